//! Integer cell coordinates, offsets, and chunk coordinates.
//!
//! A [`Position`] identifies one world cell. Positions are immutable values
//! compared and hashed by coordinates. All coordinate arithmetic saturates at
//! the `i32` bounds so that sampling near the edge of the coordinate space
//! can never overflow.

use serde::{Deserialize, Serialize};

/// Width (and depth) of a chunk in cells, as a bit shift.
pub const CHUNK_SHIFT: u32 = 4;

/// A world cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// East-west coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
    /// North-south coordinate.
    pub z: i32,
}

impl Position {
    /// The world origin `(0, 0, 0)`.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Construct a position from its coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return this position shifted by `offset`, saturating at the bounds.
    #[must_use]
    pub const fn offset(self, offset: Offset) -> Self {
        Self {
            x: self.x.saturating_add(offset.dx),
            y: self.y.saturating_add(offset.dy),
            z: self.z.saturating_add(offset.dz),
        }
    }

    /// The cell directly above.
    #[must_use]
    pub const fn above(self) -> Self {
        self.offset(Offset::new(0, 1, 0))
    }

    /// The cell directly below.
    #[must_use]
    pub const fn below(self) -> Self {
        self.offset(Offset::new(0, -1, 0))
    }

    /// The chunk column containing this cell.
    pub const fn chunk(self) -> ChunkPos {
        ChunkPos {
            x: self.x >> CHUNK_SHIFT,
            z: self.z >> CHUNK_SHIFT,
        }
    }

    /// Chebyshev (chessboard) distance to `other`: the largest per-axis gap.
    ///
    /// This is the distance under which cube sampling is uniform, so it is
    /// the natural range check for candidates found by cube sampling.
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        let xy = if dx > dy { dx } else { dy };
        if xy > dz { xy } else { dz }
    }

    /// Whether `other` lies inside the cube of half-width `radius` around
    /// this position.
    pub const fn within(self, other: Self, radius: u32) -> bool {
        self.chebyshev_distance(other) <= radius
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A relative displacement between two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Offset {
    /// East-west displacement.
    pub dx: i32,
    /// Vertical displacement.
    pub dy: i32,
    /// North-south displacement.
    pub dz: i32,
}

impl Offset {
    /// The zero displacement.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Construct an offset from its components.
    pub const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }

    /// Whether every component lies in `[-radius, radius]`.
    pub const fn within_cube(self, radius: u32) -> bool {
        self.dx.unsigned_abs() <= radius
            && self.dy.unsigned_abs() <= radius
            && self.dz.unsigned_abs() <= radius
    }
}

/// A chunk column coordinate. Loading and unloading happens per chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    /// Chunk column index along x.
    pub x: i32,
    /// Chunk column index along z.
    pub z: i32,
}

impl ChunkPos {
    /// Construct a chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl core::fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_saturates_at_bounds() {
        let edge = Position::new(i32::MAX, i32::MIN, 0);
        let moved = edge.offset(Offset::new(5, -5, 3));
        assert_eq!(moved, Position::new(i32::MAX, i32::MIN, 3));
    }

    #[test]
    fn chunk_of_negative_coordinates_rounds_down() {
        assert_eq!(Position::new(-1, 64, -16).chunk(), ChunkPos::new(-1, -1));
        assert_eq!(Position::new(15, 0, 16).chunk(), ChunkPos::new(0, 1));
    }

    #[test]
    fn chebyshev_distance_takes_largest_axis() {
        let a = Position::new(0, 60, 0);
        let b = Position::new(3, 58, -7);
        assert_eq!(a.chebyshev_distance(b), 7);
        assert!(a.within(b, 7));
        assert!(!a.within(b, 6));
    }

    #[test]
    fn offset_cube_membership() {
        assert!(Offset::new(-3, 3, 0).within_cube(3));
        assert!(!Offset::new(-4, 0, 0).within_cube(3));
        assert!(Offset::ZERO.within_cube(0));
    }
}
