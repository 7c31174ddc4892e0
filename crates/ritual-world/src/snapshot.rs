//! Read-only region snapshots for off-thread scans.
//!
//! Heavy scans (ore veins, structure searches) must never touch the live
//! world from a worker thread. The tick thread captures a [`RegionSnapshot`],
//! which owns plain copies of the cells and is `Send + 'static`, and hands it
//! to the worker. Results travel back through a channel and are re-checked
//! against the live world before anything is mutated.

use std::collections::BTreeMap;

use ritual_types::{CellState, Position};

use crate::access::World;
use crate::error::WorldError;

/// Largest region volume a single snapshot may capture.
pub const MAX_SNAPSHOT_VOLUME: u64 = 64 * 64 * 64;

/// An inclusive axis-aligned cuboid of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Lowest corner (inclusive).
    pub min: Position,
    /// Highest corner (inclusive).
    pub max: Position,
}

impl Region {
    /// Construct a region from its corners.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvertedRegion`] if `min` is above `max` on any
    /// axis.
    pub const fn new(min: Position, max: Position) -> Result<Self, WorldError> {
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return Err(WorldError::InvertedRegion { min, max });
        }
        Ok(Self { min, max })
    }

    /// The cube of half-width `radius` around `center`.
    pub fn around(center: Position, radius: u32) -> Self {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        Self {
            min: Position::new(
                center.x.saturating_sub(r),
                center.y.saturating_sub(r),
                center.z.saturating_sub(r),
            ),
            max: Position::new(
                center.x.saturating_add(r),
                center.y.saturating_add(r),
                center.z.saturating_add(r),
            ),
        }
    }

    /// Number of cells in the region.
    pub fn volume(&self) -> u64 {
        let span = |lo: i32, hi: i32| u64::from(hi.abs_diff(lo)).saturating_add(1);
        span(self.min.x, self.max.x)
            .saturating_mul(span(self.min.y, self.max.y))
            .saturating_mul(span(self.min.z, self.max.z))
    }

    /// Whether `pos` lies inside the region.
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.y >= self.min.y
            && pos.y <= self.max.y
            && pos.z >= self.min.z
            && pos.z <= self.max.z
    }

    /// Every position in the region, x-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.min.x..=self.max.x).flat_map(move |x| {
            (self.min.y..=self.max.y)
                .flat_map(move |y| (self.min.z..=self.max.z).map(move |z| Position::new(x, y, z)))
        })
    }
}

/// An owned, read-only copy of the cells in a [`Region`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSnapshot {
    /// The captured region.
    region: Region,
    /// Non-air cells inside the region.
    cells: BTreeMap<Position, CellState>,
}

impl RegionSnapshot {
    /// Capture every cell of `region` from `world`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionTooLarge`] if the region exceeds
    /// [`MAX_SNAPSHOT_VOLUME`], or [`WorldError::ChunkNotLoaded`] if any
    /// cell lies in an unloaded chunk.
    pub fn capture(world: &dyn World, region: Region) -> Result<Self, WorldError> {
        let volume = region.volume();
        if volume > MAX_SNAPSHOT_VOLUME {
            return Err(WorldError::RegionTooLarge {
                volume,
                limit: MAX_SNAPSHOT_VOLUME,
            });
        }

        let mut cells = BTreeMap::new();
        for pos in region.positions() {
            if !world.is_loaded(pos) {
                return Err(WorldError::ChunkNotLoaded(pos.chunk()));
            }
            let state = world.read(pos);
            if !state.is_air() {
                cells.insert(pos, state);
            }
        }
        Ok(Self { region, cells })
    }

    /// The captured region.
    pub const fn region(&self) -> Region {
        self.region
    }

    /// Read a captured cell. Positions outside the region read as air.
    pub fn read(&self, pos: Position) -> CellState {
        self.cells.get(&pos).copied().unwrap_or_default()
    }

    /// Every captured position whose cell satisfies `predicate`, in
    /// coordinate order.
    pub fn positions_matching(&self, predicate: impl Fn(CellState) -> bool) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|&(_, &state)| predicate(state))
            .map(|(&pos, _)| pos)
            .collect()
    }

    /// Number of non-air cells captured.
    pub fn solid_count(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ritual_types::{Material, OreKind};

    use super::*;
    use crate::grid::GridWorld;

    #[test]
    fn region_rejects_inverted_corners() {
        let result = Region::new(Position::new(1, 0, 0), Position::new(0, 0, 0));
        assert!(matches!(result, Err(WorldError::InvertedRegion { .. })));
    }

    #[test]
    fn region_volume_and_membership() {
        let region = Region::around(Position::new(0, 60, 0), 2);
        assert_eq!(region.volume(), 125);
        assert_eq!(region.positions().count(), 125);
        assert!(region.contains(Position::new(-2, 62, 2)));
        assert!(!region.contains(Position::new(-3, 60, 0)));
    }

    #[test]
    fn capture_copies_cells_and_is_detached_from_world() {
        let mut world = GridWorld::new();
        world.load_area(Position::ORIGIN, 1);
        let ore = Position::new(1, 40, 1);
        assert!(world.set(ore, CellState::Ore(OreKind::Gold)).is_ok());

        let snapshot = RegionSnapshot::capture(&world, Region::around(ore, 2)).unwrap();

        assert!(world.write(ore, CellState::block(Material::Stone)));
        assert_eq!(snapshot.read(ore), CellState::Ore(OreKind::Gold));
        assert_eq!(
            snapshot.positions_matching(|cell| matches!(cell, CellState::Ore(_))),
            vec![ore]
        );
    }

    #[test]
    fn capture_refuses_unloaded_and_oversized_regions() {
        let mut world = GridWorld::new();
        world.load_chunk(Position::ORIGIN.chunk());

        let straddling = RegionSnapshot::capture(&world, Region::around(Position::new(15, 40, 8), 2));
        assert!(matches!(straddling, Err(WorldError::ChunkNotLoaded(_))));

        let huge = RegionSnapshot::capture(&world, Region::around(Position::new(8, 100, 8), 40));
        assert!(matches!(huge, Err(WorldError::RegionTooLarge { .. })));
    }
}
