//! Error types for the `ritual-world` crate.
//!
//! Per-tick world access never fails with an error: unloaded cells read as
//! unloaded and rejected writes return `false`. [`WorldError`] covers the
//! setup paths (snapshots, entity bookkeeping) where a caller asked for
//! something impossible.

use ritual_types::{ChunkPos, EntityId, Position};

/// Errors that can occur during world setup and snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A snapshot covered a chunk that is not loaded.
    #[error("chunk {0} is not loaded")]
    ChunkNotLoaded(ChunkPos),

    /// A snapshot region exceeds the volume limit.
    #[error("region of {volume} cells exceeds the snapshot limit of {limit}")]
    RegionTooLarge {
        /// Requested volume in cells.
        volume: u64,
        /// Maximum snapshot volume.
        limit: u64,
    },

    /// A region's minimum corner lies above its maximum corner.
    #[error("region corners are inverted: min {min} is not below max {max}")]
    InvertedRegion {
        /// The minimum corner.
        min: Position,
        /// The maximum corner.
        max: Position,
    },

    /// An entity was not found.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// A position lies outside the world's vertical bounds.
    #[error("position {position} is outside the world height range {min_y}..={max_y}")]
    OutOfBounds {
        /// The offending position.
        position: Position,
        /// Lowest valid `y`.
        min_y: i32,
        /// Highest valid `y`.
        max_y: i32,
    },
}
