//! The world model the ritual effects read and mutate.
//!
//! Effects only ever see the [`World`] trait. This crate also provides the
//! in-memory [`GridWorld`] the headless engine and the tests run against,
//! read-only region snapshots for background scans, and the demo terrain.
//!
//! # Modules
//!
//! - [`access`] -- The [`World`] trait: cell and entity queries and writes.
//! - [`error`] -- Error types for world setup and snapshots.
//! - [`grid`] -- Sparse chunk-loaded voxel world with entities and drops.
//! - [`snapshot`] -- Owned region copies that can cross thread boundaries.
//! - [`terrain`] -- Demo terrain with one site per effect variant.

pub mod access;
pub mod error;
pub mod grid;
pub mod snapshot;
pub mod terrain;

// Re-export primary types at crate root.
pub use access::World;
pub use error::WorldError;
pub use grid::{DEFAULT_MAX_Y, DEFAULT_MIN_Y, EntityRecord, GridWorld};
pub use snapshot::{MAX_SNAPSHOT_VOLUME, Region, RegionSnapshot};
pub use terrain::{DemoSites, FLOOR_Y, HALF_WIDTH, SURFACE_Y, create_demo_terrain};
