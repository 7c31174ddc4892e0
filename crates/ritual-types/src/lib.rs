//! Shared type definitions for the ritual effect engine.
//!
//! Every crate in the workspace speaks in these types: cell coordinates,
//! cell contents, entity snapshots, and the events effects broadcast.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for rituals, entities, and scans
//! - [`position`] -- Cell positions, offsets, and chunk coordinates
//! - [`enums`] -- Materials, ores, crops, entity/status/item kinds, variants
//! - [`structs`] -- Cell states, entity snapshots, drops, and effect events

pub mod enums;
pub mod ids;
pub mod position;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AnimalKind, CropKind, EffectEventKind, EntityKind, Item, Material, OreKind, StatusKind,
    VariantKind,
};
pub use ids::{EntityId, RitualId, ScanId};
pub use position::{CHUNK_SHIFT, ChunkPos, Offset, Position};
pub use structs::{CellState, EffectEvent, EntitySnapshot, ItemDrop, ORE_HARDNESS, StatusEffect};
