//! The [`World`] trait: everything an effect may read or change.
//!
//! Effects never see a concrete world type. The engine hands them a
//! `&mut dyn World`, which keeps the effect crate independent of how cells and
//! entities are stored. All calls happen on the tick thread.

use ritual_types::{CellState, EntityId, EntitySnapshot, ItemDrop, Position, StatusEffect};

/// Read/write access to cells and entities.
///
/// Queries against unloaded chunks are not errors: [`World::is_loaded`]
/// reports them, reads return [`CellState::Air`], writes return `false`, and
/// entity queries skip them.
pub trait World {
    /// Whether the chunk containing `pos` is loaded and simulated.
    fn is_loaded(&self, pos: Position) -> bool;

    /// Read the cell at `pos`. Unloaded cells read as air.
    fn read(&self, pos: Position) -> CellState;

    /// Replace the cell at `pos`.
    ///
    /// Returns `false` when the write was refused (unloaded chunk, protected
    /// or immutable cell, outside the height range) and the world is
    /// unchanged.
    fn write(&mut self, pos: Position, state: CellState) -> bool;

    /// Every entity in a loaded chunk within the cube of half-width `radius`
    /// around `center`.
    fn entities_in_radius(&self, center: Position, radius: u32) -> Vec<EntitySnapshot>;

    /// A snapshot of one entity, or `None` if it no longer exists.
    fn entity(&self, id: EntityId) -> Option<EntitySnapshot>;

    /// Apply a status effect to a living entity. Returns whether it applied.
    fn apply_status(&mut self, id: EntityId, effect: StatusEffect) -> bool;

    /// Damage a living entity; entities whose health drops to zero die and
    /// are removed. Returns whether damage was dealt.
    fn damage_entity(&mut self, id: EntityId, amount: f32) -> bool;

    /// Remove an entity outright (e.g. a deflected projectile). Returns
    /// whether it existed.
    fn remove_entity(&mut self, id: EntityId) -> bool;

    /// Drop an item stack at `pos`. Returns whether the drop was placed.
    fn spawn_drop(&mut self, pos: Position, drop: ItemDrop) -> bool;
}
