//! In-memory chunked world used by the headless engine and by tests.
//!
//! [`GridWorld`] stores non-air cells sparsely, tracks which chunk columns
//! are loaded, and keeps entities and item drops in ordered maps so that
//! iteration (and therefore every simulation run) is deterministic.
//!
//! Setup helpers (`set`, `fill`, `spawn_entity`) ignore the loaded state so
//! terrain can be built before chunks are loaded. The [`World`]
//! implementation honours it.

use std::collections::{BTreeMap, BTreeSet};

use ritual_types::{
    CellState, ChunkPos, EntityId, EntityKind, EntitySnapshot, ItemDrop, Material, Position,
    StatusEffect,
};
use tracing::trace;

use crate::access::World;
use crate::error::WorldError;

/// Default lowest valid `y`.
pub const DEFAULT_MIN_Y: i32 = 0;

/// Default highest valid `y`.
pub const DEFAULT_MAX_Y: i32 = 255;

/// An entity stored in a [`GridWorld`] together with its active statuses.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// The entity's current state.
    pub snapshot: EntitySnapshot,
    /// Active status effects, at most one per [`ritual_types::StatusKind`].
    pub statuses: Vec<StatusEffect>,
}

/// A sparse, chunk-loaded voxel world.
#[derive(Debug, Clone)]
pub struct GridWorld {
    /// Non-air cells.
    cells: BTreeMap<Position, CellState>,
    /// Chunk columns currently loaded.
    loaded: BTreeSet<ChunkPos>,
    /// Cells that refuse every write.
    protected: BTreeSet<Position>,
    /// Entities by identifier.
    entities: BTreeMap<EntityId, EntityRecord>,
    /// Item drops in spawn order.
    drops: Vec<(Position, ItemDrop)>,
    /// Lowest valid `y`.
    min_y: i32,
    /// Highest valid `y`.
    max_y: i32,
    /// Number of accepted writes through [`World::write`].
    writes: u64,
}

impl GridWorld {
    /// Create an empty world with the default height range and no loaded
    /// chunks.
    pub const fn new() -> Self {
        Self::with_height(DEFAULT_MIN_Y, DEFAULT_MAX_Y)
    }

    /// Create an empty world with an explicit height range.
    pub const fn with_height(min_y: i32, max_y: i32) -> Self {
        Self {
            cells: BTreeMap::new(),
            loaded: BTreeSet::new(),
            protected: BTreeSet::new(),
            entities: BTreeMap::new(),
            drops: Vec::new(),
            min_y,
            max_y,
            writes: 0,
        }
    }

    // -------------------------------------------------------------------
    // Chunk loading
    // -------------------------------------------------------------------

    /// Mark a chunk column as loaded.
    pub fn load_chunk(&mut self, chunk: ChunkPos) {
        self.loaded.insert(chunk);
    }

    /// Mark a chunk column as unloaded.
    pub fn unload_chunk(&mut self, chunk: ChunkPos) {
        self.loaded.remove(&chunk);
    }

    /// Load every chunk column within `radius_chunks` of the chunk holding
    /// `center`.
    pub fn load_area(&mut self, center: Position, radius_chunks: u32) {
        let origin = center.chunk();
        let r = i32::try_from(radius_chunks).unwrap_or(i32::MAX);
        for dx in r.saturating_neg()..=r {
            for dz in r.saturating_neg()..=r {
                self.load_chunk(ChunkPos::new(
                    origin.x.saturating_add(dx),
                    origin.z.saturating_add(dz),
                ));
            }
        }
    }

    /// Loaded chunk columns in coordinate order.
    pub fn loaded_chunks(&self) -> impl Iterator<Item = &ChunkPos> {
        self.loaded.iter()
    }

    // -------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------

    /// Set a cell directly, ignoring loading and protection.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `pos.y` is outside the height
    /// range.
    pub fn set(&mut self, pos: Position, state: CellState) -> Result<(), WorldError> {
        self.check_height(pos)?;
        self.store(pos, state);
        Ok(())
    }

    /// Fill the cuboid spanned by `a` and `b` (inclusive, any corner order).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if the cuboid leaves the height
    /// range. Nothing is written in that case.
    pub fn fill(&mut self, a: Position, b: Position, state: CellState) -> Result<(), WorldError> {
        let min = Position::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = Position::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        self.check_height(min)?;
        self.check_height(max)?;
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.store(Position::new(x, y, z), state);
                }
            }
        }
        Ok(())
    }

    /// Make a cell refuse every write.
    pub fn protect(&mut self, pos: Position) {
        self.protected.insert(pos);
    }

    /// Lift protection from a cell.
    pub fn unprotect(&mut self, pos: Position) {
        self.protected.remove(&pos);
    }

    /// Add an entity and return its identifier.
    pub fn spawn_entity(&mut self, kind: EntityKind, position: Position, health: f32) -> EntityId {
        let id = EntityId::new();
        let health = if kind.is_living() { health.max(0.0) } else { 0.0 };
        self.entities.insert(
            id,
            EntityRecord {
                snapshot: EntitySnapshot {
                    id,
                    kind,
                    position,
                    health,
                },
                statuses: Vec::new(),
            },
        );
        id
    }

    /// Move an existing entity.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] if the entity does not exist.
    pub fn move_entity(&mut self, id: EntityId, to: Position) -> Result<(), WorldError> {
        let record = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::EntityNotFound(id))?;
        record.snapshot.position = to;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------

    /// The stored entity record, including statuses.
    pub fn entity_record(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.get(&id)
    }

    /// Active statuses of an entity (empty if it does not exist).
    pub fn statuses(&self, id: EntityId) -> &[StatusEffect] {
        self.entities
            .get(&id)
            .map_or(&[], |record| record.statuses.as_slice())
    }

    /// Number of entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Item drops in spawn order.
    pub fn drops(&self) -> &[(Position, ItemDrop)] {
        &self.drops
    }

    /// Remove and return every item drop.
    pub fn take_drops(&mut self) -> Vec<(Position, ItemDrop)> {
        std::mem::take(&mut self.drops)
    }

    /// Number of accepted writes through [`World::write`].
    pub const fn write_count(&self) -> u64 {
        self.writes
    }

    /// Number of non-air cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Count the cells in the cuboid spanned by `a` and `b` that satisfy
    /// `predicate`.
    pub fn count_matching(
        &self,
        a: Position,
        b: Position,
        predicate: impl Fn(CellState) -> bool,
    ) -> usize {
        let min = Position::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = Position::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        let mut count: usize = 0;
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    if predicate(self.cell(Position::new(x, y, z))) {
                        count = count.saturating_add(1);
                    }
                }
            }
        }
        count
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn cell(&self, pos: Position) -> CellState {
        self.cells.get(&pos).copied().unwrap_or_default()
    }

    fn store(&mut self, pos: Position, state: CellState) {
        if state.is_air() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, state);
        }
    }

    const fn in_height(&self, pos: Position) -> bool {
        pos.y >= self.min_y && pos.y <= self.max_y
    }

    const fn check_height(&self, pos: Position) -> Result<(), WorldError> {
        if self.in_height(pos) {
            Ok(())
        } else {
            Err(WorldError::OutOfBounds {
                position: pos,
                min_y: self.min_y,
                max_y: self.max_y,
            })
        }
    }

    fn living_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        let loaded = &self.loaded;
        self.entities.get_mut(&id).filter(|record| {
            record.snapshot.kind.is_living() && loaded.contains(&record.snapshot.position.chunk())
        })
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl World for GridWorld {
    fn is_loaded(&self, pos: Position) -> bool {
        self.in_height(pos) && self.loaded.contains(&pos.chunk())
    }

    fn read(&self, pos: Position) -> CellState {
        if self.is_loaded(pos) {
            self.cell(pos)
        } else {
            CellState::Air
        }
    }

    fn write(&mut self, pos: Position, state: CellState) -> bool {
        if !self.is_loaded(pos) || self.protected.contains(&pos) {
            return false;
        }
        if self.cell(pos).is(Material::Bedrock) {
            return false;
        }
        self.store(pos, state);
        self.writes = self.writes.saturating_add(1);
        trace!(%pos, ?state, "cell written");
        true
    }

    fn entities_in_radius(&self, center: Position, radius: u32) -> Vec<EntitySnapshot> {
        self.entities
            .values()
            .map(|record| record.snapshot)
            .filter(|snapshot| {
                center.within(snapshot.position, radius)
                    && self.loaded.contains(&snapshot.position.chunk())
            })
            .collect()
    }

    fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.entities.get(&id).map(|record| record.snapshot)
    }

    fn apply_status(&mut self, id: EntityId, effect: StatusEffect) -> bool {
        let Some(record) = self.living_mut(id) else {
            return false;
        };
        if let Some(existing) = record
            .statuses
            .iter_mut()
            .find(|status| status.kind == effect.kind)
        {
            existing.amplifier = existing.amplifier.max(effect.amplifier);
            existing.duration_ticks = existing.duration_ticks.max(effect.duration_ticks);
        } else {
            record.statuses.push(effect);
        }
        true
    }

    fn damage_entity(&mut self, id: EntityId, amount: f32) -> bool {
        if amount <= 0.0 {
            return false;
        }
        let Some(record) = self.living_mut(id) else {
            return false;
        };
        record.snapshot.health = (record.snapshot.health - amount).max(0.0);
        if record.snapshot.health <= 0.0 {
            self.entities.remove(&id);
            trace!(%id, "entity died");
        }
        true
    }

    fn remove_entity(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    fn spawn_drop(&mut self, pos: Position, drop: ItemDrop) -> bool {
        if !self.is_loaded(pos) || drop.count == 0 {
            return false;
        }
        self.drops.push((pos, drop));
        true
    }
}
