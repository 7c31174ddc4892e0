//! Controlled block removal.
//!
//! Caches solid blocks up to a hardness limit, removes a picked block, and
//! drops what it would yield when mined. Corrupted, the effect shatters any
//! sampled block whose blast resistance is within its limit and drops
//! nothing.
//!
//! Ore veins found by background scans can be seeded into the store.

use ritual_types::{CellState, EffectEventKind, Position, VariantKind};
use ritual_world::World;
use tracing::warn;

use crate::config::ExcavationConfig;
use crate::context::EffectContext;
use crate::store::{CandidateEntry, CandidateStore};
use crate::strategy::{EffectStrategy, Mutation, replenish_positions};

/// Excavation strategy.
#[derive(Debug, Clone)]
pub struct ExcavationStrategy {
    /// Variant settings.
    config: ExcavationConfig,
}

impl ExcavationStrategy {
    /// Create the strategy.
    pub fn new(config: &ExcavationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl EffectStrategy for ExcavationStrategy {
    type Key = Position;
    type Payload = ();

    fn kind(&self) -> VariantKind {
        VariantKind::Excavation
    }

    fn verify(&self, world: &dyn World, key: Position) -> bool {
        let cell = world.read(key);
        cell.is_solid()
            && cell
                .hardness()
                .is_some_and(|hardness| hardness <= self.config.max_hardness)
    }

    fn generate(&self, _key: Position) {}

    fn replenish(&self, ctx: &mut EffectContext<'_>, store: &mut CandidateStore<Position, ()>) -> usize {
        replenish_positions(self, ctx, store)
    }

    fn mutate(
        &self,
        ctx: &mut EffectContext<'_>,
        entry: &mut CandidateEntry<Position, ()>,
        _repetitions: u32,
    ) -> Mutation {
        let pos = entry.key();
        let yielded = ctx.world.read(pos).drop();
        if !ctx.world.write(pos, CellState::Air) {
            return Mutation::Unchanged;
        }
        if let Some(drop) = yielded
            && !ctx.world.spawn_drop(pos, drop)
        {
            warn!(ritual = %ctx.ritual, %pos, item = ?drop.item, "excavation drop refused");
        }
        ctx.emit(EffectEventKind::BlockExcavated, pos);
        Mutation::Consumed
    }

    fn corrupt(&self, ctx: &mut EffectContext<'_>, target: Position) -> bool {
        let cell = ctx.world.read(target);
        if cell.is_air() || cell.blast_resistance() > self.config.max_blast_resistance {
            return false;
        }
        if !ctx.world.write(target, CellState::Air) {
            return false;
        }
        ctx.emit(EffectEventKind::BlockShattered, target);
        true
    }

    fn key_at(&self, pos: Position) -> Option<Position> {
        Some(pos)
    }

    fn scan_filter(&self) -> Option<fn(CellState) -> bool> {
        Some(|cell: CellState| matches!(cell, CellState::Ore(_)))
    }
}
