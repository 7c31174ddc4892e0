//! Fishing from open water.
//!
//! Caches water cells with open air above. Each pick advances the cell's
//! timer by one plus the repetition count earned from strength, so stronger
//! rituals fish faster without caching more water. When the timer reaches
//! the catch threshold a weighted random catch drops above the water and
//! the timer restarts. Corrupted, sampled water is drained or frozen.

use rand::Rng;
use ritual_types::{CellState, EffectEventKind, Item, ItemDrop, Material, Position, VariantKind};
use ritual_world::World;

use crate::config::FishingConfig;
use crate::context::EffectContext;
use crate::loot::{WeightedTable, fishing_loot};
use crate::store::{CandidateEntry, CandidateStore};
use crate::strategy::{EffectStrategy, Mutation, replenish_positions};

/// Progress toward the next catch at one water cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FishingTimer {
    /// Accumulated ticks.
    pub ticks: u32,
}

/// Fishing strategy.
#[derive(Debug, Clone)]
pub struct FishingStrategy {
    /// Variant settings.
    config: FishingConfig,
    /// Catch table.
    loot: WeightedTable<Item>,
}

impl FishingStrategy {
    /// Create the strategy with the standard catch table.
    pub fn new(config: &FishingConfig) -> Self {
        Self {
            config: config.clone(),
            loot: fishing_loot(),
        }
    }
}

impl EffectStrategy for FishingStrategy {
    type Key = Position;
    type Payload = FishingTimer;

    fn kind(&self) -> VariantKind {
        VariantKind::Fishing
    }

    fn verify(&self, world: &dyn World, key: Position) -> bool {
        let above = key.above();
        world.read(key).is(Material::Water) && world.is_loaded(above) && world.read(above).is_air()
    }

    fn generate(&self, _key: Position) -> FishingTimer {
        FishingTimer::default()
    }

    fn replenish(
        &self,
        ctx: &mut EffectContext<'_>,
        store: &mut CandidateStore<Position, FishingTimer>,
    ) -> usize {
        replenish_positions(self, ctx, store)
    }

    fn repetition_step(&self) -> Option<f32> {
        Some(self.config.repetition_step)
    }

    fn mutate(
        &self,
        ctx: &mut EffectContext<'_>,
        entry: &mut CandidateEntry<Position, FishingTimer>,
        repetitions: u32,
    ) -> Mutation {
        let pos = entry.key();
        let timer = &mut entry.payload;
        timer.ticks = timer.ticks.saturating_add(repetitions.saturating_add(1));
        if timer.ticks < self.config.catch_ticks {
            return Mutation::Progressed;
        }

        let Some(item) = self.loot.pick(&mut *ctx.rng) else {
            return Mutation::Progressed;
        };
        if !ctx.world.spawn_drop(pos.above(), ItemDrop::single(item)) {
            return Mutation::Progressed;
        }
        timer.ticks = 0;
        ctx.emit(EffectEventKind::FishCaught, pos);
        Mutation::Applied
    }

    fn corrupt(&self, ctx: &mut EffectContext<'_>, target: Position) -> bool {
        if !ctx.world.read(target).is(Material::Water) {
            return false;
        }
        let (replacement, event) = if ctx.rng.random_bool(0.5) {
            (CellState::Air, EffectEventKind::WaterDrained)
        } else {
            (CellState::block(Material::Ice), EffectEventKind::BlockFrozen)
        };
        if !ctx.world.write(target, replacement) {
            return false;
        }
        ctx.emit(event, target);
        true
    }

    fn key_at(&self, pos: Position) -> Option<Position> {
        Some(pos)
    }
}
