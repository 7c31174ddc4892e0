//! Ore formation in clean stone.
//!
//! Caches stone cells (by default only stone enclosed on all six sides, so
//! ore never appears on exposed faces) and turns a picked cell into an ore
//! drawn from the abundance table. The variant has no corrupted form: an
//! inverted ritual simply does nothing.
//!
//! Stone deep inside a large area is rarely hit by random sampling, so this
//! variant also accepts positions from background scans.

use ritual_types::{CellState, EffectEventKind, Material, Offset, OreKind, Position, VariantKind};
use ritual_world::World;
use tracing::trace;

use crate::config::OreGenerationConfig;
use crate::context::EffectContext;
use crate::loot::{WeightedTable, ore_table};
use crate::store::{CandidateEntry, CandidateStore};
use crate::strategy::{EffectStrategy, Mutation, replenish_positions};

/// The six face-adjacent neighbours.
const FACES: [Offset; 6] = [
    Offset::new(1, 0, 0),
    Offset::new(-1, 0, 0),
    Offset::new(0, 1, 0),
    Offset::new(0, -1, 0),
    Offset::new(0, 0, 1),
    Offset::new(0, 0, -1),
];

/// Ore generation strategy.
#[derive(Debug, Clone)]
pub struct OreGenerationStrategy {
    /// Variant settings.
    config: OreGenerationConfig,
    /// Ore abundance.
    ores: WeightedTable<OreKind>,
}

impl OreGenerationStrategy {
    /// Create the strategy with natural ore abundance.
    pub fn new(config: &OreGenerationConfig) -> Self {
        Self {
            config: config.clone(),
            ores: ore_table(),
        }
    }
}

fn enclosed(world: &dyn World, pos: Position) -> bool {
    FACES
        .iter()
        .all(|&face| world.read(pos.offset(face)).is_solid())
}

impl EffectStrategy for OreGenerationStrategy {
    type Key = Position;
    type Payload = ();

    fn kind(&self) -> VariantKind {
        VariantKind::OreGeneration
    }

    fn verify(&self, world: &dyn World, key: Position) -> bool {
        world.read(key).is(Material::Stone) && (!self.config.require_enclosed || enclosed(world, key))
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
        let Some(ore) = self.ores.pick(&mut *ctx.rng) else {
            return Mutation::Unchanged;
        };
        if !ctx.world.write(pos, CellState::Ore(ore)) {
            return Mutation::Unchanged;
        }
        ctx.emit(EffectEventKind::OreFormed, pos);
        Mutation::Consumed
    }

    fn corrupt(&self, ctx: &mut EffectContext<'_>, target: Position) -> bool {
        trace!(ritual = %ctx.ritual, %target, "ore generation has no corrupted form");
        false
    }

    fn key_at(&self, pos: Position) -> Option<Position> {
        Some(pos)
    }

    fn scan_filter(&self) -> Option<fn(CellState) -> bool> {
        Some(|cell: CellState| cell.is(Material::Stone))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use ritual_world::GridWorld;

    use super::*;
    use crate::dispatcher::{DispatchState, dispatch};
    use crate::properties::{Augment, EffectProperties};
    use crate::variants::testing::activation;

    fn stone_block() -> GridWorld {
        let mut world = GridWorld::new();
        world.load_area(Position::ORIGIN, 1);
        let filled = world.fill(
            Position::new(-3, 40, -3),
            Position::new(3, 46, 3),
            CellState::block(Material::Stone),
        );
        assert!(filled.is_ok());
        world
    }

    #[test]
    fn only_enclosed_stone_qualifies_by_default() {
        let world = stone_block();
        let strategy = OreGenerationStrategy::new(&OreGenerationConfig::default());
        assert!(strategy.verify(&world, Position::new(0, 43, 0)));
        assert!(!strategy.verify(&world, Position::new(0, 46, 0)));

        let lenient = OreGenerationStrategy::new(&OreGenerationConfig {
            require_enclosed: false,
            ..OreGenerationConfig::default()
        });
        assert!(lenient.verify(&world, Position::new(0, 46, 0)));
    }

    #[test]
    fn benign_ticks_turn_stone_into_ore() {
        let mut world = stone_block();
        let origin = Position::new(0, 43, 0);
        let strategy = OreGenerationStrategy::new(&OreGenerationConfig::default());
        let config = OreGenerationConfig::default().base();
        let mut store = CandidateStore::new(12, 2);
        let mut rng = SmallRng::seed_from_u64(21);

        let mut formed = 0_usize;
        for _ in 0..100 {
            let mut ctx = EffectContext::new(
                activation(origin),
                VariantKind::OreGeneration,
                EffectProperties::benign(2),
                &mut world,
                &mut rng,
            );
            let report = dispatch(&strategy, &config, &mut store, &mut ctx);
            formed = formed.saturating_add(report.consumed);
        }
        assert!(formed > 0);
        let ores = world.count_matching(
            Position::new(-3, 40, -3),
            Position::new(3, 46, 3),
            |cell| matches!(cell, CellState::Ore(_)),
        );
        assert_eq!(ores, formed);
    }

    #[test]
    fn corrupted_ticks_change_nothing() {
        let mut world = stone_block();
        let strategy = OreGenerationStrategy::new(&OreGenerationConfig::default());
        let config = OreGenerationConfig::default().base();
        let mut store: CandidateStore<Position, ()> = CandidateStore::new(12, 2);
        let mut rng = SmallRng::seed_from_u64(22);
        for _ in 0..50 {
            let mut ctx = EffectContext::new(
                activation(Position::new(0, 43, 0)),
                VariantKind::OreGeneration,
                EffectProperties::derive(2, &[Augment::Inverted]),
                &mut world,
                &mut rng,
            );
            let report = dispatch(&strategy, &config, &mut store, &mut ctx);
            assert_eq!(report.state, DispatchState::CorruptedApply);
            assert!(!report.changed);
        }
        assert_eq!(world.write_count(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn scan_filter_reports_stone() {
        let strategy = OreGenerationStrategy::new(&OreGenerationConfig::default());
        let filter = strategy.scan_filter().unwrap();
        assert!(filter(CellState::block(Material::Stone)));
        assert!(!filter(CellState::Ore(OreKind::Iron)));
    }
}
