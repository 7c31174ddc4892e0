//! Cleansing of hazardous terrain.
//!
//! Caches lava, fire, magma and netherrack and turns a picked cell into its
//! safe counterpart. Corrupted, the effect does the reverse around a sampled
//! cell: stone becomes netherrack, soil becomes magma, and open ground
//! catches fire.

use ritual_types::{CellState, EffectEventKind, Material, Position, VariantKind};
use ritual_world::World;

use crate::config::PurificationConfig;
use crate::context::EffectContext;
use crate::store::{CandidateEntry, CandidateStore};
use crate::strategy::{EffectStrategy, Mutation, replenish_positions};
use crate::variants::can_ignite;

/// The safe replacement for a hazardous cell.
pub const fn cleansed(state: CellState) -> Option<CellState> {
    match state {
        CellState::Block(Material::Lava) => Some(CellState::Block(Material::Obsidian)),
        CellState::Block(Material::Fire) => Some(CellState::Air),
        CellState::Block(Material::Magma | Material::Netherrack) => {
            Some(CellState::Block(Material::Stone))
        }
        _ => None,
    }
}

/// The infernal replacement for a clean cell.
const fn tainted(state: CellState) -> Option<CellState> {
    match state {
        CellState::Block(Material::Stone) => Some(CellState::Block(Material::Netherrack)),
        CellState::Block(Material::Dirt | Material::Grass | Material::Farmland) => {
            Some(CellState::Block(Material::Magma))
        }
        _ => None,
    }
}

/// Purification strategy.
#[derive(Debug, Clone)]
pub struct PurificationStrategy {
    /// Variant settings.
    config: PurificationConfig,
}

impl PurificationStrategy {
    /// Create the strategy.
    pub fn new(config: &PurificationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// The settings this strategy was built with.
    pub const fn config(&self) -> &PurificationConfig {
        &self.config
    }
}

impl EffectStrategy for PurificationStrategy {
    type Key = Position;
    type Payload = ();

    fn kind(&self) -> VariantKind {
        VariantKind::Purification
    }

    fn verify(&self, world: &dyn World, key: Position) -> bool {
        cleansed(world.read(key)).is_some()
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
        let Some(replacement) = cleansed(ctx.world.read(pos)) else {
            return Mutation::Unchanged;
        };
        if !ctx.world.write(pos, replacement) {
            return Mutation::Unchanged;
        }
        ctx.emit(EffectEventKind::HazardCleansed, pos);
        Mutation::Consumed
    }

    fn corrupt(&self, ctx: &mut EffectContext<'_>, target: Position) -> bool {
        let state = ctx.world.read(target);
        let (replacement, event) = if let Some(replacement) = tainted(state) {
            (replacement, EffectEventKind::TerrainCorrupted)
        } else if can_ignite(&*ctx.world, target) {
            (CellState::block(Material::Fire), EffectEventKind::BlockIgnited)
        } else {
            return false;
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

    fn scan_filter(&self) -> Option<fn(CellState) -> bool> {
        Some(|cell: CellState| cleansed(cell).is_some())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::dispatcher::dispatch;
    use crate::properties::EffectProperties;
    use crate::variants::testing::{activation, floor_world};

    #[test]
    fn hazards_map_to_safe_cells() {
        assert_eq!(
            cleansed(CellState::block(Material::Lava)),
            Some(CellState::block(Material::Obsidian))
        );
        assert_eq!(cleansed(CellState::block(Material::Fire)), Some(CellState::Air));
        assert_eq!(
            cleansed(CellState::block(Material::Netherrack)),
            Some(CellState::block(Material::Stone))
        );
        assert!(cleansed(CellState::block(Material::Stone)).is_none());
    }

    #[test]
    fn lava_pool_is_cleansed_over_time() {
        let mut world = floor_world();
        let origin = Position::new(0, 60, 0);
        let filled = world.fill(
            Position::new(-1, 59, -1),
            Position::new(1, 59, 1),
            CellState::block(Material::Lava),
        );
        assert!(filled.is_ok());

        let strategy = PurificationStrategy::new(&PurificationConfig::default());
        let config = strategy.config().base();
        let mut store = CandidateStore::new(16, 1);
        let mut rng = SmallRng::seed_from_u64(51);
        for _ in 0..400 {
            let mut ctx = EffectContext::new(
                activation(origin),
                VariantKind::Purification,
                EffectProperties::benign(1),
                &mut world,
                &mut rng,
            );
            dispatch(&strategy, &config, &mut store, &mut ctx);
        }
        let lava = world.count_matching(
            Position::new(-1, 59, -1),
            Position::new(1, 59, 1),
            |cell| cell.is(Material::Lava),
        );
        assert_eq!(lava, 0);
    }

    #[test]
    fn corruption_taints_and_ignites() {
        let mut world = floor_world();
        let stone = Position::new(0, 59, 0);
        let dirt = Position::new(1, 59, 0);
        let air = Position::new(2, 60, 0);
        assert!(world.set(dirt, CellState::block(Material::Dirt)).is_ok());

        let strategy = PurificationStrategy::new(&PurificationConfig::default());
        let mut rng = SmallRng::seed_from_u64(52);
        {
            let mut ctx = EffectContext::new(
                activation(stone),
                VariantKind::Purification,
                EffectProperties::benign(4),
                &mut world,
                &mut rng,
            );
            assert!(strategy.corrupt(&mut ctx, stone));
            assert!(strategy.corrupt(&mut ctx, dirt));
            assert!(strategy.corrupt(&mut ctx, air));
            assert!(!strategy.corrupt(&mut ctx, Position::new(0, 70, 0)));
        }
        assert!(world.read(stone).is(Material::Netherrack));
        assert!(world.read(dirt).is(Material::Magma));
        assert!(world.read(air).is(Material::Fire));
    }
}
