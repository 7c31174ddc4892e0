//! Progressive melting.
//!
//! Caches meltable cells and heats one per tick. Progress lives in the
//! candidate's payload; once it reaches the material's melt duration the
//! cell is replaced by its molten or thawed form. Corrupted, a sampled cell
//! is changed at once: fluids freeze, empty ground ignites, and meltable
//! blocks are scorched without waiting.

use ritual_types::{CellState, EffectEventKind, Material, Position, VariantKind};
use ritual_world::World;

use crate::config::MeltConfig;
use crate::context::EffectContext;
use crate::store::{CandidateEntry, CandidateStore};
use crate::strategy::{EffectStrategy, Mutation, replenish_positions};
use crate::variants::can_ignite;

/// Heat accumulated by one cached cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeltProgress {
    /// Ticks of heat applied so far.
    pub ticks: u32,
}

/// What a material melts into, if it melts at all.
pub const fn melt_result(material: Material) -> Option<CellState> {
    match material {
        Material::Ice | Material::PackedIce => Some(CellState::Block(Material::Water)),
        Material::Snow => Some(CellState::Air),
        Material::Sand => Some(CellState::Block(Material::Glass)),
        Material::Stone | Material::Cobblestone | Material::Netherrack => {
            Some(CellState::Block(Material::Lava))
        }
        _ => None,
    }
}

/// Ticks of heat `material` needs, given the configured base duration.
pub const fn melt_duration(base: u32, material: Material) -> u32 {
    let tier: u32 = match material {
        Material::Ice | Material::PackedIce | Material::Snow => 1,
        Material::Sand => 2,
        _ => 3,
    };
    base.saturating_mul(tier)
}

fn meltable(state: CellState) -> Option<(Material, CellState)> {
    let material = state.material()?;
    melt_result(material).map(|result| (material, result))
}

/// Melt strategy.
#[derive(Debug, Clone)]
pub struct MeltStrategy {
    /// Variant settings.
    config: MeltConfig,
}

impl MeltStrategy {
    /// Create the strategy.
    pub fn new(config: &MeltConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl EffectStrategy for MeltStrategy {
    type Key = Position;
    type Payload = MeltProgress;

    fn kind(&self) -> VariantKind {
        VariantKind::Melt
    }

    fn verify(&self, world: &dyn World, key: Position) -> bool {
        meltable(world.read(key)).is_some()
    }

    fn generate(&self, _key: Position) -> MeltProgress {
        MeltProgress::default()
    }

    fn replenish(
        &self,
        ctx: &mut EffectContext<'_>,
        store: &mut CandidateStore<Position, MeltProgress>,
    ) -> usize {
        replenish_positions(self, ctx, store)
    }

    fn mutate(
        &self,
        ctx: &mut EffectContext<'_>,
        entry: &mut CandidateEntry<Position, MeltProgress>,
        _repetitions: u32,
    ) -> Mutation {
        let pos = entry.key();
        let Some((material, result)) = meltable(ctx.world.read(pos)) else {
            return Mutation::Unchanged;
        };

        entry.payload.ticks = entry.payload.ticks.saturating_add(1);
        if entry.payload.ticks < melt_duration(self.config.melt_duration, material) {
            return Mutation::Progressed;
        }
        if !ctx.world.write(pos, result) {
            return Mutation::Progressed;
        }
        ctx.emit(EffectEventKind::BlockMelted, pos);
        Mutation::Consumed
    }

    fn corrupt(&self, ctx: &mut EffectContext<'_>, target: Position) -> bool {
        let state = ctx.world.read(target);
        let (replacement, event) = match state {
            CellState::Block(Material::Water) => {
                (CellState::block(Material::Ice), EffectEventKind::BlockFrozen)
            }
            CellState::Block(Material::Lava) => {
                (CellState::block(Material::Obsidian), EffectEventKind::BlockFrozen)
            }
            CellState::Air if can_ignite(&*ctx.world, target) => {
                (CellState::block(Material::Fire), EffectEventKind::BlockIgnited)
            }
            other => match meltable(other) {
                Some((_, result)) => (result, EffectEventKind::BlockScorched),
                None => return false,
            },
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::properties::EffectProperties;
    use crate::variants::testing::{activation, floor_world};

    #[test]
    fn durations_scale_with_material() {
        assert_eq!(melt_duration(4, Material::Snow), 4);
        assert_eq!(melt_duration(4, Material::Sand), 8);
        assert_eq!(melt_duration(4, Material::Stone), 12);
        assert!(melt_result(Material::Obsidian).is_none());
    }

    #[test]
    fn ice_melts_after_its_duration() {
        let mut world = floor_world();
        let ice = Position::new(1, 60, 1);
        assert!(world.set(ice, CellState::block(Material::Ice)).is_ok());

        let config = MeltConfig {
            melt_duration: 3,
            ..MeltConfig::default()
        };
        let strategy = MeltStrategy::new(&config);
        let mut store = CandidateStore::new(4, 3);
        assert!(store.try_add(ice, MeltProgress::default()));
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ctx = EffectContext::new(
            activation(ice),
            VariantKind::Melt,
            EffectProperties::benign(3),
            &mut world,
            &mut rng,
        );

        let mut outcomes = Vec::new();
        for _ in 0..3 {
            let entry = store.get_mut(&ice).unwrap();
            outcomes.push(strategy.mutate(&mut ctx, entry, 0));
        }
        assert_eq!(
            outcomes,
            vec![Mutation::Progressed, Mutation::Progressed, Mutation::Consumed]
        );
        assert!(ctx.world.read(ice).is(Material::Water));
    }

    #[test]
    fn refused_write_keeps_progress_for_retry() {
        let mut world = floor_world();
        let sand = Position::new(0, 60, 0);
        assert!(world.set(sand, CellState::block(Material::Sand)).is_ok());
        world.protect(sand);

        let strategy = MeltStrategy::new(&MeltConfig {
            melt_duration: 1,
            ..MeltConfig::default()
        });
        let mut store = CandidateStore::new(4, 3);
        assert!(store.try_add(sand, MeltProgress { ticks: 5 }));
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ctx = EffectContext::new(
            activation(sand),
            VariantKind::Melt,
            EffectProperties::benign(3),
            &mut world,
            &mut rng,
        );
        let entry = store.get_mut(&sand).unwrap();
        assert_eq!(strategy.mutate(&mut ctx, entry, 0), Mutation::Progressed);
        assert!(ctx.world.read(sand).is(Material::Sand));
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn corruption_freezes_ignites_and_scorches() {
        let mut world = floor_world();
        let water = Position::new(0, 60, 0);
        let lava = Position::new(1, 60, 0);
        let sand = Position::new(2, 60, 0);
        let air = Position::new(3, 60, 0);
        assert!(world.set(water, CellState::block(Material::Water)).is_ok());
        assert!(world.set(lava, CellState::block(Material::Lava)).is_ok());
        assert!(world.set(sand, CellState::block(Material::Sand)).is_ok());

        let strategy = MeltStrategy::new(&MeltConfig::default());
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ctx = EffectContext::new(
            activation(water),
            VariantKind::Melt,
            EffectProperties::benign(3),
            &mut world,
            &mut rng,
        );
        for target in [water, lava, sand, air] {
            assert!(strategy.corrupt(&mut ctx, target));
        }
        assert!(!strategy.corrupt(&mut ctx, Position::new(0, 70, 0)));

        assert!(ctx.world.read(water).is(Material::Ice));
        assert!(ctx.world.read(lava).is(Material::Obsidian));
        assert!(ctx.world.read(sand).is(Material::Glass));
        assert!(ctx.world.read(air).is(Material::Fire));
    }
}
