//! Crop growth.
//!
//! Caches growable crop cells. A pick advances the crop by one stage plus
//! the repetition count earned from strength; stacking crops at their final
//! age grow a new segment on top instead. Corrupted, the effect withers
//! crops and degrades tilled or grassy soil to dirt.

use ritual_types::{CellState, CropKind, EffectEventKind, Material, Position, VariantKind};
use ritual_world::World;

use crate::config::GrowthConfig;
use crate::context::EffectContext;
use crate::store::{CandidateEntry, CandidateStore};
use crate::strategy::{EffectStrategy, Mutation, replenish_positions};

/// Crop growth strategy.
#[derive(Debug, Clone)]
pub struct GrowthStrategy {
    /// Variant settings.
    config: GrowthConfig,
}

impl GrowthStrategy {
    /// Create the strategy.
    pub fn new(config: &GrowthConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

/// Number of contiguous `kind` cells from `pos` downward, including `pos`.
fn stack_height(world: &dyn World, pos: Position, kind: CropKind) -> u8 {
    let mut height: u8 = 0;
    let mut cursor = pos;
    while height < u8::MAX && matches!(world.read(cursor), CellState::Crop { kind: k, .. } if k == kind)
    {
        height = height.saturating_add(1);
        cursor = cursor.below();
    }
    height
}

/// Whether a stacking crop at `pos` can grow a new segment on top.
fn can_stack(world: &dyn World, pos: Position, kind: CropKind) -> bool {
    let top = pos.above();
    kind.is_stacking()
        && world.is_loaded(top)
        && world.read(top).is_air()
        && stack_height(world, pos, kind) < kind.max_height()
}

fn can_grow(world: &dyn World, pos: Position) -> bool {
    match world.read(pos) {
        CellState::Crop { kind, stage } => stage < kind.max_stage() || can_stack(world, pos, kind),
        _ => false,
    }
}

impl EffectStrategy for GrowthStrategy {
    type Key = Position;
    type Payload = ();

    fn kind(&self) -> VariantKind {
        VariantKind::Growth
    }

    fn verify(&self, world: &dyn World, key: Position) -> bool {
        can_grow(world, key)
    }

    fn generate(&self, _key: Position) {}

    fn replenish(&self, ctx: &mut EffectContext<'_>, store: &mut CandidateStore<Position, ()>) -> usize {
        replenish_positions(self, ctx, store)
    }

    fn repetition_step(&self) -> Option<f32> {
        Some(self.config.repetition_step)
    }

    fn mutate(
        &self,
        ctx: &mut EffectContext<'_>,
        entry: &mut CandidateEntry<Position, ()>,
        repetitions: u32,
    ) -> Mutation {
        let pos = entry.key();
        let CellState::Crop { kind, stage } = ctx.world.read(pos) else {
            return Mutation::Unchanged;
        };

        let room = kind.max_stage().saturating_sub(stage);
        let grown_at = if room > 0 {
            let steps = u8::try_from(repetitions.saturating_add(1)).unwrap_or(u8::MAX);
            let next = stage.saturating_add(steps.min(room));
            ctx.world.write(pos, CellState::Crop { kind, stage: next }).then_some(pos)
        } else {
            let above = pos.above();
            (can_stack(&*ctx.world, pos, kind) && ctx.world.write(above, CellState::seedling(kind)))
                .then_some(above)
        };
        let Some(grown_at) = grown_at else {
            return Mutation::Unchanged;
        };

        ctx.emit(EffectEventKind::CropGrown, grown_at);
        if can_grow(&*ctx.world, pos) {
            Mutation::Applied
        } else {
            Mutation::Consumed
        }
    }

    fn corrupt(&self, ctx: &mut EffectContext<'_>, target: Position) -> bool {
        let (replacement, event) = match ctx.world.read(target) {
            CellState::Crop { .. } => (CellState::Air, EffectEventKind::CropWithered),
            CellState::Block(Material::Grass | Material::Farmland) => {
                (CellState::block(Material::Dirt), EffectEventKind::SoilDegraded)
            }
            _ => return false,
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
    use ritual_world::GridWorld;

    use super::*;
    use crate::properties::EffectProperties;
    use crate::variants::testing::{activation, floor_world};

    fn planted(cells: &[(Position, CellState)]) -> GridWorld {
        let mut world = floor_world();
        for &(pos, state) in cells {
            assert!(world.set(pos, state).is_ok());
        }
        world
    }

    fn run_mutate(world: &mut GridWorld, pos: Position, repetitions: u32) -> Mutation {
        let strategy = GrowthStrategy::new(&GrowthConfig::default());
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ctx = EffectContext::new(
            activation(pos),
            VariantKind::Growth,
            EffectProperties::benign(4),
            world,
            &mut rng,
        );
        let mut store = CandidateStore::new(4, 4);
        assert!(store.try_add(pos, ()));
        let entry = store.get_mut(&pos).unwrap();
        strategy.mutate(&mut ctx, entry, repetitions)
    }

    #[test]
    fn verifies_only_growable_crops() {
        let young = Position::new(0, 60, 0);
        let ripe = Position::new(1, 60, 0);
        let world = planted(&[
            (young, CellState::Crop { kind: CropKind::Wheat, stage: 2 }),
            (ripe, CellState::Crop { kind: CropKind::Wheat, stage: 7 }),
        ]);
        let strategy = GrowthStrategy::new(&GrowthConfig::default());
        assert!(strategy.verify(&world, young));
        assert!(!strategy.verify(&world, ripe));
        assert!(!strategy.verify(&world, Position::new(0, 59, 0)));
    }

    #[test]
    fn repetitions_add_stages_up_to_the_cap() {
        let pos = Position::new(0, 60, 0);
        let mut world = planted(&[(pos, CellState::Crop { kind: CropKind::Carrot, stage: 3 })]);

        assert_eq!(run_mutate(&mut world, pos, 2), Mutation::Applied);
        assert_eq!(world.read(pos), CellState::Crop { kind: CropKind::Carrot, stage: 6 });

        assert_eq!(run_mutate(&mut world, pos, 5), Mutation::Consumed);
        assert_eq!(world.read(pos), CellState::Crop { kind: CropKind::Carrot, stage: 7 });
    }

    #[test]
    fn mature_cane_grows_upward_until_max_height() {
        let base = Position::new(0, 60, 0);
        let mut world = planted(&[(base, CellState::Crop { kind: CropKind::SugarCane, stage: 15 })]);

        assert_eq!(run_mutate(&mut world, base, 0), Mutation::Consumed);
        assert_eq!(world.read(base.above()), CellState::seedling(CropKind::SugarCane));
        assert_eq!(stack_height(&world, base.above(), CropKind::SugarCane), 2);

        let third = base.above().above();
        assert!(world.set(base.above(), CellState::Crop { kind: CropKind::SugarCane, stage: 15 }).is_ok());
        assert_eq!(run_mutate(&mut world, base.above(), 0), Mutation::Consumed);
        assert!(matches!(world.read(third), CellState::Crop { .. }));

        assert!(world.set(third, CellState::Crop { kind: CropKind::SugarCane, stage: 15 }).is_ok());
        let strategy = GrowthStrategy::new(&GrowthConfig::default());
        assert!(!strategy.verify(&world, third));
    }

    #[test]
    fn upward_growth_is_reported_at_the_new_segment() {
        let base = Position::new(0, 60, 0);
        let mut world = planted(&[(base, CellState::Crop { kind: CropKind::SugarCane, stage: 15 })]);
        let strategy = GrowthStrategy::new(&GrowthConfig::default());
        let mut rng = SmallRng::seed_from_u64(2);
        let mut store = CandidateStore::new(4, 4);
        assert!(store.try_add(base, ()));
        let mut ctx = EffectContext::new(
            activation(base),
            VariantKind::Growth,
            EffectProperties::benign(4),
            &mut world,
            &mut rng,
        );
        let mutation = store
            .get_mut(&base)
            .map(|entry| strategy.mutate(&mut ctx, entry, 0));
        assert_eq!(mutation, Some(Mutation::Consumed));
        let grown: Vec<Position> = ctx.events().iter().map(|event| event.position).collect();
        assert_eq!(grown, vec![base.above()]);
    }

    #[test]
    fn corruption_withers_crops_and_degrades_soil() {
        let crop = Position::new(0, 60, 0);
        let soil = Position::new(0, 59, 1);
        let mut world = planted(&[
            (crop, CellState::seedling(CropKind::Potato)),
            (soil, CellState::block(Material::Farmland)),
        ]);
        let strategy = GrowthStrategy::new(&GrowthConfig::default());
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ctx = EffectContext::new(
            activation(crop),
            VariantKind::Growth,
            EffectProperties::derive(2, &[crate::properties::Augment::Inverted]),
            &mut world,
            &mut rng,
        );

        assert!(strategy.corrupt(&mut ctx, crop));
        assert!(strategy.corrupt(&mut ctx, soil));
        assert!(!strategy.corrupt(&mut ctx, Position::new(3, 59, 3)));
        let kinds: Vec<_> = ctx.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EffectEventKind::CropWithered, EffectEventKind::SoilDegraded]);
        drop(ctx);

        assert!(world.read(crop).is_air());
        assert!(world.read(soil).is(Material::Dirt));
    }
}
