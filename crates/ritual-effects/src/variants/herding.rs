//! Animal product harvesting.
//!
//! Caches the animals around the origin that shed something. An animal is
//! picked with the configured drop chance and then drops its product. Corrupted, every
//! animal near a sampled cell is hurt instead.

use rand::Rng;
use ritual_types::{
    AnimalKind, EffectEventKind, EntityId, EntityKind, Item, ItemDrop, Position, VariantKind,
};
use ritual_world::World;

use crate::config::HerdingConfig;
use crate::context::EffectContext;
use crate::store::{CandidateEntry, CandidateStore};
use crate::strategy::{EffectStrategy, Mutation, replenish_entities};

/// What an animal sheds, if anything.
fn product<R: Rng + ?Sized>(kind: AnimalKind, rng: &mut R) -> Option<Item> {
    match kind {
        AnimalKind::Sheep => Some(Item::Wool),
        AnimalKind::Cow => Some(Item::Leather),
        AnimalKind::Chicken => Some(if rng.random_bool(0.5) { Item::Egg } else { Item::Feather }),
        AnimalKind::Pig => None,
    }
}

const fn sheds(kind: AnimalKind) -> bool {
    !matches!(kind, AnimalKind::Pig)
}

/// Herding strategy.
#[derive(Debug, Clone)]
pub struct HerdingStrategy {
    /// Variant settings.
    config: HerdingConfig,
}

impl HerdingStrategy {
    /// Create the strategy.
    pub fn new(config: &HerdingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl EffectStrategy for HerdingStrategy {
    type Key = EntityId;
    type Payload = ();

    fn kind(&self) -> VariantKind {
        VariantKind::Herding
    }

    fn verify(&self, world: &dyn World, key: EntityId) -> bool {
        world
            .entity(key)
            .is_some_and(|entity| matches!(entity.kind, EntityKind::Animal(kind) if sheds(kind)))
    }

    fn generate(&self, _key: EntityId) {}

    fn pick_chance(&self) -> Option<f32> {
        Some(self.config.drop_chance)
    }

    fn replenish(&self, ctx: &mut EffectContext<'_>, store: &mut CandidateStore<EntityId, ()>) -> usize {
        replenish_entities(self, ctx, store)
    }

    fn mutate(
        &self,
        ctx: &mut EffectContext<'_>,
        entry: &mut CandidateEntry<EntityId, ()>,
        _repetitions: u32,
    ) -> Mutation {
        let Some(animal) = ctx.world.entity(entry.key()) else {
            return Mutation::Unchanged;
        };
        let EntityKind::Animal(kind) = animal.kind else {
            return Mutation::Unchanged;
        };
        let Some(item) = product(kind, &mut *ctx.rng) else {
            return Mutation::Unchanged;
        };
        if !ctx.world.spawn_drop(animal.position, ItemDrop::single(item)) {
            return Mutation::Unchanged;
        }
        ctx.emit(EffectEventKind::AnimalHarvested, animal.position);
        Mutation::Applied
    }

    fn corrupt(&self, ctx: &mut EffectContext<'_>, target: Position) -> bool {
        let animals: Vec<EntityId> = ctx
            .world
            .entities_in_radius(target, self.config.corruption_radius)
            .into_iter()
            .filter(|entity| matches!(entity.kind, EntityKind::Animal(_)))
            .map(|entity| entity.id)
            .collect();

        let damage = self.config.corruption_damage;
        let hurt = animals
            .into_iter()
            .filter(|&id| ctx.world.damage_entity(id, damage))
            .count();
        if hurt == 0 {
            return false;
        }
        ctx.emit(EffectEventKind::AnimalsHurt, target);
        true
    }
}
