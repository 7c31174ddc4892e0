//! Strikes against hostile creatures.
//!
//! A picked hostile takes the configured damage; once it dies the candidate
//! is consumed. Corrupted, the strike lands on every living entity around a
//! sampled cell, players and animals included.

use ritual_types::{EffectEventKind, EntityId, EntityKind, Position, VariantKind};
use ritual_world::World;

use crate::config::SmitingConfig;
use crate::context::EffectContext;
use crate::store::{CandidateEntry, CandidateStore};
use crate::strategy::{EffectStrategy, Mutation, replenish_entities};

/// Smiting strategy.
#[derive(Debug, Clone)]
pub struct SmitingStrategy {
    /// Variant settings.
    config: SmitingConfig,
}

impl SmitingStrategy {
    /// Create the strategy.
    pub fn new(config: &SmitingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl EffectStrategy for SmitingStrategy {
    type Key = EntityId;
    type Payload = ();

    fn kind(&self) -> VariantKind {
        VariantKind::Smiting
    }

    fn verify(&self, world: &dyn World, key: EntityId) -> bool {
        world
            .entity(key)
            .is_some_and(|entity| entity.kind == EntityKind::Hostile)
    }

    fn generate(&self, _key: EntityId) {}

    fn replenish(&self, ctx: &mut EffectContext<'_>, store: &mut CandidateStore<EntityId, ()>) -> usize {
        replenish_entities(self, ctx, store)
    }

    fn mutate(
        &self,
        ctx: &mut EffectContext<'_>,
        entry: &mut CandidateEntry<EntityId, ()>,
        _repetitions: u32,
    ) -> Mutation {
        let id = entry.key();
        let Some(target) = ctx.world.entity(id) else {
            return Mutation::Unchanged;
        };
        if !ctx.world.damage_entity(id, self.config.damage) {
            return Mutation::Unchanged;
        }
        ctx.emit(EffectEventKind::HostileSmitten, target.position);
        if ctx.world.entity(id).is_none() {
            Mutation::Consumed
        } else {
            Mutation::Applied
        }
    }

    fn corrupt(&self, ctx: &mut EffectContext<'_>, target: Position) -> bool {
        let living: Vec<EntityId> = ctx
            .world
            .entities_in_radius(target, self.config.corruption_radius)
            .into_iter()
            .filter(|entity| entity.kind.is_living())
            .map(|entity| entity.id)
            .collect();

        let damage = self.config.damage;
        let struck = living
            .into_iter()
            .filter(|&id| ctx.world.damage_entity(id, damage))
            .count();
        if struck == 0 {
            return false;
        }
        ctx.emit(EffectEventKind::EntitiesSmitten, target);
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use ritual_types::AnimalKind;

    use super::*;
    use crate::dispatcher::dispatch;
    use crate::properties::EffectProperties;
    use crate::variants::testing::{activation, floor_world};

    #[test]
    fn hostiles_are_struck_until_they_die() {
        let mut world = floor_world();
        let origin = Position::new(0, 60, 0);
        let zombie = world.spawn_entity(EntityKind::Hostile, Position::new(3, 60, 0), 10.0);
        world.spawn_entity(EntityKind::Animal(AnimalKind::Cow), Position::new(0, 60, 2), 10.0);
        let config = SmitingConfig::default();
        let strategy = SmitingStrategy::new(&config);
        let mut store = CandidateStore::new(4, 6);
        let mut rng = SmallRng::seed_from_u64(41);

        let mut consumed = 0_usize;
        for _ in 0..3 {
            let mut ctx = EffectContext::new(
                activation(origin),
                VariantKind::Smiting,
                EffectProperties::benign(6),
                &mut world,
                &mut rng,
            );
            let report = dispatch(&strategy, &config.base(), &mut store, &mut ctx);
            consumed = consumed.saturating_add(report.consumed);
        }
        assert!(world.entity(zombie).is_none());
        assert_eq!(consumed, 1);
        assert!(store.is_empty());
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn corruption_strikes_every_living_entity() {
        let mut world = floor_world();
        let target = Position::new(0, 60, 0);
        let player = world.spawn_entity(EntityKind::Player, Position::new(1, 60, 0), 20.0);
        let arrow = world.spawn_entity(
            EntityKind::Projectile { hostile: false },
            Position::new(0, 61, 0),
            0.0,
        );
        let strategy = SmitingStrategy::new(&SmitingConfig::default());
        let mut rng = SmallRng::seed_from_u64(42);
        {
            let mut ctx = EffectContext::new(
                activation(target),
                VariantKind::Smiting,
                EffectProperties::benign(6),
                &mut world,
                &mut rng,
            );
            assert!(strategy.corrupt(&mut ctx, target));
            assert!(!strategy.corrupt(&mut ctx, Position::new(8, 60, 8)));
        }
        assert!(world.entity(player).is_some_and(|e| e.health < 20.0));
        assert!(world.entity(arrow).is_some());
    }
}
