//! Projectile and hostile suppression.
//!
//! The only variant that caches entities by threat: every hostile creature
//! or hostile projectile around the origin is collected. A picked projectile
//! is deflected (removed); a picked hostile is slowed and weakened. Each
//! tick the ward also grants resistance to every player and animal in range.
//! Corrupted, the ward instead empowers hostiles near a sampled cell.

use ritual_types::{
    EffectEventKind, EntityId, EntityKind, Position, StatusEffect, StatusKind, VariantKind,
};
use ritual_world::World;

use crate::config::ProtectionConfig;
use crate::context::EffectContext;
use crate::store::{CandidateEntry, CandidateStore};
use crate::strategy::{EffectStrategy, Mutation, replenish_entities};

/// Protection strategy.
#[derive(Debug, Clone)]
pub struct ProtectionStrategy {
    /// Variant settings.
    config: ProtectionConfig,
}

impl ProtectionStrategy {
    /// Create the strategy.
    pub fn new(config: &ProtectionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl EffectStrategy for ProtectionStrategy {
    type Key = EntityId;
    type Payload = ();

    fn kind(&self) -> VariantKind {
        VariantKind::Protection
    }

    fn verify(&self, world: &dyn World, key: EntityId) -> bool {
        world.entity(key).is_some_and(|entity| entity.kind.is_threat())
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
        let Some(threat) = ctx.world.entity(id) else {
            return Mutation::Unchanged;
        };

        if matches!(threat.kind, EntityKind::Projectile { .. }) {
            if !ctx.world.remove_entity(id) {
                return Mutation::Unchanged;
            }
            ctx.emit(EffectEventKind::ProjectileDeflected, threat.position);
            return Mutation::Consumed;
        }

        let slowed = ctx
            .world
            .apply_status(id, StatusEffect::new(StatusKind::Slowness, self.config.repel_ticks, 1));
        let weakened = ctx
            .world
            .apply_status(id, StatusEffect::new(StatusKind::Weakness, self.config.repel_ticks, 0));
        if !(slowed || weakened) {
            return Mutation::Unchanged;
        }
        ctx.emit(EffectEventKind::HostileRepelled, threat.position);
        Mutation::Applied
    }

    fn corrupt(&self, ctx: &mut EffectContext<'_>, target: Position) -> bool {
        let hostiles: Vec<EntityId> = ctx
            .world
            .entities_in_radius(target, self.config.corruption_radius)
            .into_iter()
            .filter(|entity| entity.kind == EntityKind::Hostile)
            .map(|entity| entity.id)
            .collect();

        let mut empowered = false;
        for id in hostiles {
            let strong = ctx
                .world
                .apply_status(id, StatusEffect::new(StatusKind::Strength, self.config.ward_ticks, 1));
            let fast = ctx
                .world
                .apply_status(id, StatusEffect::new(StatusKind::Speed, self.config.ward_ticks, 0));
            empowered = empowered || strong || fast;
        }
        if empowered {
            ctx.emit(EffectEventKind::HostilesEmpowered, target);
        }
        empowered
    }

    fn ambient(&self, ctx: &mut EffectContext<'_>) -> bool {
        let defenders: Vec<EntityId> = ctx
            .world
            .entities_in_radius(ctx.origin, ctx.properties.size)
            .into_iter()
            .filter(|entity| entity.kind.is_defender())
            .map(|entity| entity.id)
            .collect();

        let ward = StatusEffect::new(StatusKind::Resistance, self.config.ward_ticks, 0);
        let warded = defenders
            .into_iter()
            .filter(|&id| ctx.world.apply_status(id, ward))
            .count();
        if warded == 0 {
            return false;
        }
        ctx.emit(EffectEventKind::DefendersWarded, ctx.origin);
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use ritual_types::AnimalKind;

    use super::*;
    use crate::config::VariantConfig;
    use crate::dispatcher::{DispatchState, dispatch};
    use crate::properties::{Augment, EffectProperties};
    use crate::variants::testing::{activation, floor_world};

    fn base() -> VariantConfig {
        ProtectionConfig::default().base()
    }

    #[test]
    fn collects_threats_and_deflects_projectiles() {
        let mut world = floor_world();
        let origin = Position::new(0, 60, 0);
        let arrow = world.spawn_entity(EntityKind::Projectile { hostile: true }, Position::new(1, 62, 0), 0.0);
        let friendly = world.spawn_entity(EntityKind::Projectile { hostile: false }, Position::new(0, 62, 1), 0.0);
        let sheep = world.spawn_entity(EntityKind::Animal(AnimalKind::Sheep), Position::new(2, 60, 2), 8.0);

        let strategy = ProtectionStrategy::new(&ProtectionConfig::default());
        let mut store = CandidateStore::new(8, 6);
        let mut rng = SmallRng::seed_from_u64(3);
        {
            let mut ctx = EffectContext::new(
                activation(origin),
                VariantKind::Protection,
                EffectProperties::benign(6),
                &mut world,
                &mut rng,
            );
            let report = dispatch(&strategy, &base(), &mut store, &mut ctx);
            assert_eq!(report.state, DispatchState::BenignApply);
            assert_eq!(report.candidates_added, 1);
            assert_eq!(report.consumed, 1);
            let kinds: Vec<_> = report.events.iter().map(|e| e.kind).collect();
            assert_eq!(
                kinds,
                vec![EffectEventKind::ProjectileDeflected, EffectEventKind::DefendersWarded]
            );
        }

        assert!(world.entity(arrow).is_none());
        assert!(world.entity(friendly).is_some());
        assert!(store.is_empty());
        assert!(world.statuses(sheep).iter().any(|s| s.kind == StatusKind::Resistance));
    }

    #[test]
    fn repels_hostiles_and_keeps_them_cached() {
        let mut world = floor_world();
        let origin = Position::new(0, 60, 0);
        let zombie = world.spawn_entity(EntityKind::Hostile, Position::new(-2, 60, 1), 20.0);

        let strategy = ProtectionStrategy::new(&ProtectionConfig::default());
        let mut store = CandidateStore::new(8, 6);
        let mut rng = SmallRng::seed_from_u64(4);
        {
            let mut ctx = EffectContext::new(
                activation(origin),
                VariantKind::Protection,
                EffectProperties::benign(6),
                &mut world,
                &mut rng,
            );
            let report = dispatch(&strategy, &base(), &mut store, &mut ctx);
            assert!(report.changed);
            assert_eq!(report.consumed, 0);
        }

        assert!(store.contains(&zombie));
        let statuses = world.statuses(zombie);
        assert!(statuses.iter().any(|s| s.kind == StatusKind::Slowness));
        assert!(statuses.iter().any(|s| s.kind == StatusKind::Weakness));
    }

    #[test]
    fn hostile_leaving_range_goes_stale() {
        let mut world = floor_world();
        let origin = Position::new(0, 60, 0);
        let zombie = world.spawn_entity(EntityKind::Hostile, Position::new(1, 60, 1), 20.0);
        let strategy = ProtectionStrategy::new(&ProtectionConfig::default());
        let mut store = CandidateStore::new(8, 6);
        assert!(store.try_add(zombie, ()));
        assert!(world.move_entity(zombie, Position::new(12, 60, 0)).is_ok());

        let mut rng = SmallRng::seed_from_u64(5);
        let mut ctx = EffectContext::new(
            activation(origin),
            VariantKind::Protection,
            EffectProperties::benign(6),
            &mut world,
            &mut rng,
        );
        let report = dispatch(&strategy, &base(), &mut store, &mut ctx);
        assert_eq!(report.stale_removed, 1);
        assert!(report.changed);
        assert!(store.is_empty());
    }

    #[test]
    fn corruption_empowers_nearby_hostiles() {
        let mut world = floor_world();
        let target = Position::new(0, 60, 0);
        let zombie = world.spawn_entity(EntityKind::Hostile, Position::new(1, 60, 0), 20.0);
        let player = world.spawn_entity(EntityKind::Player, Position::new(0, 60, 1), 20.0);

        let strategy = ProtectionStrategy::new(&ProtectionConfig::default());
        let mut rng = SmallRng::seed_from_u64(6);
        {
            let mut ctx = EffectContext::new(
                activation(target),
                VariantKind::Protection,
                EffectProperties::derive(6, &[Augment::Inverted]),
                &mut world,
                &mut rng,
            );
            assert!(strategy.corrupt(&mut ctx, target));
            assert!(!strategy.corrupt(&mut ctx, Position::new(8, 60, 8)));
        }
        assert!(world.statuses(zombie).iter().any(|s| s.kind == StatusKind::Strength));
        assert!(world.statuses(player).is_empty());
    }
}
