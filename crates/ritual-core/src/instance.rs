//! One active ritual: its identity, anchor, cadence, and effect.

use rand::RngCore;
use ritual_effects::{
    ActiveEffect, Activation, Broadcaster, EffectError, EffectProperties, EffectsConfig,
    TickReport, build_effect,
};
use ritual_types::{Position, RitualId, VariantKind};
use ritual_world::World;

use crate::clock::is_due;
use crate::config::RitualSpec;

/// An activated ritual and the effect it drives.
pub struct RitualInstance {
    id: RitualId,
    origin: Position,
    strength: f32,
    tick_interval: u64,
    activated_at: u64,
    effect: Box<dyn ActiveEffect>,
}

impl RitualInstance {
    /// Activate `spec` at tick `activated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError`] if the variant's effect cannot be built from
    /// `effects`.
    pub fn activate(
        spec: &RitualSpec,
        effects: &EffectsConfig,
        activated_at: u64,
    ) -> Result<Self, EffectError> {
        let spec = spec.clone().sanitized();
        let effect = build_effect(spec.variant, effects, &spec.augments)?;
        Ok(Self {
            id: RitualId::new(),
            origin: spec.origin,
            strength: spec.strength,
            tick_interval: spec.tick_interval,
            activated_at,
            effect,
        })
    }

    /// The instance's identifier.
    pub const fn id(&self) -> RitualId {
        self.id
    }

    /// The anchor cell.
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// The variant this ritual runs.
    pub fn kind(&self) -> VariantKind {
        self.effect.kind()
    }

    /// Radius and mode derived from the augments.
    pub fn properties(&self) -> EffectProperties {
        self.effect.properties()
    }

    /// Incoming strength.
    pub const fn strength(&self) -> f32 {
        self.strength
    }

    /// Ticks between dispatches.
    pub const fn tick_interval(&self) -> u64 {
        self.tick_interval
    }

    /// The tick the ritual was activated on.
    pub const fn activated_at(&self) -> u64 {
        self.activated_at
    }

    /// Whether the ritual dispatches on `tick`.
    pub const fn is_due(&self, tick: u64) -> bool {
        is_due(tick, self.activated_at, self.tick_interval)
    }

    /// Number of cached candidates.
    pub fn candidate_count(&self) -> usize {
        self.effect.candidate_count()
    }

    /// The scheduler's view of this ritual for one dispatch.
    pub const fn activation(&self) -> Activation {
        Activation {
            ritual: self.id,
            origin: self.origin,
            strength: self.strength,
        }
    }

    /// Run one dispatch.
    pub fn dispatch(
        &mut self,
        world: &mut dyn World,
        rng: &mut dyn RngCore,
        broadcaster: &dyn Broadcaster,
    ) -> TickReport {
        let activation = self.activation();
        self.effect.tick(&activation, world, rng, broadcaster)
    }

    /// The effect, for scan seeding and inspection.
    pub fn effect_mut(&mut self) -> &mut dyn ActiveEffect {
        self.effect.as_mut()
    }

    /// The effect.
    pub fn effect(&self) -> &dyn ActiveEffect {
        self.effect.as_ref()
    }
}

impl std::fmt::Debug for RitualInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RitualInstance")
            .field("id", &self.id)
            .field("variant", &self.effect.kind())
            .field("origin", &self.origin)
            .field("strength", &self.strength)
            .field("tick_interval", &self.tick_interval)
            .field("activated_at", &self.activated_at)
            .field("candidates", &self.effect.candidate_count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ritual_effects::Augment;

    use super::*;

    #[test]
    fn activation_carries_spec_values() {
        let spec = RitualSpec {
            strength: 0.75,
            augments: vec![Augment::Contracted(10)],
            tick_interval: 3,
            ..RitualSpec::new(VariantKind::Melt, Position::new(2, 60, 2))
        };
        let instance = RitualInstance::activate(&spec, &EffectsConfig::default(), 5).unwrap();
        assert_eq!(instance.kind(), VariantKind::Melt);
        assert_eq!(instance.origin(), Position::new(2, 60, 2));
        assert_eq!(instance.properties().size, 1);
        assert!((instance.activation().strength - 0.75).abs() < f32::EPSILON);
        assert!(instance.is_due(5));
        assert!(!instance.is_due(6));
        assert!(instance.is_due(8));
    }
}
