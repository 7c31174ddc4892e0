//! Type-erased effect instances.
//!
//! The engine holds one [`ActiveEffect`] per active ritual without knowing
//! which variant it is. [`RitualEffect`] binds a strategy to its settings,
//! its candidate store, and the properties derived from the instance's
//! augments; [`build_effect`] picks the strategy for a variant.

use rand::RngCore;
use ritual_types::{CellState, Position, VariantKind};
use ritual_world::World;
use tracing::{debug, info};

use crate::broadcast::Broadcaster;
use crate::config::{EffectsConfig, MIN_REPETITION_STEP, VariantConfig};
use crate::context::{Activation, EffectContext};
use crate::dispatcher::{TickReport, dispatch};
use crate::error::EffectError;
use crate::properties::{Augment, EffectProperties};
use crate::store::{CandidateKey, CandidateStore};
use crate::strategy::EffectStrategy;
use crate::variants::{
    ExcavationStrategy, FishingStrategy, GrowthStrategy, HerdingStrategy, MeltStrategy,
    OreGenerationStrategy, ProtectionStrategy, PurificationStrategy, SmitingStrategy,
};

/// One ritual's effect, independent of its variant.
pub trait ActiveEffect: Send {
    /// The variant this effect runs.
    fn kind(&self) -> VariantKind;

    /// Radius and mode derived from the instance's augments.
    fn properties(&self) -> EffectProperties;

    /// Number of cached candidates.
    fn candidate_count(&self) -> usize;

    /// Run one dispatch against `world`.
    fn tick(
        &mut self,
        activation: &Activation,
        world: &mut dyn World,
        rng: &mut dyn RngCore,
        broadcaster: &dyn Broadcaster,
    ) -> TickReport;

    /// Offer positions found outside the tick (e.g. by a background scan).
    ///
    /// Each position is re-verified against the live world before it is
    /// cached. Returns the number of candidates added.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::NotScannable`] for variants whose candidates
    /// are not keyed by position.
    fn seed(
        &mut self,
        origin: Position,
        world: &dyn World,
        positions: &[Position],
    ) -> Result<usize, EffectError>;

    /// The cell predicate a background scan should use for this variant, if
    /// it accepts scanned positions.
    fn scan_filter(&self) -> Option<fn(CellState) -> bool>;

    /// Apply reloaded shared settings (enabled, search range, capacity,
    /// potency, broadcast radius). Variant-specific knobs keep the values
    /// they had at activation. Cached candidates beyond the new capacity are
    /// dropped.
    fn reconfigure(&mut self, effects: &EffectsConfig);
}

/// A strategy bound to its settings and candidate store.
pub struct RitualEffect<S: EffectStrategy> {
    strategy: S,
    config: VariantConfig,
    store: CandidateStore<S::Key, S::Payload>,
    properties: EffectProperties,
    augments: Vec<Augment>,
    broadcast_radius: u32,
}

impl<S: EffectStrategy> RitualEffect<S> {
    /// Bind `strategy` to its settings. The store's search radius is the
    /// configured search range adjusted by `augments`.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::InvalidRepetitionStep`] if the strategy scales
    /// by strength with a step that is not finite or is below
    /// [`MIN_REPETITION_STEP`].
    pub fn new(
        strategy: S,
        config: VariantConfig,
        augments: &[Augment],
        broadcast_radius: u32,
    ) -> Result<Self, EffectError> {
        if let Some(step) = strategy.repetition_step()
            && !(step.is_finite() && step >= MIN_REPETITION_STEP)
        {
            return Err(EffectError::InvalidRepetitionStep { step });
        }
        let properties = EffectProperties::derive(config.search_range, augments);
        let store = CandidateStore::new(config.max_count, properties.size);
        Ok(Self {
            strategy,
            config,
            store,
            properties,
            augments: augments.to_vec(),
            broadcast_radius,
        })
    }

    /// The candidate store.
    pub const fn store(&self) -> &CandidateStore<S::Key, S::Payload> {
        &self.store
    }
}

impl<S> ActiveEffect for RitualEffect<S>
where
    S: EffectStrategy + Send,
    S::Key: Send,
    S::Payload: Send,
{
    fn kind(&self) -> VariantKind {
        self.strategy.kind()
    }

    fn properties(&self) -> EffectProperties {
        self.properties
    }

    fn candidate_count(&self) -> usize {
        self.store.len()
    }

    fn tick(
        &mut self,
        activation: &Activation,
        world: &mut dyn World,
        rng: &mut dyn RngCore,
        broadcaster: &dyn Broadcaster,
    ) -> TickReport {
        let mut ctx = EffectContext::new(
            *activation,
            self.strategy.kind(),
            self.properties,
            world,
            rng,
        )
        .broadcasting_to(broadcaster, self.broadcast_radius);
        dispatch(&self.strategy, &self.config, &mut self.store, &mut ctx)
    }

    fn seed(
        &mut self,
        origin: Position,
        world: &dyn World,
        positions: &[Position],
    ) -> Result<usize, EffectError> {
        let kind = self.strategy.kind();
        let radius = self.store.search_radius();
        let mut added: usize = 0;
        for &pos in positions {
            if self.store.is_full() {
                break;
            }
            let key = self
                .strategy
                .key_at(pos)
                .ok_or(EffectError::NotScannable(kind))?;
            if !pos.within(origin, radius)
                || self.store.contains(&key)
                || !key.locate(world).is_some_and(|at| world.is_loaded(at))
                || !self.strategy.verify(world, key)
            {
                continue;
            }
            if self.store.try_add(key, self.strategy.generate(key)) {
                added = added.saturating_add(1);
            }
        }
        debug!(variant = %kind, offered = positions.len(), added, "seeded scan results");
        Ok(added)
    }

    fn scan_filter(&self) -> Option<fn(CellState) -> bool> {
        self.strategy.scan_filter()
    }

    fn reconfigure(&mut self, effects: &EffectsConfig) {
        let kind = self.strategy.kind();
        self.config = effects.variant(kind).sanitized(kind);
        self.properties = EffectProperties::derive(self.config.search_range, &self.augments);
        self.store.set_capacity(self.config.max_count);
        self.store.set_search_radius(self.properties.size);
        self.broadcast_radius = effects.broadcast_radius;
        debug!(
            variant = %kind,
            size = self.properties.size,
            capacity = self.config.max_count,
            cached = self.store.len(),
            "effect reconfigured"
        );
    }
}

fn bind<S>(
    strategy: S,
    effects: &EffectsConfig,
    augments: &[Augment],
) -> Result<Box<dyn ActiveEffect>, EffectError>
where
    S: EffectStrategy + Send + 'static,
    S::Key: Send + 'static,
    S::Payload: Send + 'static,
{
    let kind = strategy.kind();
    let config = effects.variant(kind).sanitized(kind);
    let effect = RitualEffect::new(strategy, config, augments, effects.broadcast_radius)?;
    info!(
        variant = %kind,
        size = effect.properties.size,
        corrupted = effect.properties.corrupted,
        capacity = config.max_count,
        "effect bound"
    );
    Ok(Box::new(effect))
}

/// Build the effect for `kind` from its configured section.
///
/// # Errors
///
/// Returns [`EffectError::InvalidRepetitionStep`] if a strength-scaled
/// variant was configured with an unusable repetition step.
pub fn build_effect(
    kind: VariantKind,
    effects: &EffectsConfig,
    augments: &[Augment],
) -> Result<Box<dyn ActiveEffect>, EffectError> {
    match kind {
        VariantKind::Growth => bind(GrowthStrategy::new(&effects.growth), effects, augments),
        VariantKind::Protection => {
            bind(ProtectionStrategy::new(&effects.protection), effects, augments)
        }
        VariantKind::Melt => bind(MeltStrategy::new(&effects.melt), effects, augments),
        VariantKind::Fishing => bind(FishingStrategy::new(&effects.fishing), effects, augments),
        VariantKind::OreGeneration => bind(
            OreGenerationStrategy::new(&effects.ore_generation),
            effects,
            augments,
        ),
        VariantKind::Excavation => {
            bind(ExcavationStrategy::new(&effects.excavation), effects, augments)
        }
        VariantKind::Herding => bind(HerdingStrategy::new(&effects.herding), effects, augments),
        VariantKind::Smiting => bind(SmitingStrategy::new(&effects.smiting), effects, augments),
        VariantKind::Purification => bind(
            PurificationStrategy::new(&effects.purification),
            effects,
            augments,
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use ritual_types::{Material, RitualId};
    use ritual_world::GridWorld;

    use super::*;
    use crate::broadcast::EventLog;
    use crate::config::FishingConfig;

    fn stone_world() -> GridWorld {
        let mut world = GridWorld::new();
        world.load_area(Position::ORIGIN, 1);
        let filled = world.fill(
            Position::new(-4, 40, -4),
            Position::new(4, 48, 4),
            CellState::block(Material::Stone),
        );
        assert!(filled.is_ok());
        world
    }

    #[test]
    fn augments_shape_the_store_radius() {
        let effects = EffectsConfig::default();
        let effect = build_effect(
            VariantKind::Growth,
            &effects,
            &[Augment::Expanded(3), Augment::Inverted],
        )
        .unwrap();
        assert_eq!(effect.kind(), VariantKind::Growth);
        assert_eq!(effect.properties().size, effects.growth.search_range.saturating_add(3));
        assert!(effect.properties().corrupted);
    }

    #[test]
    fn invalid_repetition_step_is_rejected() {
        let effects = EffectsConfig {
            fishing: FishingConfig {
                repetition_step: 0.0,
                ..FishingConfig::default()
            },
            ..EffectsConfig::default()
        };
        let result = build_effect(VariantKind::Fishing, &effects, &[]);
        assert!(matches!(
            result,
            Err(EffectError::InvalidRepetitionStep { .. })
        ));
    }

    #[test]
    fn steps_below_the_floor_are_rejected() {
        let effects = EffectsConfig {
            fishing: FishingConfig {
                repetition_step: 1e-9,
                ..FishingConfig::default()
            },
            ..EffectsConfig::default()
        };
        let result = build_effect(VariantKind::Fishing, &effects, &[]);
        assert!(matches!(
            result,
            Err(EffectError::InvalidRepetitionStep { .. })
        ));
    }

    #[test]
    fn seeding_reverifies_and_respects_the_cube() {
        let world = stone_world();
        let origin = Position::new(0, 44, 0);
        let mut effect =
            build_effect(VariantKind::OreGeneration, &EffectsConfig::default(), &[]).unwrap();
        let offered = [
            Position::new(0, 44, 0),
            Position::new(1, 44, 0),
            Position::new(0, 48, 0),
            Position::new(0, 44, 0),
            Position::new(0, 60, 0),
            Position::new(30, 44, 0),
        ];
        let added = effect.seed(origin, &world, &offered);
        assert_eq!(added.ok(), Some(2));
        assert_eq!(effect.candidate_count(), 2);
    }

    #[test]
    fn reconfigure_shrinks_the_store() {
        let world = stone_world();
        let origin = Position::new(0, 44, 0);
        let mut effect = build_effect(
            VariantKind::OreGeneration,
            &EffectsConfig::default(),
            &[Augment::Expanded(1)],
        )
        .unwrap();
        let offered = [Position::new(0, 44, 0), Position::new(1, 44, 0), Position::new(-1, 44, 1)];
        assert_eq!(effect.seed(origin, &world, &offered).ok(), Some(3));

        let mut effects = EffectsConfig::default();
        effects.ore_generation.max_count = 1;
        effects.ore_generation.search_range = 2;
        effect.reconfigure(&effects);
        assert_eq!(effect.candidate_count(), 1);
        assert_eq!(effect.properties().size, 3);
    }

    #[test]
    fn entity_variants_refuse_scanned_positions() {
        let world = stone_world();
        let mut effect = build_effect(VariantKind::Smiting, &EffectsConfig::default(), &[]).unwrap();
        assert!(effect.scan_filter().is_none());
        let result = effect.seed(Position::ORIGIN, &world, &[Position::new(0, 44, 0)]);
        assert!(matches!(result, Err(EffectError::NotScannable(VariantKind::Smiting))));
    }

    #[test]
    fn ticks_deliver_events_to_the_broadcaster() {
        let mut world = stone_world();
        let origin = Position::new(0, 44, 0);
        let mut effect =
            build_effect(VariantKind::OreGeneration, &EffectsConfig::default(), &[]).unwrap();
        let activation = Activation {
            ritual: RitualId::new(),
            origin,
            strength: 1.0,
        };
        let log = EventLog::new();
        let mut rng = SmallRng::seed_from_u64(61);
        let mut emitted = 0_usize;
        for _ in 0..50 {
            let report = effect.tick(&activation, &mut world, &mut rng, &log);
            emitted = emitted.saturating_add(report.events.len());
        }
        assert!(emitted > 0);
        assert_eq!(log.len(), emitted);
    }
}
