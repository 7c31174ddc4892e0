//! The tick cycle.
//!
//! Each tick runs through these phases:
//!
//! 1. **Advance** -- step the clock.
//! 2. **Seed** -- drain finished background scans and offer their positions
//!    to the rituals that asked for them (discarding results for rituals
//!    that were deactivated meanwhile).
//! 3. **Dispatch** -- run every ritual whose cadence is due, in activation
//!    order.
//! 4. **Scan** -- submit region scans for rituals whose scan cadence is due.
//!
//! Given the same seed, world, and rituals, the tick cycle is
//! deterministic. Scan results arrive asynchronously, so runs with the scan
//! worker enabled only repeat exactly when every scan is awaited.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use ritual_effects::{Broadcaster, DispatchState, EffectError, EffectsConfig, NullBroadcaster};
use ritual_types::{EffectEvent, RitualId, ScanId};
use ritual_world::{GridWorld, Region, RegionSnapshot};
use tracing::{debug, info, warn};

use crate::clock::{ClockError, TickClock, is_due};
use crate::config::{EngineConfig, RitualSpec, ScanConfig};
use crate::instance::RitualInstance;
use crate::scan::{ScanError, ScanRequest, ScanResult, ScanWorker};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Rituals active during the tick.
    pub rituals_active: usize,
    /// Rituals that dispatched (their cadence was due).
    pub rituals_dispatched: usize,
    /// Dispatches that ran the benign branch.
    pub benign: usize,
    /// Dispatches that ran the corrupted branch.
    pub corrupted: usize,
    /// Dispatches that changed the world or a store.
    pub changed: usize,
    /// Candidates added by replenishment.
    pub candidates_added: usize,
    /// Candidates dropped as stale.
    pub stale_removed: usize,
    /// Candidates consumed by their mutation.
    pub consumed: usize,
    /// Candidates seeded from background scans.
    pub seeded: usize,
    /// Scans submitted at the end of the tick.
    pub scans_submitted: usize,
    /// Every effect event broadcast during the tick.
    pub events: Vec<EffectEvent>,
}

/// Everything the tick cycle owns.
pub struct SimulationState {
    /// The tick counter.
    pub clock: TickClock,
    /// The live world.
    pub world: GridWorld,
    rng: SmallRng,
    effects: EffectsConfig,
    rituals: BTreeMap<RitualId, RitualInstance>,
    broadcaster: Box<dyn Broadcaster + Send>,
    scan: ScanConfig,
    scanner: Option<ScanWorker>,
}

impl SimulationState {
    /// A state with no rituals, events discarded, and no scan worker.
    pub fn new(world: GridWorld, effects: EffectsConfig, seed: u64) -> Self {
        Self {
            clock: TickClock::new(),
            world,
            rng: SmallRng::seed_from_u64(seed),
            effects,
            rituals: BTreeMap::new(),
            broadcaster: Box::new(NullBroadcaster),
            scan: ScanConfig {
                enabled: false,
                ..ScanConfig::default()
            },
            scanner: None,
        }
    }

    /// A state configured from `config`, with the scan worker started if
    /// scans are enabled and the configured rituals activated.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the scan worker cannot start or a ritual
    /// cannot be activated.
    pub fn from_config(world: GridWorld, config: &EngineConfig) -> Result<Self, SetupError> {
        let mut state = Self::new(world, config.effects.clone(), config.world.seed);
        state.enable_scans(config.scan.clone())?;
        for spec in &config.rituals {
            state.activate(spec)?;
        }
        Ok(state)
    }

    /// Send effect events to `broadcaster` instead of discarding them.
    #[must_use]
    pub fn with_broadcaster(mut self, broadcaster: Box<dyn Broadcaster + Send>) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    /// Apply scan settings, starting or stopping the worker to match.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Spawn`] if the worker thread cannot start.
    pub fn enable_scans(&mut self, scan: ScanConfig) -> Result<(), ScanError> {
        if scan.enabled && scan.interval_ticks > 0 {
            if self.scanner.is_none() {
                self.scanner = Some(ScanWorker::spawn()?);
            }
        } else {
            self.scanner = None;
        }
        self.scan = scan;
        Ok(())
    }

    /// Activate a ritual starting with the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError`] if the ritual's effect cannot be built.
    pub fn activate(&mut self, spec: &RitualSpec) -> Result<RitualId, EffectError> {
        let starts_at = self.clock.tick().saturating_add(1);
        let instance = RitualInstance::activate(spec, &self.effects, starts_at)?;
        let id = instance.id();
        info!(
            ritual = %id,
            variant = %instance.kind(),
            origin = %instance.origin(),
            strength = instance.strength(),
            size = instance.properties().size,
            corrupted = instance.properties().corrupted,
            "ritual activated"
        );
        self.rituals.insert(id, instance);
        Ok(id)
    }

    /// Deactivate a ritual, dropping its candidate store. Returns whether
    /// it was active.
    pub fn deactivate(&mut self, id: RitualId) -> bool {
        let removed = self.rituals.remove(&id);
        if let Some(instance) = &removed {
            info!(ritual = %id, variant = %instance.kind(), "ritual deactivated");
        }
        removed.is_some()
    }

    /// Replace the effect settings. Active rituals pick up the shared
    /// settings at once; rituals activated later use the new settings in
    /// full.
    pub fn reload_effects(&mut self, effects: EffectsConfig) {
        let effects = effects.sanitized();
        for instance in self.rituals.values_mut() {
            instance.effect_mut().reconfigure(&effects);
        }
        info!(rituals = self.rituals.len(), "effect settings reloaded");
        self.effects = effects;
    }

    /// One active ritual.
    pub fn ritual(&self, id: RitualId) -> Option<&RitualInstance> {
        self.rituals.get(&id)
    }

    /// One active ritual, mutably.
    pub fn ritual_mut(&mut self, id: RitualId) -> Option<&mut RitualInstance> {
        self.rituals.get_mut(&id)
    }

    /// Every active ritual in activation order.
    pub fn rituals(&self) -> impl Iterator<Item = &RitualInstance> {
        self.rituals.values()
    }

    /// Number of active rituals.
    pub fn ritual_count(&self) -> usize {
        self.rituals.len()
    }

    /// Whether the background scan worker is running.
    pub const fn scans_enabled(&self) -> bool {
        self.scanner.is_some()
    }

    /// Block until every outstanding scan has finished and seed its results.
    /// Returns the number of candidates seeded.
    pub fn await_scans(&mut self) -> usize {
        let results = self
            .scanner
            .as_mut()
            .map(ScanWorker::wait_all)
            .unwrap_or_default();
        self.seed(results)
    }

    fn seed(&mut self, results: Vec<ScanResult>) -> usize {
        let mut seeded: usize = 0;
        for result in results {
            let Some(instance) = self.rituals.get_mut(&result.ritual) else {
                debug!(scan = %result.id, ritual = %result.ritual, "late scan result discarded");
                continue;
            };
            let origin = instance.origin();
            match instance.effect_mut().seed(origin, &self.world, &result.positions) {
                Ok(added) => seeded = seeded.saturating_add(added),
                Err(err) => warn!(scan = %result.id, ritual = %result.ritual, %err, "scan result rejected"),
            }
        }
        seeded
    }

    fn submit_scans(&mut self, tick: u64) -> usize {
        let Some(scanner) = self.scanner.as_mut() else {
            return 0;
        };
        let mut submitted: usize = 0;
        for instance in self.rituals.values() {
            let Some(filter) = instance.effect().scan_filter() else {
                continue;
            };
            if !is_due(tick, instance.activated_at(), self.scan.interval_ticks) {
                continue;
            }
            let region = Region::around(instance.origin(), instance.properties().size);
            let snapshot = match RegionSnapshot::capture(&self.world, region) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(ritual = %instance.id(), %err, "scan region not captured");
                    continue;
                }
            };
            let request = ScanRequest {
                id: ScanId::new(),
                ritual: instance.id(),
                origin: instance.origin(),
                snapshot,
                filter,
            };
            match scanner.submit(request) {
                Ok(_) => submitted = submitted.saturating_add(1),
                Err(err) => warn!(ritual = %instance.id(), %err, "scan not submitted"),
            }
        }
        submitted
    }
}

impl std::fmt::Debug for SimulationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationState")
            .field("tick", &self.clock.tick())
            .field("rituals", &self.rituals)
            .field("scans_enabled", &self.scanner.is_some())
            .finish_non_exhaustive()
    }
}

/// Errors from building a [`SimulationState`] out of configuration.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The scan worker could not start.
    #[error("scan setup failed: {source}")]
    Scan {
        /// The underlying scan error.
        #[from]
        source: ScanError,
    },

    /// A configured ritual could not be activated.
    #[error("ritual activation failed: {source}")]
    Effect {
        /// The underlying effect error.
        #[from]
        source: EffectError,
    },
}

/// Run one tick.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter overflows. Nothing else
/// in the tick can fail: unloaded regions, stale candidates, and refused
/// writes are ordinary outcomes counted in the summary.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    let tick = state.clock.advance()?;
    let mut summary = TickSummary {
        tick,
        rituals_active: state.rituals.len(),
        ..TickSummary::default()
    };

    let finished = state.scanner.as_mut().map(ScanWorker::drain).unwrap_or_default();
    summary.seeded = state.seed(finished);

    let SimulationState {
        world,
        rng,
        rituals,
        broadcaster,
        ..
    } = state;
    for instance in rituals.values_mut() {
        if !instance.is_due(tick) {
            continue;
        }
        let report = instance.dispatch(&mut *world, &mut *rng, &**broadcaster);
        summary.rituals_dispatched = summary.rituals_dispatched.saturating_add(1);
        match report.state {
            DispatchState::Idle => {}
            DispatchState::BenignApply => summary.benign = summary.benign.saturating_add(1),
            DispatchState::CorruptedApply => {
                summary.corrupted = summary.corrupted.saturating_add(1);
            }
        }
        if report.changed {
            summary.changed = summary.changed.saturating_add(1);
        }
        summary.candidates_added = summary.candidates_added.saturating_add(report.candidates_added);
        summary.stale_removed = summary.stale_removed.saturating_add(report.stale_removed);
        summary.consumed = summary.consumed.saturating_add(report.consumed);
        summary.events.extend(report.events);
    }

    summary.scans_submitted = state.submit_scans(tick);

    debug!(
        tick,
        active = summary.rituals_active,
        dispatched = summary.rituals_dispatched,
        changed = summary.changed,
        events = summary.events.len(),
        seeded = summary.seeded,
        scans = summary.scans_submitted,
        "tick complete"
    );
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ritual_types::{CellState, Material, OreKind, Position, VariantKind};
    use ritual_world::World;

    use super::*;

    fn stone_world() -> GridWorld {
        let mut world = GridWorld::new();
        world.load_area(Position::ORIGIN, 2);
        let filled = world.fill(
            Position::new(-8, 40, -8),
            Position::new(8, 50, 8),
            CellState::block(Material::Stone),
        );
        assert!(filled.is_ok());
        world
    }

    #[test]
    fn ticks_advance_and_dispatch_due_rituals() {
        let mut state = SimulationState::new(stone_world(), EffectsConfig::default(), 1);
        let every_tick = RitualSpec::new(VariantKind::OreGeneration, Position::new(0, 45, 0));
        let every_third = RitualSpec {
            tick_interval: 3,
            ..RitualSpec::new(VariantKind::Excavation, Position::new(0, 45, 0))
        };
        assert!(state.activate(&every_tick).is_ok());
        assert!(state.activate(&every_third).is_ok());

        let mut dispatched = Vec::new();
        for _ in 0..6 {
            let summary = run_tick(&mut state).unwrap();
            assert_eq!(summary.rituals_active, 2);
            dispatched.push(summary.rituals_dispatched);
        }
        assert_eq!(dispatched, vec![2, 1, 1, 2, 1, 1]);
        assert_eq!(state.clock.tick(), 6);
    }

    #[test]
    fn deactivated_rituals_stop_dispatching() {
        let mut state = SimulationState::new(stone_world(), EffectsConfig::default(), 2);
        let id = state
            .activate(&RitualSpec::new(VariantKind::Melt, Position::new(0, 50, 0)))
            .unwrap();
        assert!(run_tick(&mut state).is_ok_and(|s| s.rituals_dispatched == 1));
        assert!(state.deactivate(id));
        assert!(!state.deactivate(id));
        assert!(run_tick(&mut state).is_ok_and(|s| s.rituals_dispatched == 0));
        assert_eq!(state.ritual_count(), 0);
    }

    #[test]
    fn scans_seed_the_excavation_store() {
        let mut world = stone_world();
        let origin = Position::new(0, 45, 0);
        for pos in [Position::new(2, 44, 1), Position::new(-3, 46, 2), Position::new(1, 43, -4)] {
            assert!(world.set(pos, CellState::Ore(OreKind::Gold)).is_ok());
        }
        let mut state = SimulationState::new(world, EffectsConfig::default(), 3);
        assert!(state
            .enable_scans(ScanConfig {
                enabled: true,
                interval_ticks: 10,
            })
            .is_ok());
        if !state.scans_enabled() {
            return;
        }
        let spec = RitualSpec {
            augments: vec![ritual_effects::Augment::Expanded(2)],
            ..RitualSpec::new(VariantKind::Excavation, origin)
        };
        let id = state.activate(&spec).unwrap();
        let first = run_tick(&mut state);
        assert!(first.is_ok_and(|s| s.scans_submitted == 1));

        let seeded = state.await_scans();
        assert!(seeded >= 1);
        assert!(state.ritual(id).is_some_and(|r| r.candidate_count() >= seeded));
    }

    #[test]
    fn reloaded_settings_reach_active_rituals() {
        let mut state = SimulationState::new(stone_world(), EffectsConfig::default(), 5);
        let id = state
            .activate(&RitualSpec::new(VariantKind::OreGeneration, Position::new(0, 45, 0)))
            .unwrap();
        let mut effects = EffectsConfig::default();
        effects.ore_generation.enabled = false;
        effects.ore_generation.search_range = 0;
        state.reload_effects(effects);

        assert_eq!(state.ritual(id).map(|r| r.properties().size), Some(1));
        let writes = state.world.write_count();
        for _ in 0..20 {
            assert!(run_tick(&mut state).is_ok_and(|s| s.benign == 0 && s.corrupted == 0));
        }
        assert_eq!(state.world.write_count(), writes);
    }

    #[test]
    fn late_scan_results_are_discarded() {
        let mut state = SimulationState::new(stone_world(), EffectsConfig::default(), 4);
        let orphan = ScanResult {
            id: ScanId::new(),
            ritual: RitualId::new(),
            positions: vec![Position::new(0, 45, 0)],
        };
        assert_eq!(state.seed(vec![orphan]), 0);
        assert!(state.world.read(Position::new(0, 45, 0)).is(Material::Stone));
    }
}
