//! Tick callback that reports run progress.

use ritual_core::instance::RitualInstance;
use ritual_core::runner::TickCallback;
use ritual_core::tick::{SimulationState, TickSummary};
use tracing::{debug, info};

/// Logs a progress line every `every` ticks and accumulates totals.
pub struct ProgressCallback {
    every: u64,
    changed: u64,
    events: u64,
}

impl ProgressCallback {
    /// Report every `every` ticks (0 reports never).
    pub const fn new(every: u64) -> Self {
        Self {
            every,
            changed: 0,
            events: 0,
        }
    }
}

impl TickCallback for ProgressCallback {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        let changed = u64::try_from(summary.changed).unwrap_or(u64::MAX);
        let events = u64::try_from(summary.events.len()).unwrap_or(u64::MAX);
        self.changed = self.changed.saturating_add(changed);
        self.events = self.events.saturating_add(events);

        if summary.stale_removed > 0 || summary.seeded > 0 {
            debug!(
                tick = summary.tick,
                stale = summary.stale_removed,
                seeded = summary.seeded,
                "candidate churn"
            );
        }

        let due = self.every > 0 && summary.tick.checked_rem(self.every) == Some(0);
        if !due {
            return;
        }
        let candidates: usize = state.rituals().map(RitualInstance::candidate_count).sum();
        info!(
            tick = summary.tick,
            rituals = summary.rituals_active,
            candidates,
            changed_total = self.changed,
            events_total = self.events,
            drops = state.world.drops().len(),
            "progress"
        );
    }
}
