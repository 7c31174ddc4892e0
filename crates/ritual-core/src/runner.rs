//! The run loop.
//!
//! [`run_simulation`] drives [`run_tick`] with pause/resume, runtime pacing,
//! a tick bound, and clean stop.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::time::Duration;

use tracing::{info, warn};

use crate::control::{EndReason, RunControl};
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// How a run ended.
#[derive(Debug)]
pub struct SimulationResult {
    /// Why it ended.
    pub end_reason: EndReason,
    /// The last tick summary, if any tick ran.
    pub final_summary: Option<TickSummary>,
    /// Ticks executed by this run.
    pub total_ticks: u64,
    /// Effect events broadcast over the whole run.
    pub total_events: u64,
}

/// Called after each tick.
pub trait TickCallback: Send {
    /// Called after a tick completes.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run ticks until the bound is reached or a stop is requested.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails.
pub async fn run_simulation(
    state: &mut SimulationState,
    control: &RunControl,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let mut total_events: u64 = 0;

    info!(
        max_ticks = control.max_ticks(),
        tick_interval_ms = control.tick_interval_ms(),
        rituals = state.ritual_count(),
        scans = state.scans_enabled(),
        "Simulation starting"
    );

    loop {
        if control.is_paused() {
            info!("Simulation paused, waiting for resume...");
            control.wait_if_paused().await;
            info!("Simulation resumed");
        }

        if control.is_stop_requested() {
            info!("Stop requested");
            return Ok(SimulationResult {
                end_reason: EndReason::StopRequested,
                final_summary: last_summary,
                total_ticks,
                total_events,
            });
        }

        let summary = tick::run_tick(state)?;
        total_ticks = total_ticks.saturating_add(1);
        let events = u64::try_from(summary.events.len()).unwrap_or(u64::MAX);
        total_events = total_events.saturating_add(events);

        callback.on_tick(&summary, state);

        // summary.tick is the tick that just ran, so max_ticks = 5 stops
        // after tick 5.
        if control.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = control.max_ticks(),
                "Tick limit reached"
            );
            return Ok(SimulationResult {
                end_reason: EndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
                total_events,
            });
        }

        last_summary = Some(summary);

        let interval_ms = control.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        } else {
            // Let the broadcast subscribers and signal handler run.
            tokio::task::yield_now().await;
        }
    }
}

/// Log how a run ended.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        total_events = result.total_events,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            rituals_active = summary.rituals_active,
            rituals_dispatched = summary.rituals_dispatched,
            changed = summary.changed,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
