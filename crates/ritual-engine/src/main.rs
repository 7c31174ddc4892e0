//! Engine binary for the ritual effect engine.
//!
//! Loads configuration, builds the demo terrain, activates the configured
//! rituals, and runs the tick loop until the tick bound is reached or the
//! process receives Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `ritual-config.yaml` (or `RITUAL_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the demo terrain
//! 4. Start the event broadcaster and its logging subscriber
//! 5. Start the scan worker and activate rituals
//! 6. Run the simulation loop
//! 7. Log the result

mod error;
mod progress;

use std::sync::Arc;

use ritual_core::broadcast::{ChannelBroadcaster, EventBroadcast};
use ritual_core::config::{EngineConfig, LoggingConfig};
use ritual_core::control::RunControl;
use ritual_core::runner;
use ritual_core::tick::SimulationState;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::progress::ProgressCallback;

/// Ticks between progress lines.
const PROGRESS_EVERY: u64 = 100;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the run itself fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let path = EngineConfig::path();
    let config = if path.exists() {
        EngineConfig::from_file(&path)?
    } else {
        EngineConfig::default()
    };

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        path = %path.display(),
        found = path.exists(),
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.simulation.max_ticks,
        rituals = config.rituals.len(),
        "Configuration loaded"
    );

    // 3. Build the demo terrain.
    let (world, sites) = ritual_world::create_demo_terrain()?;
    info!(
        cells = world.cell_count(),
        entities = world.entity_count(),
        farm = %sites.farm,
        quarry = %sites.quarry,
        "Demo terrain created"
    );

    // 4. Start the event broadcaster.
    let broadcaster = ChannelBroadcaster::new();
    let events = broadcaster.subscribe();
    let _event_logger = tokio::spawn(log_events(events));

    // 5. Start the scan worker and activate rituals.
    let mut state = SimulationState::from_config(world, &config)?
        .with_broadcaster(Box::new(broadcaster));
    info!(
        rituals = state.ritual_count(),
        scans = state.scans_enabled(),
        "Simulation state assembled, entering tick loop"
    );

    // 6. Run until the bound or Ctrl-C.
    let control = Arc::new(RunControl::from_config(&config.world, &config.simulation));
    let stopper = Arc::clone(&control);
    let _signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping after the current tick");
            stopper.request_stop();
        }
    });

    let mut callback = ProgressCallback::new(PROGRESS_EVERY);
    let result = runner::run_simulation(&mut state, &control, &mut callback).await?;

    // 7. Log results.
    runner::log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "ritual-engine shutdown complete"
    );
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };
    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}

/// Log every broadcast effect event until the channel closes.
async fn log_events(mut rx: Receiver<EventBroadcast>) {
    loop {
        match rx.recv().await {
            Ok(message) => match serde_json::to_string(&message) {
                Ok(payload) => debug!(
                    ritual = %message.event.ritual,
                    variant = %message.event.variant,
                    position = %message.event.position,
                    radius = message.radius,
                    %payload,
                    "effect event"
                ),
                Err(e) => warn!(error = %e, "failed to serialize effect event"),
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "effect event logger lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
