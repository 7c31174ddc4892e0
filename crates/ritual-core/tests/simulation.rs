//! Whole-engine runs on the demo terrain.

#![allow(clippy::unwrap_used)]

use ritual_core::broadcast::ChannelBroadcaster;
use ritual_core::config::{EngineConfig, RitualSpec, ScanConfig};
use ritual_core::control::{EndReason, RunControl};
use ritual_core::runner::{NoOpCallback, run_simulation};
use ritual_core::tick::{SimulationState, run_tick};
use ritual_effects::{Augment, EffectsConfig};
use ritual_types::{CellState, Material, Offset, VariantKind};
use ritual_world::create_demo_terrain;
use tokio::sync::broadcast::error::TryRecvError;

#[test]
fn melting_the_frost_field_broadcasts_events() {
    let (world, sites) = create_demo_terrain().unwrap();
    let lo = sites.frost.offset(Offset::new(-3, 0, -3));
    let hi = sites.frost.offset(Offset::new(3, 0, 3));
    let is_ice = |cell: CellState| cell.is(Material::Ice) || cell.is(Material::PackedIce);
    let ice_before = world.count_matching(lo, hi, is_ice);

    let broadcaster = ChannelBroadcaster::with_capacity(8192);
    let mut rx = broadcaster.subscribe();
    let mut state = SimulationState::new(world, EffectsConfig::default(), 11)
        .with_broadcaster(Box::new(broadcaster));
    assert!(state.activate(&RitualSpec::new(VariantKind::Melt, sites.frost)).is_ok());

    let mut summarized: usize = 0;
    for _ in 0..400 {
        let summary = run_tick(&mut state).unwrap();
        summarized = summarized.saturating_add(summary.events.len());
    }

    let ice_after = state.world.count_matching(lo, hi, is_ice);
    assert!(ice_after < ice_before, "{ice_after} of {ice_before} ice cells left");

    let mut received: usize = 0;
    loop {
        match rx.try_recv() {
            Ok(message) => {
                assert_eq!(message.event.variant, VariantKind::Melt);
                received = received.saturating_add(1);
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            Err(TryRecvError::Lagged(_)) => {}
        }
    }
    assert!(received > 0);
    assert_eq!(received, summarized);
}

#[test]
fn quarry_scans_feed_excavation() {
    let (world, sites) = create_demo_terrain().unwrap();
    let mut state = SimulationState::new(world, EffectsConfig::default(), 12);
    assert!(
        state
            .enable_scans(ScanConfig {
                enabled: true,
                interval_ticks: 20,
            })
            .is_ok()
    );
    let spec = RitualSpec {
        augments: vec![Augment::Expanded(2)],
        ..RitualSpec::new(VariantKind::Excavation, sites.quarry)
    };
    assert!(state.activate(&spec).is_ok());

    let mut seeded: usize = 0;
    for _ in 0..100 {
        let summary = run_tick(&mut state).unwrap();
        seeded = seeded.saturating_add(summary.seeded);
        seeded = seeded.saturating_add(state.await_scans());
    }
    assert!(seeded > 0);
    assert!(!state.world.drops().is_empty());
}

#[tokio::test]
async fn configured_run_reaches_its_tick_bound() {
    let yaml = r"
world:
  seed: 99
  tick_interval_ms: 0
simulation:
  max_ticks: 150
scan:
  enabled: true
  interval_ticks: 25
rituals:
  - variant: growth
    origin: { x: -20, y: 61, z: -20 }
  - variant: purification
    origin: { x: 20, y: 60, z: -20 }
    tick_interval: 2
  - variant: herding
    origin: { x: 0, y: 61, z: -20 }
    augments: [expanded]
";
    // `expanded` needs an amount; a bad ritual list must not parse.
    assert!(EngineConfig::parse(yaml).is_err());

    let yaml = yaml.replace("[expanded]", "[{ expanded: 2 }]");
    let config = EngineConfig::parse(&yaml).unwrap();
    let (world, _) = create_demo_terrain().unwrap();
    let mut state = SimulationState::from_config(world, &config).unwrap();
    assert_eq!(state.ritual_count(), 3);
    assert!(state.scans_enabled());

    let control = RunControl::from_config(&config.world, &config.simulation);
    let result = run_simulation(&mut state, &control, &mut NoOpCallback).await.unwrap();
    assert_eq!(result.end_reason, EndReason::MaxTicksReached);
    assert_eq!(result.total_ticks, 150);
    assert!(result.total_events > 0);
}

#[test]
fn shipped_config_activates_on_the_demo_terrain() {
    let yaml = include_str!("../../../ritual-config.yaml");
    let config = EngineConfig::parse(yaml).unwrap();
    assert_eq!(config.rituals.len(), VariantKind::ALL.len());
    let (world, _) = create_demo_terrain().unwrap();
    let state = SimulationState::from_config(world, &config).unwrap();
    assert_eq!(state.ritual_count(), VariantKind::ALL.len());
}
