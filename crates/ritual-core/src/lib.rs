//! Tick cycle, ritual instances, and orchestration for the ritual engine.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `ritual-config.yaml` into
//!   strongly-typed structs.
//! - [`clock`] -- Tick counter and cadence checks.
//! - [`instance`] -- One activated ritual and its effect.
//! - [`scan`] -- The background region scan worker.
//! - [`broadcast`] -- Effect event fan-out over a tokio channel.
//! - [`tick`] -- The per-tick cycle: seed, dispatch, scan.
//! - [`control`] -- Pause, pacing, and stop flags shared with the run loop.
//! - [`runner`] -- The async run loop.

pub mod broadcast;
pub mod clock;
pub mod config;
pub mod control;
pub mod instance;
pub mod runner;
pub mod scan;
pub mod tick;
