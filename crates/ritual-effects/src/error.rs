//! Error types for the ritual-effects crate.
//!
//! The per-tick dispatch path never returns an error: unloaded regions, stale
//! candidates, full stores, and refused writes are all ordinary outcomes
//! recorded in a [`crate::dispatcher::TickReport`]. [`EffectError`] covers the
//! setup calls made from outside the tick, such as seeding a store from a
//! background scan.

use ritual_types::VariantKind;

/// Errors that can occur while setting up or seeding an effect.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    /// The variant does not key its candidates by position, so scan results
    /// cannot be seeded into its store.
    #[error("variant {0} does not accept scanned positions")]
    NotScannable(VariantKind),

    /// A repetition step was not a number or below the accepted minimum.
    #[error("repetition step must be a finite number of at least 0.01, got {step}")]
    InvalidRepetitionStep {
        /// The rejected step.
        step: f32,
    },
}
