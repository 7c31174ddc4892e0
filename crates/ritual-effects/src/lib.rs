//! The effect half of the ritual engine: what an active ritual does to the
//! world each tick.
//!
//! Every variant follows the same cycle. Qualifying candidates are found by
//! random sampling around the ritual's origin and cached in a bounded
//! store; each tick one cached candidate is picked, re-verified, and
//! mutated. Inverted rituals skip the store and corrupt a sampled position
//! instead.
//!
//! # Modules
//!
//! - [`store`] -- Bounded candidate cache with O(1) uniform selection.
//! - [`search`] -- Random cube sampling and the find-new-candidate routine.
//! - [`selector`] -- Uniform picks, chance picks, and strength repetitions.
//! - [`properties`] -- Augments and the per-activation properties they derive.
//! - [`context`] -- The per-dispatch context handed to strategies.
//! - [`strategy`] -- The [`EffectStrategy`] trait.
//! - [`dispatcher`] -- The per-tick benign/corrupted state machine.
//! - [`variants`] -- The nine concrete strategies.
//! - [`registry`] -- Type-erased effects bound to their settings and stores.
//! - [`config`] -- Per-variant tunables with load-time sanitization.
//! - [`loot`] -- Weighted tables for catches and ore abundance.
//! - [`broadcast`] -- The event side channel.
//! - [`error`] -- Setup errors.
//!
//! [`EffectStrategy`]: strategy::EffectStrategy

pub mod broadcast;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod loot;
pub mod properties;
pub mod registry;
pub mod search;
pub mod selector;
pub mod store;
pub mod strategy;
pub mod variants;

pub use broadcast::{Broadcaster, EventLog, NullBroadcaster};
pub use config::{EffectsConfig, VariantConfig};
pub use context::{Activation, EffectContext};
pub use dispatcher::{DispatchState, TickReport, dispatch};
pub use error::EffectError;
pub use properties::{Augment, EffectProperties};
pub use registry::{ActiveEffect, RitualEffect, build_effect};
pub use store::{CandidateEntry, CandidateKey, CandidateStore};
pub use strategy::{EffectStrategy, Mutation};
