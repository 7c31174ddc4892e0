//! Everything an effect needs for one dispatch, built fresh every tick.

use rand::RngCore;
use ritual_types::{EffectEvent, EffectEventKind, Position, RitualId, VariantKind};
use ritual_world::World;
use tracing::trace;

use crate::broadcast::{Broadcaster, NullBroadcaster};
use crate::properties::EffectProperties;

/// The scheduler's view of one activation: which instance, where, and how
/// strongly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
    /// The ritual instance being ticked.
    pub ritual: RitualId,
    /// The instance's anchor cell.
    pub origin: Position,
    /// Incoming strength, nominally `0.0..=1.0` but may exceed one.
    pub strength: f32,
}

/// Mutable state for one dispatch. Not retained past the call.
pub struct EffectContext<'a> {
    /// The ritual instance being ticked.
    pub ritual: RitualId,
    /// The variant being dispatched.
    pub variant: VariantKind,
    /// The instance's anchor cell.
    pub origin: Position,
    /// Strength for this dispatch. The dispatcher scales the incoming value
    /// by the variant's potency multiplier before any variant hook runs.
    pub strength: f32,
    /// Radius and mode of the instance.
    pub properties: EffectProperties,
    /// The live world.
    pub world: &'a mut dyn World,
    /// Randomness source for sampling and rolls.
    pub rng: &'a mut dyn RngCore,
    /// Where events go.
    broadcaster: &'a dyn Broadcaster,
    /// Delivery radius handed to the broadcaster.
    broadcast_radius: u32,
    /// Events emitted so far in this dispatch.
    events: Vec<EffectEvent>,
}

impl<'a> EffectContext<'a> {
    /// A context that discards its events.
    pub fn new(
        activation: Activation,
        variant: VariantKind,
        properties: EffectProperties,
        world: &'a mut dyn World,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Self {
            ritual: activation.ritual,
            variant,
            origin: activation.origin,
            strength: activation.strength,
            properties,
            world,
            rng,
            broadcaster: &NullBroadcaster,
            broadcast_radius: 0,
            events: Vec::new(),
        }
    }

    /// Send events to `broadcaster` with the given delivery radius.
    #[must_use]
    pub fn broadcasting_to(mut self, broadcaster: &'a dyn Broadcaster, radius: u32) -> Self {
        self.broadcaster = broadcaster;
        self.broadcast_radius = radius;
        self
    }

    /// Announce a world mutation at `position`.
    pub fn emit(&mut self, kind: EffectEventKind, position: Position) {
        let event = EffectEvent {
            ritual: self.ritual,
            variant: self.variant,
            kind,
            position,
        };
        trace!(ritual = %self.ritual, variant = %self.variant, ?kind, %position, "effect event");
        self.broadcaster.notify(&event, self.broadcast_radius);
        self.events.push(event);
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[EffectEvent] {
        &self.events
    }

    /// Number of events emitted so far.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}
