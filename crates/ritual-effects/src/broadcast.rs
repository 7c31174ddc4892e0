//! The fire-and-forget side channel for visual and audio events.
//!
//! Every world mutation an effect performs is announced through a
//! [`Broadcaster`]. Delivery is best effort: implementations must return
//! immediately, may drop events, and must never feed back into the
//! simulation.

use std::cell::RefCell;

use ritual_types::EffectEvent;

/// Receives effect events for delivery to observers near the event.
pub trait Broadcaster {
    /// Deliver `event` to every observer within `radius` cells of its
    /// position. Must not block.
    fn notify(&self, event: &EffectEvent, radius: u32);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBroadcaster;

impl Broadcaster for NullBroadcaster {
    fn notify(&self, _event: &EffectEvent, _radius: u32) {}
}

/// Keeps every event in memory, for inspection in tests and tools.
#[derive(Debug, Default)]
pub struct EventLog {
    /// Events in notification order.
    events: RefCell<Vec<EffectEvent>>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every logged event.
    pub fn take(&self) -> Vec<EffectEvent> {
        self.events.take()
    }

    /// Number of logged events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl Broadcaster for EventLog {
    fn notify(&self, event: &EffectEvent, _radius: u32) {
        self.events.borrow_mut().push(*event);
    }
}
