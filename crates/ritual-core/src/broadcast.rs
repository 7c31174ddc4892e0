//! Effect event fan-out over a tokio broadcast channel.
//!
//! [`ChannelBroadcaster`] is the engine's [`Broadcaster`]. Sending never
//! blocks the tick thread: with no subscribers the event is dropped, and a
//! subscriber that falls more than [`BROADCAST_CAPACITY`] messages behind
//! receives [`broadcast::error::RecvError::Lagged`] and skips ahead.

use ritual_effects::Broadcaster;
use ritual_types::EffectEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// Capacity of the effect event channel.
pub const BROADCAST_CAPACITY: usize = 256;

/// An effect event together with the radius it should reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventBroadcast {
    /// The event.
    pub event: EffectEvent,
    /// Observers within this many cells of the event should receive it.
    pub radius: u32,
}

/// Publishes effect events to every subscriber.
#[derive(Debug, Clone)]
pub struct ChannelBroadcaster {
    tx: broadcast::Sender<EventBroadcast>,
}

impl ChannelBroadcaster {
    /// Create a broadcaster with [`BROADCAST_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(BROADCAST_CAPACITY)
    }

    /// Create a broadcaster whose subscribers may lag by up to `capacity`
    /// messages. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to effect events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EventBroadcast> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn notify(&self, event: &EffectEvent, radius: u32) {
        let message = EventBroadcast {
            event: *event,
            radius,
        };
        if self.tx.send(message).is_err() {
            trace!(kind = ?event.kind, "no subscribers, effect event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use ritual_types::{EffectEventKind, Position, RitualId, VariantKind};

    use super::*;

    fn event(kind: EffectEventKind) -> EffectEvent {
        EffectEvent {
            ritual: RitualId::new(),
            variant: VariantKind::Melt,
            kind,
            position: Position::new(1, 60, 1),
        }
    }

    #[tokio::test]
    async fn subscribers_receive_events_with_radius() {
        let broadcaster = ChannelBroadcaster::new();
        let mut rx = broadcaster.subscribe();
        let melted = event(EffectEventKind::BlockMelted);
        broadcaster.notify(&melted, 32);

        let received = rx.recv().await;
        assert_eq!(
            received.ok(),
            Some(EventBroadcast {
                event: melted,
                radius: 32
            })
        );
    }

    #[test]
    fn sending_without_subscribers_is_silent() {
        let broadcaster = ChannelBroadcaster::new();
        assert_eq!(broadcaster.subscriber_count(), 0);
        broadcaster.notify(&event(EffectEventKind::BlockFrozen), 8);
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_ahead() {
        let broadcaster = ChannelBroadcaster::with_capacity(2);
        let mut rx = broadcaster.subscribe();
        for _ in 0..5 {
            broadcaster.notify(&event(EffectEventKind::OreFormed), 4);
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        assert!(rx.recv().await.is_ok());
    }
}
