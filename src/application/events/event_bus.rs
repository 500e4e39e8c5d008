//! Event Bus for broadcasting booking events to subscribers
//!
//! Uses tokio broadcast channel for pub/sub pattern. Publishing never blocks
//! and never reports failure to the caller.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::events::{BookingEvent, EventMessage};
use crate::shared::ShutdownSignal;

/// Default channel capacity
const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: BookingEvent) {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let reservation_id = message.event.reservation_id().to_string();

        match self.sender.send(message) {
            Ok(count) => debug!(
                event_type,
                reservation_id = %reservation_id,
                subscribers = count,
                "Event published"
            ),
            // no subscribers is normal when no notifier is attached
            Err(_) => debug!(
                event_type,
                reservation_id = %reservation_id,
                "Event published (no subscribers)"
            ),
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        info!(subscribers = self.sender.receiver_count(), "New event subscriber");
        EventSubscriber { receiver }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
}

impl EventSubscriber {
    /// Next event; `None` once the bus is gone. Lagged events are skipped.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "Subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

/// Log every booking event until shutdown. Stands in for the outbound
/// notifier, which consumes the same stream.
pub fn spawn_event_logger(bus: &EventBus, shutdown: ShutdownSignal) {
    let mut subscriber = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                msg = subscriber.recv() => match msg {
                    Some(msg) => info!(
                        event_id = %msg.id,
                        event_type = msg.event.event_type(),
                        reservation_id = %msg.event.reservation_id(),
                        "Booking event"
                    ),
                    None => break,
                },
                _ = shutdown.wait() => break,
            }
        }
        debug!("Event logger stopped");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::events::ReservationCompletedEvent;
    use chrono::Utc;

    fn completed(id: &str) -> BookingEvent {
        BookingEvent::ReservationCompleted(ReservationCompletedEvent {
            reservation_id: id.to_string(),
            venue_id: "v1".to_string(),
            timestamp: Utc::now(),
        })
    }

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        bus.publish(completed("r1"));

        let received = tokio::time::timeout(std::time::Duration::from_millis(100), subscriber.recv())
            .await
            .expect("Timeout")
            .expect("No message");
        assert_eq!(received.event.event_type(), "reservation_completed");
        assert_eq!(received.event.reservation_id(), "r1");
    }

    #[test]
    fn publish_without_subscribers_does_not_fail() {
        let bus = EventBus::new();
        bus.publish(completed("r1"));
    }

    #[test]
    fn subscriber_count_tracks_drops() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);

        let sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(sub1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_value(EventMessage::new(completed("r1"))).unwrap();
        assert_eq!(json["type"], "ReservationCompleted");
        assert_eq!(json["data"]["reservation_id"], "r1");
    }
}
