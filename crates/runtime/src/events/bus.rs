//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;

use super::types::{ListingEvent, SessionEvent, WorkflowEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, strum::EnumIter)]
pub enum Topic {
    /// Account, network, and reset notifications
    Session,
    /// Mint and record-update progress
    Workflow,
    /// Listing refreshes
    Listing,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone)]
pub enum Event {
    Session(SessionEvent),
    Workflow(WorkflowEvent),
    Listing(ListingEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session(_) => Topic::Session,
            Event::Workflow(_) => Topic::Workflow,
            Event::Listing(_) => Topic::Listing,
        }
    }
}

/// Topic-based event bus
///
/// Channels are created up front for every topic, so publishing and
/// subscribing never fail. Events published while nobody listens are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        use strum::IntoEnumIterator;

        let channels = Topic::iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();
        Self {
            channels: Arc::new(channels),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        // Every topic is inserted by `with_capacity`.
        &self.channels[&topic]
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut listing_rx = bus.subscribe(Topic::Listing);
        let mut session_rx = bus.subscribe(Topic::Session);

        bus.publish(Event::Listing(ListingEvent::Cleared));

        assert!(matches!(
            listing_rx.recv().await,
            Ok(Event::Listing(ListingEvent::Cleared))
        ));
        assert!(session_rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(Event::Listing(ListingEvent::Cleared));
        let receivers = bus.subscribe_multiple(&[Topic::Session, Topic::Workflow]);
        assert_eq!(receivers.len(), 2);
    }
}
