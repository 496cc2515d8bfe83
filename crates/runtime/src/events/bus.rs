//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::Serialize;
use skirmish_core::{CombatEvent, EncounterSnapshot};
use tokio::sync::broadcast;

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum Topic {
    /// Combat events with their rendered log lines.
    Combat,
    /// Full encounter snapshots after each mutation batch.
    Snapshot,
}

/// Event wrapper that carries the topic payloads.
#[derive(Debug, Clone, Serialize)]
pub enum Event {
    Combat {
        /// Human-readable combat log line for this event.
        line: String,
        event: CombatEvent,
    },
    Snapshot(EncounterSnapshot),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat { .. } => Topic::Combat,
            Event::Snapshot(_) => Topic::Snapshot,
        }
    }
}

/// Topic-based event bus.
///
/// Consumers subscribe to the topics they care about; slow consumers lag
/// (broadcast semantics) rather than blocking the session worker.
pub struct EventBus {
    channels: HashMap<Topic, broadcast::Sender<Event>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        channels.insert(Topic::Combat, broadcast::channel(capacity).0);
        channels.insert(Topic::Snapshot, broadcast::channel(capacity).0);
        Self { channels }
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[&topic].subscribe()
    }

    /// Publish to the event's topic. Returns the number of receivers that
    /// got it; zero subscribers is not an error.
    pub fn publish(&self, event: Event) -> usize {
        let topic = event.topic();
        self.channels[&topic].send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
