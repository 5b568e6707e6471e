//! Event logging for auditing and replay.
//!
//! Every event dispatched on the kitchen's bus is appended here together with
//! the virtual time it was observed at. The log is append-only and keeps the
//! order in which the orchestration loop drained the events.
//!
//! # Example
//!
//! ```rust
//! use kitchen_simulator_core_rs::events::KitchenEvent;
//! use kitchen_simulator_core_rs::models::EventLog;
//!
//! let mut log = EventLog::new();
//! log.log(0, KitchenEvent::BotAdded);
//! log.log(10_000, KitchenEvent::CookingCompleted { order_id: 1 });
//!
//! assert_eq!(log.len(), 2);
//! assert_eq!(log.events_for_order(1).len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::time::Timestamp;
use crate::events::{EventKind, KitchenEvent};
use crate::models::order::OrderId;

/// An event with the virtual time it was observed at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub at: Timestamp,
    pub event: KitchenEvent,
}

/// Event log for storing and querying kitchen events.
///
/// This is a simple wrapper around Vec<LoggedEvent> with convenience methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, at: Timestamp, event: KitchenEvent) {
        self.events.push(LoggedEvent { at, event });
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Get events observed at a specific time
    pub fn events_at(&self, at: Timestamp) -> Vec<&LoggedEvent> {
        self.events.iter().filter(|e| e.at == at).collect()
    }

    /// Get events of a specific kind
    pub fn events_of_kind(&self, kind: EventKind) -> Vec<&LoggedEvent> {
        self.events
            .iter()
            .filter(|e| e.event.kind() == kind)
            .collect()
    }

    /// Get events whose payload names a specific order
    pub fn events_for_order(&self, order_id: OrderId) -> Vec<&LoggedEvent> {
        self.events
            .iter()
            .filter(|e| e.event.order_id() == Some(order_id))
            .collect()
    }

    /// Count events of a specific kind
    pub fn count_of_kind(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.event.kind() == kind).count()
    }
}
