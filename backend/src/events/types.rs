//! Kitchen event types
//!
//! Every cross-component notification is one of these events. The payload
//! lives on the enum variant; `EventKind` is the payload-free type name used
//! to register listeners.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::order::OrderId;

/// Type name of a kitchen event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    OrderAdded,
    OrderCompleted,
    ProcessingOrderCancelled,
    CookingCompleted,
    BotAdded,
    BotRemoved,
}

impl EventKind {
    /// Every event kind, in catalogue order
    pub const ALL: [EventKind; 6] = [
        EventKind::OrderAdded,
        EventKind::OrderCompleted,
        EventKind::ProcessingOrderCancelled,
        EventKind::CookingCompleted,
        EventKind::BotAdded,
        EventKind::BotRemoved,
    ];

    /// Stable string name of the event type
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::OrderAdded => "OrderAdded",
            EventKind::OrderCompleted => "OrderCompleted",
            EventKind::ProcessingOrderCancelled => "ProcessingOrderCancelled",
            EventKind::CookingCompleted => "CookingCompleted",
            EventKind::BotAdded => "BotAdded",
            EventKind::BotRemoved => "BotRemoved",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification published on the event bus
///
/// Serializes as a JSON object tagged by `type`, e.g.
/// `{"type":"CookingCompleted","order_id":2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum KitchenEvent {
    /// An order entered the pending sequence
    OrderAdded,

    /// A processing order moved to the completed sequence
    OrderCompleted,

    /// A processing order was put back into the pending sequence
    ProcessingOrderCancelled,

    /// A bot's cooking timer expired
    CookingCompleted { order_id: OrderId },

    /// A bot joined the pool
    BotAdded,

    /// A bot left the pool; `order_id` is the order it was cooking, if any
    BotRemoved { order_id: Option<OrderId> },
}

impl KitchenEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            KitchenEvent::OrderAdded => EventKind::OrderAdded,
            KitchenEvent::OrderCompleted => EventKind::OrderCompleted,
            KitchenEvent::ProcessingOrderCancelled => EventKind::ProcessingOrderCancelled,
            KitchenEvent::CookingCompleted { .. } => EventKind::CookingCompleted,
            KitchenEvent::BotAdded => EventKind::BotAdded,
            KitchenEvent::BotRemoved { .. } => EventKind::BotRemoved,
        }
    }

    /// Order named by the payload, if any
    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            KitchenEvent::CookingCompleted { order_id } => Some(*order_id),
            KitchenEvent::BotRemoved { order_id } => *order_id,
            _ => None,
        }
    }

    /// Whether this event can make room for (or bring) work to assign
    pub fn triggers_dispatch(&self) -> bool {
        matches!(
            self.kind(),
            EventKind::OrderAdded
                | EventKind::BotAdded
                | EventKind::CookingCompleted
                | EventKind::BotRemoved
        )
    }
}
