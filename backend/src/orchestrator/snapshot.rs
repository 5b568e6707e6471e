//! Snapshot - read model of the kitchen
//!
//! Captures the three order sequences and every bot's current order at one
//! instant. This is what a rendering layer consumes; it is a view only and
//! cannot be loaded back into a kitchen.

use serde::{Deserialize, Serialize};

use crate::cooking::{BotId, BotPool, BotStatus};
use crate::core::time::Timestamp;
use crate::models::order::{AcceptedOrder, OrderId};
use crate::orders::OrderQueue;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete kitchen view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenSnapshot {
    /// Virtual time the snapshot was taken
    pub now: Timestamp,

    /// Pending orders in serving order
    pub pending: Vec<OrderView>,

    /// Orders being cooked, in hand-off order
    pub processing: Vec<OrderView>,

    /// Completed orders in completion order
    pub completed: Vec<OrderView>,

    /// Bots in pool order
    pub bots: Vec<BotView>,
}

/// Order view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderView {
    pub id: OrderId,
    pub is_vip: bool,
    pub submitted_at: Timestamp,
}

impl From<&AcceptedOrder> for OrderView {
    fn from(order: &AcceptedOrder) -> Self {
        OrderView {
            id: order.id(),
            is_vip: order.is_vip(),
            submitted_at: order.submitted_at(),
        }
    }
}

/// Bot view; `order` is `None` while idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotView {
    pub id: BotId,
    pub order: Option<OrderView>,
}

impl From<&BotStatus> for BotView {
    fn from(bot: &BotStatus) -> Self {
        BotView {
            id: bot.id(),
            order: bot.order().as_ref().map(OrderView::from),
        }
    }
}

impl KitchenSnapshot {
    /// Capture the current state of `orders` and `pool`
    pub fn capture(now: Timestamp, orders: &OrderQueue, pool: &BotPool) -> Self {
        fn views(orders: &[AcceptedOrder]) -> Vec<OrderView> {
            orders.iter().map(OrderView::from).collect()
        }

        KitchenSnapshot {
            now,
            pending: views(orders.pending()),
            processing: views(orders.processing()),
            completed: views(orders.completed()),
            bots: pool.bots().iter().map(BotView::from).collect(),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Number of idle bots
    pub fn idle_bots(&self) -> usize {
        self.bots.iter().filter(|bot| bot.order.is_none()).count()
    }
}
