//! Order model
//!
//! An `Order` is what a customer submits: a VIP flag and the time it was
//! submitted. Once the order queue admits it, it becomes an `AcceptedOrder`
//! with a unique id. Lifecycle stage is not stored on the order; it is given
//! by which of the queue's sequences currently holds it.

use serde::{Deserialize, Serialize};

use crate::core::time::Timestamp;

/// Unique order identifier, assigned on admission starting at 1
pub type OrderId = u64;

/// A submitted order, before admission
///
/// # Example
/// ```
/// use kitchen_simulator_core_rs::Order;
///
/// let order = Order::vip(1_500);
/// assert!(order.is_vip);
/// assert_eq!(order.submitted_at, 1_500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// VIP orders are served before every normal order
    pub is_vip: bool,

    /// Virtual time the order was submitted
    pub submitted_at: Timestamp,
}

impl Order {
    pub fn new(is_vip: bool, submitted_at: Timestamp) -> Self {
        Self {
            is_vip,
            submitted_at,
        }
    }

    /// VIP order submitted at `submitted_at`
    pub fn vip(submitted_at: Timestamp) -> Self {
        Self::new(true, submitted_at)
    }

    /// Normal order submitted at `submitted_at`
    pub fn normal(submitted_at: Timestamp) -> Self {
        Self::new(false, submitted_at)
    }
}

/// An order admitted by the order queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedOrder {
    id: OrderId,
    order: Order,
}

impl AcceptedOrder {
    pub(crate) fn new(id: OrderId, order: Order) -> Self {
        Self { id, order }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn is_vip(&self) -> bool {
        self.order.is_vip
    }

    pub fn submitted_at(&self) -> Timestamp {
        self.order.submitted_at
    }

    /// The order as originally submitted
    pub fn order(&self) -> Order {
        self.order
    }

    /// Whether `self` must be served before `other`
    ///
    /// VIP orders precede normal orders. Within a class, the earlier
    /// submission goes first, and the lower id settles equal timestamps.
    ///
    /// The id tie-break means an order returned from processing goes back
    /// ahead of later-admitted orders with the same timestamp, rather than
    /// behind them as a strict "later timestamp" comparison would place it.
    pub fn precedes(&self, other: &AcceptedOrder) -> bool {
        match (self.is_vip(), other.is_vip()) {
            (true, false) => true,
            (false, true) => false,
            _ => (self.submitted_at(), self.id) < (other.submitted_at(), other.id),
        }
    }
}
