//! Order Queue
//!
//! Owns the three lifecycle sequences of accepted orders and the priority
//! insertion rule that keeps `pending` ordered.
//!
//! # Lifecycle
//!
//! ```text
//! add_order ──► pending ──process_next_order──► processing ──complete_order──► completed
//!                  ▲                                 │
//!                  └────cancel_processing_order──────┘
//! ```
//!
//! # Critical Invariants
//!
//! - **Single residence**: an order lives in exactly one sequence at a time
//! - **Priority order**: `pending` is sorted by `AcceptedOrder::precedes`
//!   (all VIP orders first, each class by submission time, then id)
//! - **Ids**: strictly increasing from 1, never reused
//! - **Audit trail**: nothing ever leaves `completed`

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::events::{EventBus, KitchenEvent};
use crate::models::order::{AcceptedOrder, Order, OrderId};

/// Errors raised by order queue lookups
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OrderError {
    #[error("Order {0} not found")]
    NotFound(OrderId),

    #[error("Order {0} not processing")]
    NotProcessing(OrderId),
}

/// Sequence currently holding an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStage {
    Pending,
    Processing,
    Completed,
}

/// Priority queue of orders plus the processing and completed sequences
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use kitchen_simulator_core_rs::events::LocalEventBus;
/// use kitchen_simulator_core_rs::{Order, OrderQueue};
///
/// let mut queue = OrderQueue::new(Rc::new(LocalEventBus::new()));
/// let normal = queue.add_order(Order::normal(0));
/// let vip = queue.add_order(Order::vip(1));
///
/// assert_eq!((normal, vip), (1, 2));
/// assert_eq!(queue.next_order_id(), Some(vip));
/// ```
pub struct OrderQueue {
    bus: Rc<dyn EventBus>,
    /// Last id handed out (0 before the first admission)
    last_id: OrderId,
    pending: Vec<AcceptedOrder>,
    processing: Vec<AcceptedOrder>,
    completed: Vec<AcceptedOrder>,
}

impl OrderQueue {
    pub fn new(bus: Rc<dyn EventBus>) -> Self {
        Self {
            bus,
            last_id: 0,
            pending: Vec::new(),
            processing: Vec::new(),
            completed: Vec::new(),
        }
    }

    /// Admit an order into `pending` and return its new id
    ///
    /// Emits `OrderAdded` once the order is in place.
    pub fn add_order(&mut self, order: Order) -> OrderId {
        self.last_id += 1;
        let accepted = AcceptedOrder::new(self.last_id, order);
        let position = self.insert_pending(accepted);

        debug!(
            order_id = accepted.id(),
            is_vip = accepted.is_vip(),
            position,
            "order added"
        );
        self.bus.dispatch(KitchenEvent::OrderAdded);
        accepted.id()
    }

    /// Id of the order at the head of `pending`
    pub fn next_order_id(&self) -> Option<OrderId> {
        self.pending.first().map(AcceptedOrder::id)
    }

    /// Move the head of `pending` to the back of `processing`
    ///
    /// Returns `None` when nothing is pending.
    pub fn process_next_order(&mut self) -> Option<AcceptedOrder> {
        if self.pending.is_empty() {
            return None;
        }
        let order = self.pending.remove(0);
        self.processing.push(order);

        debug!(order_id = order.id(), "order processing");
        Some(order)
    }

    /// Return a processing order to `pending` at its priority position
    ///
    /// Emits `ProcessingOrderCancelled` after reinsertion.
    ///
    /// # Errors
    /// `NotProcessing` if no processing order has this id.
    pub fn cancel_processing_order(&mut self, order_id: OrderId) -> Result<(), OrderError> {
        let order = self.take_processing(order_id)?;
        let position = self.insert_pending(order);

        debug!(order_id, position, "processing order cancelled");
        self.bus.dispatch(KitchenEvent::ProcessingOrderCancelled);
        Ok(())
    }

    /// Move a processing order to the back of `completed`
    ///
    /// Emits `OrderCompleted` after the move.
    ///
    /// # Errors
    /// `NotProcessing` if no processing order has this id, which includes an
    /// order that was already completed.
    pub fn complete_order(&mut self, order_id: OrderId) -> Result<(), OrderError> {
        let order = self.take_processing(order_id)?;
        self.completed.push(order);

        debug!(order_id, "order completed");
        self.bus.dispatch(KitchenEvent::OrderCompleted);
        Ok(())
    }

    /// Report which sequence holds an order
    ///
    /// # Errors
    /// `NotFound` if the id was never admitted.
    pub fn locate(&self, order_id: OrderId) -> Result<OrderStage, OrderError> {
        let holds = |orders: &[AcceptedOrder]| orders.iter().any(|order| order.id() == order_id);

        if holds(&self.pending) {
            Ok(OrderStage::Pending)
        } else if holds(&self.processing) {
            Ok(OrderStage::Processing)
        } else if holds(&self.completed) {
            Ok(OrderStage::Completed)
        } else {
            Err(OrderError::NotFound(order_id))
        }
    }

    /// Orders waiting, in serving order
    pub fn pending(&self) -> &[AcceptedOrder] {
        &self.pending
    }

    /// Orders handed to bots, in hand-off order
    pub fn processing(&self) -> &[AcceptedOrder] {
        &self.processing
    }

    /// Finished orders, in completion order
    pub fn completed(&self) -> &[AcceptedOrder] {
        &self.completed
    }

    /// Total number of orders ever admitted
    pub fn admitted(&self) -> usize {
        self.pending.len() + self.processing.len() + self.completed.len()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Insert before the first pending order this one precedes
    fn insert_pending(&mut self, order: AcceptedOrder) -> usize {
        let position = self
            .pending
            .iter()
            .position(|queued| order.precedes(queued))
            .unwrap_or(self.pending.len());
        self.pending.insert(position, order);
        position
    }

    fn take_processing(&mut self, order_id: OrderId) -> Result<AcceptedOrder, OrderError> {
        let index = self
            .processing
            .iter()
            .position(|order| order.id() == order_id)
            .ok_or(OrderError::NotProcessing(order_id))?;
        Ok(self.processing.remove(index))
    }
}

impl fmt::Debug for OrderQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderQueue")
            .field("last_id", &self.last_id)
            .field("pending", &self.pending)
            .field("processing", &self.processing)
            .field("completed", &self.completed)
            .finish()
    }
}
