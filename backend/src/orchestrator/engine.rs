//! Kitchen Engine
//!
//! Thin orchestration loop wiring the order queue to the bot pool:
//! - Order intake (VIP or normal, stamped with the virtual time)
//! - Bot pool sizing (add / remove, with requeue of displaced orders)
//! - Dispatch of pending orders to idle bots
//! - Completion bookkeeping when a bot's timer expires
//! - Event logging (complete run history)
//!
//! # Architecture
//!
//! The kitchen subscribes to every event kind through a channel-backed
//! mailbox. After each public operation it drains the mailbox to completion:
//!
//! ```text
//! For each drained event:
//! 1. Append it to the event log
//! 2. CookingCompleted { order_id }      → complete the order
//! 3. BotRemoved { order_id: Some(id) }  → put the order back in pending
//! 4. OrderAdded / BotAdded / CookingCompleted / BotRemoved
//!                                       → assign pending orders while a bot is idle
//! ```
//!
//! Reactions may publish further events (e.g. `OrderCompleted`); they land
//! in the same mailbox and are drained in the same pass.
//!
//! # Example
//!
//! ```rust
//! use kitchen_simulator_core_rs::{Kitchen, KitchenConfig, COOKING_TIME_MS};
//!
//! let mut kitchen = Kitchen::new(KitchenConfig::default()).unwrap();
//! kitchen.add_bot().unwrap();
//! let normal = kitchen.submit_order(false).unwrap();
//!
//! kitchen.advance(COOKING_TIME_MS).unwrap();
//! assert_eq!(kitchen.orders().completed()[0].id(), normal);
//! ```

use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::time::{Scheduler, Timestamp};
use crate::cooking::{BotId, BotPool, BotStatus, CookingError, COOKING_TIME_MS};
use crate::events::{EventBus, EventKind, KitchenEvent, Listener, LocalEventBus};
use crate::models::event::EventLog;
use crate::models::order::{Order, OrderId};
use crate::orchestrator::snapshot::KitchenSnapshot;
use crate::orders::{OrderError, OrderQueue};

// ============================================================================
// Configuration Types
// ============================================================================

/// Kitchen configuration
///
/// # Fields
///
/// * `cooking_time_ms` - How long every bot takes per order
/// * `initial_bots` - Bots present when the kitchen opens
///
/// Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Cooking duration in virtual milliseconds (must be positive)
    pub cooking_time_ms: u64,

    /// Number of bots added at start-up
    pub initial_bots: usize,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            cooking_time_ms: COOKING_TIME_MS,
            initial_bots: 0,
        }
    }
}

impl KitchenConfig {
    /// Parse a configuration from JSON
    ///
    /// # Example
    /// ```
    /// use kitchen_simulator_core_rs::KitchenConfig;
    ///
    /// let config = KitchenConfig::from_json(r#"{"initial_bots": 2}"#).unwrap();
    /// assert_eq!(config.initial_bots, 2);
    /// assert_eq!(config.cooking_time_ms, 10_000);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, KitchenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), KitchenError> {
        if self.cooking_time_ms == 0 {
            return Err(KitchenError::InvalidConfig(
                "cooking_time_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Kitchen errors
#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Cooking error: {0}")]
    Cooking(#[from] CookingError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Kitchen
// ============================================================================

/// Orchestrator owning the bus, the clock, the order queue and the bot pool
pub struct Kitchen {
    config: KitchenConfig,
    bus: Rc<LocalEventBus>,
    scheduler: Rc<Scheduler>,
    orders: OrderQueue,
    pool: BotPool,
    inbox: Receiver<KitchenEvent>,
    event_log: EventLog,
}

impl Kitchen {
    /// Create a kitchen from a validated configuration
    ///
    /// # Errors
    /// `InvalidConfig` if validation fails.
    pub fn new(config: KitchenConfig) -> Result<Self, KitchenError> {
        config.validate()?;

        let bus = Rc::new(LocalEventBus::new());
        let scheduler = Rc::new(Scheduler::new());
        let shared_bus: Rc<dyn EventBus> = bus.clone();

        let orders = OrderQueue::new(Rc::clone(&shared_bus));
        let pool = BotPool::with_cooking_time(
            config.cooking_time_ms,
            Rc::clone(&shared_bus),
            Rc::clone(&scheduler),
        );

        let (sender, inbox) = mpsc::channel();
        for kind in EventKind::ALL {
            let sender = sender.clone();
            bus.listen(
                kind,
                Box::new(move |event| {
                    // Only fails once the kitchen (and its receiver) is gone.
                    let _ = sender.send(event.clone());
                }),
            );
        }

        let mut kitchen = Self {
            config,
            bus,
            scheduler,
            orders,
            pool,
            inbox,
            event_log: EventLog::new(),
        };
        for _ in 0..kitchen.config.initial_bots {
            kitchen.add_bot()?;
        }

        info!(
            cooking_time_ms = kitchen.config.cooking_time_ms,
            bots = kitchen.pool.len(),
            "kitchen opened"
        );
        Ok(kitchen)
    }

    /// Submit a new order stamped with the current virtual time
    pub fn submit_order(&mut self, is_vip: bool) -> Result<OrderId, KitchenError> {
        let order_id = self.orders.add_order(Order::new(is_vip, self.scheduler.now()));
        self.pump()?;
        Ok(order_id)
    }

    /// Add a bot to the pool
    pub fn add_bot(&mut self) -> Result<BotId, KitchenError> {
        let bot_id = self.pool.add_bot();
        self.pump()?;
        Ok(bot_id)
    }

    /// Withdraw the most recently added bot, re-queueing its order
    pub fn remove_bot(&mut self) -> Result<(), KitchenError> {
        self.pool.remove_bot();
        self.pump()
    }

    /// Advance virtual time by `delta_ms`, reacting to every timer on the way
    ///
    /// Timers armed while reacting fire within the same call if they fall due
    /// before the target time. If a reaction fails, the clock stays at the
    /// time of the failing timer and later timers remain armed.
    pub fn advance(&mut self, delta_ms: u64) -> Result<(), KitchenError> {
        let target = self.scheduler.now().saturating_add(delta_ms);
        while self.scheduler.fire_next_until(target) {
            self.pump()?;
        }
        self.scheduler.advance_to(target);
        Ok(())
    }

    /// Current virtual time
    pub fn now(&self) -> Timestamp {
        self.scheduler.now()
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    pub fn orders(&self) -> &OrderQueue {
        &self.orders
    }

    pub fn pool(&self) -> &BotPool {
        &self.pool
    }

    /// Status of every bot, in pool order
    pub fn bots(&self) -> Vec<BotStatus> {
        self.pool.bots()
    }

    /// Register an observer for one event kind
    ///
    /// Observers run synchronously during dispatch, after the kitchen's own
    /// components. They can watch the bus but not publish on it.
    pub fn subscribe(&self, kind: EventKind, listener: Listener) {
        self.bus.listen(kind, listener);
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Serializable view of the three sequences and the bots
    pub fn snapshot(&self) -> KitchenSnapshot {
        KitchenSnapshot::capture(self.now(), &self.orders, &self.pool)
    }

    // ========================================================================
    // Event handling
    // ========================================================================

    /// Drain the mailbox, reacting to each event in arrival order
    ///
    /// On error the events still queued are logged without reactions.
    fn pump(&mut self) -> Result<(), KitchenError> {
        while let Ok(event) = self.inbox.try_recv() {
            self.event_log.log(self.scheduler.now(), event.clone());

            if let Err(err) = self.react(&event) {
                while let Ok(rest) = self.inbox.try_recv() {
                    self.event_log.log(self.scheduler.now(), rest);
                }
                warn!(event = event.kind().as_str(), error = %err, "reaction failed");
                return Err(err);
            }
        }
        Ok(())
    }

    fn react(&mut self, event: &KitchenEvent) -> Result<(), KitchenError> {
        match *event {
            KitchenEvent::CookingCompleted { order_id } => {
                self.orders.complete_order(order_id)?;
            }
            KitchenEvent::BotRemoved {
                order_id: Some(order_id),
            } => {
                self.orders.cancel_processing_order(order_id)?;
            }
            _ => {}
        }

        if event.triggers_dispatch() {
            self.assign_pending_orders()?;
        }
        Ok(())
    }

    /// Hand pending orders to idle bots until one side runs out
    fn assign_pending_orders(&mut self) -> Result<(), KitchenError> {
        while self.orders.next_order_id().is_some() && self.pool.can_cook() {
            let Some(order) = self.orders.process_next_order() else {
                break;
            };

            match self.pool.cook(order) {
                Ok(bot_id) => {
                    debug!(order_id = order.id(), bot_id, "dispatched");
                }
                Err(CookingError::NoCapacity) => {
                    warn!(order_id = order.id(), "no idle bot, order returned to pending");
                    self.orders.cancel_processing_order(order.id())?;
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Kitchen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kitchen")
            .field("now", &self.scheduler.now())
            .field("pending", &self.orders.pending().len())
            .field("processing", &self.orders.processing().len())
            .field("completed", &self.orders.completed().len())
            .field("bots", &self.pool.len())
            .field("busy", &self.pool.busy_count())
            .finish()
    }
}
