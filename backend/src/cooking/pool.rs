//! Bot Pool
//!
//! Owns the cooking bots, tracks how many are busy and hands work to the
//! first idle bot. The pool learns about finished cooks only through the bus:
//! it listens for `CookingCompleted` and releases one unit of capacity per
//! event, whichever bot sent it.
//!
//! # Critical Invariants
//!
//! - `0 <= busy_count <= len`
//! - Removal is last-in-first-out
//! - A bot removed mid-cook yields its order through `BotRemoved`

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::time::Scheduler;
use crate::cooking::bot::{BotId, CookingBot, COOKING_TIME_MS};
use crate::events::{EventBus, EventKind, KitchenEvent};
use crate::models::order::AcceptedOrder;

/// Errors raised when assigning work to bots
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CookingError {
    #[error("No cooking bots available")]
    NoCapacity,

    #[error("Cooking bot {0} is already cooking")]
    BotBusy(BotId),
}

/// Read-only status of one bot in the pool
///
/// A copy taken when requested; it does not follow later changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotStatus {
    id: BotId,
    order: Option<AcceptedOrder>,
}

impl BotStatus {
    pub fn id(&self) -> BotId {
        self.id
    }

    /// The order the bot was cooking, if any
    pub fn order(&self) -> Option<AcceptedOrder> {
        self.order
    }

    pub fn is_cooking(&self) -> bool {
        self.order.is_some()
    }
}

impl From<&CookingBot> for BotStatus {
    fn from(bot: &CookingBot) -> Self {
        BotStatus {
            id: bot.id(),
            order: bot.order(),
        }
    }
}

/// Ordered collection of bots with a busy counter
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use kitchen_simulator_core_rs::cooking::BotPool;
/// use kitchen_simulator_core_rs::events::LocalEventBus;
/// use kitchen_simulator_core_rs::Scheduler;
///
/// let mut pool = BotPool::new(Rc::new(LocalEventBus::new()), Rc::new(Scheduler::new()));
/// assert!(!pool.can_cook());
///
/// pool.add_bot();
/// assert!(pool.can_cook());
/// ```
pub struct BotPool {
    bots: Vec<CookingBot>,
    /// Bots currently cooking, shared with the completion listener
    busy: Rc<Cell<usize>>,
    next_bot_id: BotId,
    cooking_time_ms: u64,
    bus: Rc<dyn EventBus>,
    scheduler: Rc<Scheduler>,
}

impl BotPool {
    /// Create an empty pool whose bots cook for `COOKING_TIME_MS`
    pub fn new(bus: Rc<dyn EventBus>, scheduler: Rc<Scheduler>) -> Self {
        Self::with_cooking_time(COOKING_TIME_MS, bus, scheduler)
    }

    /// Create an empty pool whose bots cook for `cooking_time_ms`
    ///
    /// Registers the completion listener on `bus`.
    pub fn with_cooking_time(
        cooking_time_ms: u64,
        bus: Rc<dyn EventBus>,
        scheduler: Rc<Scheduler>,
    ) -> Self {
        let busy: Rc<Cell<usize>> = Rc::new(Cell::new(0));
        let counter = Rc::clone(&busy);
        bus.listen(
            EventKind::CookingCompleted,
            Box::new(move |_| counter.set(counter.get().saturating_sub(1))),
        );

        Self {
            bots: Vec::new(),
            busy,
            next_bot_id: 1,
            cooking_time_ms,
            bus,
            scheduler,
        }
    }

    /// Append a new idle bot and emit `BotAdded`
    pub fn add_bot(&mut self) -> BotId {
        let id = self.next_bot_id;
        self.next_bot_id += 1;
        self.bots.push(CookingBot::with_cooking_time(
            id,
            self.cooking_time_ms,
            Rc::clone(&self.bus),
            Rc::clone(&self.scheduler),
        ));

        info!(bot_id = id, bots = self.bots.len(), "bot added");
        self.bus.dispatch(KitchenEvent::BotAdded);
        id
    }

    /// Remove the most recently added bot and emit `BotRemoved`
    ///
    /// A cooking bot is stopped first; its order id travels in the event so
    /// the order can be re-queued. Does nothing on an empty pool.
    pub fn remove_bot(&mut self) {
        let Some(bot) = self.bots.pop() else {
            return;
        };

        let displaced = bot.stop().map(|order| order.id());
        if displaced.is_some() {
            self.busy.set(self.busy.get().saturating_sub(1));
        }

        info!(
            bot_id = bot.id(),
            displaced_order = ?displaced,
            bots = self.bots.len(),
            "bot removed"
        );
        self.bus.dispatch(KitchenEvent::BotRemoved {
            order_id: displaced,
        });
    }

    /// Whether at least one bot is idle
    pub fn can_cook(&self) -> bool {
        self.busy.get() < self.bots.len()
    }

    /// Hand `order` to the first idle bot in pool order
    ///
    /// Returns the id of the bot that took it.
    ///
    /// # Errors
    /// `NoCapacity` if every bot is cooking (or the pool is empty).
    pub fn cook(&mut self, order: AcceptedOrder) -> Result<BotId, CookingError> {
        let bot = self
            .bots
            .iter()
            .find(|bot| !bot.is_cooking())
            .ok_or(CookingError::NoCapacity)?;
        bot.cook(order)?;
        self.busy.set(self.busy.get() + 1);

        debug!(bot_id = bot.id(), order_id = order.id(), "order assigned");
        Ok(bot.id())
    }

    /// Status of every bot, in pool order
    ///
    /// Only the pool binds or unbinds orders on its bots.
    pub fn bots(&self) -> Vec<BotStatus> {
        self.bots.iter().map(BotStatus::from).collect()
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }

    /// Number of bots currently cooking
    pub fn busy_count(&self) -> usize {
        self.busy.get()
    }
}

impl fmt::Debug for BotPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotPool")
            .field("bots", &self.bots)
            .field("busy", &self.busy.get())
            .finish()
    }
}
