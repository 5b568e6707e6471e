//! Cooking Bot
//!
//! A bot cooks one order at a time. `cook` binds the order and arms a
//! one-shot timer on the shared scheduler; when the timer fires the bot
//! unbinds the order and publishes `CookingCompleted`. `stop` disarms the
//! timer and hands the order back, so no completion is ever published for a
//! stopped cook.
//!
//! ```text
//! idle ──cook(order)──► cooking ──timer expiry──► idle   (emits CookingCompleted)
//!                       cooking ──stop()────────► idle   (returns the order)
//! idle ──stop()──► idle                                  (returns None)
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::core::time::{Scheduler, TimerHandle};
use crate::cooking::pool::CookingError;
use crate::events::{EventBus, KitchenEvent};
use crate::models::order::AcceptedOrder;

/// Fixed cooking duration, in virtual milliseconds
pub const COOKING_TIME_MS: u64 = 10_000;

/// Pool-assigned bot identifier
pub type BotId = u64;

/// Mutable part of a bot, shared with its pending timer callback
#[derive(Debug, Default)]
struct BotState {
    order: Option<AcceptedOrder>,
    timer: Option<TimerHandle>,
}

/// A worker processing exactly one order for a fixed duration
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use kitchen_simulator_core_rs::cooking::{CookingBot, COOKING_TIME_MS};
/// use kitchen_simulator_core_rs::events::LocalEventBus;
/// use kitchen_simulator_core_rs::{Order, OrderQueue, Scheduler};
///
/// let bus = Rc::new(LocalEventBus::new());
/// let scheduler = Rc::new(Scheduler::new());
/// let mut queue = OrderQueue::new(bus.clone());
/// queue.add_order(Order::normal(0));
///
/// let bot = CookingBot::new(1, bus, scheduler.clone());
/// bot.cook(queue.process_next_order().unwrap()).unwrap();
/// assert!(bot.is_cooking());
///
/// scheduler.advance(COOKING_TIME_MS);
/// assert!(!bot.is_cooking());
/// ```
pub struct CookingBot {
    id: BotId,
    cooking_time_ms: u64,
    state: Rc<RefCell<BotState>>,
    bus: Rc<dyn EventBus>,
    scheduler: Rc<Scheduler>,
}

impl CookingBot {
    /// Create an idle bot cooking for `COOKING_TIME_MS`
    pub fn new(id: BotId, bus: Rc<dyn EventBus>, scheduler: Rc<Scheduler>) -> Self {
        Self::with_cooking_time(id, COOKING_TIME_MS, bus, scheduler)
    }

    /// Create an idle bot with a custom cooking duration
    pub fn with_cooking_time(
        id: BotId,
        cooking_time_ms: u64,
        bus: Rc<dyn EventBus>,
        scheduler: Rc<Scheduler>,
    ) -> Self {
        Self {
            id,
            cooking_time_ms,
            state: Rc::new(RefCell::new(BotState::default())),
            bus,
            scheduler,
        }
    }

    pub fn id(&self) -> BotId {
        self.id
    }

    /// True iff an order is bound
    pub fn is_cooking(&self) -> bool {
        self.state.borrow().order.is_some()
    }

    /// The order being cooked, if any
    pub fn order(&self) -> Option<AcceptedOrder> {
        self.state.borrow().order
    }

    /// Bind `order` and arm the completion timer
    ///
    /// # Errors
    /// `BotBusy` if the bot is already cooking; the bound order is untouched.
    pub fn cook(&self, order: AcceptedOrder) -> Result<(), CookingError> {
        let mut state = self.state.borrow_mut();
        if state.order.is_some() {
            return Err(CookingError::BotBusy(self.id));
        }

        let bot_id = self.id;
        let shared = Rc::downgrade(&self.state);
        let bus = Rc::clone(&self.bus);
        let timer = self.scheduler.schedule(self.cooking_time_ms, move || {
            // The bot may have been dropped without being stopped.
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let finished = {
                let mut state = shared.borrow_mut();
                state.timer = None;
                state.order.take()
            };
            if let Some(order) = finished {
                debug!(bot_id, order_id = order.id(), "cooking completed");
                bus.dispatch(KitchenEvent::CookingCompleted {
                    order_id: order.id(),
                });
            }
        });

        state.order = Some(order);
        state.timer = Some(timer);
        debug!(bot_id, order_id = order.id(), "cooking started");
        Ok(())
    }

    /// Disarm the timer and unbind the order
    ///
    /// Safe to call on an idle bot (returns `None`) and idempotent.
    pub fn stop(&self) -> Option<AcceptedOrder> {
        let mut state = self.state.borrow_mut();
        if let Some(timer) = state.timer.take() {
            self.scheduler.cancel(timer);
        }
        let order = state.order.take();
        if let Some(order) = &order {
            debug!(bot_id = self.id, order_id = order.id(), "cooking stopped");
        }
        order
    }
}

impl Drop for CookingBot {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for CookingBot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookingBot")
            .field("id", &self.id)
            .field("cooking_time_ms", &self.cooking_time_ms)
            .field("order", &self.order())
            .finish()
    }
}
