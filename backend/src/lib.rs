//! Kitchen Simulator Core - Rust Engine
//!
//! Order-fulfillment simulation with deterministic virtual time: orders are
//! queued by priority, dispatched to a pool of cooking bots and move through
//! pending → processing → completed.
//!
//! # Architecture
//!
//! - **core**: Virtual clock and the global timer queue
//! - **models**: Domain types (Order, AcceptedOrder, EventLog)
//! - **events**: Event catalogue and the publish/subscribe bus
//! - **orders**: Order queue with VIP-first priority insertion
//! - **cooking**: Cooking bots and the bot pool
//! - **orchestrator**: Kitchen loop wiring orders to bots, plus snapshots
//!
//! # Critical Invariants
//!
//! 1. An order lives in exactly one of pending, processing, completed
//! 2. Pending keeps every VIP order ahead of every normal order
//! 3. All time is virtual; a stopped bot never reports completion

// Module declarations
pub mod cooking;
pub mod core;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod orders;

// Re-exports for convenience
pub use cooking::{BotId, BotPool, BotStatus, CookingBot, CookingError, COOKING_TIME_MS};
pub use crate::core::time::{Scheduler, TimerHandle, Timestamp};
pub use events::{EventBus, EventKind, KitchenEvent, LocalEventBus};
pub use models::{
    event::{EventLog, LoggedEvent},
    order::{AcceptedOrder, Order, OrderId},
};
pub use orchestrator::{Kitchen, KitchenConfig, KitchenError, KitchenSnapshot};
pub use orders::{OrderError, OrderQueue, OrderStage};
