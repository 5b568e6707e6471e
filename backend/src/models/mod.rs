//! Domain models for the kitchen simulator

pub mod event;
pub mod order;

// Re-exports
pub use event::{EventLog, LoggedEvent};
pub use order::{AcceptedOrder, Order, OrderId};
