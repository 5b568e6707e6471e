//! Event catalogue and the publish/subscribe bus

pub mod bus;
pub mod types;

pub use bus::{EventBus, Listener, LocalEventBus};
pub use types::{EventKind, KitchenEvent};
