//! Orchestrator - the kitchen's event-driven dispatch loop
//!
//! See `engine.rs` for full implementation.

pub mod engine;
pub mod snapshot;

// Re-export main types for convenience
pub use engine::{Kitchen, KitchenConfig, KitchenError};

// Re-export snapshot types
pub use snapshot::{BotView, KitchenSnapshot, OrderView};
