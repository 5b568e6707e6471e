//! Cooking bots and the pool that dispatches work to them

pub mod bot;
pub mod pool;

pub use bot::{BotId, CookingBot, COOKING_TIME_MS};
pub use pool::{BotPool, BotStatus, CookingError};
