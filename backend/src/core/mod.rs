//! Simulation clock and timer queue

pub mod time;

pub use time::{Scheduler, TimerHandle, Timestamp};
