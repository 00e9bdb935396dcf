//! Simulated live match feed.
//!
//! The simulator owns the match collection and mutates it one tick at a
//! time; the runner drives ticks on a timer.

pub mod catalog;
pub mod runner;
pub mod simulator;

pub use runner::{spawn_feed, FeedHandle, SharedFeed};
pub use simulator::{FeedConfig, FeedSimulator, TickReport};
