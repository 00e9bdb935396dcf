//! Core engine — ties the live feed, the bet slip and settlement together.

pub mod sportsbook;

pub use sportsbook::{SlipSnapshot, Sportsbook};
