//! SPORTSBOOK — simulated live match feed and bet slip
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod feed;
pub mod slip;
pub mod engine;
pub mod dashboard;
