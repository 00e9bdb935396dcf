//! Match feed simulator.
//!
//! Each tick, every live match may be suspended, every suspended match may
//! resume, and every live match that stayed live gets its odds jittered.
//! Upcoming and finished matches are left alone. The random source is a
//! type parameter so tests can drive transitions deterministically.

use rand::Rng;
use rust_decimal::prelude::*;
use std::collections::HashSet;
use tracing::debug;

pub use crate::types::MIN_ODDS;
use crate::types::{Match, MatchStatus, Odds, ValidationError};

pub const DEFAULT_SUSPENSION_REASON: &str = "Major Event - Betting Suspended";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Transition probabilities and jitter width for one tick.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Chance a live match is suspended on a tick.
    pub suspend_probability: f64,
    /// Chance a suspended match resumes on a tick.
    pub resume_probability: f64,
    /// Full width `d` of the uniform odds delta, drawn from [-d/2, +d/2].
    pub odds_jitter: f64,
    /// Reason shown on matches the simulator suspends.
    pub suspension_reason: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            suspend_probability: 0.10,
            resume_probability: 0.30,
            odds_jitter: 0.15,
            suspension_reason: DEFAULT_SUSPENSION_REASON.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// What changed during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub suspended: Vec<String>,
    pub resumed: Vec<String>,
    pub repriced: usize,
}

impl TickReport {
    pub fn is_quiet(&self) -> bool {
        self.suspended.is_empty() && self.resumed.is_empty() && self.repriced == 0
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

pub struct FeedSimulator<R> {
    matches: Vec<Match>,
    config: FeedConfig,
    rng: R,
    ticks: u64,
}

impl<R: Rng> FeedSimulator<R> {
    /// Build a simulator over `matches`. Every match is validated and ids
    /// must be unique; malformed records are rejected here so `tick` never
    /// has to fail.
    pub fn new(matches: Vec<Match>, config: FeedConfig, rng: R) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for m in &matches {
            m.validate()?;
            if !seen.insert(m.id.as_str()) {
                return Err(ValidationError::DuplicateMatch(m.id.clone()));
            }
        }

        Ok(Self {
            matches,
            config,
            rng,
            ticks: 0,
        })
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn get(&self, match_id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Number of ticks applied so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn live_count(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| m.status == MatchStatus::Live)
            .count()
    }

    /// Advance the feed by one step.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let mut report = TickReport {
            tick: self.ticks,
            ..TickReport::default()
        };

        let Self {
            matches,
            config,
            rng,
            ..
        } = self;

        for m in matches.iter_mut() {
            match m.status {
                MatchStatus::Live => {
                    if rng.gen::<f64>() < config.suspend_probability {
                        m.suspend(config.suspension_reason.as_str());
                        report.suspended.push(m.id.clone());
                    } else {
                        jitter_odds(&mut m.odds, config.odds_jitter, rng);
                        report.repriced += 1;
                    }
                }
                MatchStatus::Suspended => {
                    if rng.gen::<f64>() < config.resume_probability {
                        m.resume();
                        report.resumed.push(m.id.clone());
                    }
                }
                MatchStatus::Upcoming | MatchStatus::Finished => {}
            }
        }

        debug!(
            tick = report.tick,
            suspended = ?report.suspended,
            resumed = ?report.resumed,
            repriced = report.repriced,
            "Feed ticked"
        );

        report
    }
}

/// Move every present price by its own random delta. Draws happen in
/// home / away / draw order.
fn jitter_odds<R: Rng + ?Sized>(odds: &mut Odds, width: f64, rng: &mut R) {
    odds.home = jitter_price(odds.home, width, rng);
    odds.away = jitter_price(odds.away, width, rng);
    if let Some(draw) = odds.draw.as_mut() {
        *draw = jitter_price(*draw, width, rng);
    }
}

fn jitter_price<R: Rng + ?Sized>(price: Decimal, width: f64, rng: &mut R) -> Decimal {
    let delta = (rng.gen::<f64>() - 0.5) * width;
    let delta = Decimal::from_f64(delta).unwrap_or(Decimal::ZERO);
    (price + delta)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .max(MIN_ODDS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
