//! Shared types for the sportsbook core.
//!
//! Matches, odds, outcomes and bet-slip wagers. The feed simulator and the
//! bet slip both depend on these types but never on each other.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

/// Sports offered by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Cricket,
    Football,
    Tennis,
    Basketball,
}

impl Sport {
    pub const ALL: &'static [Sport] = &[
        Sport::Cricket,
        Sport::Football,
        Sport::Tennis,
        Sport::Basketball,
    ];

    /// Whether a match of this sport can be priced with a draw outcome.
    pub fn supports_draw(&self) -> bool {
        matches!(self, Sport::Football)
    }

    /// Session markets (runs / wickets / overs) only exist for cricket.
    pub fn supports_session_markets(&self) -> bool {
        matches!(self, Sport::Cricket)
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sport::Cricket => write!(f, "Cricket"),
            Sport::Football => write!(f, "Football"),
            Sport::Tennis => write!(f, "Tennis"),
            Sport::Basketball => write!(f, "Basketball"),
        }
    }
}

/// Case-insensitive parse, accepting a few common aliases.
impl std::str::FromStr for Sport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cricket" => Ok(Sport::Cricket),
            "football" | "soccer" => Ok(Sport::Football),
            "tennis" => Ok(Sport::Tennis),
            "basketball" | "nba" => Ok(Sport::Basketball),
            _ => Err(anyhow::anyhow!("Unknown sport: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Match status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Live,
    Upcoming,
    Finished,
    Suspended,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Live => write!(f, "live"),
            MatchStatus::Upcoming => write!(f, "upcoming"),
            MatchStatus::Finished => write!(f, "finished"),
            MatchStatus::Suspended => write!(f, "suspended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Odds & side markets
// ---------------------------------------------------------------------------

/// Decimal odds for the match-winner market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Odds {
    pub home: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw: Option<Decimal>,
    pub away: Decimal,
}

impl Odds {
    pub fn two_way(home: Decimal, away: Decimal) -> Self {
        Self { home, draw: None, away }
    }

    pub fn three_way(home: Decimal, draw: Decimal, away: Decimal) -> Self {
        Self { home, draw: Some(draw), away }
    }

    /// Every present price, in home / draw / away order.
    pub fn prices(&self) -> Vec<Decimal> {
        let mut prices = vec![self.home];
        if let Some(draw) = self.draw {
            prices.push(draw);
        }
        prices.push(self.away);
        prices
    }
}

/// Cricket session thresholds. Each threshold is offered at a fixed price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMarkets {
    pub runs: u32,
    pub wickets: u32,
    pub overs: u32,
}

impl SessionMarkets {
    pub const RUNS_PRICE: Decimal = dec!(2.10);
    pub const WICKETS_PRICE: Decimal = dec!(1.90);
    pub const OVERS_PRICE: Decimal = dec!(1.80);
}

/// A named player outcome and its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPrice {
    pub name: String,
    pub price: Decimal,
}

impl PlayerPrice {
    pub fn new(name: &str, price: Decimal) -> Self {
        Self { name: name.to_string(), price }
    }
}

/// Player-performance markets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerMarkets {
    pub top_scorer: Vec<PlayerPrice>,
    pub most_wickets: Vec<PlayerPrice>,
}

/// Lowest match-winner price the feed will quote.
pub const MIN_ODDS: Decimal = dec!(1.01);

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A priced outcome a user can pick from a match.
///
/// Serialises as its market-type label (`"home"`, `"session-runs"`,
/// `"top-scorer-<name>"`, ...), which is also what ends up on the wager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Outcome {
    Home,
    Draw,
    Away,
    SessionRuns,
    SessionWickets,
    SessionOvers,
    TopScorer(String),
    MostWickets(String),
}

const TOP_SCORER_PREFIX: &str = "top-scorer-";
const MOST_WICKETS_PREFIX: &str = "most-wickets-";

impl Outcome {
    /// Market-type label recorded on the wager.
    pub fn label(&self) -> String {
        match self {
            Outcome::Home => "home".to_string(),
            Outcome::Draw => "draw".to_string(),
            Outcome::Away => "away".to_string(),
            Outcome::SessionRuns => "session-runs".to_string(),
            Outcome::SessionWickets => "session-wickets".to_string(),
            Outcome::SessionOvers => "session-overs".to_string(),
            Outcome::TopScorer(name) => format!("{TOP_SCORER_PREFIX}{name}"),
            Outcome::MostWickets(name) => format!("{MOST_WICKETS_PREFIX}{name}"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Outcome::Home),
            "draw" => Ok(Outcome::Draw),
            "away" => Ok(Outcome::Away),
            "session-runs" => Ok(Outcome::SessionRuns),
            "session-wickets" => Ok(Outcome::SessionWickets),
            "session-overs" => Ok(Outcome::SessionOvers),
            _ => {
                if let Some(name) = s.strip_prefix(TOP_SCORER_PREFIX).filter(|n| !n.is_empty()) {
                    Ok(Outcome::TopScorer(name.to_string()))
                } else if let Some(name) =
                    s.strip_prefix(MOST_WICKETS_PREFIX).filter(|n| !n.is_empty())
                {
                    Ok(Outcome::MostWickets(name.to_string()))
                } else {
                    Err(anyhow::anyhow!("Unknown market type: {s}"))
                }
            }
        }
    }
}

impl TryFrom<String> for Outcome {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.label()
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A fixture in the simulated feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub sport: Sport,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: MatchStatus,
    /// Display clock, e.g. "15.2 overs", "67'", "15:30".
    pub clock: String,
    pub odds: Odds,
    pub session: Option<SessionMarkets>,
    pub players: Option<PlayerMarkets>,
    pub suspension_reason: Option<String>,
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} v {} ({}, {}) home={} away={}",
            self.sport, self.home_team, self.away_team, self.status, self.clock,
            self.odds.home, self.odds.away,
        )?;
        if let Some(draw) = self.odds.draw {
            write!(f, " draw={draw}")?;
        }
        Ok(())
    }
}

impl Match {
    /// Derived from the status so the flag and the status cannot disagree.
    pub fn is_suspended(&self) -> bool {
        self.status == MatchStatus::Suspended
    }

    /// Whether selections may currently be taken on this match.
    pub fn accepts_selections(&self) -> bool {
        matches!(self.status, MatchStatus::Live | MatchStatus::Upcoming)
    }

    pub fn suspend(&mut self, reason: impl Into<String>) {
        self.status = MatchStatus::Suspended;
        self.suspension_reason = Some(reason.into());
    }

    pub fn resume(&mut self) {
        self.status = MatchStatus::Live;
        self.suspension_reason = None;
    }

    /// Current price for an outcome, or `None` if this match doesn't offer it.
    pub fn price_for(&self, outcome: &Outcome) -> Option<Decimal> {
        match outcome {
            Outcome::Home => Some(self.odds.home),
            Outcome::Draw => self.odds.draw,
            Outcome::Away => Some(self.odds.away),
            Outcome::SessionRuns => self.session.as_ref().map(|_| SessionMarkets::RUNS_PRICE),
            Outcome::SessionWickets => {
                self.session.as_ref().map(|_| SessionMarkets::WICKETS_PRICE)
            }
            Outcome::SessionOvers => self.session.as_ref().map(|_| SessionMarkets::OVERS_PRICE),
            Outcome::TopScorer(name) => self
                .players
                .as_ref()
                .and_then(|p| p.top_scorer.iter().find(|pp| &pp.name == name))
                .map(|pp| pp.price),
            Outcome::MostWickets(name) => self
                .players
                .as_ref()
                .and_then(|p| p.most_wickets.iter().find(|pp| &pp.name == name))
                .map(|pp| pp.price),
        }
    }

    /// Every outcome this match currently offers, in display order.
    pub fn outcomes(&self) -> Vec<Outcome> {
        let mut outcomes = vec![Outcome::Home];
        if self.odds.draw.is_some() {
            outcomes.push(Outcome::Draw);
        }
        outcomes.push(Outcome::Away);
        if self.session.is_some() {
            outcomes.extend([
                Outcome::SessionRuns,
                Outcome::SessionWickets,
                Outcome::SessionOvers,
            ]);
        }
        if let Some(players) = &self.players {
            outcomes.extend(players.top_scorer.iter().map(|p| Outcome::TopScorer(p.name.clone())));
            outcomes.extend(
                players.most_wickets.iter().map(|p| Outcome::MostWickets(p.name.clone())),
            );
        }
        outcomes
    }

    /// Structural checks run when a match enters the feed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidMatch {
            match_id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if self.home_team.trim().is_empty() || self.away_team.trim().is_empty() {
            return Err(invalid("missing team name"));
        }
        if self.odds.prices().iter().any(|p| *p < MIN_ODDS) {
            return Err(invalid(&format!("odds must be at least {MIN_ODDS}")));
        }
        if self.odds.draw.is_some() && !self.sport.supports_draw() {
            return Err(invalid(&format!("{} has no draw outcome", self.sport)));
        }
        if self.session.is_some() && !self.sport.supports_session_markets() {
            return Err(invalid(&format!("{} has no session markets", self.sport)));
        }
        if self.suspension_reason.is_some() && !self.is_suspended() {
            return Err(invalid("suspension reason on a match that is not suspended"));
        }
        if let Some(players) = &self.players {
            let all = players.top_scorer.iter().chain(players.most_wickets.iter());
            for player in all {
                if player.name.trim().is_empty() {
                    return Err(invalid("unnamed player outcome"));
                }
                if player.price <= Decimal::ZERO {
                    return Err(invalid(&format!("non-positive price for {}", player.name)));
                }
            }
            let mut seen = HashSet::new();
            if !players.top_scorer.iter().all(|p| seen.insert(&p.name)) {
                return Err(invalid("duplicate top scorer outcome"));
            }
            seen.clear();
            if !players.most_wickets.iter().all(|p| seen.insert(&p.name)) {
                return Err(invalid("duplicate most wickets outcome"));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wager
// ---------------------------------------------------------------------------

/// Where a wager sits in its lifecycle while still on the slip.
///
/// Cashed-out, placed and removed wagers leave the slip, so they have no
/// state here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WagerState {
    Created,
    Staked,
}

/// One bet-slip line.
///
/// The price is a copy taken at selection time; it never follows the feed.
/// `potential_payout` is kept equal to `stake * price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wager {
    match_id: String,
    market_type: String,
    price: Decimal,
    stake: Decimal,
    potential_payout: Decimal,
}

impl Wager {
    pub fn new(
        match_id: impl Into<String>,
        market_type: impl Into<String>,
        price: Decimal,
    ) -> Result<Self, ValidationError> {
        if price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice { price });
        }
        Ok(Self {
            match_id: match_id.into(),
            market_type: market_type.into(),
            price,
            stake: Decimal::ZERO,
            potential_payout: Decimal::ZERO,
        })
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn market_type(&self) -> &str {
        &self.market_type
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stake(&self) -> Decimal {
        self.stake
    }

    pub fn potential_payout(&self) -> Decimal {
        self.potential_payout
    }

    pub fn state(&self) -> WagerState {
        if self.stake > Decimal::ZERO {
            WagerState::Staked
        } else {
            WagerState::Created
        }
    }

    /// Set the stake and recompute the payout. Negative stakes and stakes
    /// whose payout is not representable are rejected and leave the wager
    /// untouched.
    pub fn set_stake(&mut self, stake: Decimal) -> Result<(), ValidationError> {
        if stake < Decimal::ZERO {
            return Err(ValidationError::NegativeStake { stake });
        }
        let payout = stake
            .checked_mul(self.price)
            .ok_or(ValidationError::StakeTooLarge { stake })?;
        self.stake = stake;
        self.potential_payout = payout;
        Ok(())
    }
}

impl fmt::Display for Wager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {} stake={} win={}",
            self.match_id, self.market_type, self.price, self.stake, self.potential_payout,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Caller errors. Every operation returning one leaves state unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Selection index {index} out of range (slip has {len} entries)")]
    InvalidIndex { index: usize, len: usize },

    #[error("Stake must not be negative (got {stake})")]
    NegativeStake { stake: Decimal },

    #[error("Stake {stake} is too large")]
    StakeTooLarge { stake: Decimal },

    #[error("Price must be positive (got {price})")]
    NonPositivePrice { price: Decimal },

    #[error("Selection {index} has no stake to cash out")]
    ZeroStakeCashOut { index: usize },

    #[error("Bet slip is empty")]
    EmptySlip,

    #[error("Selection {index} has no stake")]
    UnstakedSelection { index: usize },

    #[error("Match not found: {0}")]
    UnknownMatch(String),

    #[error("Match {match_id} does not offer {market_type}")]
    UnknownOutcome { match_id: String, market_type: String },

    #[error("Betting suspended on match {match_id}: {reason}")]
    MatchSuspended { match_id: String, reason: String },

    #[error("Match {match_id} is {status}")]
    MatchNotOpen { match_id: String, status: MatchStatus },

    #[error("Invalid match {match_id}: {reason}")]
    InvalidMatch { match_id: String, reason: String },

    #[error("Duplicate match id: {0}")]
    DuplicateMatch(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
