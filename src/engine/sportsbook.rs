//! Sportsbook — the surface the presentation layer talks to.
//!
//! Holds the shared feed, the bet slip and the settlement ledger. Selections
//! copy the current price out of the feed, so later ticks never touch a
//! wager already on the slip. Settling operations quote first, settle
//! through the ledger, and only then change the slip.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::feed::SharedFeed;
use crate::slip::ledger::{Settlement, SettlementLedger};
use crate::slip::{BetSlip, CashOut};
use crate::types::{Match, MatchStatus, Outcome, ValidationError, Wager};

/// Read-only view of the slip for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlipSnapshot {
    pub wagers: Vec<Wager>,
    pub total_stake: Decimal,
    pub total_potential_payout: Decimal,
    /// Cash-out offer per line; `None` for unstaked lines.
    pub cash_out_values: Vec<Option<Decimal>>,
    /// Whether `place_all` would currently succeed.
    pub can_place: bool,
}

impl SlipSnapshot {
    fn of(slip: &BetSlip) -> Self {
        Self {
            wagers: slip.wagers().to_vec(),
            total_stake: slip.total_stake(),
            total_potential_payout: slip.total_potential_payout(),
            cash_out_values: (0..slip.len()).map(|i| slip.cash_out_value(i).ok()).collect(),
            can_place: slip.ensure_placeable().is_ok(),
        }
    }
}

pub struct Sportsbook {
    feed: SharedFeed,
    slip: RwLock<BetSlip>,
    ledger: Arc<dyn SettlementLedger>,
}

impl Sportsbook {
    pub fn new(feed: SharedFeed, slip: BetSlip, ledger: Arc<dyn SettlementLedger>) -> Self {
        Self {
            feed,
            slip: RwLock::new(slip),
            ledger,
        }
    }

    /// Handle to the feed, for the runner.
    pub fn feed(&self) -> SharedFeed {
        self.feed.clone()
    }

    pub async fn matches(&self) -> Vec<Match> {
        self.feed.read().await.matches().to_vec()
    }

    pub async fn slip(&self) -> SlipSnapshot {
        SlipSnapshot::of(&*self.slip.read().await)
    }

    /// Pick an outcome from the live feed at its current price.
    pub async fn select(&self, match_id: &str, outcome: &Outcome) -> Result<usize, ValidationError> {
        let price = {
            let feed = self.feed.read().await;
            quote(feed.get(match_id), match_id, outcome)?
        };
        self.slip
            .write()
            .await
            .add_selection(match_id, &outcome.label(), price)
    }

    /// Add a line with an explicit price, bypassing the feed lookup.
    pub async fn add_selection(
        &self,
        match_id: &str,
        market_type: &str,
        price: Decimal,
    ) -> Result<usize, ValidationError> {
        self.slip.write().await.add_selection(match_id, market_type, price)
    }

    pub async fn set_stake(&self, index: usize, stake: Decimal) -> Result<Wager, ValidationError> {
        self.slip.write().await.set_stake(index, stake).cloned()
    }

    pub async fn remove_selection(&self, index: usize) -> Result<Wager, ValidationError> {
        self.slip.write().await.remove_selection(index)
    }

    pub async fn clear_all(&self) {
        self.slip.write().await.clear_all();
    }

    pub async fn cash_out_value(&self, index: usize) -> Result<Decimal, ValidationError> {
        self.slip.read().await.cash_out_value(index)
    }

    /// Confirm a cash-out. The line leaves the slip only once the ledger has
    /// accepted the settlement.
    pub async fn cash_out(&self, index: usize) -> Result<Settlement> {
        let mut slip = self.slip.write().await;
        let value = slip.cash_out_value(index)?;
        let wager = slip.wagers()[index].clone();

        let settlement = self
            .ledger
            .settle_cash_out(&CashOut { wager, value })
            .await
            .inspect_err(|e| warn!(index, error = %e, "Cash-out settlement failed"))?;

        slip.confirm_cash_out(index)?;
        info!(index, value = %value, "Cash-out complete");
        Ok(settlement)
    }

    /// Place every line on the slip. The slip is emptied only once the
    /// ledger has accepted all of them.
    pub async fn place_all(&self) -> Result<Vec<Settlement>> {
        let mut slip = self.slip.write().await;
        slip.ensure_placeable()?;

        let settlements = self
            .ledger
            .settle_placement(slip.wagers())
            .await
            .inspect_err(|e| warn!(error = %e, "Placement settlement failed"))?;

        let placed = slip.place_all()?;
        info!(
            count = placed.len(),
            total_stake = %placed.iter().map(Wager::stake).sum::<Decimal>(),
            "Bets placed"
        );
        Ok(settlements)
    }

    pub async fn settlements(&self) -> Result<Vec<Settlement>> {
        self.ledger.history().await
    }
}

/// Current price of `outcome`, if the match exists and is taking selections.
///
/// Suspended matches refuse selections with their reason. Finished matches
/// refuse them too, which is stricter than the web front-end: it only
/// disables the odds buttons while a match is suspended.
fn quote(m: Option<&Match>, match_id: &str, outcome: &Outcome) -> Result<Decimal, ValidationError> {
    let m = m.ok_or_else(|| ValidationError::UnknownMatch(match_id.to_string()))?;

    match m.status {
        MatchStatus::Suspended => {
            return Err(ValidationError::MatchSuspended {
                match_id: m.id.clone(),
                reason: m.suspension_reason.clone().unwrap_or_default(),
            })
        }
        MatchStatus::Finished => {
            return Err(ValidationError::MatchNotOpen {
                match_id: m.id.clone(),
                status: m.status,
            })
        }
        MatchStatus::Live | MatchStatus::Upcoming => {}
    }

    m.price_for(outcome).ok_or_else(|| ValidationError::UnknownOutcome {
        match_id: m.id.clone(),
        market_type: outcome.label(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
