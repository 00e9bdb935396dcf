//! Settlement ledger.
//!
//! The slip only computes values; moving money is the ledger's job. The
//! in-memory ledger just records what would have been settled.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::CashOut;
use crate::types::Wager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementKind {
    CashOut,
    Placement,
}

/// One settled wager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    pub id: Uuid,
    pub kind: SettlementKind,
    pub match_id: String,
    pub market_type: String,
    pub price: Decimal,
    pub stake: Decimal,
    /// Cash-out value paid, or potential payout for a placed bet.
    pub amount: Decimal,
    pub settled_at: DateTime<Utc>,
}

impl Settlement {
    pub fn cash_out(cash_out: &CashOut) -> Self {
        Self::new(SettlementKind::CashOut, &cash_out.wager, cash_out.value)
    }

    pub fn placement(wager: &Wager) -> Self {
        Self::new(SettlementKind::Placement, wager, wager.potential_payout())
    }

    fn new(kind: SettlementKind, wager: &Wager, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            match_id: wager.match_id().to_string(),
            market_type: wager.market_type().to_string(),
            price: wager.price(),
            stake: wager.stake(),
            amount,
            settled_at: Utc::now(),
        }
    }
}

/// Where cash-outs and placed bets are settled.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettlementLedger: Send + Sync {
    async fn settle_cash_out(&self, cash_out: &CashOut) -> Result<Settlement>;

    async fn settle_placement(&self, wagers: &[Wager]) -> Result<Vec<Settlement>>;

    /// Everything settled so far, oldest first.
    async fn history(&self) -> Result<Vec<Settlement>>;
}

/// Ledger that keeps settlements in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<Vec<Settlement>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Sum of all cash-out amounts paid.
    pub async fn total_cashed_out(&self) -> Decimal {
        self.entries
            .read()
            .await
            .iter()
            .filter(|s| s.kind == SettlementKind::CashOut)
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.amount))
    }
}

#[async_trait]
impl SettlementLedger for InMemoryLedger {
    async fn settle_cash_out(&self, cash_out: &CashOut) -> Result<Settlement> {
        let settlement = Settlement::cash_out(cash_out);
        info!(
            id = %settlement.id,
            match_id = %settlement.match_id,
            market_type = %settlement.market_type,
            stake = %settlement.stake,
            value = %settlement.amount,
            "Cash-out settled"
        );
        self.entries.write().await.push(settlement.clone());
        Ok(settlement)
    }

    async fn settle_placement(&self, wagers: &[Wager]) -> Result<Vec<Settlement>> {
        let settlements: Vec<Settlement> = wagers.iter().map(Settlement::placement).collect();
        let total_stake: Decimal = settlements.iter().map(|s| s.stake).sum();
        info!(count = settlements.len(), total_stake = %total_stake, "Bets placed");
        self.entries.write().await.extend(settlements.iter().cloned());
        Ok(settlements)
    }

    async fn history(&self) -> Result<Vec<Settlement>> {
        Ok(self.entries.read().await.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
