//! Mock ledger for integration testing.
//!
//! Provides a deterministic `SettlementLedger` that records settlements in
//! memory and can be told to refuse every request.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use sportsbook::slip::ledger::{Settlement, SettlementLedger};
use sportsbook::slip::CashOut;
use sportsbook::types::Wager;

/// A ledger whose failures are controllable from test code.
#[derive(Clone, Default)]
pub struct MockLedger {
    settled: Arc<Mutex<Vec<Settlement>>>,
    /// If set, every settlement fails with this message.
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn recover(&self) {
        *self.force_error.lock().unwrap() = None;
    }

    pub fn settled_count(&self) -> usize {
        self.settled.lock().unwrap().len()
    }

    fn check(&self) -> Result<()> {
        match self.force_error.lock().unwrap().as_ref() {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SettlementLedger for MockLedger {
    async fn settle_cash_out(&self, cash_out: &CashOut) -> Result<Settlement> {
        self.check()?;
        let settlement = Settlement::cash_out(cash_out);
        self.settled.lock().unwrap().push(settlement.clone());
        Ok(settlement)
    }

    async fn settle_placement(&self, wagers: &[Wager]) -> Result<Vec<Settlement>> {
        self.check()?;
        let settlements: Vec<Settlement> = wagers.iter().map(Settlement::placement).collect();
        self.settled.lock().unwrap().extend(settlements.iter().cloned());
        Ok(settlements)
    }

    async fn history(&self) -> Result<Vec<Settlement>> {
        self.check()?;
        Ok(self.settled.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_ledger_records_and_fails_on_demand() {
        let ledger = MockLedger::new();
        let wager = Wager::new("m1", "home", dec!(2.0)).unwrap();

        ledger.settle_placement(&[wager.clone()]).await.unwrap();
        assert_eq!(ledger.settled_count(), 1);

        ledger.fail_with("ledger offline");
        let err = ledger.settle_placement(&[wager]).await.unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert_eq!(ledger.settled_count(), 1);
    }
}
