//! Bet slip — the user's in-progress wagers.
//!
//! Every operation is validated up front and either applies fully or leaves
//! the slip as it was. Identical selections are kept as separate lines.

pub mod ledger;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use crate::types::{ValidationError, Wager};

/// Share of the potential payout offered on cash-out.
pub const DEFAULT_CASH_OUT_RATIO: Decimal = dec!(0.8);

/// A wager leaving the slip through cash-out, with the amount offered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashOut {
    pub wager: Wager,
    pub value: Decimal,
}

#[derive(Debug, Clone)]
pub struct BetSlip {
    wagers: Vec<Wager>,
    cash_out_ratio: Decimal,
}

impl Default for BetSlip {
    fn default() -> Self {
        Self::new()
    }
}

impl BetSlip {
    pub fn new() -> Self {
        Self::with_cash_out_ratio(DEFAULT_CASH_OUT_RATIO)
    }

    pub fn with_cash_out_ratio(cash_out_ratio: Decimal) -> Self {
        Self {
            wagers: Vec::new(),
            cash_out_ratio,
        }
    }

    pub fn wagers(&self) -> &[Wager] {
        &self.wagers
    }

    pub fn get(&self, index: usize) -> Option<&Wager> {
        self.wagers.get(index)
    }

    pub fn len(&self) -> usize {
        self.wagers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wagers.is_empty()
    }

    pub fn cash_out_ratio(&self) -> Decimal {
        self.cash_out_ratio
    }

    /// Append a new unstaked line. Returns its index.
    pub fn add_selection(
        &mut self,
        match_id: &str,
        market_type: &str,
        price: Decimal,
    ) -> Result<usize, ValidationError> {
        let wager = Wager::new(match_id, market_type, price)?;
        self.wagers.push(wager);
        let index = self.wagers.len() - 1;
        debug!(index, match_id, market_type, %price, "Selection added");
        Ok(index)
    }

    /// Stake one line. The slip totals must stay representable with the new
    /// stake in place, so `total_stake` and `total_potential_payout` never
    /// overflow.
    pub fn set_stake(&mut self, index: usize, stake: Decimal) -> Result<&Wager, ValidationError> {
        let mut staked = self.wager(index)?.clone();
        staked.set_stake(stake)?;

        let others = || {
            self.wagers
                .iter()
                .enumerate()
                .filter(move |(i, _)| *i != index)
                .map(|(_, w)| w)
        };
        let stake_fits = others()
            .try_fold(staked.stake(), |acc, w| acc.checked_add(w.stake()))
            .is_some();
        let payout_fits = others()
            .try_fold(staked.potential_payout(), |acc, w| acc.checked_add(w.potential_payout()))
            .is_some();
        if !(stake_fits && payout_fits) {
            return Err(ValidationError::StakeTooLarge { stake });
        }

        self.wagers[index] = staked;
        Ok(&self.wagers[index])
    }

    /// Remove one line; later lines shift down by one.
    pub fn remove_selection(&mut self, index: usize) -> Result<Wager, ValidationError> {
        self.check_index(index)?;
        Ok(self.wagers.remove(index))
    }

    pub fn clear_all(&mut self) {
        self.wagers.clear();
    }

    pub fn total_stake(&self) -> Decimal {
        self.wagers.iter().map(Wager::stake).sum()
    }

    pub fn total_potential_payout(&self) -> Decimal {
        self.wagers.iter().map(Wager::potential_payout).sum()
    }

    /// Cash-out offer for a staked line. Does not modify the slip.
    pub fn cash_out_value(&self, index: usize) -> Result<Decimal, ValidationError> {
        let wager = self.wager(index)?;
        if wager.stake() <= Decimal::ZERO {
            return Err(ValidationError::ZeroStakeCashOut { index });
        }
        wager
            .potential_payout()
            .checked_mul(self.cash_out_ratio)
            .ok_or(ValidationError::StakeTooLarge { stake: wager.stake() })
    }

    /// Take a staked line off the slip at its cash-out value.
    pub fn confirm_cash_out(&mut self, index: usize) -> Result<CashOut, ValidationError> {
        let value = self.cash_out_value(index)?;
        let wager = self.wagers.remove(index);
        debug!(index, %value, "Cash-out confirmed");
        Ok(CashOut { wager, value })
    }

    /// Whether `place_all` would succeed.
    pub fn ensure_placeable(&self) -> Result<(), ValidationError> {
        if self.wagers.is_empty() {
            return Err(ValidationError::EmptySlip);
        }
        match self.wagers.iter().position(|w| w.stake() <= Decimal::ZERO) {
            Some(index) => Err(ValidationError::UnstakedSelection { index }),
            None => Ok(()),
        }
    }

    /// Place every line at once. Requires a non-empty slip where every line
    /// carries a stake; on success the slip is emptied.
    pub fn place_all(&mut self) -> Result<Vec<Wager>, ValidationError> {
        self.ensure_placeable()?;
        Ok(self.wagers.drain(..).collect())
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        self.wager(index).map(|_| ())
    }

    fn wager(&self, index: usize) -> Result<&Wager, ValidationError> {
        self.wagers.get(index).ok_or(ValidationError::InvalidIndex {
            index,
            len: self.wagers.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
