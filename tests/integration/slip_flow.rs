//! End-to-end bet slip sessions against a live feed.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use sportsbook::engine::Sportsbook;
    use sportsbook::feed::{catalog, FeedConfig, FeedSimulator};
    use sportsbook::slip::ledger::{InMemoryLedger, SettlementKind, SettlementLedger};
    use sportsbook::slip::BetSlip;
    use sportsbook::types::{Outcome, ValidationError, WagerState};

    use crate::mock_ledger::MockLedger;

    fn book_with(ledger: Arc<dyn SettlementLedger>) -> Sportsbook {
        let feed = FeedSimulator::new(
            catalog::sample_matches(),
            FeedConfig::default(),
            StdRng::seed_from_u64(17),
        )
        .unwrap();
        Sportsbook::new(Arc::new(RwLock::new(feed)), BetSlip::new(), ledger)
    }

    fn validation(err: &anyhow::Error) -> Option<&ValidationError> {
        err.downcast_ref::<ValidationError>()
    }

    #[tokio::test]
    async fn test_full_session_select_stake_cash_out_place() {
        let ledger = Arc::new(InMemoryLedger::new());
        let book = book_with(ledger.clone());

        let home = book.select("m1", &Outcome::Home).await.unwrap();
        let runs = book.select("m1", &Outcome::SessionRuns).await.unwrap();
        let tennis = book.select("m3", &Outcome::Away).await.unwrap();
        assert_eq!((home, runs, tennis), (0, 1, 2));

        let wager = book.set_stake(home, dec!(50)).await.unwrap();
        assert_eq!(wager.state(), WagerState::Staked);
        assert_eq!(wager.potential_payout(), dec!(122.50));
        book.set_stake(runs, dec!(10)).await.unwrap();
        book.set_stake(tennis, dec!(20)).await.unwrap();

        let slip = book.slip().await;
        assert_eq!(slip.total_stake, dec!(80));
        assert_eq!(slip.total_potential_payout, dec!(122.50) + dec!(21.0) + dec!(46.0));
        assert!(slip.can_place);

        assert_eq!(book.cash_out_value(home).await.unwrap(), dec!(98.000));
        let settlement = book.cash_out(home).await.unwrap();
        assert_eq!(settlement.kind, SettlementKind::CashOut);
        assert_eq!(settlement.amount, dec!(98.000));

        let slip = book.slip().await;
        assert_eq!(slip.wagers.len(), 2);
        assert_eq!(slip.wagers[0].market_type(), "session-runs");

        let placed = book.place_all().await.unwrap();
        assert_eq!(placed.len(), 2);
        assert!(placed.iter().all(|s| s.kind == SettlementKind::Placement));
        assert!(book.slip().await.wagers.is_empty());

        assert_eq!(ledger.len().await, 3);
        assert_eq!(ledger.total_cashed_out().await, dec!(98.000));
        assert_eq!(book.settlements().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_wager_price_frozen_while_feed_moves() {
        let book = book_with(Arc::new(InMemoryLedger::new()));
        book.select("m1", &Outcome::Home).await.unwrap();

        {
            let feed = book.feed();
            let mut feed = feed.write().await;
            for _ in 0..100 {
                feed.tick();
            }
        }

        let slip = book.slip().await;
        assert_eq!(slip.wagers[0].price(), dec!(2.45));
    }

    #[tokio::test]
    async fn test_suspended_match_rejects_selection_until_resumed() {
        let book = book_with(Arc::new(InMemoryLedger::new()));

        let err = book.select("m2", &Outcome::Draw).await.unwrap_err();
        assert!(matches!(err, ValidationError::MatchSuspended { ref reason, .. } if reason == "VAR Review in Progress"));

        {
            let feed = book.feed();
            let mut feed = feed.write().await;
            while feed.get("m2").unwrap().is_suspended() {
                feed.tick();
            }
        }

        let index = book.select("m2", &Outcome::Draw).await.unwrap();
        let slip = book.slip().await;
        assert_eq!(slip.wagers[index].market_type(), "draw");
        assert!(slip.wagers[index].price() >= dec!(1.01));
    }

    #[tokio::test]
    async fn test_ledger_outage_keeps_slip_intact() {
        let ledger = Arc::new(MockLedger::new());
        let book = book_with(ledger.clone());

        book.select("m1", &Outcome::Away).await.unwrap();
        book.set_stake(0, dec!(40)).await.unwrap();

        ledger.fail_with("ledger offline");
        let err = book.cash_out(0).await.unwrap_err();
        assert!(validation(&err).is_none());
        let err = book.place_all().await.unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert_eq!(book.slip().await.wagers.len(), 1);
        assert_eq!(ledger.settled_count(), 0);

        ledger.recover();
        let settlement = book.cash_out(0).await.unwrap();
        assert_eq!(settlement.amount, dec!(52.800));
        assert!(book.slip().await.wagers.is_empty());
    }

    #[tokio::test]
    async fn test_validation_errors_surface_through_anyhow() {
        let book = book_with(Arc::new(MockLedger::new()));

        let err = book.place_all().await.unwrap_err();
        assert_eq!(validation(&err), Some(&ValidationError::EmptySlip));

        book.select("m3", &Outcome::Home).await.unwrap();
        let err = book.cash_out(0).await.unwrap_err();
        assert_eq!(validation(&err), Some(&ValidationError::ZeroStakeCashOut { index: 0 }));

        let err = book.place_all().await.unwrap_err();
        assert_eq!(validation(&err), Some(&ValidationError::UnstakedSelection { index: 0 }));

        let err = book.cash_out(5).await.unwrap_err();
        assert_eq!(validation(&err), Some(&ValidationError::InvalidIndex { index: 5, len: 1 }));
    }

    #[tokio::test]
    async fn test_manual_selection_and_removal() {
        let book = book_with(Arc::new(InMemoryLedger::new()));

        book.add_selection("m1", "home", dec!(2.00)).await.unwrap();
        book.add_selection("m1", "home", dec!(2.00)).await.unwrap();
        book.set_stake(1, dec!(10)).await.unwrap();

        let removed = book.remove_selection(0).await.unwrap();
        assert_eq!(removed.stake(), Decimal::ZERO);
        let slip = book.slip().await;
        assert_eq!(slip.wagers.len(), 1);
        assert_eq!(slip.total_potential_payout, dec!(20.00));

        book.clear_all().await;
        let slip = book.slip().await;
        assert!(slip.wagers.is_empty());
        assert_eq!(slip.total_stake, Decimal::ZERO);
        assert!(!slip.can_place);
    }
}
