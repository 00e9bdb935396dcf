//! Feed simulation harness.
//!
//! Runs the sample catalogue through many seeded ticks and checks the
//! invariants that must hold after every step.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::RwLock;

    use sportsbook::feed::simulator::MIN_ODDS;
    use sportsbook::feed::{catalog, spawn_feed, FeedConfig, FeedSimulator};
    use sportsbook::types::{Match, MatchStatus};

    fn seeded(seed: u64) -> FeedSimulator<StdRng> {
        FeedSimulator::new(
            catalog::sample_matches(),
            FeedConfig::default(),
            StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    fn frozen(m: &Match) -> (String, String, Option<u32>, Option<u32>, String) {
        (
            m.home_team.clone(),
            m.away_team.clone(),
            m.home_score,
            m.away_score,
            m.clock.clone(),
        )
    }

    #[test]
    fn test_invariants_hold_over_long_run() {
        let mut feed = seeded(2024);
        let initial = feed.matches().to_vec();

        for _ in 0..1_000 {
            let report = feed.tick();
            for (m, before) in feed.matches().iter().zip(&initial) {
                assert_eq!(m.id, before.id);
                assert_eq!(frozen(m), frozen(before));
                assert_eq!(m.is_suspended(), m.status == MatchStatus::Suspended);
                assert_eq!(m.odds.draw.is_some(), before.odds.draw.is_some());
                for price in m.odds.prices() {
                    assert!(price >= MIN_ODDS, "price {price} fell below floor");
                    assert_eq!(price, price.round_dp(2));
                }
            }
            assert!(report.repriced <= 2);
        }
        assert_eq!(feed.tick_count(), 1_000);
    }

    #[test]
    fn test_upcoming_match_never_moves() {
        let mut feed = seeded(7);
        let before = feed.get("m3").unwrap().clone();
        for _ in 0..500 {
            feed.tick();
        }
        assert_eq!(feed.get("m3").unwrap(), &before);
    }

    #[test]
    fn test_live_and_suspended_states_both_visited() {
        let mut feed = seeded(99);
        let mut saw_suspend = false;
        let mut saw_resume = false;
        for _ in 0..500 {
            let report = feed.tick();
            saw_suspend |= !report.suspended.is_empty();
            saw_resume |= !report.resumed.is_empty();
        }
        assert!(saw_suspend);
        assert!(saw_resume);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let mut a = seeded(31);
        let mut b = seeded(31);
        for _ in 0..200 {
            assert_eq!(a.tick(), b.tick());
        }
        assert_eq!(a.matches(), b.matches());
    }

    #[test]
    fn test_odds_drift_stays_bounded_per_tick() {
        let mut feed = seeded(5);
        let jitter = Decimal::from_f64_retain(FeedConfig::default().odds_jitter).unwrap();
        let half = jitter / Decimal::TWO + Decimal::new(1, 2);
        for _ in 0..300 {
            let before = feed.get("m1").unwrap().odds.clone();
            feed.tick();
            let after = &feed.get("m1").unwrap().odds;
            if after != &before {
                assert!((after.home - before.home).abs() <= half);
                assert!((after.away - before.away).abs() <= half);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runner_ticks_shared_feed() {
        let feed = Arc::new(RwLock::new(seeded(3)));
        let handle = spawn_feed(feed.clone(), Duration::from_millis(3_000));

        tokio::time::sleep(Duration::from_millis(9_500)).await;
        let ticks = handle.stop().await.unwrap();

        assert_eq!(ticks, 3);
        assert_eq!(feed.read().await.tick_count(), 3);
    }
}
