//! Sample fixtures the feed starts from.

use rust_decimal_macros::dec;

use crate::types::{
    Match, MatchStatus, Odds, PlayerMarkets, PlayerPrice, SessionMarkets, Sport,
};

/// The three demo fixtures: a live cricket match with session and player
/// markets, a suspended football match, and an upcoming tennis match.
pub fn sample_matches() -> Vec<Match> {
    vec![
        Match {
            id: "m1".to_string(),
            sport: Sport::Cricket,
            home_team: "Mumbai Indians".to_string(),
            away_team: "Chennai Super Kings".to_string(),
            home_score: Some(156),
            away_score: Some(89),
            status: MatchStatus::Live,
            clock: "15.2 overs".to_string(),
            odds: Odds::two_way(dec!(2.45), dec!(1.65)),
            session: Some(SessionMarkets {
                runs: 45,
                wickets: 3,
                overs: 5,
            }),
            players: Some(PlayerMarkets {
                top_scorer: vec![
                    PlayerPrice::new("Rohit Sharma", dec!(3.2)),
                    PlayerPrice::new("MS Dhoni", dec!(4.1)),
                ],
                most_wickets: vec![
                    PlayerPrice::new("Jasprit Bumrah", dec!(2.8)),
                    PlayerPrice::new("Ravindra Jadeja", dec!(3.5)),
                ],
            }),
            suspension_reason: None,
        },
        Match {
            id: "m2".to_string(),
            sport: Sport::Football,
            home_team: "Manchester United".to_string(),
            away_team: "Liverpool".to_string(),
            home_score: Some(1),
            away_score: Some(2),
            status: MatchStatus::Suspended,
            clock: "67'".to_string(),
            odds: Odds::three_way(dec!(2.45), dec!(3.20), dec!(1.85)),
            session: None,
            players: None,
            suspension_reason: Some("VAR Review in Progress".to_string()),
        },
        Match {
            id: "m3".to_string(),
            sport: Sport::Tennis,
            home_team: "Novak Djokovic".to_string(),
            away_team: "Rafael Nadal".to_string(),
            home_score: None,
            away_score: None,
            status: MatchStatus::Upcoming,
            clock: "15:30".to_string(),
            odds: Odds::two_way(dec!(1.65), dec!(2.30)),
            session: None,
            players: None,
            suspension_reason: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_valid() {
        for m in sample_matches() {
            assert!(m.validate().is_ok(), "{} failed validation", m.id);
        }
    }

    #[test]
    fn test_sample_statuses() {
        let statuses: Vec<_> = sample_matches().iter().map(|m| m.status).collect();
        assert_eq!(
            statuses,
            vec![MatchStatus::Live, MatchStatus::Suspended, MatchStatus::Upcoming]
        );
    }

    #[test]
    fn test_only_football_sample_has_draw() {
        for m in sample_matches() {
            assert_eq!(m.odds.draw.is_some(), m.sport == Sport::Football);
        }
    }
}
