//! Per-user totals and averages.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::{parse_date_param, round_div, AnalyticsError, ScoreSet};
use crate::models::{DailyGame, LeaderboardSort, UserAggregate};

/// Leaderboard query: a single date (daily mode) or all time (overall).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardQuery {
    pub date: Option<NaiveDate>,
    pub sort_by: LeaderboardSort,
}

impl LeaderboardQuery {
    /// Build a query from raw string parameters.
    pub fn from_params(date: Option<&str>, sort_by: Option<&str>) -> Result<Self, AnalyticsError> {
        let date = parse_date_param("date", date)?;
        let sort_by = match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse().map_err(AnalyticsError::Validation)?,
            None => LeaderboardSort::default(),
        };
        Ok(Self { date, sort_by })
    }
}

#[derive(Default)]
struct Accumulator {
    total_score: i64,
    games_played: u32,
    perfect_scores: u32,
    lowest: Option<i64>,
    highest: Option<i64>,
}

impl Accumulator {
    fn add(&mut self, game: &DailyGame) {
        self.total_score += game.total_score;
        self.games_played += 1;
        self.perfect_scores += game.perfect_score_count;
        if !game.location_scores.is_empty() {
            self.lowest = Some(
                self.lowest
                    .map_or(game.lowest_location_score, |l| l.min(game.lowest_location_score)),
            );
            self.highest = Some(
                self.highest
                    .map_or(game.highest_location_score, |h| h.max(game.highest_location_score)),
            );
        }
    }

    fn finish(self, user: &str) -> UserAggregate {
        UserAggregate {
            user: user.to_string(),
            total_score: self.total_score,
            games_played: self.games_played,
            avg_score: round_div(self.total_score, self.games_played),
            perfect_scores: self.perfect_scores,
            lowest_score: self.lowest.unwrap_or(0),
            highest_score: self.highest.unwrap_or(0),
        }
    }
}

/// Aggregate games per user, in first-seen user order.
///
/// Each game is one distinct (user, date), so `games_played` is the number
/// of distinct dates.
pub fn aggregate_users<'a, I>(games: I) -> Vec<UserAggregate>
where
    I: IntoIterator<Item = &'a DailyGame>,
{
    let mut order: Vec<&'a str> = Vec::new();
    let mut accs: HashMap<&'a str, Accumulator> = HashMap::new();

    for game in games {
        let acc = accs.entry(game.user.as_str()).or_insert_with(|| {
            order.push(game.user.as_str());
            Accumulator::default()
        });
        acc.add(game);
    }

    order
        .into_iter()
        .map(|user| accs.remove(user).unwrap_or_default().finish(user))
        .collect()
}

/// Sort rows descending by the chosen key.
///
/// The sort is stable: ties keep first-seen user order.
pub fn sort_leaderboard(rows: &mut [UserAggregate], sort_by: LeaderboardSort) {
    match sort_by {
        LeaderboardSort::TotalScore => rows.sort_by(|a, b| b.total_score.cmp(&a.total_score)),
        LeaderboardSort::AvgScore => rows.sort_by(|a, b| b.avg_score.cmp(&a.avg_score)),
        LeaderboardSort::PerfectScores => {
            rows.sort_by(|a, b| b.perfect_scores.cmp(&a.perfect_scores))
        }
        LeaderboardSort::GamesPlayed => rows.sort_by(|a, b| b.games_played.cmp(&a.games_played)),
    }
}

/// Build a leaderboard from daily games.
pub fn leaderboard(games: &[DailyGame], query: &LeaderboardQuery) -> Vec<UserAggregate> {
    let mut rows = match query.date {
        Some(date) => aggregate_users(games.iter().filter(|g| g.date == date)),
        None => aggregate_users(games),
    };
    sort_leaderboard(&mut rows, query.sort_by);
    rows
}

/// Leaderboard over a score set.
pub fn get_leaderboard(set: &ScoreSet, query: &LeaderboardQuery) -> Vec<UserAggregate> {
    leaderboard(set.games(), query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, ScoreRecord};
    use pretty_assertions::assert_eq;

    fn rec(user: &str, date: &str, score: i64, total: i64) -> ScoreRecord {
        ScoreRecord::new(user, parse_date(date).unwrap(), 1, score, total, None)
    }

    fn sample() -> ScoreSet {
        ScoreSet::new(vec![
            rec("alice", "2025-01-01", 90, 800),
            rec("alice", "2025-01-01", 100, 800),
            rec("bob", "2025-01-01", 70, 900),
            rec("alice", "2025-01-02", 60, 701),
            rec("bob", "2025-01-02", 100, 500),
            rec("carol", "2025-01-02", 100, 950),
        ])
    }

    #[test]
    fn test_overall_sums_daily_totals() {
        let rows = get_leaderboard(&sample(), &LeaderboardQuery::default());

        let alice = rows.iter().find(|r| r.user == "alice").unwrap();
        assert_eq!(alice.total_score, 1501);
        assert_eq!(alice.games_played, 2);
        assert_eq!(alice.avg_score, 751);
        assert_eq!(alice.perfect_scores, 1);
        assert_eq!(alice.lowest_score, 60);
        assert_eq!(alice.highest_score, 100);

        let users: Vec<&str> = rows.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(users, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_daily_mode_filters_date() {
        let query = LeaderboardQuery {
            date: parse_date("2025-01-02"),
            sort_by: LeaderboardSort::TotalScore,
        };
        let rows = get_leaderboard(&sample(), &query);

        let users: Vec<(&str, i64, u32)> = rows
            .iter()
            .map(|r| (r.user.as_str(), r.total_score, r.games_played))
            .collect();
        assert_eq!(
            users,
            vec![("carol", 950, 1), ("alice", 701, 1), ("bob", 500, 1)]
        );
    }

    #[test]
    fn test_daily_mode_unknown_date_is_empty() {
        let query = LeaderboardQuery {
            date: parse_date("2030-01-01"),
            ..Default::default()
        };
        assert!(get_leaderboard(&sample(), &query).is_empty());
    }

    #[test]
    fn test_sort_keys() {
        let set = sample();
        let by = |sort_by| {
            get_leaderboard(&set, &LeaderboardQuery { date: None, sort_by })
                .into_iter()
                .map(|r| r.user)
                .collect::<Vec<_>>()
        };

        assert_eq!(by(LeaderboardSort::AvgScore), vec!["carol", "alice", "bob"]);
        // alice, bob and carol each have one perfect location: ties stay in first-seen order
        assert_eq!(by(LeaderboardSort::PerfectScores), vec!["alice", "bob", "carol"]);
        assert_eq!(by(LeaderboardSort::GamesPlayed), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_empty_aggregate_has_no_sentinels() {
        let rows = aggregate_users(std::iter::empty());
        assert!(rows.is_empty());

        let row = Accumulator::default().finish("nobody");
        assert_eq!(row, UserAggregate::empty("nobody"));
    }

    #[test]
    fn test_leaderboard_sum_property() {
        let set = sample();
        let rows = get_leaderboard(&set, &LeaderboardQuery::default());
        for row in rows {
            let games: Vec<&DailyGame> =
                set.games().iter().filter(|g| g.user == row.user).collect();
            assert_eq!(row.total_score, games.iter().map(|g| g.total_score).sum::<i64>());
            assert_eq!(row.games_played as usize, games.len());
        }
    }

    #[test]
    fn test_query_from_params() {
        let q = LeaderboardQuery::from_params(Some("2025-01-02"), Some("avgScore")).unwrap();
        assert_eq!(q.date, parse_date("2025-01-02"));
        assert_eq!(q.sort_by, LeaderboardSort::AvgScore);

        assert_eq!(
            LeaderboardQuery::from_params(None, None).unwrap(),
            LeaderboardQuery::default()
        );
        assert!(LeaderboardQuery::from_params(None, Some("wins")).is_err());
        assert!(LeaderboardQuery::from_params(Some("yesterday"), None).is_err());
    }
}
