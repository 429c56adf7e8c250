//! Per-date trends and calendar-period aggregation.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::rolling::rolling_averages;
use super::{parse_date_param, round_div, AnalyticsError, ScoreSet};
use crate::models::{normalize_user, DailyGame, Period, PeriodBucket, RollingAverages};

/// One user's result on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRow {
    pub user: String,
    pub date: NaiveDate,
    pub total_score: i64,
    pub games_played: u32,
    pub avg_score: i64,
    pub perfect_scores: u32,
}

/// Chronological per-user-per-date rows, optionally for a single user.
///
/// Rows on the same date keep first-seen order.
pub fn trends(games: &[DailyGame], user: Option<&str>) -> Vec<TrendRow> {
    let user = user.map(normalize_user).filter(|u| !u.is_empty());
    let mut rows: Vec<TrendRow> = games
        .iter()
        .filter(|g| user.as_deref().map_or(true, |u| g.user == u))
        .map(|g| TrendRow {
            user: g.user.clone(),
            date: g.date,
            total_score: g.total_score,
            games_played: 1,
            avg_score: round_div(g.total_score, 1),
            perfect_scores: g.perfect_score_count,
        })
        .collect();
    rows.sort_by_key(|r| r.date);
    rows
}

/// Trends over a score set.
pub fn get_trends(set: &ScoreSet, user: Option<&str>) -> Vec<TrendRow> {
    trends(set.games(), user)
}

/// Bucket key for a date at the given granularity.
///
/// Weeks use the ISO-8601 week-numbering year, so 2024-12-30 is `2025-W01`.
pub fn period_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Day => date.format("%Y-%m-%d").to_string(),
        Period::Week => {
            let week = date.iso_week();
            format!("{:04}-W{:02}", week.year(), week.week())
        }
        Period::Month => format!("{:04}-{:02}", date.year(), date.month()),
        Period::Quarter => format!("{:04}-Q{}", date.year(), (date.month() - 1) / 3 + 1),
        Period::Year => format!("{:04}", date.year()),
    }
}

/// Period aggregation query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationQuery {
    pub period: Period,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for AggregationQuery {
    fn default() -> Self {
        Self {
            period: Period::Day,
            start_date: None,
            end_date: None,
        }
    }
}

impl AggregationQuery {
    /// Build a query from raw string parameters. A missing period means `day`.
    pub fn from_params(
        period: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self, AnalyticsError> {
        let period = match period.map(str::trim).filter(|s| !s.is_empty()) {
            Some(p) => p.parse().map_err(AnalyticsError::Validation)?,
            None => Period::Day,
        };
        Ok(Self {
            period,
            start_date: parse_date_param("startDate", start_date)?,
            end_date: parse_date_param("endDate", end_date)?,
        })
    }

    /// Inclusive date-range check.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |s| date >= s) && self.end_date.map_or(true, |e| date <= e)
    }
}

/// Group games by (period key, user), ascending by period key.
///
/// Buckets sharing a key keep first-seen order.
pub fn aggregate_periods<'a, I>(games: I, period: Period) -> Vec<PeriodBucket>
where
    I: IntoIterator<Item = &'a DailyGame>,
{
    let mut index: HashMap<(String, &'a str), usize> = HashMap::new();
    let mut buckets: Vec<PeriodBucket> = Vec::new();

    for game in games {
        let key = period_key(game.date, period);
        let i = match index.get(&(key.clone(), game.user.as_str())) {
            Some(&i) => i,
            None => {
                index.insert((key.clone(), game.user.as_str()), buckets.len());
                buckets.push(PeriodBucket {
                    period_key: key,
                    user: game.user.clone(),
                    total_score: 0,
                    games_played: 0,
                    dates: Default::default(),
                });
                buckets.len() - 1
            }
        };
        let bucket = &mut buckets[i];
        bucket.total_score += game.total_score;
        bucket.games_played += 1;
        bucket.dates.insert(game.date);
    }

    buckets.sort_by(|a, b| a.period_key.cmp(&b.period_key));
    buckets
}

/// Period buckets plus rolling averages for a filtered range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub period: Period,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub buckets: Vec<PeriodBucket>,
    /// Only populated for `day` granularity
    pub rolling: RollingAverages,
}

/// Aggregate games into calendar periods.
pub fn aggregations(games: &[DailyGame], query: &AggregationQuery) -> AggregationResult {
    let filtered: Vec<DailyGame> = games
        .iter()
        .filter(|g| query.contains(g.date))
        .cloned()
        .collect();

    AggregationResult {
        period: query.period,
        start_date: query.start_date,
        end_date: query.end_date,
        buckets: aggregate_periods(&filtered, query.period),
        rolling: rolling_averages(&filtered, query.period),
    }
}

/// Aggregations over a score set.
pub fn get_aggregations(set: &ScoreSet, query: &AggregationQuery) -> AggregationResult {
    aggregations(set.games(), query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, ScoreRecord};
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn rec(user: &str, date: &str, total: i64) -> ScoreRecord {
        ScoreRecord::new(user, d(date), 1, 90, total, None)
    }

    #[test]
    fn test_period_keys() {
        let date = d("2025-05-14");
        assert_eq!(period_key(date, Period::Day), "2025-05-14");
        assert_eq!(period_key(date, Period::Week), "2025-W20");
        assert_eq!(period_key(date, Period::Month), "2025-05");
        assert_eq!(period_key(date, Period::Quarter), "2025-Q2");
        assert_eq!(period_key(date, Period::Year), "2025");
    }

    #[test]
    fn test_iso_week_year_boundaries() {
        assert_eq!(period_key(d("2024-12-30"), Period::Week), "2025-W01");
        assert_eq!(period_key(d("2021-01-03"), Period::Week), "2020-W53");
        assert_eq!(period_key(d("2026-01-01"), Period::Week), "2026-W01");
        assert_eq!(period_key(d("2025-01-06"), Period::Week), "2025-W02");
    }

    #[test]
    fn test_quarter_boundaries() {
        assert_eq!(period_key(d("2025-03-31"), Period::Quarter), "2025-Q1");
        assert_eq!(period_key(d("2025-04-01"), Period::Quarter), "2025-Q2");
        assert_eq!(period_key(d("2025-12-31"), Period::Quarter), "2025-Q4");
    }

    #[test]
    fn test_trends_chronological_and_filtered() {
        let set = ScoreSet::new(vec![
            rec("bob", "2025-01-02", 500),
            rec("alice", "2025-01-01", 800),
            rec("alice", "2025-01-02", 700),
        ]);

        let all = get_trends(&set, None);
        let keys: Vec<(&str, String)> = all
            .iter()
            .map(|r| (r.user.as_str(), r.date.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("alice", "2025-01-01".to_string()),
                ("bob", "2025-01-02".to_string()),
                ("alice", "2025-01-02".to_string()),
            ]
        );

        let alice = get_trends(&set, Some(" Alice "));
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|r| r.user == "alice" && r.games_played == 1));
        assert_eq!(alice[1].avg_score, 700);
    }

    #[test]
    fn test_monthly_buckets_sum_and_sort() {
        let set = ScoreSet::new(vec![
            rec("alice", "2025-02-03", 600),
            rec("alice", "2025-01-30", 800),
            rec("bob", "2025-01-31", 500),
            rec("alice", "2025-01-31", 700),
        ]);
        let query = AggregationQuery {
            period: Period::Month,
            ..Default::default()
        };
        let result = get_aggregations(&set, &query);

        let rows: Vec<(&str, &str, i64, u32)> = result
            .buckets
            .iter()
            .map(|b| (b.period_key.as_str(), b.user.as_str(), b.total_score, b.games_played))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("2025-01", "alice", 1500, 2),
                ("2025-01", "bob", 500, 1),
                ("2025-02", "alice", 600, 1),
            ]
        );
        assert_eq!(result.buckets[0].dates.len(), 2);
        assert!(result.rolling.seven_day.is_empty());
        assert!(result.rolling.thirty_day.is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let set = ScoreSet::new(vec![
            rec("alice", "2025-01-01", 100),
            rec("alice", "2025-01-02", 200),
            rec("alice", "2025-01-03", 300),
            rec("alice", "2025-01-04", 400),
        ]);
        let query =
            AggregationQuery::from_params(Some("year"), Some("2025-01-02"), Some("2025-01-03"))
                .unwrap();
        let result = get_aggregations(&set, &query);

        assert_eq!(result.buckets.len(), 1);
        assert_eq!(result.buckets[0].total_score, 500);
        assert_eq!(result.buckets[0].games_played, 2);
    }

    #[test]
    fn test_query_validation() {
        assert_eq!(
            AggregationQuery::from_params(None, None, None).unwrap(),
            AggregationQuery::default()
        );
        assert!(matches!(
            AggregationQuery::from_params(Some("fortnight"), None, None),
            Err(AnalyticsError::Validation(_))
        ));
        assert!(AggregationQuery::from_params(Some("week"), Some("01/02/2025"), None).is_err());
    }
}
