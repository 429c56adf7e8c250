//! Statistics calculation engine.
//!
//! Pure functions over an immutable [`ScoreSet`]:
//! - Daily game grouping
//! - Leaderboards (daily and overall)
//! - Calendar-period trends and rolling averages
//! - Streaks and achievements
//! - Player stats and head-to-head comparison
//!
//! Nothing here performs I/O. Every division guards against zero games
//! and resolves to 0.

pub mod achievements;
pub mod comparison;
pub mod grouping;
pub mod leaderboard;
pub mod player;
pub mod rolling;
pub mod streaks;
pub mod summary;
pub mod trends;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{parse_date, DailyGame, ScoreRecord};

pub use achievements::get_achievements;
pub use comparison::get_comparison;
pub use grouping::group_daily_games;
pub use leaderboard::{get_leaderboard, LeaderboardQuery};
pub use player::get_player_stats;
pub use streaks::get_streaks;
pub use summary::get_analytics_summary;
pub use trends::{get_aggregations, get_trends, AggregationQuery};

/// Engine errors.
///
/// Malformed raw rows are never an error; they are dropped during
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Normalized records plus their daily games.
#[derive(Debug, Clone, Default)]
pub struct ScoreSet {
    records: Vec<ScoreRecord>,
    games: Vec<DailyGame>,
}

impl ScoreSet {
    /// Build a score set, grouping the records into daily games.
    pub fn new(records: Vec<ScoreRecord>) -> Self {
        let games = group_daily_games(&records);
        Self { records, games }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn games(&self) -> &[DailyGame] {
        &self.games
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest date present across all users.
    pub fn most_recent_date(&self) -> Option<NaiveDate> {
        most_recent_date(&self.games)
    }
}

/// Latest date among the given games.
pub fn most_recent_date(games: &[DailyGame]) -> Option<NaiveDate> {
    games.iter().map(|g| g.date).max()
}

/// Round half up (towards positive infinity on .5).
///
/// Non-finite input resolves to 0.
pub fn round_half_up(value: f64) -> i64 {
    if value.is_finite() {
        (value + 0.5).floor() as i64
    } else {
        0
    }
}

/// `round(total / count)`, or 0 when `count` is 0.
pub fn round_div(total: i64, count: u32) -> i64 {
    if count == 0 {
        0
    } else {
        round_half_up(total as f64 / count as f64)
    }
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation, 0.0 for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Parse an optional date query parameter.
pub fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AnalyticsError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_date(s).map(Some).ok_or_else(|| {
            AnalyticsError::Validation(format!("{} must be a YYYY-MM-DD date, got {:?}", name, s))
        }),
    }
}
