//! Derived statistics models.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user leaderboard/analytics row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAggregate {
    pub user: String,
    pub total_score: i64,
    /// Distinct dates played
    pub games_played: u32,
    /// `round(total_score / games_played)`, 0 when no games
    pub avg_score: i64,
    pub perfect_scores: u32,
    /// Lowest location score, 0 when no games
    pub lowest_score: i64,
    /// Highest location score, 0 when no games
    pub highest_score: i64,
}

impl UserAggregate {
    /// An aggregate with no games yet.
    pub fn empty(user: &str) -> Self {
        Self {
            user: user.to_string(),
            total_score: 0,
            games_played: 0,
            avg_score: 0,
            perfect_scores: 0,
            lowest_score: 0,
            highest_score: 0,
        }
    }
}

/// A run of consecutive calendar days played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord {
    pub user: String,
    pub streak_length: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Longest and currently-active streaks across all users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub most_recent_date: Option<NaiveDate>,
    pub longest: Vec<StreakRecord>,
    pub current: Vec<StreakRecord>,
}

/// Summed scores for one user within one calendar period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBucket {
    pub period_key: String,
    pub user: String,
    pub total_score: i64,
    pub games_played: u32,
    pub dates: BTreeSet<NaiveDate>,
}

/// One point of a trailing-window average series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub avg_score: i64,
}

/// 7-day and 30-day trailing averages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingAverages {
    pub seven_day: Vec<RollingPoint>,
    pub thirty_day: Vec<RollingPoint>,
}

/// An unlocked achievement badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked_date: NaiveDate,
}

/// All badges held by one user, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievements {
    pub user: String,
    pub badges: Vec<Badge>,
}

/// A single (date, score) point for charting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub date: NaiveDate,
    pub score: i64,
}

/// Leaderboard ordering key. All orderings are descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeaderboardSort {
    #[default]
    TotalScore,
    AvgScore,
    PerfectScores,
    GamesPlayed,
}

impl FromStr for LeaderboardSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "totalScore" | "total_score" | "total" => Ok(LeaderboardSort::TotalScore),
            "avgScore" | "avg_score" | "average" => Ok(LeaderboardSort::AvgScore),
            "perfectScores" | "perfect_scores" | "perfect" => Ok(LeaderboardSort::PerfectScores),
            "gamesPlayed" | "games_played" | "games" => Ok(LeaderboardSort::GamesPlayed),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

/// Calendar granularity for trend aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Period::Day),
            "week" | "weekly" => Ok(Period::Week),
            "month" | "monthly" => Ok(Period::Month),
            "quarter" | "quarterly" => Ok(Period::Quarter),
            "year" | "yearly" => Ok(Period::Year),
            other => Err(format!("unknown period: {}", other)),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
            Period::Quarter => write!(f, "quarter"),
            Period::Year => write!(f, "year"),
        }
    }
}
