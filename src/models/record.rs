//! Raw and normalized score rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by every record and query parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` date.
///
/// chrono accepts single-digit months and days for `%m`/`%d`, which would
/// break lexicographic ordering of the stored strings, so the length is
/// checked as well.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// One row as it arrives from the CSV file, before any validation.
///
/// Every field is optional text; the normalizer decides what survives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub location_number: Option<String>,

    #[serde(default)]
    pub location_score: Option<String>,

    #[serde(default)]
    pub total_score: Option<String>,

    #[serde(default, alias = "emoji")]
    pub location_emoji: Option<String>,
}

impl RawRow {
    /// Build a raw row from plain string fields.
    pub fn new(
        user: &str,
        date: &str,
        location_number: &str,
        location_score: &str,
        total_score: &str,
        emoji: Option<&str>,
    ) -> Self {
        Self {
            user: Some(user.to_string()),
            date: Some(date.to_string()),
            location_number: Some(location_number.to_string()),
            location_score: Some(location_score.to_string()),
            total_score: Some(total_score.to_string()),
            location_emoji: emoji.map(str::to_string),
        }
    }
}

/// A well-formed score row for one location of one day's game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Lowercased, trimmed player name
    pub user: String,

    pub date: NaiveDate,

    /// Location index within the day's game (1-based in practice)
    pub location_number: i64,

    pub location_score: i64,

    /// Day total shared by every location row of the same game
    pub total_score: i64,

    pub emoji: Option<String>,
}

impl ScoreRecord {
    /// Create a record, normalizing the user name.
    pub fn new(
        user: &str,
        date: NaiveDate,
        location_number: i64,
        location_score: i64,
        total_score: i64,
        emoji: Option<String>,
    ) -> Self {
        Self {
            user: normalize_user(user),
            date,
            location_number,
            location_score,
            total_score,
            emoji: emoji.filter(|e| !e.trim().is_empty()),
        }
    }

    /// Whether this location was a perfect 100.
    pub fn is_perfect(&self) -> bool {
        self.location_score == 100
    }
}

/// Canonical form of a player name: trimmed and lowercased.
pub fn normalize_user(user: &str) -> String {
    user.trim().to_lowercase()
}
