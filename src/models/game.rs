//! Daily game model: one entry per (user, date).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ScoreRecord;

/// The collapsed unit of play for one user on one date.
///
/// Several location rows feed a single DailyGame; only the first row's
/// total is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGame {
    pub user: String,
    pub date: NaiveDate,
    pub total_score: i64,
    /// Location scores in encounter order
    pub location_scores: Vec<i64>,
    pub perfect_score_count: u32,
    pub lowest_location_score: i64,
    pub highest_location_score: i64,
    pub emoji_counts: BTreeMap<String, u32>,
}

impl DailyGame {
    /// Start a game from its first-seen record.
    pub fn from_first(record: &ScoreRecord) -> Self {
        let mut game = Self {
            user: record.user.clone(),
            date: record.date,
            total_score: record.total_score,
            location_scores: Vec::new(),
            perfect_score_count: 0,
            lowest_location_score: record.location_score,
            highest_location_score: record.location_score,
            emoji_counts: BTreeMap::new(),
        };
        game.add_location(record);
        game
    }

    /// Fold another location row of the same (user, date) into this game.
    ///
    /// The record's `total_score` is ignored.
    pub fn add_location(&mut self, record: &ScoreRecord) {
        let score = record.location_score;
        self.location_scores.push(score);
        if score == 100 {
            self.perfect_score_count += 1;
        }
        self.lowest_location_score = self.lowest_location_score.min(score);
        self.highest_location_score = self.highest_location_score.max(score);
        if let Some(emoji) = &record.emoji {
            *self.emoji_counts.entry(emoji.clone()).or_insert(0) += 1;
        }
    }

    /// True when every location in the game scored 100.
    pub fn is_flawless(&self) -> bool {
        !self.location_scores.is_empty() && self.location_scores.iter().all(|&s| s == 100)
    }
}
