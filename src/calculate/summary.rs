//! Dataset-wide analytics summary.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use super::achievements::achievements;
use super::leaderboard::aggregate_users;
use super::player::location_stats;
use super::streaks::streaks;
use super::ScoreSet;
use crate::models::{DailyGame, ScoreRecord, StreakSummary, UserAchievements};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmojiCount {
    pub emoji: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDifficulty {
    pub location: i64,
    pub total_score: i64,
    pub attempts: u32,
    pub avg_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfectScoreLeader {
    pub user: String,
    pub perfect_scores: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub emoji_frequency: Vec<EmojiCount>,
    /// Hardest location first
    pub location_difficulty: Vec<LocationDifficulty>,
    pub perfect_score_leaders: Vec<PerfectScoreLeader>,
    pub total_records: usize,
    pub total_games: usize,
    pub total_dates: usize,
    pub unique_players: usize,
    pub date_range: Option<DateRange>,
    pub streaks: StreakSummary,
    pub achievements: Vec<UserAchievements>,
}

/// Distinct users in first-seen order.
pub fn distinct_players(records: &[ScoreRecord]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.user.as_str()))
        .map(|r| r.user.clone())
        .collect()
}

/// Distinct dates, ascending.
pub fn distinct_dates(records: &[ScoreRecord]) -> Vec<NaiveDate> {
    records
        .iter()
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Emoji occurrence counts, most frequent first. Ties keep first-seen order.
fn emoji_frequency(records: &[ScoreRecord]) -> Vec<EmojiCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<EmojiCount> = Vec::new();
    for emoji in records.iter().filter_map(|r| r.emoji.as_deref()) {
        match index.get(emoji) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(emoji, counts.len());
                counts.push(EmojiCount {
                    emoji: emoji.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn location_difficulty(records: &[ScoreRecord]) -> Vec<LocationDifficulty> {
    // location_stats is ordered by location number, so equal averages stay in that order
    let mut ranked: Vec<LocationDifficulty> = location_stats(records)
        .into_iter()
        .map(|stat| LocationDifficulty {
            location: stat.location,
            total_score: stat.total_score,
            attempts: stat.attempts,
            avg_score: stat.avg_score,
        })
        .collect();
    ranked.sort_by_key(|l| l.avg_score);
    ranked
}

fn perfect_score_leaders(games: &[DailyGame]) -> Vec<PerfectScoreLeader> {
    let mut leaders: Vec<PerfectScoreLeader> = aggregate_users(games)
        .into_iter()
        .filter(|a| a.perfect_scores > 0)
        .map(|a| PerfectScoreLeader {
            user: a.user,
            perfect_scores: a.perfect_scores,
        })
        .collect();
    leaders.sort_by(|a, b| b.perfect_scores.cmp(&a.perfect_scores));
    leaders
}

/// Build the full analytics summary.
pub fn get_analytics_summary(set: &ScoreSet) -> AnalyticsSummary {
    let records = set.records();
    let dates = distinct_dates(records);
    let date_range = match (dates.first(), dates.last()) {
        (Some(&start), Some(&end)) => Some(DateRange { start, end }),
        _ => None,
    };

    AnalyticsSummary {
        emoji_frequency: emoji_frequency(records),
        location_difficulty: location_difficulty(records),
        perfect_score_leaders: perfect_score_leaders(set.games()),
        total_records: records.len(),
        total_games: set.games().len(),
        total_dates: dates.len(),
        unique_players: distinct_players(records).len(),
        date_range,
        streaks: streaks(set.games()),
        achievements: achievements(set.games()),
    }
}
