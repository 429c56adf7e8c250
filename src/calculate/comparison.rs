//! Side-by-side player comparison and head-to-head records.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::leaderboard::aggregate_users;
use super::{AnalyticsError, ScoreSet};
use crate::models::{normalize_user, DailyGame, ScorePoint, UserAggregate};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparedPlayer {
    pub stats: UserAggregate,
    /// Chronological daily totals
    pub trend: Vec<ScorePoint>,
}

/// Win/loss/tie tally from `player`'s point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead {
    pub player: String,
    pub opponent: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub common_dates: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub players: Vec<ComparedPlayer>,
    pub head_to_head: Option<HeadToHead>,
}

/// Tally head-to-head results over the dates both players played.
pub fn head_to_head(games: &[DailyGame], player: &str, opponent: &str) -> HeadToHead {
    let opponent_totals: HashMap<NaiveDate, i64> = games
        .iter()
        .filter(|g| g.user == opponent)
        .map(|g| (g.date, g.total_score))
        .collect();

    let mut record = HeadToHead {
        player: player.to_string(),
        opponent: opponent.to_string(),
        wins: 0,
        losses: 0,
        ties: 0,
        common_dates: 0,
    };

    for game in games.iter().filter(|g| g.user == player) {
        let Some(&theirs) = opponent_totals.get(&game.date) else {
            continue;
        };
        record.common_dates += 1;
        match game.total_score.cmp(&theirs) {
            std::cmp::Ordering::Greater => record.wins += 1,
            std::cmp::Ordering::Less => record.losses += 1,
            std::cmp::Ordering::Equal => record.ties += 1,
        }
    }

    record
}

/// Compare 2-3 players.
///
/// Names are matched case-insensitively and repeated names count once.
/// Players without any games are left out; head-to-head is only computed
/// when exactly two players were requested and both have games.
pub fn compare(games: &[DailyGame], users: &[String]) -> Result<Comparison, AnalyticsError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&users.len()) {
        return Err(AnalyticsError::Validation(format!(
            "comparison needs {} to {} players, got {}",
            MIN_PLAYERS,
            MAX_PLAYERS,
            users.len()
        )));
    }

    let mut names: Vec<String> = Vec::with_capacity(users.len());
    for name in users.iter().map(|u| normalize_user(u)) {
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }

    let players: Vec<ComparedPlayer> = names
        .iter()
        .filter_map(|name| {
            let mut user_games: Vec<&DailyGame> =
                games.iter().filter(|g| &g.user == name).collect();
            user_games.sort_by_key(|g| g.date);
            let trend = user_games
                .iter()
                .map(|g| ScorePoint {
                    date: g.date,
                    score: g.total_score,
                })
                .collect();
            let stats = aggregate_users(user_games).pop()?;
            Some(ComparedPlayer { stats, trend })
        })
        .collect();

    let head_to_head = match (users.len(), players.as_slice()) {
        (2, [a, b]) => Some(head_to_head(games, &a.stats.user, &b.stats.user)),
        _ => None,
    };

    Ok(Comparison {
        players,
        head_to_head,
    })
}

/// Comparison over a score set.
pub fn get_comparison(set: &ScoreSet, users: &[String]) -> Result<Comparison, AnalyticsError> {
    compare(set.games(), users)
}
