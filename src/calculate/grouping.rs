//! Collapse per-location rows into one game per (user, date).

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::models::{DailyGame, ScoreRecord};

/// Group records into daily games, keeping first-seen key order.
///
/// The first row of a group fixes its `total_score`. Later rows with a
/// different total are logged and otherwise ignored.
pub fn group_daily_games(records: &[ScoreRecord]) -> Vec<DailyGame> {
    let mut index: HashMap<(&str, NaiveDate), usize> = HashMap::new();
    let mut games: Vec<DailyGame> = Vec::new();

    for record in records {
        match index.get(&(record.user.as_str(), record.date)) {
            Some(&i) => {
                let game = &mut games[i];
                if record.total_score != game.total_score {
                    warn!(
                        "Conflicting total for {} on {}: keeping {}, ignoring {}",
                        record.user, record.date, game.total_score, record.total_score
                    );
                }
                game.add_location(record);
            }
            None => {
                index.insert((record.user.as_str(), record.date), games.len());
                games.push(DailyGame::from_first(record));
            }
        }
    }

    games
}

/// Distinct users in first-seen order, each with their games in input order.
pub fn games_by_user(games: &[DailyGame]) -> Vec<(&str, Vec<&DailyGame>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<(&str, Vec<&DailyGame>)> = Vec::new();

    for game in games {
        let i = *index.entry(game.user.as_str()).or_insert_with(|| {
            grouped.push((game.user.as_str(), Vec::new()));
            grouped.len() - 1
        });
        grouped[i].1.push(game);
    }

    grouped
}
