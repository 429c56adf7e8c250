//! Full stats bundle for a single player.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Weekday};
use serde::Serialize;

use super::achievements::{evaluate_player, PlayerHistory};
use super::leaderboard::aggregate_users;
use super::streaks::{current_streak, longest_streak, sorted_dates};
use super::trends::aggregate_periods;
use super::{round_div, AnalyticsError, ScoreSet};
use crate::models::{
    normalize_user, Badge, DailyGame, Period, PeriodBucket, ScoreRecord, StreakRecord,
    UserAggregate,
};

/// Per-location performance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStat {
    pub location: i64,
    pub attempts: u32,
    pub total_score: i64,
    pub avg_score: i64,
    pub perfect_scores: u32,
    pub best_score: i64,
    pub worst_score: i64,
}

/// Average daily total for one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayStat {
    pub weekday: String,
    pub games_played: u32,
    pub avg_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub user: String,
    pub overall: UserAggregate,
    /// Daily games in chronological order
    pub games: Vec<DailyGame>,
    pub emoji_counts: BTreeMap<String, u32>,
    pub locations: Vec<LocationStat>,
    /// Location with the lowest average score
    pub nemesis_location: Option<i64>,
    /// Location with the highest average score
    pub best_location: Option<i64>,
    pub monthly: Vec<PeriodBucket>,
    pub weekdays: Vec<WeekdayStat>,
    pub longest_streak: Option<StreakRecord>,
    pub current_streak: Option<StreakRecord>,
    pub badges: Vec<Badge>,
}

/// Per-location stats, ascending by location number.
pub fn location_stats<'a, I>(records: I) -> Vec<LocationStat>
where
    I: IntoIterator<Item = &'a ScoreRecord>,
{
    let mut by_location: BTreeMap<i64, LocationStat> = BTreeMap::new();
    for record in records {
        let stat = by_location
            .entry(record.location_number)
            .or_insert_with(|| LocationStat {
                location: record.location_number,
                attempts: 0,
                total_score: 0,
                avg_score: 0,
                perfect_scores: 0,
                best_score: record.location_score,
                worst_score: record.location_score,
            });
        stat.attempts += 1;
        stat.total_score += record.location_score;
        if record.is_perfect() {
            stat.perfect_scores += 1;
        }
        stat.best_score = stat.best_score.max(record.location_score);
        stat.worst_score = stat.worst_score.min(record.location_score);
    }

    by_location
        .into_values()
        .map(|mut stat| {
            stat.avg_score = round_div(stat.total_score, stat.attempts);
            stat
        })
        .collect()
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn weekday_stats(games: &[&DailyGame]) -> Vec<WeekdayStat> {
    let mut sums: HashMap<Weekday, (i64, u32)> = HashMap::new();
    for game in games {
        let entry = sums.entry(game.date.weekday()).or_insert((0, 0));
        entry.0 += game.total_score;
        entry.1 += 1;
    }

    let mut days: Vec<(Weekday, (i64, u32))> = sums.into_iter().collect();
    days.sort_by_key(|(day, _)| day.num_days_from_monday());
    days.into_iter()
        .map(|(day, (total, count))| WeekdayStat {
            weekday: weekday_name(day).to_string(),
            games_played: count,
            avg_score: round_div(total, count),
        })
        .collect()
}

/// Build the stats bundle for `user`.
///
/// Returns `NotFound` when the user has no games at all.
pub fn get_player_stats(set: &ScoreSet, user: &str) -> Result<PlayerStats, AnalyticsError> {
    let user = normalize_user(user);
    let mut games: Vec<&DailyGame> = set.games().iter().filter(|g| g.user == user).collect();
    if games.is_empty() {
        return Err(AnalyticsError::NotFound(format!("player {:?}", user)));
    }
    games.sort_by_key(|g| g.date);

    let overall = aggregate_users(games.iter().copied())
        .pop()
        .unwrap_or_else(|| UserAggregate::empty(&user));

    let mut emoji_counts: BTreeMap<String, u32> = BTreeMap::new();
    for game in &games {
        for (emoji, count) in &game.emoji_counts {
            *emoji_counts.entry(emoji.clone()).or_insert(0) += count;
        }
    }

    let locations = location_stats(set.records().iter().filter(|r| r.user == user));
    // ties go to the lower location number
    let nemesis_location = locations
        .iter()
        .min_by(|a, b| a.avg_score.cmp(&b.avg_score).then(a.location.cmp(&b.location)))
        .map(|l| l.location);
    let best_location = locations
        .iter()
        .max_by(|a, b| a.avg_score.cmp(&b.avg_score).then(b.location.cmp(&a.location)))
        .map(|l| l.location);

    let dates = sorted_dates(games.iter().copied());
    let longest = longest_streak(&user, &dates);
    let current = set
        .most_recent_date()
        .and_then(|latest| current_streak(&user, &dates, latest));

    let badges = evaluate_player(&PlayerHistory::new(&user, games.clone()));

    Ok(PlayerStats {
        overall,
        emoji_counts,
        nemesis_location,
        best_location,
        monthly: aggregate_periods(games.iter().copied(), Period::Month),
        weekdays: weekday_stats(&games),
        locations,
        longest_streak: longest,
        current_streak: current,
        badges,
        games: games.into_iter().cloned().collect(),
        user,
    })
}
