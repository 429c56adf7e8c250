//! Consecutive-day streak detection.

use chrono::NaiveDate;

use super::grouping::games_by_user;
use super::{most_recent_date, ScoreSet};
use crate::models::{DailyGame, StreakRecord, StreakSummary};

/// True when `next` is exactly one calendar day after `prev`.
pub fn is_next_day(prev: NaiveDate, next: NaiveDate) -> bool {
    prev.succ_opt() == Some(next)
}

/// Sorted, de-duplicated dates for a set of games.
pub fn sorted_dates<'a, I>(games: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = &'a DailyGame>,
{
    let mut dates: Vec<NaiveDate> = games.into_iter().map(|g| g.date).collect();
    dates.sort();
    dates.dedup();
    dates
}

/// Longest run of adjacent dates. The earliest run wins ties.
///
/// `dates` must be sorted ascending without duplicates.
pub fn longest_streak(user: &str, dates: &[NaiveDate]) -> Option<StreakRecord> {
    let first = *dates.first()?;

    let mut best = (1u32, first, first);
    let mut run_len = 1u32;
    let mut run_start = first;

    for pair in dates.windows(2) {
        if is_next_day(pair[0], pair[1]) {
            run_len += 1;
        } else {
            run_len = 1;
            run_start = pair[1];
        }
        if run_len > best.0 {
            best = (run_len, run_start, pair[1]);
        }
    }

    Some(StreakRecord {
        user: user.to_string(),
        streak_length: best.0,
        start_date: best.1,
        end_date: best.2,
    })
}

/// Run ending on `most_recent`, or `None` if the user didn't play that day.
///
/// `dates` must be sorted ascending without duplicates.
pub fn current_streak(
    user: &str,
    dates: &[NaiveDate],
    most_recent: NaiveDate,
) -> Option<StreakRecord> {
    if dates.last() != Some(&most_recent) {
        return None;
    }

    let mut start = most_recent;
    for &date in dates.iter().rev().skip(1) {
        if is_next_day(date, start) {
            start = date;
        } else {
            break;
        }
    }

    let length = (most_recent - start).num_days() as u32 + 1;
    Some(StreakRecord {
        user: user.to_string(),
        streak_length: length,
        start_date: start,
        end_date: most_recent,
    })
}

/// Longest and current streaks for every user, each sorted descending by
/// length. Ties keep first-seen user order.
pub fn streaks(games: &[DailyGame]) -> StreakSummary {
    let Some(most_recent) = most_recent_date(games) else {
        return StreakSummary::default();
    };

    let mut longest = Vec::new();
    let mut current = Vec::new();

    for (user, user_games) in games_by_user(games) {
        let dates = sorted_dates(user_games);
        longest.extend(longest_streak(user, &dates));
        current.extend(current_streak(user, &dates, most_recent));
    }

    longest.sort_by(|a, b| b.streak_length.cmp(&a.streak_length));
    current.sort_by(|a, b| b.streak_length.cmp(&a.streak_length));

    StreakSummary {
        most_recent_date: Some(most_recent),
        longest,
        current,
    }
}

/// Streaks over a score set.
pub fn get_streaks(set: &ScoreSet) -> StreakSummary {
    streaks(set.games())
}
