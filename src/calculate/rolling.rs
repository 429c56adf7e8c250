//! Trailing 7-day and 30-day average series.
//!
//! Windows are positional over the sorted list of dates that have data;
//! missing calendar days are skipped rather than zero-filled.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{mean, round_half_up};
use crate::models::{DailyGame, Period, RollingAverages, RollingPoint};

pub const SHORT_WINDOW: usize = 7;
pub const LONG_WINDOW: usize = 30;

/// Mean of all users' daily totals for each date, ascending by date.
pub fn daily_averages<'a, I>(games: I) -> Vec<(NaiveDate, f64)>
where
    I: IntoIterator<Item = &'a DailyGame>,
{
    let mut sums: BTreeMap<NaiveDate, (i64, u32)> = BTreeMap::new();
    for game in games {
        let entry = sums.entry(game.date).or_insert((0, 0));
        entry.0 += game.total_score;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(date, (total, count))| (date, total as f64 / count as f64))
        .collect()
}

/// One point per date once `window` dates are available.
pub fn trailing_average(daily: &[(NaiveDate, f64)], window: usize) -> Vec<RollingPoint> {
    if window == 0 {
        return Vec::new();
    }
    daily
        .windows(window)
        .map(|w| {
            let values: Vec<f64> = w.iter().map(|(_, avg)| *avg).collect();
            RollingPoint {
                date: w[window - 1].0,
                avg_score: round_half_up(mean(&values)),
            }
        })
        .collect()
}

/// Rolling series for day granularity; empty for any other period.
pub fn rolling_averages(games: &[DailyGame], period: Period) -> RollingAverages {
    if period != Period::Day {
        return RollingAverages::default();
    }
    let daily = daily_averages(games);
    RollingAverages {
        seven_day: trailing_average(&daily, SHORT_WINDOW),
        thirty_day: trailing_average(&daily, LONG_WINDOW),
    }
}
