//! Achievement badges.
//!
//! Every rule is evaluated independently against a player's chronological
//! history; a player can hold any subset of badges. Game-count tiers are
//! cumulative, so a higher tier always implies the lower ones.

use chrono::NaiveDate;

use super::grouping::games_by_user;
use super::streaks::{is_next_day, sorted_dates};
use super::{mean, std_dev, ScoreSet};
use crate::models::{Badge, DailyGame, UserAchievements};

const HIGH_SCORE: i64 = 900;
const ELITE_SCORE: i64 = 950;
const SHORT_STREAK: u32 = 7;
const LONG_STREAK: u32 = 30;
/// Games required before average-based badges are considered
const QUALIFYING_GAMES: usize = 10;
const CONSISTENT_MAX_STD_DEV: f64 = 50.0;
const HIGH_AVERAGE: f64 = 850.0;
const COMEBACK_DELTA: f64 = 50.0;

/// One player's games in chronological order, plus derived facts.
pub struct PlayerHistory<'a> {
    pub user: &'a str,
    pub games: Vec<&'a DailyGame>,
    /// Distinct play dates, ascending
    pub dates: Vec<NaiveDate>,
}

impl<'a> PlayerHistory<'a> {
    pub fn new(user: &'a str, mut games: Vec<&'a DailyGame>) -> Self {
        games.sort_by_key(|g| g.date);
        let dates = sorted_dates(games.iter().copied());
        Self { user, games, dates }
    }

    fn latest_date(&self) -> Option<NaiveDate> {
        self.games.last().map(|g| g.date)
    }

    fn totals(&self) -> Vec<f64> {
        self.games.iter().map(|g| g.total_score as f64).collect()
    }

    fn nth_date(&self, n: usize) -> Option<NaiveDate> {
        n.checked_sub(1)
            .and_then(|i| self.games.get(i))
            .map(|g| g.date)
    }

    fn first_date_where(&self, pred: impl Fn(&DailyGame) -> bool) -> Option<NaiveDate> {
        self.games.iter().find(|g| pred(g)).map(|g| g.date)
    }

    fn qualifies(&self) -> bool {
        self.games.len() >= QUALIFYING_GAMES
    }
}

/// The badge catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Achievement {
    FirstGame,
    Games10,
    Games50,
    Games100,
    Score900,
    Score950,
    PerfectLocation,
    Flawless,
    Streak7,
    Streak30,
    Consistent,
    HighAverage,
    Comeback,
}

impl Achievement {
    pub const ALL: [Achievement; 13] = [
        Achievement::FirstGame,
        Achievement::Games10,
        Achievement::Games50,
        Achievement::Games100,
        Achievement::Score900,
        Achievement::Score950,
        Achievement::PerfectLocation,
        Achievement::Flawless,
        Achievement::Streak7,
        Achievement::Streak30,
        Achievement::Consistent,
        Achievement::HighAverage,
        Achievement::Comeback,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Achievement::FirstGame => "first_game",
            Achievement::Games10 => "games_10",
            Achievement::Games50 => "games_50",
            Achievement::Games100 => "games_100",
            Achievement::Score900 => "score_900",
            Achievement::Score950 => "score_950",
            Achievement::PerfectLocation => "perfect_location",
            Achievement::Flawless => "flawless",
            Achievement::Streak7 => "streak_7",
            Achievement::Streak30 => "streak_30",
            Achievement::Consistent => "consistent",
            Achievement::HighAverage => "high_average",
            Achievement::Comeback => "comeback",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Achievement::FirstGame => "First Steps",
            Achievement::Games10 => "Regular",
            Achievement::Games50 => "Dedicated",
            Achievement::Games100 => "Centurion",
            Achievement::Score900 => "Sharpshooter",
            Achievement::Score950 => "Elite",
            Achievement::PerfectLocation => "Bullseye",
            Achievement::Flawless => "Flawless",
            Achievement::Streak7 => "On Fire",
            Achievement::Streak30 => "Unstoppable",
            Achievement::Consistent => "Steady Hand",
            Achievement::HighAverage => "High Roller",
            Achievement::Comeback => "Comeback Kid",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstGame => "Played your first game",
            Achievement::Games10 => "Played 10 games",
            Achievement::Games50 => "Played 50 games",
            Achievement::Games100 => "Played 100 games",
            Achievement::Score900 => "Scored 900 or more in a single day",
            Achievement::Score950 => "Scored 950 or more in a single day",
            Achievement::PerfectLocation => "Hit a perfect 100 on a location",
            Achievement::Flawless => "Scored 100 on every location in one game",
            Achievement::Streak7 => "Played 7 days in a row",
            Achievement::Streak30 => "Played 30 days in a row",
            Achievement::Consistent => "Daily totals within a standard deviation of 50 over 10+ games",
            Achievement::HighAverage => "Averaged 850 or more over 10+ games",
            Achievement::Comeback => "Improved your average by 50+ points in the second half of your games",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Achievement::FirstGame => "🎮",
            Achievement::Games10 => "🔟",
            Achievement::Games50 => "🏅",
            Achievement::Games100 => "💯",
            Achievement::Score900 => "🎯",
            Achievement::Score950 => "🏆",
            Achievement::PerfectLocation => "📍",
            Achievement::Flawless => "💎",
            Achievement::Streak7 => "🔥",
            Achievement::Streak30 => "⚡",
            Achievement::Consistent => "📏",
            Achievement::HighAverage => "⭐",
            Achievement::Comeback => "📈",
        }
    }

    /// Date the badge was unlocked, or `None` if it wasn't.
    pub fn unlocked_on(&self, history: &PlayerHistory<'_>) -> Option<NaiveDate> {
        match self {
            Achievement::FirstGame => history.nth_date(1),
            Achievement::Games10 => history.nth_date(10),
            Achievement::Games50 => history.nth_date(50),
            Achievement::Games100 => history.nth_date(100),
            Achievement::Score900 => history.first_date_where(|g| g.total_score >= HIGH_SCORE),
            Achievement::Score950 => history.first_date_where(|g| g.total_score >= ELITE_SCORE),
            Achievement::PerfectLocation => history.first_date_where(|g| g.perfect_score_count > 0),
            Achievement::Flawless => history.first_date_where(DailyGame::is_flawless),
            Achievement::Streak7 => streak_reached(&history.dates, SHORT_STREAK),
            Achievement::Streak30 => streak_reached(&history.dates, LONG_STREAK),
            Achievement::Consistent => {
                let passes =
                    history.qualifies() && std_dev(&history.totals()) <= CONSISTENT_MAX_STD_DEV;
                passes.then(|| history.latest_date()).flatten()
            }
            Achievement::HighAverage => {
                let passes = history.qualifies() && mean(&history.totals()) >= HIGH_AVERAGE;
                passes.then(|| history.latest_date()).flatten()
            }
            Achievement::Comeback => {
                let totals = history.totals();
                let (first, second) = totals.split_at(totals.len() / 2);
                let passes =
                    history.qualifies() && mean(second) - mean(first) >= COMEBACK_DELTA;
                passes.then(|| history.latest_date()).flatten()
            }
        }
    }

    pub fn badge(&self, unlocked_date: NaiveDate) -> Badge {
        Badge {
            id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            icon: self.icon().to_string(),
            unlocked_date,
        }
    }
}

/// The day the first run of consecutive dates reaches `length` days.
fn streak_reached(dates: &[NaiveDate], length: u32) -> Option<NaiveDate> {
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &date in dates {
        run = match prev {
            Some(p) if is_next_day(p, date) => run + 1,
            _ => 1,
        };
        if run >= length {
            return Some(date);
        }
        prev = Some(date);
    }
    None
}

/// All badges a player has unlocked, newest first.
///
/// Badges unlocked on the same date keep catalog order.
pub fn evaluate_player(history: &PlayerHistory<'_>) -> Vec<Badge> {
    let mut badges: Vec<Badge> = Achievement::ALL
        .iter()
        .filter_map(|a| a.unlocked_on(history).map(|date| a.badge(date)))
        .collect();
    badges.sort_by(|a, b| b.unlocked_date.cmp(&a.unlocked_date));
    badges
}

/// Badges for every user, in first-seen user order.
pub fn achievements(games: &[DailyGame]) -> Vec<UserAchievements> {
    games_by_user(games)
        .into_iter()
        .map(|(user, user_games)| UserAchievements {
            user: user.to_string(),
            badges: evaluate_player(&PlayerHistory::new(user, user_games)),
        })
        .collect()
}

/// Achievements over a score set.
pub fn get_achievements(set: &ScoreSet) -> Vec<UserAchievements> {
    achievements(set.games())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoreRecord;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    /// `totals[i]` is played on day `i * step` after Jan 1.
    fn games(user: &str, totals: &[i64], step: i64) -> Vec<ScoreRecord> {
        totals
            .iter()
            .enumerate()
            .map(|(i, &total)| {
                ScoreRecord::new(
                    user,
                    start() + chrono::Duration::days(i as i64 * step),
                    1,
                    90,
                    total,
                    None,
                )
            })
            .collect()
    }

    fn badge_ids(set: &ScoreSet, user: &str) -> Vec<String> {
        get_achievements(set)
            .into_iter()
            .find(|a| a.user == user)
            .map(|a| a.badges.into_iter().map(|b| b.id).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_game_count_tiers_are_cumulative() {
        let set = ScoreSet::new(games("alice", &[500; 100], 2));
        let ids = badge_ids(&set, "alice");

        for tier in ["first_game", "games_10", "games_50", "games_100"] {
            assert!(ids.contains(&tier.to_string()), "missing {}", tier);
        }

        for user in get_achievements(&set) {
            let has = |id: &str| user.badges.iter().any(|b| b.id == id);
            if has("games_100") {
                assert!(has("games_50") && has("games_10"));
            }
            if has("games_50") {
                assert!(has("games_10"));
            }
        }
    }

    #[test]
    fn test_tenth_game_unlock_date() {
        let set = ScoreSet::new(games("alice", &[500; 12], 1));
        let user = &get_achievements(&set)[0];
        let regular = user.badges.iter().find(|b| b.id == "games_10").unwrap();
        assert_eq!(regular.unlocked_date, start() + chrono::Duration::days(9));
        assert!(!user.badges.iter().any(|b| b.id == "games_50"));
    }

    #[test]
    fn test_badges_sorted_newest_first() {
        let set = ScoreSet::new(games("alice", &[500, 500, 920, 500, 500, 500, 500], 1));
        let user = &get_achievements(&set)[0];
        let dates: Vec<NaiveDate> = user.badges.iter().map(|b| b.unlocked_date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
        // streak_7 ends on day 7, score_900 on day 3, first_game on day 1
        let ids: Vec<&str> = user.badges.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["streak_7", "score_900", "first_game"]);
    }

    #[test]
    fn test_streak_badge_dated_when_threshold_first_reached() {
        // Jan 1-7, then Mar 1-10
        let mut records = games("alice", &[500; 7], 1);
        let march = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        for i in 0..10 {
            records.push(ScoreRecord::new(
                "alice",
                march + chrono::Duration::days(i),
                1,
                90,
                500,
                None,
            ));
        }
        let set = ScoreSet::new(records);
        let user = &get_achievements(&set)[0];
        let streak = user.badges.iter().find(|b| b.id == "streak_7").unwrap();
        assert_eq!(streak.unlocked_date, start() + chrono::Duration::days(6));

        // a longer run reaches seven days on its seventh day, not its last
        let set = ScoreSet::new(games("bob", &[500; 12], 1));
        let user = &get_achievements(&set)[0];
        let streak = user.badges.iter().find(|b| b.id == "streak_7").unwrap();
        assert_eq!(streak.unlocked_date, start() + chrono::Duration::days(6));
        assert!(!user.badges.iter().any(|b| b.id == "streak_30"));
    }

    #[test]
    fn test_consistency_and_average_need_ten_games() {
        let set = ScoreSet::new(games("alice", &[900; 9], 2));
        let ids = badge_ids(&set, "alice");
        assert!(!ids.contains(&"consistent".to_string()));
        assert!(!ids.contains(&"high_average".to_string()));

        let set = ScoreSet::new(games("alice", &[900; 10], 2));
        let ids = badge_ids(&set, "alice");
        assert!(ids.contains(&"consistent".to_string()));
        assert!(ids.contains(&"high_average".to_string()));
    }

    #[test]
    fn test_comeback_uses_latest_date() {
        let totals = [600, 600, 600, 600, 600, 720, 720, 720, 720, 720];
        let set = ScoreSet::new(games("alice", &totals, 2));
        let user = &get_achievements(&set)[0];
        let comeback = user.badges.iter().find(|b| b.id == "comeback").unwrap();
        assert_eq!(comeback.unlocked_date, start() + chrono::Duration::days(18));
        assert!(!user.badges.iter().any(|b| b.id == "consistent"));
    }

    #[test]
    fn test_perfect_and_flawless() {
        let date = start();
        let mut records = vec![
            ScoreRecord::new("bob", date, 1, 100, 800, None),
            ScoreRecord::new("bob", date, 2, 40, 800, None),
        ];
        let next = date + chrono::Duration::days(1);
        for loc in 1..=5 {
            records.push(ScoreRecord::new("bob", next, loc, 100, 1000, None));
        }
        let set = ScoreSet::new(records);
        let user = &get_achievements(&set)[0];

        let find = |id: &str| user.badges.iter().find(|b| b.id == id).map(|b| b.unlocked_date);
        assert_eq!(find("perfect_location"), Some(date));
        assert_eq!(find("flawless"), Some(next));
        assert_eq!(find("score_950"), Some(next));
    }
}
