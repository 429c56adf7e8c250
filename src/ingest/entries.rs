//! Chat-message score entries.
//!
//! Players paste their daily result into a group chat as one line:
//!
//! ```text
//! Nov 3: David Ellis: 99! 98" 97" 98" 99!, Final: 982
//! ```
//!
//! Each line expands into five location rows sharing the final total.

use std::collections::HashSet;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::{normalize_user, RawRow, DATE_FORMAT};

/// Number of locations in one day's game.
pub const LOCATIONS_PER_GAME: usize = 5;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// One parsed chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Player name as written in the message
    pub user: String,
    pub date: NaiveDate,
    /// (score, emoji) per location, in order
    pub scores: Vec<(i64, String)>,
    pub final_score: i64,
}

impl ParsedEntry {
    /// Expand into one raw row per location, numbered from 1.
    pub fn to_raw_rows(&self) -> Vec<RawRow> {
        let date = self.date.format(DATE_FORMAT).to_string();
        let total = self.final_score.to_string();
        self.scores
            .iter()
            .enumerate()
            .map(|(i, (score, emoji))| {
                let emoji = (!emoji.is_empty()).then_some(emoji.as_str());
                RawRow::new(
                    &self.user,
                    &date,
                    &(i + 1).to_string(),
                    &score.to_string(),
                    &total,
                    emoji,
                )
            })
            .collect()
    }
}

/// Parser for chat-message entries in a fixed year.
pub struct EntryParser {
    year: i32,
    line_re: Regex,
}

impl EntryParser {
    pub fn new(year: i32) -> Result<Self, regex::Error> {
        let line_re =
            Regex::new(r"^\s*([A-Za-z]+)\s+(\d{1,2}):\s*([^:]+?):\s*(.+?),\s*Final:\s*(\d+)\s*$")?;
        Ok(Self { year, line_re })
    }

    /// Parse one line, or `None` if it isn't a complete entry.
    pub fn parse_line(&self, line: &str) -> Option<ParsedEntry> {
        let caps = self.line_re.captures(line)?;
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(self.year, month, day)?;
        let user = caps[3].trim().to_string();
        let final_score: i64 = caps[5].parse().ok()?;

        let scores: Vec<(i64, String)> = caps[4]
            .split_whitespace()
            .map(parse_score_token)
            .collect::<Option<_>>()?;

        if scores.len() != LOCATIONS_PER_GAME {
            debug!(
                "Skipping entry with {} scores: {}",
                scores.len(),
                line.trim()
            );
            return None;
        }

        Some(ParsedEntry {
            user,
            date,
            scores,
            final_score,
        })
    }
}

/// Parse a block of chat lines, skipping entries whose (user, date) is
/// already in `existing` or repeats earlier in the same block.
pub fn parse_entries(
    parser: &EntryParser,
    text: &str,
    existing: &HashSet<(String, NaiveDate)>,
) -> Vec<ParsedEntry> {
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();
    let mut entries = Vec::new();

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let Some(entry) = parser.parse_line(line) else {
            warn!("Unrecognized entry line: {}", line.trim());
            continue;
        };
        let key = (normalize_user(&entry.user), entry.date);
        if existing.contains(&key) || !seen.insert(key) {
            debug!("Skipping duplicate entry for {} on {}", entry.user, entry.date);
            continue;
        }
        entries.push(entry);
    }

    entries
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&name))
        .map(|i| i as u32 + 1)
}

/// Split a token like `99!` or `100S` into (score, emoji).
///
/// Some chat clients flatten keycap emoji into a trailing digit (`815`
/// for 81 + keycap 5); a run of digits above 100 is read that way.
fn parse_score_token(token: &str) -> Option<(i64, String)> {
    let split = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let (digits, rest) = token.split_at(split);
    if digits.is_empty() {
        return None;
    }

    let value: i64 = digits.parse().ok()?;
    if value <= 100 {
        return Some((value, rest.to_string()));
    }

    let (head, keycap) = digits.split_at(digits.len() - 1);
    let score: i64 = head.parse().ok()?;
    (score <= 100).then(|| (score, format!("{}{}", keycap, rest)))
}
