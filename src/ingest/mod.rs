//! Record normalization and entry import.
//!
//! Raw rows become [`ScoreRecord`]s here. Rows that are missing a required
//! field or carry a non-numeric score are dropped silently: the engine
//! never sees them and nothing downstream reports them as errors.

pub mod entries;

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{parse_date, RawRow, ScoreRecord};
use crate::storage::{self, StorageError};

pub use entries::{parse_entries, EntryParser, ParsedEntry};

/// Errors raised while importing chat entries.
///
/// Malformed score rows are never errors.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read entries: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid entry pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of an entry import.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub entries: Vec<ParsedEntry>,
    pub rows_written: usize,
}

/// Result of normalizing a batch of raw rows.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Well-formed records in input order
    pub records: Vec<ScoreRecord>,
    /// How many rows were dropped
    pub dropped: usize,
}

/// Normalize a batch of raw rows, preserving input order.
pub fn normalize_rows(rows: &[RawRow]) -> Normalized {
    let mut out = Normalized {
        records: Vec::with_capacity(rows.len()),
        dropped: 0,
    };

    for row in rows {
        match normalize_row(row) {
            Some(record) => out.records.push(record),
            None => out.dropped += 1,
        }
    }

    if out.dropped > 0 {
        debug!(
            "Dropped {} malformed rows ({} kept)",
            out.dropped,
            out.records.len()
        );
    }
    out
}

/// Normalize a single raw row, or `None` if it is malformed.
pub fn normalize_row(row: &RawRow) -> Option<ScoreRecord> {
    let user = required(&row.user)?;
    let date = parse_date(required(&row.date)?)?;
    let location_number = parse_int(required(&row.location_number)?)?;
    let location_score = parse_int(required(&row.location_score)?)?;
    let total_score = parse_int(required(&row.total_score)?)?;

    Some(ScoreRecord::new(
        user,
        date,
        location_number,
        location_score,
        total_score,
        row.location_emoji.as_ref().map(|e| e.trim().to_string()),
    ))
}

/// Import chat entries from `entries_file` into the CSV at `data_file`.
///
/// Entries whose (user, date) already exists in the data file are skipped.
/// With `dry_run` nothing is written.
pub fn import_entries(
    entries_file: &Path,
    data_file: &Path,
    year: i32,
    dry_run: bool,
) -> Result<ImportReport, IngestError> {
    let text = std::fs::read_to_string(entries_file)?;
    let parser = EntryParser::new(year)?;

    let existing: HashSet<(String, NaiveDate)> = if data_file.exists() {
        storage::load_records(data_file)?
            .records
            .into_iter()
            .map(|r| (r.user, r.date))
            .collect()
    } else {
        HashSet::new()
    };

    let entries = parse_entries(&parser, &text, &existing);
    let rows: Vec<RawRow> = entries.iter().flat_map(ParsedEntry::to_raw_rows).collect();

    let rows_written = if dry_run {
        info!("Dry run: {} new entries, nothing written", entries.len());
        0
    } else {
        storage::append_rows(data_file, &rows)?
    };

    Ok(ImportReport {
        entries,
        rows_written,
    })
}

fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_int(s: &str) -> Option<i64> {
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(user: &str, date: &str, loc: &str, score: &str, total: &str) -> RawRow {
        RawRow::new(user, date, loc, score, total, None)
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        let record = normalize_row(&raw(" Alice ", "2025-01-01", "1", " 90 ", "300")).unwrap();
        assert_eq!(record.user, "alice");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(record.location_score, 90);
        assert_eq!(record.total_score, 300);
    }

    #[test]
    fn test_normalize_drops_missing_fields() {
        assert!(normalize_row(&raw("", "2025-01-01", "1", "90", "300")).is_none());
        assert!(normalize_row(&raw("alice", "", "1", "90", "300")).is_none());
        assert!(normalize_row(&raw("alice", "2025-01-01", " ", "90", "300")).is_none());
        assert!(normalize_row(&RawRow::default()).is_none());
    }

    #[test]
    fn test_normalize_drops_non_numeric() {
        assert!(normalize_row(&raw("alice", "2025-01-01", "1", "ninety", "300")).is_none());
        assert!(normalize_row(&raw("alice", "2025-01-01", "1", "90", "3x0")).is_none());
        assert!(normalize_row(&raw("alice", "2025-01-01", "one", "90", "300")).is_none());
        assert!(normalize_row(&raw("alice", "2025-01-01", "1", "90.5", "300")).is_none());
    }

    #[test]
    fn test_normalize_drops_bad_dates() {
        assert!(normalize_row(&raw("alice", "2025-13-01", "1", "90", "300")).is_none());
        assert!(normalize_row(&raw("alice", "01/01/2025", "1", "90", "300")).is_none());
    }

    #[test]
    fn test_normalize_rows_preserves_order_and_counts_drops() {
        let rows = vec![
            raw("bob", "2025-01-02", "1", "50", "400"),
            raw("alice", "2025-01-01", "1", "bad", "300"),
            raw("alice", "2025-01-01", "2", "70", "300"),
        ];
        let out = normalize_rows(&rows);
        assert_eq!(out.dropped, 1);
        let users: Vec<&str> = out.records.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(users, vec!["bob", "alice"]);
    }

    #[test]
    fn test_normalize_keeps_emoji() {
        let row = RawRow::new("alice", "2025-01-01", "1", "100", "900", Some(" 🎯 "));
        let record = normalize_row(&row).unwrap();
        assert_eq!(record.emoji.as_deref(), Some("🎯"));
    }

    #[test]
    fn test_import_entries_skips_existing_and_dry_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let data = dir.path().join("data.csv");
        let entries = dir.path().join("entries.txt");
        storage::append_rows(
            &data,
            &[raw("alice", "2025-11-03", "1", "90", "900")],
        )
        .unwrap();
        std::fs::write(
            &entries,
            "Nov 3: Alice: 90 90 90 90 90, Final: 900\n\
             Nov 4: Alice: 80 81 82 83 84, Final: 820\n\
             not an entry\n",
        )
        .unwrap();

        let report = import_entries(&entries, &data, 2025, true).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.rows_written, 0);
        assert_eq!(storage::load_records(&data).unwrap().records.len(), 1);

        let report = import_entries(&entries, &data, 2025, false).unwrap();
        assert_eq!(report.rows_written, 5);
        let records = storage::load_records(&data).unwrap().records;
        assert_eq!(records.len(), 6);
        assert_eq!(records[5].location_number, 5);
        assert_eq!(records[5].total_score, 820);

        // a second run finds nothing new
        let report = import_entries(&entries, &data, 2025, false).unwrap();
        assert!(report.entries.is_empty());
        assert_eq!(report.rows_written, 0);
    }
}
