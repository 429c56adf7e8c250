//! Score data file operations.
//!
//! Handles the CSV data file and the in-memory snapshot built from it:
//! - Reading raw rows (any column order, missing columns allowed)
//! - Appending imported rows
//! - Swapping immutable snapshots on reload

pub mod records;
pub mod snapshot;

use std::path::PathBuf;
use thiserror::Error;

pub use records::{append_rows, load_records, read_raw_rows};
pub use snapshot::{Snapshot, SnapshotStore};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}
