//! Immutable score snapshots behind a swappable pointer.
//!
//! Readers clone the current `Arc<Snapshot>` and work on it without holding
//! the lock; a reload builds a complete new snapshot and swaps it in.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use super::{load_records, StorageError};
use crate::calculate::ScoreSet;
use crate::ingest::Normalized;

/// One loaded view of the data file.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub scores: ScoreSet,
    pub loaded_at: DateTime<Utc>,
    /// Rows discarded by the normalizer
    pub dropped_rows: usize,
}

impl Snapshot {
    pub fn new(normalized: Normalized) -> Self {
        Self {
            scores: ScoreSet::new(normalized.records),
            loaded_at: Utc::now(),
            dropped_rows: normalized.dropped,
        }
    }

    /// A snapshot with no records.
    pub fn empty() -> Self {
        Self::new(Normalized::default())
    }

    /// Load a snapshot from a CSV file.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let snapshot = Self::new(load_records(path)?);
        info!(
            "Loaded {} records ({} games, {} dropped) from {:?}",
            snapshot.scores.records().len(),
            snapshot.scores.games().len(),
            snapshot.dropped_rows,
            path
        );
        Ok(snapshot)
    }
}

/// Shared holder of the current snapshot.
pub struct SnapshotStore {
    data_file: PathBuf,
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new(data_file: PathBuf, snapshot: Snapshot) -> Self {
        Self {
            data_file,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Open the store, starting empty when the data file doesn't exist yet.
    pub fn open(data_file: PathBuf) -> Result<Self, StorageError> {
        let snapshot = match Snapshot::load(&data_file) {
            Ok(snapshot) => snapshot,
            Err(StorageError::PathNotFound(path)) => {
                tracing::warn!("Data file {:?} not found, starting empty", path);
                Snapshot::empty()
            }
            Err(e) => return Err(e),
        };
        Ok(Self::new(data_file, snapshot))
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// The snapshot in effect right now.
    pub async fn current(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    /// Re-read the data file and swap in the result.
    ///
    /// On failure the current snapshot stays in place.
    pub async fn reload(&self) -> Result<Arc<Snapshot>, StorageError> {
        let path = self.data_file.clone();
        let snapshot = tokio::task::spawn_blocking(move || Snapshot::load(&path))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))??;

        let snapshot = Arc::new(snapshot);
        *self.current.write().await = snapshot.clone();
        info!(
            "Snapshot swapped: {} records, {} games",
            snapshot.scores.records().len(),
            snapshot.scores.games().len()
        );
        Ok(snapshot)
    }
}
