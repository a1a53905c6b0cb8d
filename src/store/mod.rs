//! Snapshot Store
//!
//! Persists snapshots keyed by subject (the folder name) and finds the most
//! recent one for comparison. Two backends: a directory of CSV tables using
//! the denormalized one-row-per-file layout, and a sled database.

pub mod csv_table;
pub mod persistence;

pub use csv_table::CsvSnapshotStore;
pub use persistence::SledSnapshotStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::StoreError;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Identifier of a stored snapshot
///
/// A file path for the CSV backend, a database key for the sled backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapshotId(String);

impl SnapshotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SnapshotId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SnapshotId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Snapshot Store interface
pub trait SnapshotStore {
    /// Persist a snapshot under `subject` and return its identifier
    fn save(&self, snapshot: &Snapshot, subject: &str) -> Result<SnapshotId, StoreError>;

    /// Load a specific snapshot
    fn load(&self, id: &SnapshotId) -> Result<Snapshot, StoreError>;

    /// All stored snapshots for `subject`, oldest first
    fn list(&self, subject: &str) -> Result<Vec<SnapshotId>, StoreError>;

    /// Most recent snapshot for `subject`
    ///
    /// Returns `StoreError::NoPriorState` when nothing was stored yet.
    fn latest(&self, subject: &str) -> Result<SnapshotId, StoreError> {
        self.list(subject)?
            .pop()
            .ok_or_else(|| StoreError::NoPriorState {
                subject: subject.to_string(),
            })
    }

    /// Load the most recent snapshot for `subject`
    fn load_most_recent(&self, subject: &str) -> Result<Snapshot, StoreError> {
        let id = self.latest(subject)?;
        self.load(&id)
    }
}

/// Open the store selected by `config`, resolving relative paths against `base`
pub fn open_store(config: &StorageConfig, base: &Path) -> Result<Box<dyn SnapshotStore>, StoreError> {
    let dir = if config.snapshot_dir.is_absolute() {
        config.snapshot_dir.clone()
    } else {
        base.join(&config.snapshot_dir)
    };

    match config.backend {
        StorageBackend::Csv => Ok(Box::new(CsvSnapshotStore::new(dir))),
        StorageBackend::Sled => Ok(Box::new(SledSnapshotStore::new(dir)?)),
    }
}
