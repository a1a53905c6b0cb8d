//! Sled-backed snapshot persistence

use crate::error::StoreError;
use crate::snapshot::Snapshot;
use crate::store::{SnapshotId, SnapshotStore};
use std::path::Path;
use tracing::{debug, info, instrument};

const KEY_PREFIX: &str = "snapshot";
/// Width of the zero-padded nanosecond stamp; keeps key order chronological
const STAMP_WIDTH: usize = 20;

/// Sled-based implementation of SnapshotStore
///
/// Keys are `snapshot:<subject>:<nanos>`, values are bincode-encoded
/// snapshots.
pub struct SledSnapshotStore {
    db: sled::Db,
}

impl SledSnapshotStore {
    /// Create a new SledSnapshotStore at the given path
    ///
    /// The path is a directory; sled creates its database files there.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)
            .map_err(|e| StoreError::Backend(format!("Failed to open sled database: {}", e)))?;
        Ok(Self { db })
    }

    /// Wrap an already open database
    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }

    fn subject_prefix(subject: &str) -> String {
        format!("{}:{}:", KEY_PREFIX, subject)
    }

    fn key_for(subject: &str, snapshot: &Snapshot) -> Result<String, StoreError> {
        let nanos = snapshot
            .timestamp
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| {
                StoreError::Backend(format!(
                    "Timestamp out of storable range: {}",
                    snapshot.timestamp
                ))
            })?;
        Ok(format!(
            "{}{:0width$}",
            Self::subject_prefix(subject),
            nanos,
            width = STAMP_WIDTH
        ))
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::Backend(format!("Failed to flush database: {}", e)))?;
        Ok(())
    }
}

impl SnapshotStore for SledSnapshotStore {
    #[instrument(skip(self, snapshot))]
    fn save(&self, snapshot: &Snapshot, subject: &str) -> Result<SnapshotId, StoreError> {
        let key = Self::key_for(subject, snapshot)?;
        let value = bincode::serialize(snapshot)
            .map_err(|e| StoreError::Backend(format!("Failed to serialize snapshot: {}", e)))?;

        self.db
            .insert(key.as_bytes(), value)
            .map_err(|e| StoreError::Backend(format!("Failed to put snapshot: {}", e)))?;
        self.flush()?;

        info!(key = %key, files = snapshot.len(), "Saved snapshot");
        Ok(SnapshotId::new(key))
    }

    #[instrument(skip(self))]
    fn load(&self, id: &SnapshotId) -> Result<Snapshot, StoreError> {
        let value = self
            .db
            .get(id.as_str().as_bytes())
            .map_err(|e| StoreError::Backend(format!("Failed to get snapshot: {}", e)))?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let snapshot: Snapshot =
            bincode::deserialize(&value).map_err(|e| StoreError::Malformed {
                id: id.to_string(),
                line: 0,
                reason: format!("Failed to deserialize snapshot: {}", e),
            })?;
        debug!(files = snapshot.len(), "Loaded snapshot");
        Ok(snapshot)
    }

    fn list(&self, subject: &str) -> Result<Vec<SnapshotId>, StoreError> {
        let prefix = Self::subject_prefix(subject);
        let mut ids = Vec::new();

        for item in self.db.scan_prefix(prefix.as_bytes()) {
            let (key, _) =
                item.map_err(|e| StoreError::Backend(format!("Failed to iterate store: {}", e)))?;
            let Ok(key) = std::str::from_utf8(&key) else {
                continue;
            };
            // Subjects containing ':' can share a prefix; only exact stamps count
            let stamp = &key[prefix.len()..];
            if stamp.len() == STAMP_WIDTH && stamp.bytes().all(|b| b.is_ascii_digit()) {
                ids.push(SnapshotId::new(key));
            }
        }

        Ok(ids)
    }
}
