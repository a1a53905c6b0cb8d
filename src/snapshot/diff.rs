//! Snapshot comparison
//!
//! Derives a classified changeset from two snapshots by comparing their flat
//! path maps. Records come out Modified first, then Added, then Deleted, each
//! group in ascending path order.

use crate::snapshot::Snapshot;
use crate::types::Digest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of change detected for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Modified,
    Added,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Modified => "MODIFIED",
            ChangeKind::Added => "ADDED",
            ChangeKind::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change detected in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub path: String,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_digest: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_digest: Option<Digest>,
}

/// All changes detected between two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub old_timestamp: DateTime<Utc>,
    pub new_timestamp: DateTime<Utc>,
    pub old_root: Digest,
    pub new_root: Digest,
    pub changes: Vec<ChangeRecord>,
}

/// Per-kind change counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub modified: usize,
    pub added: usize,
    pub deleted: usize,
}

impl ChangeReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn root_changed(&self) -> bool {
        self.old_root != self.new_root
    }

    /// Records of one kind, in emission order
    pub fn of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &ChangeRecord> {
        self.changes.iter().filter(move |c| c.kind == kind)
    }

    pub fn summary(&self) -> ChangeSummary {
        let mut summary = ChangeSummary::default();
        for change in &self.changes {
            match change.kind {
                ChangeKind::Modified => summary.modified += 1,
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Deleted => summary.deleted += 1,
            }
        }
        summary
    }
}

/// Compare two snapshots
///
/// Total over any pair of snapshots, empty ones included. Paths present in
/// both with equal digests produce no record. Safe to call unconditionally,
/// including after a root match.
pub fn compare(old: &Snapshot, new: &Snapshot) -> ChangeReport {
    let mut changes = Vec::new();

    // Modified
    for (path, new_digest) in &new.files {
        if let Some(old_digest) = old.files.get(path) {
            if old_digest != new_digest {
                changes.push(ChangeRecord {
                    path: path.clone(),
                    kind: ChangeKind::Modified,
                    old_digest: Some(*old_digest),
                    new_digest: Some(*new_digest),
                });
            }
        }
    }

    // Added
    for (path, new_digest) in &new.files {
        if !old.files.contains_key(path) {
            changes.push(ChangeRecord {
                path: path.clone(),
                kind: ChangeKind::Added,
                old_digest: None,
                new_digest: Some(*new_digest),
            });
        }
    }

    // Deleted
    for (path, old_digest) in &old.files {
        if !new.files.contains_key(path) {
            changes.push(ChangeRecord {
                path: path.clone(),
                kind: ChangeKind::Deleted,
                old_digest: Some(*old_digest),
                new_digest: None,
            });
        }
    }

    ChangeReport {
        old_timestamp: old.timestamp,
        new_timestamp: new.timestamp,
        old_root: old.root,
        new_root: new.root,
        changes,
    }
}
