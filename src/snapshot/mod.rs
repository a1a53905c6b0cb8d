//! Snapshots: flattened, point-in-time fingerprints of a directory
//!
//! A snapshot carries the root digest captured at build time plus every
//! leaf's path and digest. The map alone cannot reproduce the root, so the
//! two always travel together. Snapshots are compared as flat maps; the tree
//! only exists to produce the root for cheap equality checks.

pub mod diff;

pub use diff::{compare, ChangeKind, ChangeRecord, ChangeReport, ChangeSummary};

use crate::tree::{MerkleTree, TreeNode};
use crate::types::Digest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time fingerprint of a directory tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub root: Digest,
    pub files: BTreeMap<String, Digest>,
}

impl Snapshot {
    /// Capture a snapshot of `tree` stamped with the current time
    pub fn capture(tree: &MerkleTree) -> Self {
        Self::from_tree(tree, Utc::now())
    }

    /// Flatten `tree` into a snapshot with an explicit timestamp
    pub fn from_tree(tree: &MerkleTree, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            root: tree.root_digest(),
            files: flatten(tree),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&Digest> {
        self.files.get(path)
    }

    /// Paths in ascending byte order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Root equality means the same contents in the same sorted order.
    /// Leaves hash content only, so a rename that keeps sort position is
    /// invisible here; `compare` still reports it.
    pub fn same_root(&self, other: &Snapshot) -> bool {
        self.root == other.root
    }
}

/// Collect every leaf reachable from the root into a path-indexed map
///
/// Walks the arena from the root with an explicit stack. Self-paired nodes
/// visit the same subtree twice; inserting a leaf again is a no-op.
pub fn flatten(tree: &MerkleTree) -> BTreeMap<String, Digest> {
    let mut files = BTreeMap::new();
    let mut stack = vec![tree.root_index()];

    while let Some(index) = stack.pop() {
        let Some(node) = tree.node(index) else {
            continue;
        };
        match node {
            TreeNode::Leaf { digest, path } => {
                files.entry(path.clone()).or_insert(*digest);
            }
            TreeNode::Internal { left, right, .. } => {
                if left != right {
                    stack.push(*right);
                }
                stack.push(*left);
            }
        }
    }

    files
}
