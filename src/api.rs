//! Snapshot API
//!
//! Thin facade tying the tree builder, snapshot model, differ and store
//! together. The store is handed in explicitly; nothing is process-global.

use crate::error::ApiError;
use crate::snapshot::{compare, ChangeReport, Snapshot};
use crate::store::{SnapshotId, SnapshotStore};
use crate::tree::path::subject_name;
use crate::tree::walker::WalkerConfig;
use crate::tree::{MerkleTree, TreeBuilder};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Snapshot API service
pub struct SnapshotApi {
    store: Box<dyn SnapshotStore>,
    walker: WalkerConfig,
}

impl SnapshotApi {
    pub fn new(store: Box<dyn SnapshotStore>, walker: WalkerConfig) -> Self {
        Self { store, walker }
    }

    /// Underlying store
    pub fn store(&self) -> &dyn SnapshotStore {
        self.store.as_ref()
    }

    /// Build the Merkle tree of `folder`
    pub fn get_tree(&self, folder: &Path) -> Result<MerkleTree, ApiError> {
        let tree = TreeBuilder::new(folder.to_path_buf())
            .with_walker_config(self.walker.clone())
            .build()?;
        Ok(tree)
    }

    /// Capture a snapshot of `folder` stamped with the current time
    pub fn create_snapshot(&self, folder: &Path) -> Result<Snapshot, ApiError> {
        Ok(self.create_snapshot_with_tree(folder)?.0)
    }

    /// Capture a snapshot and keep the tree it was flattened from
    #[instrument(skip(self), fields(folder = %folder.display()))]
    pub fn create_snapshot_with_tree(
        &self,
        folder: &Path,
    ) -> Result<(Snapshot, MerkleTree), ApiError> {
        let tree = self.get_tree(folder)?;
        let snapshot = Snapshot::capture(&tree);
        debug!(files = snapshot.len(), root = %snapshot.root, "Captured snapshot");
        Ok((snapshot, tree))
    }

    /// Persist `snapshot` under the subject derived from `folder`
    pub fn save_snapshot(&self, snapshot: &Snapshot, folder: &Path) -> Result<SnapshotId, ApiError> {
        let subject = self.subject_for(folder)?;
        let id = self.store.save(snapshot, &subject)?;
        info!(subject = %subject, id = %id, "Snapshot saved");
        Ok(id)
    }

    pub fn load_snapshot(&self, id: &SnapshotId) -> Result<Snapshot, ApiError> {
        Ok(self.store.load(id)?)
    }

    /// Identifier of the newest stored snapshot for `folder`
    pub fn find_latest_snapshot(&self, folder: &Path) -> Result<SnapshotId, ApiError> {
        let subject = self.subject_for(folder)?;
        Ok(self.store.latest(&subject)?)
    }

    /// Newest stored snapshot for `folder`
    ///
    /// Fails with a `NoPriorState` store error when nothing was saved yet.
    pub fn load_most_recent(&self, folder: &Path) -> Result<Snapshot, ApiError> {
        let subject = self.subject_for(folder)?;
        Ok(self.store.load_most_recent(&subject)?)
    }

    /// Stored snapshots for `folder`, oldest first
    pub fn list_snapshots(&self, folder: &Path) -> Result<Vec<SnapshotId>, ApiError> {
        let subject = self.subject_for(folder)?;
        Ok(self.store.list(&subject)?)
    }

    pub fn compare_snapshots(&self, old: &Snapshot, new: &Snapshot) -> ChangeReport {
        compare(old, new)
    }

    /// Subject key for `folder`: its final path component
    pub fn subject_for(&self, folder: &Path) -> Result<String, ApiError> {
        Ok(subject_name(folder)?)
    }
}
