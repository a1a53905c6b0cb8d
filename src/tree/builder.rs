//! Tree builder for constructing Merkle trees over directory contents

use crate::error::TreeError;
use crate::tree::hasher;
use crate::tree::node::{LeafEntry, NodeIndex, TreeNode};
use crate::tree::walker::{FileEntry, Walker, WalkerConfig};
use crate::types::Digest;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Complete Merkle tree structure
///
/// Nodes live in a flat arena: the sorted leaves first, then every level of
/// internal nodes in construction order, with the root last.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    nodes: Vec<TreeNode>,
    root: NodeIndex,
    leaf_count: usize,
    height: usize,
}

impl MerkleTree {
    /// Build a tree from leaf entries
    ///
    /// Leaves are sorted by path (byte-wise) so the root depends on content
    /// only, never on enumeration order. An odd node at any level is paired
    /// with itself.
    pub fn from_leaves(mut leaves: Vec<LeafEntry>) -> Result<Self, TreeError> {
        if leaves.is_empty() {
            return Err(TreeError::EmptyTree);
        }

        leaves.sort_by(|a, b| a.path.cmp(&b.path));
        if let Some(pair) = leaves.windows(2).find(|w| w[0].path == w[1].path) {
            return Err(TreeError::DuplicatePath(pair[0].path.clone()));
        }

        let leaf_count = leaves.len();
        let mut nodes: Vec<TreeNode> = leaves
            .into_iter()
            .map(|leaf| TreeNode::Leaf {
                digest: leaf.digest,
                path: leaf.path,
            })
            .collect();

        let mut level: Vec<NodeIndex> = (0..leaf_count).collect();
        let mut height = 0;

        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                let left = pair[0];
                let right = pair.get(1).copied().unwrap_or(left);
                let digest = hasher::combine(nodes[left].digest(), nodes[right].digest());
                nodes.push(TreeNode::Internal {
                    digest,
                    left,
                    right,
                });
                next.push(nodes.len() - 1);
            }
            level = next;
            height += 1;
        }

        Ok(Self {
            root: level[0],
            nodes,
            leaf_count,
            height,
        })
    }

    /// Root node of the tree
    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root]
    }

    pub fn root_index(&self) -> NodeIndex {
        self.root
    }

    /// Root digest: the fingerprint of the whole directory
    pub fn root_digest(&self) -> Digest {
        *self.root().digest()
    }

    /// Look up a node by arena index
    pub fn node(&self, index: NodeIndex) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of combination levels above the leaves (0 for a single file)
    pub fn height(&self) -> usize {
        self.height
    }

    /// Leaves in sorted path order
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes[..self.leaf_count].iter()
    }
}

/// Tree builder reading a directory from the filesystem
pub struct TreeBuilder {
    root: PathBuf,
    walker_config: Option<WalkerConfig>,
}

impl TreeBuilder {
    /// Create a new tree builder for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            walker_config: None,
        }
    }

    /// Set walker config (ignore list, symlinks, depth). When set, the walker
    /// uses this config instead of the default.
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = Some(config);
        self
    }

    /// Build the complete Merkle tree from the filesystem
    ///
    /// Files are read one at a time; the first I/O error aborts the build.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn build(&self) -> Result<MerkleTree, TreeError> {
        let start = Instant::now();
        info!("Starting tree build");

        let walker = match &self.walker_config {
            Some(config) => Walker::with_config(self.root.clone(), config.clone()),
            None => Walker::new(self.root.clone()),
        };
        let files = walker.walk().map_err(|e| {
            error!("Filesystem walk failed: {}", e);
            e
        })?;

        let mut leaves = Vec::with_capacity(files.len());
        for file in &files {
            leaves.push(self.hash_file(file)?);
        }
        debug!(leaf_count = leaves.len(), "Hashed files");

        let tree = MerkleTree::from_leaves(leaves)?;

        info!(
            leaf_count = tree.leaf_count(),
            node_count = tree.node_count(),
            root = %tree.root_digest(),
            duration_ms = start.elapsed().as_millis(),
            "Tree build completed"
        );

        Ok(tree)
    }

    /// Compute root digest of the directory
    ///
    /// Convenience method that builds the tree and returns only the root.
    pub fn compute_root(&self) -> Result<Digest, TreeError> {
        Ok(self.build()?.root_digest())
    }

    /// Hash a file's content in a single streaming pass
    fn hash_file(&self, file: &FileEntry) -> Result<LeafEntry, TreeError> {
        let handle = File::open(&file.path).map_err(|e| {
            error!(path = %file.path.display(), "Failed to open file: {}", e);
            TreeError::io(&file.path, e)
        })?;
        let digest = hasher::digest_reader(BufReader::new(handle))
            .map_err(|e| TreeError::io(&file.path, e))?;
        trace!(path = %file.relative_path, digest = %digest, "Computed content hash");

        Ok(LeafEntry::new(file.relative_path.clone(), digest))
    }
}
