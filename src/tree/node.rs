//! Merkle tree node types

use crate::types::Digest;

/// Index of a node inside a [`MerkleTree`](crate::tree::MerkleTree) arena
pub type NodeIndex = usize;

/// One file's content fingerprint, keyed by its relative path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafEntry {
    pub path: String,
    pub digest: Digest,
}

impl LeafEntry {
    pub fn new(path: impl Into<String>, digest: Digest) -> Self {
        Self {
            path: path.into(),
            digest,
        }
    }

    /// Build an entry by hashing in-memory content
    pub fn from_content(path: impl Into<String>, content: &[u8]) -> Self {
        Self::new(path, crate::tree::hasher::digest_bytes(content))
    }
}

/// Merkle node type
///
/// Internal nodes refer to their children by arena index. A self-paired node
/// has `left == right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Leaf {
        digest: Digest,
        path: String,
    },
    Internal {
        digest: Digest,
        left: NodeIndex,
        right: NodeIndex,
    },
}

impl TreeNode {
    pub fn digest(&self) -> &Digest {
        match self {
            TreeNode::Leaf { digest, .. } | TreeNode::Internal { digest, .. } => digest,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// File path for leaves, `None` for internal nodes
    pub fn path(&self) -> Option<&str> {
        match self {
            TreeNode::Leaf { path, .. } => Some(path),
            TreeNode::Internal { .. } => None,
        }
    }

    /// Child indices for internal nodes, `None` for leaves
    pub fn children(&self) -> Option<(NodeIndex, NodeIndex)> {
        match self {
            TreeNode::Internal { left, right, .. } => Some((*left, *right)),
            TreeNode::Leaf { .. } => None,
        }
    }
}
