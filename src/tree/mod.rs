//! Directory Merkle Tree
//!
//! Represents a directory's files as the leaves of a binary hash tree whose
//! root is a single fingerprint of every path and its content.

pub mod builder;
pub mod hasher;
pub mod node;
pub mod path;
pub mod walker;

pub use builder::{MerkleTree, TreeBuilder};
pub use node::{LeafEntry, NodeIndex, TreeNode};
