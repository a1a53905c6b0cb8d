//! treesnap: Merkle Tree Snapshots for Directories
//!
//! Fingerprints a directory as a binary Merkle tree over its files, stores
//! flattened snapshots, and reports which files were modified, added, or
//! deleted between two snapshots.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod snapshot;
pub mod store;
pub mod tree;
pub mod types;
