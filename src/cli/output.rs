//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, StoreError, TreeError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Tree(TreeError::InvalidRoot(path)) => {
            format!("Error: Folder '{}' does not exist or is not a directory", path.display())
        }
        ApiError::Tree(TreeError::EmptyTree) => {
            format!("Error creating Merkle tree: {}", TreeError::EmptyTree)
        }
        ApiError::Store(StoreError::NotFound(id)) => format!("Error: no stored snapshot {}", id),
        other => format!("Error: {}", other),
    }
}
