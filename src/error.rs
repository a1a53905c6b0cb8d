//! Error types for the treesnap change detection system.

use std::path::PathBuf;
use thiserror::Error;

/// Tree construction and traversal errors
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Root path does not exist or is not a directory: {0:?}")]
    InvalidRoot(PathBuf),

    #[error("No files found in folder")]
    EmptyTree,

    #[error("Duplicate leaf path: {0}")]
    DuplicatePath(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),
}

impl TreeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TreeError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Snapshot persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot not found: {0}")]
    NotFound(String),

    #[error("No previous state found for folder: {subject}")]
    NoPriorState { subject: String },

    #[error("Malformed snapshot {id} at line {line}: {reason}")]
    Malformed {
        id: String,
        line: usize,
        reason: String,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// True for the expected first-run condition, as opposed to a fault.
    pub fn is_no_prior_state(&self) -> bool {
        matches!(self, StoreError::NoPriorState { .. })
    }
}

/// Errors surfaced through the client facade and CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl ApiError {
    /// True when the failure only means no snapshot was stored yet.
    pub fn is_no_prior_state(&self) -> bool {
        matches!(self, ApiError::Store(e) if e.is_no_prior_state())
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Output(err.to_string())
    }
}
