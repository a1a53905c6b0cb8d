//! Configuration System
//!
//! Layered configuration: built-in defaults, the global user file, workspace
//! files, `TREESNAP_*` environment variables, then CLI flags applied by the
//! caller. The storage directory is an explicit value handed to the store;
//! nothing here is process-global.

use crate::logging::LoggingConfig;
use crate::tree::walker::WalkerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreesnapConfig {
    /// Snapshot storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Directory traversal
    #[serde(default)]
    pub walker: WalkerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which persistence backend holds snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One CSV table per snapshot
    #[default]
    Csv,
    /// sled key-value database
    Sled,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(StorageBackend::Csv),
            "sled" => Ok(StorageBackend::Sled),
            other => Err(format!(
                "Invalid storage backend: {} (must be 'csv' or 'sled')",
                other
            )),
        }
    }
}

/// Snapshot storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding snapshots; relative paths resolve against the
    /// directory treesnap runs in
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

pub(crate) fn default_snapshot_dir() -> PathBuf {
    PathBuf::from(".treesnap/states")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Storage(String),
    Walker(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Walker(msg) => write!(f, "Walker: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TreesnapConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.storage.snapshot_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Storage(
                "Snapshot directory cannot be empty".to_string(),
            ));
        }

        if self.walker.ignore.iter().any(|p| p.is_empty() || p.contains('/')) {
            errors.push(ValidationError::Walker(
                "Ignore entries must be single, non-empty path components".to_string(),
            ));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render as TOML for `treesnap config`
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
