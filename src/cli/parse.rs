//! CLI parse: clap types for treesnap. No behavior; definitions only.

use crate::config::StorageBackend;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// treesnap - Merkle tree snapshots and change detection for directories
#[derive(Parser)]
#[command(name = "treesnap")]
#[command(about = "Fingerprint directories with Merkle trees and report what changed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding stored snapshots
    #[arg(long, global = true)]
    pub snapshot_dir: Option<PathBuf>,

    /// Storage backend (csv, sled)
    #[arg(long, global = true)]
    pub backend: Option<StorageBackend>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the tree of a directory, print its root and save a snapshot
    Scan {
        /// Directory to scan
        dir: PathBuf,
        /// Also print the tree structure
        #[arg(long)]
        tree: bool,
        /// Do not store the snapshot
        #[arg(long)]
        no_save: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Compare a directory against its most recent stored snapshot
    Compare {
        /// Directory to compare
        dir: PathBuf,
        /// Do not store the new snapshot
        #[arg(long)]
        no_save: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the Merkle tree structure of a directory
    Tree {
        /// Directory to scan
        dir: PathBuf,
    },
    /// Compare two stored snapshots
    Diff {
        /// Identifier of the older snapshot
        old_id: String,
        /// Identifier of the newer snapshot
        new_id: String,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List stored snapshots for a directory, oldest first
    List {
        /// Directory whose snapshots to list
        dir: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show one stored snapshot
    Show {
        /// Snapshot identifier
        id: String,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Output format for commands that support it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
