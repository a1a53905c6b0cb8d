//! CLI route: single route table and run context. Dispatches to the snapshot
//! API and presentation.

use crate::api::SnapshotApi;
use crate::config::{ConfigLoader, StorageBackend, TreesnapConfig};
use crate::error::ApiError;
use crate::store::{open_store, SnapshotId};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_compare_json, format_report_json, format_report_text, format_scan_json,
    format_scan_text, format_snapshot_json, format_snapshot_list_json, format_snapshot_list_text,
    format_snapshot_text, format_tree,
};

/// CLI flags that override loaded configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub snapshot_dir: Option<PathBuf>,
    pub backend: Option<StorageBackend>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut TreesnapConfig) {
        if let Some(ref dir) = self.snapshot_dir {
            config.storage.snapshot_dir = dir.clone();
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
    }
}

/// Runtime context for CLI execution: effective config and the snapshot API.
/// Built from the working directory and optional config path using
/// ConfigLoader only.
pub struct RunContext {
    api: SnapshotApi,
    config: TreesnapConfig,
}

impl RunContext {
    /// Load configuration, apply CLI overrides, and open the configured store.
    /// Relative snapshot directories resolve against `workspace_root`.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ApiError> {
        let mut config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        overrides.apply(&mut config);

        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::Config(format!("Invalid configuration: {}", messages.join("; ")))
        })?;

        let store = open_store(&config.storage, &workspace_root)?;
        debug!(
            backend = ?config.storage.backend,
            snapshot_dir = %config.storage.snapshot_dir.display(),
            "Opened snapshot store"
        );

        Ok(Self {
            api: SnapshotApi::new(store, config.walker.clone()),
            config,
        })
    }

    /// Reference to the underlying snapshot API.
    pub fn api(&self) -> &SnapshotApi {
        &self.api
    }

    /// Effective configuration after all layers and overrides.
    pub fn config(&self) -> &TreesnapConfig {
        &self.config
    }

    /// Execute a CLI command and return its rendered output
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Scan {
                dir,
                tree,
                no_save,
                format,
            } => self.handle_scan(dir, *tree, *no_save, *format),
            Commands::Compare {
                dir,
                no_save,
                format,
            } => self.handle_compare(dir, *no_save, *format),
            Commands::Tree { dir } => Ok(format_tree(&self.api.get_tree(dir)?)),
            Commands::Diff {
                old_id,
                new_id,
                format,
            } => self.handle_diff(old_id, new_id, *format),
            Commands::List { dir, format } => self.handle_list(dir, *format),
            Commands::Show { id, format } => self.handle_show(id, *format),
            Commands::Config => self
                .config
                .to_toml()
                .map_err(|e| ApiError::Output(format!("Failed to render configuration: {}", e))),
        }
    }

    fn handle_scan(
        &self,
        dir: &Path,
        show_tree: bool,
        no_save: bool,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        let (snapshot, tree) = self.api.create_snapshot_with_tree(dir)?;
        let saved = if no_save {
            None
        } else {
            Some(self.api.save_snapshot(&snapshot, dir)?)
        };
        info!(root = %snapshot.root, files = snapshot.len(), "Scan completed");

        match format {
            OutputFormat::Text => Ok(format_scan_text(
                &snapshot,
                show_tree.then_some(&tree),
                saved.as_ref(),
            )),
            OutputFormat::Json => format_scan_json(&snapshot, saved.as_ref()),
        }
    }

    fn handle_compare(
        &self,
        dir: &Path,
        no_save: bool,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        let current = self.api.create_snapshot(dir)?;

        let previous = match self.api.find_latest_snapshot(dir) {
            Ok(id) => {
                let snapshot = self.api.load_snapshot(&id)?;
                Ok((id, snapshot))
            }
            Err(e) if e.is_no_prior_state() => {
                info!("No previous state to compare with");
                Err(e)
            }
            Err(e) => return Err(e),
        };
        let report = previous
            .as_ref()
            .ok()
            .map(|(_, old)| self.api.compare_snapshots(old, &current));

        // Save after loading so the new table never shadows the previous one
        let saved = if no_save {
            None
        } else {
            Some(self.api.save_snapshot(&current, dir)?)
        };

        match format {
            OutputFormat::Json => format_compare_json(
                previous.as_ref().ok().map(|(id, _)| id),
                report.as_ref(),
                saved.as_ref(),
            ),
            OutputFormat::Text => {
                let mut out = String::new();
                match (&previous, &report) {
                    (Ok((id, _)), Some(report)) => {
                        out.push_str(&format!("Loading previous state from: {}\n\n", id));
                        out.push_str(&format_report_text(report));
                    }
                    (Err(e), _) => {
                        out.push_str(&format!("No previous state to compare with: {}\n", e));
                    }
                    (Ok(_), None) => {}
                }
                if let Some(id) = saved {
                    out.push_str(&format!("\nTree state saved to {}\n", id));
                }
                Ok(out)
            }
        }
    }

    fn handle_diff(
        &self,
        old_id: &str,
        new_id: &str,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        let old = self.api.load_snapshot(&SnapshotId::from(old_id))?;
        let new = self.api.load_snapshot(&SnapshotId::from(new_id))?;
        let report = self.api.compare_snapshots(&old, &new);

        match format {
            OutputFormat::Text => Ok(format_report_text(&report)),
            OutputFormat::Json => format_report_json(&report),
        }
    }

    fn handle_list(&self, dir: &Path, format: OutputFormat) -> Result<String, ApiError> {
        let subject = self.api.subject_for(dir)?;
        let ids = self.api.list_snapshots(dir)?;

        match format {
            OutputFormat::Text => Ok(format_snapshot_list_text(&subject, &ids)),
            OutputFormat::Json => format_snapshot_list_json(&subject, &ids),
        }
    }

    fn handle_show(&self, id: &str, format: OutputFormat) -> Result<String, ApiError> {
        let id = SnapshotId::from(id);
        let snapshot = self.api.load_snapshot(&id)?;

        match format {
            OutputFormat::Text => Ok(format_snapshot_text(&id, &snapshot)),
            OutputFormat::Json => format_snapshot_json(&id, &snapshot),
        }
    }
}
