//! Config loader facade: assembles sources in precedence order.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::TreesnapConfig;
use config::{ConfigError, File};
use std::path::Path;
use tracing::debug;

/// Loads [`TreesnapConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// files, environment.
    pub fn load(workspace_root: &Path) -> Result<TreesnapConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let config: TreesnapConfig = builder
            .add_source(merge_policy::environment())
            .build()?
            .try_deserialize()?;

        debug!(workspace = %workspace_root.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from one explicit file, skipping global and
    /// workspace files. Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<TreesnapConfig, ConfigError> {
        let config: TreesnapConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(merge_policy::environment())
            .build()?
            .try_deserialize()?;

        debug!(config_path = %path.display(), "Loaded configuration file");
        Ok(config)
    }
}
