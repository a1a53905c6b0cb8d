//! Merge rules: defaults, override order, conflict handling.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix for environment overrides, e.g. `TREESNAP_STORAGE__BACKEND=sled`.
pub const ENV_PREFIX: &str = "TREESNAP";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("storage.backend", "csv")?
        .set_default(
            "storage.snapshot_dir",
            crate::config::default_snapshot_dir()
                .to_string_lossy()
                .to_string(),
        )?
        .set_default("walker.follow_symlinks", false)?
        .set_default("walker.ignore", Vec::<String>::new())
}

/// Environment source layered last, above every file.
///
/// Nested keys use `__`; `walker.ignore` accepts a comma-separated list.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("walker.ignore")
}
