//! Config loading entrypoint: layers every source in precedence order.

use crate::config::merge::merge_policy;
use crate::config::sources::global_file;
use crate::config::EngineConfig;
use config::{ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`EngineConfig`] from defaults, files and environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): built-in defaults, global config file,
    /// `config/config.toml`, `config/{SEAM_ENV}.toml`, then `SEAM__*`
    /// environment variables (e.g. `SEAM__INVOCATION__DEFAULT_TIMEOUT_MS=500`).
    pub fn load(workspace_root: &Path) -> Result<EngineConfig, ConfigError> {
        let mut builder = global_file::add_to_builder(merge_policy::builder_with_defaults()?)?;
        for path in Self::workspace_files(workspace_root) {
            debug!(config_path = %path.display(), "Layering workspace configuration");
            builder = builder.add_source(File::from(path).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("SEAM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a single TOML file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<EngineConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true))
            .build()?
            .try_deserialize()
    }

    /// Workspace files that exist under `workspace_root/config`, lowest
    /// precedence first. The environment file is named by `SEAM_ENV`
    /// (default `development`).
    pub fn workspace_files(workspace_root: &Path) -> Vec<PathBuf> {
        let environment =
            std::env::var("SEAM_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = workspace_root.join("config");
        [
            config_dir.join("config.toml"),
            config_dir.join(format!("{}.toml", environment)),
        ]
        .into_iter()
        .filter(|path| path.is_file())
        .collect()
    }
}
