//! Configuration System
//!
//! Layered configuration for the engine's ambient concerns: logging, the
//! facade's default invocation deadline, and contract-to-key bindings.
//! Providers themselves are code and are registered programmatically.

use crate::error::EngineError;
use crate::facade::Bindings;
use crate::logging::LoggingConfig;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Facade invocation settings
    #[serde(default)]
    pub invocation: InvocationConfig,

    /// Contract name -> registry key used by `invoke_bound`.
    /// Names are matched case-insensitively.
    #[serde(default)]
    pub bindings: Bindings,
}

/// Facade invocation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvocationConfig {
    /// Deadline applied to every `invoke`, in milliseconds. Unset means no deadline.
    #[serde(default)]
    pub default_timeout_ms: Option<u64>,
}

impl InvocationConfig {
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_ms.map(Duration::from_millis)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Logging(String),
    Invocation(String),
    Binding(String, String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
            ValidationError::Invocation(msg) => write!(f, "Invocation: {}", msg),
            ValidationError::Binding(contract, msg) => {
                write!(f, "Binding '{}': {}", contract, msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl EngineConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if self.invocation.default_timeout_ms == Some(0) {
            errors.push(ValidationError::Invocation(
                "default_timeout_ms must be greater than zero".to_string(),
            ));
        }

        for (contract, key) in self.bindings.iter() {
            if contract.trim().is_empty() {
                errors.push(ValidationError::Binding(
                    contract.to_string(),
                    "contract name cannot be empty".to_string(),
                ));
            }
            if key.trim().is_empty() {
                errors.push(ValidationError::Binding(
                    contract.to_string(),
                    "bound key cannot be empty".to_string(),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Load and validate, folding validation failures into one error
    pub fn load_validated(workspace_root: &Path) -> Result<Self, EngineError> {
        let config = ConfigLoader::load(workspace_root)?;
        config.validate().map_err(fold_validation_errors)?;
        Ok(config)
    }
}

fn fold_validation_errors(errors: Vec<ValidationError>) -> EngineError {
    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    EngineError::ConfigError(format!(
        "Configuration validation failed:\n{}",
        error_msgs.join("\n")
    ))
}

/// Configuration manager for runtime reloads
#[derive(Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<EngineConfig>>,
}

impl ConfigManager {
    /// Create a new configuration manager with the given config
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Reload configuration from files. The current configuration is kept
    /// if the new one fails to load or validate.
    pub fn reload(&self, workspace_root: &Path) -> Result<(), EngineError> {
        let new_config = EngineConfig::load_validated(workspace_root)?;
        *self.config.write() = new_config;
        Ok(())
    }

    /// Get current configuration (snapshot)
    pub fn get(&self) -> EngineConfig {
        self.config.read().clone()
    }
}
