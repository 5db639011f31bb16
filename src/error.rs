//! Error types for the strategy engine.

use std::time::Duration;
use thiserror::Error;

/// Failure reported by a provider's own operation body.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A failure condition the contract declares (e.g. `"negative_amount"`)
    #[error("{condition}: {message}")]
    Failed { condition: String, message: String },

    /// The provider was asked for an operation it does not implement
    #[error("Operation not implemented by provider: {operation}")]
    Unsupported { operation: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProviderError {
    /// Shorthand for a declared failure condition.
    pub fn failed(condition: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Failed {
            condition: condition.into(),
            message: message.into(),
        }
    }
}

/// Engine errors surfaced to registration and invocation callers
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Duplicate registration: key '{key}' is already registered for contract '{contract}'")]
    DuplicateRegistration { key: String, contract: String },

    #[error("Contract mismatch for '{contract}' (provider '{provider}'): {}", .reasons.join("; "))]
    ContractMismatch {
        contract: String,
        provider: String,
        reasons: Vec<String>,
        /// Raised by the facade after the provider ran, rather than by
        /// `register` before it was admitted
        at_invocation: bool,
    },

    #[error("Unknown key '{key}' for contract '{contract}'")]
    UnknownKey { key: String, contract: String },

    #[error("Unknown operation '{operation}' on contract '{contract}'")]
    UnknownOperation { contract: String, operation: String },

    #[error("Provider '{provider}' failed: {detail}")]
    ProviderFailure {
        provider: String,
        #[source]
        detail: ProviderError,
    },

    #[error("Contract '{0}' is already published with a different descriptor")]
    ContractRedefined(String),

    #[error("Invalid contract: {0}")]
    InvalidContract(String),

    #[error("Duplicate operation '{operation}' in contract '{contract}'")]
    DuplicateOperation { contract: String, operation: String },

    #[error("Invalid registration key: {0:?}")]
    InvalidKey(String),

    #[error("Invalid input for '{contract}.{operation}': {reason}")]
    InvalidInput {
        contract: String,
        operation: String,
        reason: String,
    },

    #[error("No binding configured for contract '{0}'")]
    Unbound(String),

    #[error("Provider '{provider}' timed out after {elapsed:?}")]
    TimedOut { provider: String, elapsed: Duration },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl EngineError {
    /// Internal-consistency faults: reaching one means a registration-time check
    /// was bypassed or a provider broke its declared signature. Not retryable.
    /// A `ContractMismatch` rejected by `register` is not a fault.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownOperation { .. }
                | EngineError::ContractMismatch {
                    at_invocation: true,
                    ..
                }
        )
    }
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}
