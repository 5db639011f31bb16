//! Provider Abstraction
//!
//! A provider is a concrete behaviour that realizes one or more contracts. The
//! engine only ever talks to it through [`Provider`]: its declared operation
//! signatures (checked against contracts at registration time) and a single
//! dispatch entry point.

use crate::contract::OperationSignature;
use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::Value;

pub mod function;

pub use function::{FnProvider, FnProviderBuilder};

/// Behaviour implementation behind a registry key.
///
/// Implementations are responsible for their own thread safety; the engine
/// calls them concurrently without serialization.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identity reported in resolution results and failures
    fn identity(&self) -> &str;

    /// Signatures of every operation this provider implements, across all
    /// contracts it may be registered against
    fn signatures(&self) -> &[OperationSignature];

    /// Execute one operation.
    ///
    /// Return [`ProviderError::Unsupported`] for operations not listed in
    /// [`Provider::signatures`].
    async fn call(&self, operation: &str, input: Value) -> Result<Value, ProviderError>;
}

impl std::fmt::Debug for dyn Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("identity", &self.identity())
            .field(
                "operations",
                &self.signatures().iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
