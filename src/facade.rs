//! Resolution Facade
//!
//! The single entry point consumers call. Resolves a provider through the
//! registry, checks the request against the contract, invokes the provider
//! through the contract only, and hands back the output untouched. No
//! caching, no retries, no state between calls.

use crate::config::EngineConfig;
use crate::contract::Contract;
use crate::error::{EngineError, ProviderError};
use crate::registry::StrategyRegistry;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument, warn};

mod bindings;
mod resolution;

pub use bindings::Bindings;
pub use resolution::{Diagnostics, Resolution};

/// Consumer-facing dispatcher over a [`StrategyRegistry`]
#[derive(Clone)]
pub struct ResolutionFacade {
    registry: Arc<StrategyRegistry>,
    bindings: Bindings,
    default_timeout: Option<Duration>,
}

impl ResolutionFacade {
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self {
            registry,
            bindings: Bindings::new(),
            default_timeout: None,
        }
    }

    /// Build a facade with the bindings and default timeout from `config`
    pub fn from_config(registry: Arc<StrategyRegistry>, config: &EngineConfig) -> Self {
        Self {
            registry,
            bindings: config.bindings.clone(),
            default_timeout: config.invocation.default_timeout(),
        }
    }

    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Deadline applied by [`ResolutionFacade::invoke`] when set
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> &Arc<StrategyRegistry> {
        &self.registry
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Resolve `key` for `contract` and run `operation` with `input`.
    ///
    /// Dropping the returned future cancels the in-flight provider call.
    pub async fn invoke(
        &self,
        key: &str,
        contract: &Contract,
        operation: &str,
        input: Value,
    ) -> Result<Resolution, EngineError> {
        self.dispatch(key, contract, operation, input, self.default_timeout)
            .await
    }

    /// Like [`ResolutionFacade::invoke`] with an explicit deadline.
    ///
    /// On expiry the provider future is dropped, not left running, and
    /// `TimedOut` is returned.
    pub async fn invoke_with_timeout(
        &self,
        key: &str,
        contract: &Contract,
        operation: &str,
        input: Value,
        timeout: Duration,
    ) -> Result<Resolution, EngineError> {
        self.dispatch(key, contract, operation, input, Some(timeout))
            .await
    }

    /// Invoke through the key bound to `contract`; `Unbound` if there is none.
    pub async fn invoke_bound(
        &self,
        contract: &Contract,
        operation: &str,
        input: Value,
    ) -> Result<Resolution, EngineError> {
        let key = self
            .bindings
            .key_for(contract.name())
            .ok_or_else(|| EngineError::Unbound(contract.name().to_string()))?;
        self.invoke(key, contract, operation, input).await
    }

    /// Typed invocation: `input` is serialized, the output decoded into `O`.
    ///
    /// An output that does not decode into `O` is a `ContractMismatch`.
    pub async fn call<I, O>(
        &self,
        key: &str,
        contract: &Contract,
        operation: &str,
        input: &I,
    ) -> Result<O, EngineError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let value = serde_json::to_value(input).map_err(|e| EngineError::InvalidInput {
            contract: contract.name().to_string(),
            operation: operation.to_string(),
            reason: e.to_string(),
        })?;

        let resolution = self.invoke(key, contract, operation, value).await?;
        let provider = resolution.provider.clone();
        serde_json::from_value(resolution.into_output()).map_err(|e| {
            EngineError::ContractMismatch {
                contract: contract.name().to_string(),
                provider,
                reasons: vec![format!("output of '{}' does not decode: {}", operation, e)],
                at_invocation: true,
            }
        })
    }

    /// Typed invocation through the key bound to `contract`.
    pub async fn call_bound<I, O>(
        &self,
        contract: &Contract,
        operation: &str,
        input: &I,
    ) -> Result<O, EngineError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let key = self
            .bindings
            .key_for(contract.name())
            .ok_or_else(|| EngineError::Unbound(contract.name().to_string()))?;
        self.call(key, contract, operation, input).await
    }

    #[instrument(skip(self, contract, input), fields(contract = contract.name()))]
    async fn dispatch(
        &self,
        key: &str,
        contract: &Contract,
        operation: &str,
        input: Value,
        timeout: Option<Duration>,
    ) -> Result<Resolution, EngineError> {
        let provider = self.registry.resolve(key, contract)?;

        let signature = contract.operation(operation).ok_or_else(|| {
            debug!("Operation not declared by contract");
            EngineError::UnknownOperation {
                contract: contract.name().to_string(),
                operation: operation.to_string(),
            }
        })?;

        signature
            .input
            .check(&input)
            .map_err(|reason| EngineError::InvalidInput {
                contract: contract.name().to_string(),
                operation: operation.to_string(),
                reason,
            })?;

        let started_at = Utc::now();
        let start = Instant::now();
        let call = provider.call(operation, input);
        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(provider = provider.identity(), ?limit, "Provider call timed out");
                    return Err(EngineError::TimedOut {
                        provider: provider.identity().to_string(),
                        elapsed: start.elapsed(),
                    });
                }
            },
            None => call.await,
        };
        let elapsed = start.elapsed();

        let output = match result {
            Ok(output) => output,
            Err(ProviderError::Unsupported { operation }) => {
                error!(
                    provider = provider.identity(),
                    %operation,
                    "Registered provider does not implement a contract operation"
                );
                return Err(EngineError::UnknownOperation {
                    contract: contract.name().to_string(),
                    operation,
                });
            }
            Err(ProviderError::Failed { condition, .. })
                if !signature.failures.contains(&condition) =>
            {
                error!(
                    provider = provider.identity(),
                    %condition,
                    "Provider reported an undeclared failure condition"
                );
                return Err(EngineError::ContractMismatch {
                    contract: contract.name().to_string(),
                    provider: provider.identity().to_string(),
                    reasons: vec![format!(
                        "'{}' failed with undeclared condition '{}'",
                        operation, condition
                    )],
                    at_invocation: true,
                });
            }
            Err(detail) => {
                debug!(provider = provider.identity(), %detail, "Provider reported failure");
                return Err(EngineError::ProviderFailure {
                    provider: provider.identity().to_string(),
                    detail,
                });
            }
        };

        if let Err(reason) = signature.output.check(&output) {
            error!(provider = provider.identity(), %reason, "Provider output violates contract");
            return Err(EngineError::ContractMismatch {
                contract: contract.name().to_string(),
                provider: provider.identity().to_string(),
                reasons: vec![format!("output of '{}' {}", operation, reason)],
                at_invocation: true,
            });
        }

        debug!(provider = provider.identity(), ?elapsed, "Invocation complete");
        Ok(Resolution {
            key: key.to_string(),
            contract: contract.name().to_string(),
            operation: operation.to_string(),
            provider: provider.identity().to_string(),
            output,
            diagnostics: Diagnostics {
                started_at,
                elapsed,
            },
        })
    }
}
