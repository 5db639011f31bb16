//! Closure-backed providers.

use crate::contract::OperationSignature;
use crate::error::ProviderError;
use crate::provider::Provider;
use anyhow::anyhow;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

type SyncHandler = Arc<dyn Fn(Value) -> Result<Value, ProviderError> + Send + Sync>;
type AsyncHandler =
    Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, ProviderError>> + Send + Sync>;

#[derive(Clone)]
enum Handler {
    Sync(SyncHandler),
    Async(AsyncHandler),
}

/// Provider assembled from one closure per operation
pub struct FnProvider {
    identity: String,
    signatures: Vec<OperationSignature>,
    handlers: HashMap<String, Handler>,
}

impl FnProvider {
    pub fn builder(identity: impl Into<String>) -> FnProviderBuilder {
        FnProviderBuilder {
            identity: identity.into(),
            signatures: Vec::new(),
            handlers: HashMap::new(),
        }
    }
}

#[async_trait]
impl Provider for FnProvider {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn signatures(&self) -> &[OperationSignature] {
        &self.signatures
    }

    async fn call(&self, operation: &str, input: Value) -> Result<Value, ProviderError> {
        match self.handlers.get(operation) {
            Some(Handler::Sync(f)) => f(input),
            Some(Handler::Async(f)) => f(input).await,
            None => Err(ProviderError::Unsupported {
                operation: operation.to_string(),
            }),
        }
    }
}

pub struct FnProviderBuilder {
    identity: String,
    signatures: Vec<OperationSignature>,
    handlers: HashMap<String, Handler>,
}

impl FnProviderBuilder {
    /// Add an operation over raw JSON values. A later call with the same
    /// operation name replaces the earlier one.
    pub fn operation<F>(self, signature: OperationSignature, handler: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ProviderError> + Send + Sync + 'static,
    {
        self.insert(signature, Handler::Sync(Arc::new(handler)))
    }

    /// Add an operation with serde-typed input and output.
    pub fn typed_operation<I, O, F>(self, signature: OperationSignature, handler: F) -> Self
    where
        I: DeserializeOwned,
        O: Serialize,
        F: Fn(I) -> Result<O, ProviderError> + Send + Sync + 'static,
    {
        let name = signature.name.clone();
        self.operation(signature, move |input| {
            let decoded: I = serde_json::from_value(input)
                .map_err(|e| anyhow!("Failed to decode input for '{}': {}", name, e))?;
            let output = handler(decoded)?;
            serde_json::to_value(output)
                .map_err(|e| anyhow!("Failed to encode output of '{}': {}", name, e).into())
        })
    }

    /// Add an operation whose body suspends (I/O, timers).
    pub fn async_operation<F, Fut>(self, signature: OperationSignature, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ProviderError>> + Send + 'static,
    {
        self.insert(
            signature,
            Handler::Async(Arc::new(move |input| handler(input).boxed())),
        )
    }

    fn insert(mut self, signature: OperationSignature, handler: Handler) -> Self {
        self.signatures.retain(|s| s.name != signature.name);
        self.handlers.insert(signature.name.clone(), handler);
        self.signatures.push(signature);
        self
    }

    pub fn build(self) -> FnProvider {
        FnProvider {
            identity: self.identity,
            signatures: self.signatures,
            handlers: self.handlers,
        }
    }
}
