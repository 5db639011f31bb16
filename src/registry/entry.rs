//! Registration entries owned by the strategy registry.

use crate::contract::Contract;
use crate::provider::Provider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One live `(key, contract, provider)` binding. Immutable once created.
#[derive(Clone)]
pub(crate) struct RegistrationEntry {
    pub key: String,
    pub contract: Arc<Contract>,
    pub provider: Arc<dyn Provider>,
    pub registered_at: DateTime<Utc>,
}

impl RegistrationEntry {
    pub fn new(key: String, contract: Arc<Contract>, provider: Arc<dyn Provider>) -> Self {
        Self {
            key,
            contract,
            provider,
            registered_at: Utc::now(),
        }
    }

    pub fn info(&self) -> EntryInfo {
        EntryInfo {
            key: self.key.clone(),
            contract: self.contract.name().to_string(),
            provider: self.provider.identity().to_string(),
            operations: self
                .contract
                .operations()
                .iter()
                .map(|op| op.name.clone())
                .collect(),
            registered_at: self.registered_at,
        }
    }
}

/// Diagnostic view of a registration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    pub key: String,
    pub contract: String,
    pub provider: String,
    /// Operations reachable through this entry (the contract's, not the provider's)
    pub operations: Vec<String>,
    pub registered_at: DateTime<Utc>,
}
