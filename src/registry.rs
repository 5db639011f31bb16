//! Strategy registry: owns the `(key, contract) -> provider` table.
//!
//! Every registration is checked structurally against its contract before it
//! becomes visible, so a resolved provider always satisfies the contract it
//! was requested for. There is no override: a live entry must be
//! unregistered explicitly before its key can be reused.

use crate::contract::Contract;
use crate::error::EngineError;
use crate::provider::Provider;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

mod entry;
mod listing;

pub use entry::EntryInfo;
pub use listing::KeyListing;

use entry::RegistrationEntry;

#[derive(Default)]
struct Table {
    /// Descriptor each contract name was first registered with
    pins: HashMap<String, Arc<Contract>>,
    /// contract name -> key -> entry
    entries: HashMap<String, HashMap<String, RegistrationEntry>>,
}

impl Table {
    /// Return the pinned descriptor for `contract`, or an error if the name is
    /// pinned to a different descriptor.
    fn pinned(&self, contract: &Contract) -> Result<Option<&Arc<Contract>>, EngineError> {
        match self.pins.get(contract.name()) {
            Some(pinned) if **pinned != *contract => {
                Err(EngineError::ContractRedefined(contract.name().to_string()))
            }
            other => Ok(other),
        }
    }
}

/// Registry of providers keyed by `(key, contract)`.
///
/// Writes are serialized behind a write lock; `resolve` and `list` take the
/// read lock and never block each other.
#[derive(Default)]
pub struct StrategyRegistry {
    table: RwLock<Table>,
}

impl StrategyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under `key` for `contract`.
    ///
    /// Fails with `ContractMismatch` if the provider's signatures do not
    /// satisfy every contract operation, and with `DuplicateRegistration` if
    /// the pair is already taken. A failed registration leaves the table
    /// untouched.
    pub fn register(
        &self,
        key: &str,
        contract: &Contract,
        provider: Arc<dyn Provider>,
    ) -> Result<(), EngineError> {
        if key.trim().is_empty() {
            return Err(EngineError::InvalidKey(key.to_string()));
        }

        let reasons = contract.mismatches(provider.signatures());
        if !reasons.is_empty() {
            warn!(
                key,
                contract = contract.name(),
                provider = provider.identity(),
                ?reasons,
                "Rejected provider that does not satisfy contract"
            );
            return Err(EngineError::ContractMismatch {
                contract: contract.name().to_string(),
                provider: provider.identity().to_string(),
                reasons,
                at_invocation: false,
            });
        }

        let mut table = self.table.write();
        let pinned = match table.pinned(contract)? {
            Some(pinned) => Arc::clone(pinned),
            None => Arc::new(contract.clone()),
        };

        let by_key = table.entries.entry(contract.name().to_string()).or_default();
        if by_key.contains_key(key) {
            warn!(key, contract = contract.name(), "Rejected duplicate registration");
            return Err(EngineError::DuplicateRegistration {
                key: key.to_string(),
                contract: contract.name().to_string(),
            });
        }

        info!(
            key,
            contract = contract.name(),
            provider = provider.identity(),
            "Registered provider"
        );
        by_key.insert(
            key.to_string(),
            RegistrationEntry::new(key.to_string(), Arc::clone(&pinned), provider),
        );
        table.pins.insert(contract.name().to_string(), pinned);
        Ok(())
    }

    /// Look up the provider registered under `(key, contract)`.
    ///
    /// Pure lookup: no provider code runs, and there is no fallback.
    pub fn resolve(&self, key: &str, contract: &Contract) -> Result<Arc<dyn Provider>, EngineError> {
        let table = self.table.read();
        table.pinned(contract)?;
        table
            .entries
            .get(contract.name())
            .and_then(|by_key| by_key.get(key))
            .map(|entry| Arc::clone(&entry.provider))
            .ok_or_else(|| EngineError::UnknownKey {
                key: key.to_string(),
                contract: contract.name().to_string(),
            })
    }

    /// Remove the entry for `(key, contract)`, returning its provider.
    ///
    /// The contract descriptor stays pinned.
    pub fn unregister(
        &self,
        key: &str,
        contract: &Contract,
    ) -> Result<Arc<dyn Provider>, EngineError> {
        let mut table = self.table.write();
        table.pinned(contract)?;
        let removed = table
            .entries
            .get_mut(contract.name())
            .and_then(|by_key| by_key.remove(key))
            .ok_or_else(|| EngineError::UnknownKey {
                key: key.to_string(),
                contract: contract.name().to_string(),
            })?;

        info!(
            key,
            contract = contract.name(),
            provider = removed.provider.identity(),
            "Unregistered provider"
        );
        Ok(removed.provider)
    }

    /// Keys registered against `contract`, sorted. For diagnostics only;
    /// selection always goes through an explicit key.
    pub fn list(&self, contract: &Contract) -> KeyListing {
        let table = self.table.read();
        let keys = table
            .entries
            .get(contract.name())
            .map(|by_key| by_key.keys().cloned().collect())
            .unwrap_or_default();
        KeyListing::new(contract.name(), keys)
    }

    /// Names of the contracts `key` is registered against, sorted
    pub fn contracts_for(&self, key: &str) -> Vec<String> {
        let table = self.table.read();
        let mut names: Vec<String> = table
            .entries
            .iter()
            .filter(|(_, by_key)| by_key.contains_key(key))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Metadata for one entry, if present
    pub fn entry(&self, key: &str, contract: &Contract) -> Option<EntryInfo> {
        let table = self.table.read();
        table
            .entries
            .get(contract.name())
            .and_then(|by_key| by_key.get(key))
            .map(|entry| entry.info())
    }

    /// Number of live entries across all contracts
    pub fn len(&self) -> usize {
        self.table.read().entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descriptor `name` is pinned to, if any provider was ever registered for it
    pub fn pinned_contract(&self, name: &str) -> Option<Arc<Contract>> {
        self.table.read().pins.get(name).cloned()
    }
}
