//! Contract catalog: publish-once store of contract descriptors by name.

use crate::contract::Contract;
use crate::error::EngineError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Published contracts, keyed by name.
///
/// A name is bound to one descriptor for the catalog's lifetime.
#[derive(Debug, Default)]
pub struct ContractCatalog {
    contracts: RwLock<BTreeMap<String, Arc<Contract>>>,
}

impl ContractCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a contract.
    ///
    /// Publishing an identical descriptor again returns the existing handle;
    /// a different descriptor under a taken name fails with `ContractRedefined`.
    pub fn publish(&self, contract: Contract) -> Result<Arc<Contract>, EngineError> {
        let mut contracts = self.contracts.write();
        if let Some(existing) = contracts.get(contract.name()) {
            if **existing == contract {
                return Ok(Arc::clone(existing));
            }
            return Err(EngineError::ContractRedefined(contract.name().to_string()));
        }

        debug!(
            contract = contract.name(),
            operations = contract.operations().len(),
            "Published contract"
        );
        let published = Arc::new(contract);
        contracts.insert(published.name().to_string(), Arc::clone(&published));
        Ok(published)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Contract>> {
        self.contracts.read().get(name).cloned()
    }

    /// Names of all published contracts, sorted
    pub fn names(&self) -> Vec<String> {
        self.contracts.read().keys().cloned().collect()
    }
}
