//! Contract Set
//!
//! Narrow, immutable behavioural interfaces that providers implement and
//! consumers request. A contract is a name plus an ordered list of operation
//! signatures. Contracts compose (a provider may satisfy several) but never
//! inherit from one another.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod catalog;
pub mod shape;
pub mod signature;

pub use catalog::ContractCatalog;
pub use shape::Shape;
pub use signature::OperationSignature;

/// Immutable contract descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    name: String,
    operations: Vec<OperationSignature>,
}

impl Contract {
    /// Start declaring a contract
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operations in declaration order
    pub fn operations(&self) -> &[OperationSignature] {
        &self.operations
    }

    pub fn operation(&self, name: &str) -> Option<&OperationSignature> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Check a provider's declared signatures against every operation of this contract.
    ///
    /// Returns all reasons the provider cannot stand in for the contract; an
    /// empty list means the provider is substitutable.
    pub fn mismatches(&self, provided: &[OperationSignature]) -> Vec<String> {
        let mut reasons = Vec::new();
        for required in &self.operations {
            match provided.iter().find(|p| p.name == required.name) {
                Some(signature) => {
                    if let Err(mut errs) = signature.satisfies(required) {
                        reasons.append(&mut errs);
                    }
                }
                None => reasons.push(format!("missing operation '{}'", required.name)),
            }
        }
        reasons
    }
}

/// Builder for [`Contract`]; validation happens in [`ContractBuilder::build`].
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    name: String,
    operations: Vec<OperationSignature>,
}

impl ContractBuilder {
    pub fn operation(mut self, signature: OperationSignature) -> Self {
        self.operations.push(signature);
        self
    }

    pub fn build(self) -> Result<Contract, EngineError> {
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidContract(
                "contract name cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for op in &self.operations {
            if op.name.trim().is_empty() {
                return Err(EngineError::InvalidContract(format!(
                    "contract '{}' declares an operation with an empty name",
                    self.name
                )));
            }
            if !seen.insert(op.name.as_str()) {
                return Err(EngineError::DuplicateOperation {
                    contract: self.name.clone(),
                    operation: op.name.clone(),
                });
            }
        }

        Ok(Contract {
            name: self.name,
            operations: self.operations,
        })
    }
}
