//! Operation signatures and the provider-vs-contract compatibility check.

use crate::contract::shape::Shape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name, input/output shapes and declared failure conditions of one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSignature {
    pub name: String,
    pub input: Shape,
    pub output: Shape,
    #[serde(default)]
    pub failures: BTreeSet<String>,
}

impl OperationSignature {
    pub fn new(name: impl Into<String>, input: Shape, output: Shape) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            failures: BTreeSet::new(),
        }
    }

    /// Declare a failure condition this operation may report.
    pub fn fails_with(mut self, condition: impl Into<String>) -> Self {
        self.failures.insert(condition.into());
        self
    }

    /// Check that `self` (a provider's signature) can stand in for `required`.
    ///
    /// Inputs are contravariant, outputs covariant, and the failure set may only
    /// shrink. Returns every violated rule.
    pub fn satisfies(&self, required: &OperationSignature) -> Result<(), Vec<String>> {
        let mut reasons = Vec::new();

        if self.name != required.name {
            reasons.push(format!(
                "operation name '{}' does not match '{}'",
                self.name, required.name
            ));
        }

        if !required.input.is_subshape_of(&self.input) {
            reasons.push(format!(
                "'{}' narrows accepted input: contract takes {}, provider takes {}",
                required.name, required.input, self.input
            ));
        }

        if !self.output.is_subshape_of(&required.output) {
            reasons.push(format!(
                "'{}' widens output: contract returns {}, provider returns {}",
                required.name, required.output, self.output
            ));
        }

        let extra: Vec<&str> = self
            .failures
            .difference(&required.failures)
            .map(String::as_str)
            .collect();
        if !extra.is_empty() {
            reasons.push(format!(
                "'{}' adds undeclared failure conditions: {}",
                required.name,
                extra.join(", ")
            ));
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(reasons)
        }
    }
}
