//! Contract-to-key bindings.
//!
//! A binding names the key a deployment wants behind a contract, so consumers
//! can ask for "the configured `RateApplier`" without hard-coding a provider.
//!
//! Contract names are matched case-insensitively. The `config` crate folds
//! table keys to lower case when reading files and environment variables, so
//! `[bindings] RateApplier = "standard"` arrives as `rateapplier`; folding
//! on both `bind` and `key_for` makes either spelling resolve.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Bindings {
    by_contract: BTreeMap<String, String>,
}

fn fold(contract: &str) -> String {
    contract.to_lowercase()
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `contract` to `key`, returning the previous key if one was bound.
    pub fn bind(&mut self, contract: impl AsRef<str>, key: impl Into<String>) -> Option<String> {
        self.by_contract.insert(fold(contract.as_ref()), key.into())
    }

    pub fn unbind(&mut self, contract: &str) -> Option<String> {
        self.by_contract.remove(&fold(contract))
    }

    pub fn key_for(&self, contract: &str) -> Option<&str> {
        self.by_contract.get(&fold(contract)).map(String::as_str)
    }

    /// Bound pairs, contract names in folded form
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.by_contract
            .iter()
            .map(|(contract, key)| (contract.as_str(), key.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_contract.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_contract.is_empty()
    }
}

impl FromIterator<(String, String)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            by_contract: iter
                .into_iter()
                .map(|(contract, key)| (fold(&contract), key))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for Bindings {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Bindings> for BTreeMap<String, String> {
    fn from(bindings: Bindings) -> Self {
        bindings.by_contract
    }
}
