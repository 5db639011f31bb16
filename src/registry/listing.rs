//! Key listings for introspection.

use std::slice;

/// Snapshot of the keys registered against one contract, sorted.
///
/// Finite and restartable: iterate it as many times as needed. Taken under
/// the registry read lock, so it never reflects a half-applied registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyListing {
    contract: String,
    keys: Vec<String>,
}

impl KeyListing {
    pub(crate) fn new(contract: impl Into<String>, mut keys: Vec<String>) -> Self {
        keys.sort();
        Self {
            contract: contract.into(),
            keys,
        }
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.binary_search_by(|k| k.as_str().cmp(key)).is_ok()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.keys
    }
}

impl<'a> IntoIterator for &'a KeyListing {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl IntoIterator for KeyListing {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}
