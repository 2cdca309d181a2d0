//! Outputs already reserved by other in-flight transactions
//!
//! An [`ExclusionSet`] is built once per selection attempt from the outputs other pending
//! operations have already committed to, and is read-only afterwards. There is no way to
//! insert into or remove from a built set; a new attempt builds a new set.

use bitcoin::OutPoint;
use std::collections::HashSet;

use crate::utxo_selection::types::{OutputKey, SpendableOutput};

/// Immutable set of reserved output keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    keys: HashSet<OutputKey>,
}

impl ExclusionSet {
    /// An empty set; nothing is excluded
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the set from outputs already used elsewhere
    ///
    /// Duplicate keys collapse into one entry.
    pub fn build<'a, I>(already_used: I) -> Self
    where
        I: IntoIterator<Item = &'a SpendableOutput>,
    {
        Self {
            keys: already_used.into_iter().map(OutputKey::from).collect(),
        }
    }

    /// Build the set from bare outpoints (e.g. inputs of a pending transaction)
    pub fn from_outpoints<I>(outpoints: I) -> Self
    where
        I: IntoIterator<Item = OutPoint>,
    {
        Self {
            keys: outpoints.into_iter().map(OutputKey::from).collect(),
        }
    }

    /// Whether an output with the same key was in the build input
    pub fn contains(&self, output: &SpendableOutput) -> bool {
        self.keys.contains(&output.key())
    }

    /// Whether the given key is reserved
    pub fn contains_key(&self, key: &OutputKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of distinct reserved outputs
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing is reserved
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<'a> FromIterator<&'a SpendableOutput> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = &'a SpendableOutput>>(iter: I) -> Self {
        Self::build(iter)
    }
}
