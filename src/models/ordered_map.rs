//! Name-keyed map that remembers insertion order.
//!
//! Behaviors and macros are referenced by position in the generated Vial file
//! (`M0`, `M1`, ...), so lookups by name must agree with the order in which
//! names were first seen.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Insertion-ordered map from names to values with an index lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value and returns its index.
    ///
    /// Re-inserting an existing name replaces the value in place; the name
    /// keeps the index it was first given.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> usize {
        let name = name.into();
        if let Some(&idx) = self.index.get(&name) {
            self.entries[idx].1 = value;
            return idx;
        }

        let idx = self.entries.len();
        self.index.insert(name.clone(), idx);
        self.entries.push((name, value));
        idx
    }

    /// Gets a value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.index.get(name).map(|&idx| &self.entries[idx].1)
    }

    /// Gets the insertion index of a name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Gets the entry at an index.
    #[must_use]
    pub fn get_index(&self, idx: usize) -> Option<(&str, &V)> {
        self.entries
            .get(idx)
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Checks whether a name is present.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
