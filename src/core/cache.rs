//! Keyed index of materialized cards.
//!
//! The cache has no eviction policy. The reconciler decides what lives here,
//! and the cache is the only record of which cards exist.

use std::collections::HashMap;

/// O(1) lookup from record identity to its live card.
#[derive(Debug)]
pub struct ElementCache<C> {
    entries: HashMap<String, C>,
}

impl<C> ElementCache<C> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&C> {
        self.entries.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut C> {
        self.entries.get_mut(key)
    }

    /// Insert or replace, returning the previous entry.
    pub fn set(&mut self, key: impl Into<String>, element: C) -> Option<C> {
        self.entries.insert(key.into(), element)
    }

    pub fn delete(&mut self, key: &str) -> Option<C> {
        self.entries.remove(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &C)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut C)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

impl<C> Default for ElementCache<C> {
    fn default() -> Self {
        Self::new()
    }
}
