//! In-memory ordered store.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard};

use futures::stream::{self, StreamExt};

use crate::storage::store::{KeyRange, KeyStream, KeyValueStore, StoreError};

/// A `BTreeMap`-backed store.
///
/// Scans observe a snapshot of the keys taken when the scan starts, so a
/// concurrent write never shows up halfway through an iteration.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given entries.
    #[must_use]
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Get the number of entries.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    /// Check if the store has no entries.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.entries.read().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert entries, overwriting existing keys.
    pub(crate) fn insert_all(&self, batch: Vec<(String, String)>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.extend(batch);
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn scan(&self, range: &KeyRange) -> KeyStream<'_> {
        match self.read() {
            Ok(entries) => {
                let keys = collect_range(&entries, range);
                stream::iter(keys.into_iter().map(Ok)).boxed()
            }
            Err(e) => stream::once(async move { Err::<String, StoreError>(e) }).boxed(),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn write_batch(&self, entries: Vec<(String, String)>) -> Result<(), StoreError> {
        self.insert_all(entries)
    }
}

/// Collect the keys of `entries` that fall inside `range`, in order.
pub(crate) fn collect_range(entries: &BTreeMap<String, String>, range: &KeyRange) -> Vec<String> {
    if range.is_empty() {
        return Vec::new();
    }
    entries
        .range::<str, _>((
            Bound::Included(range.lower.as_str()),
            Bound::Included(range.upper.as_str()),
        ))
        .map(|(key, _)| key.clone())
        .collect()
}
