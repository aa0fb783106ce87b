//! Shared in-memory record cache.
//!
//! The cache is owned and mutated by the surrounding data layer (local edits
//! and post-resync merges); the realtime layer only reads it to judge
//! staleness. Handles are cheap clones over the same underlying list.

use std::sync::{Arc, PoisonError, RwLock};

use crate::models::StreamRecord;

/// Shared handle to one stream's locally cached records.
#[derive(Debug)]
pub struct LocalCache<R> {
    records: Arc<RwLock<Vec<R>>>,
}

impl<R> Clone for LocalCache<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R> Default for LocalCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> LocalCache<R> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a cache seeded with the given records.
    #[must_use]
    pub fn from_records(records: Vec<R>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Number of cached records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Replace the full record list, typically after a resync fetch.
    pub fn replace_all(&self, records: Vec<R>) {
        *self.write() = records;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<R>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<R>> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: StreamRecord> LocalCache<R> {
    /// Find the cached record with the given natural key.
    #[must_use]
    pub fn lookup(&self, key: &R::Key) -> Option<R> {
        self.read().iter().find(|record| record.key() == *key).cloned()
    }

    /// Check whether a record with the given key is cached.
    #[must_use]
    pub fn contains(&self, key: &R::Key) -> bool {
        self.read().iter().any(|record| record.key() == *key)
    }

    /// Copy of the full record list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<R> {
        self.read().clone()
    }

    /// Insert a record, replacing any existing record with the same key.
    pub fn upsert(&self, record: R) {
        let mut records = self.write();
        let key = record.key();
        if let Some(existing) = records.iter_mut().find(|existing| existing.key() == key) {
            *existing = record;
        } else {
            records.push(record);
        }
    }

    /// Remove and return the record with the given key, if cached.
    pub fn remove(&self, key: &R::Key) -> Option<R> {
        let mut records = self.write();
        let index = records.iter().position(|record| record.key() == *key)?;
        Some(records.remove(index))
    }
}
