//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{KeyValueStore, StoreError};

/// A [`KeyValueStore`] backed by a shared `HashMap`.
///
/// Clones share the same map, so a test can keep one handle to inspect what
/// the cart store wrote through another. Writes can be made to fail with
/// [`MemoryStore::fail_writes`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, Vec<u8>>,
    fail_writes: bool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `value` already written under `key`.
    #[must_use]
    pub fn with_entry(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.lock().entries.insert(key.to_owned(), value.into());
        store
    }

    /// Make every subsequent `put` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// The raw bytes under `key`, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().entries.get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.raw(key))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        inner.entries.insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}
