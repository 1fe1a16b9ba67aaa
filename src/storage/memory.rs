//! In-memory storage.
//!
//! DESIGN
//! ======
//! `HashMap<String, String>` behind `Arc<Mutex<..>>`; clones share the map.
//! `session()` hands out the one process-wide instance, standing in for a
//! browser session store on native targets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use super::{AsyncStoragePort, StoragePort};
use crate::error::StorageError;

static SESSION: OnceLock<MemoryStorage> = OnceLock::new();

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// A fresh, private store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the process-wide session store.
    #[must_use]
    pub fn session() -> Self {
        SESSION.get_or_init(Self::new).clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl AsyncStoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        StoragePort::get(self, key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        StoragePort::set(self, key, value)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        StoragePort::remove(self, key)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
