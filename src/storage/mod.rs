//! Storage Port: key to string get/set/remove.
//!
//! SYSTEM CONTEXT
//! ==============
//! Backends are supplied by the host. Every operation is fallible and errors
//! propagate unchanged; a missing key is `Ok(None)` on `get` and a no-op on
//! `remove`, never an error.
//!
//! TRADE-OFFS
//! ==========
//! The async port is `?Send` so browser-backed futures qualify. Controllers
//! are single-threaded per form, so nothing is lost by it.

mod file;
mod memory;
#[cfg(feature = "web")]
mod web;

use std::rc::Rc;
use std::sync::Arc;

use crate::error::StorageError;

pub use file::FileStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "web")]
pub use web::WebStorage;

/// Synchronous key-value store.
pub trait StoragePort {
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend rejects the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: StoragePort + ?Sized> StoragePort for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        StoragePort::get(&**self, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        StoragePort::set(&**self, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        StoragePort::remove(&**self, key)
    }
}

impl<T: StoragePort + ?Sized> StoragePort for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        StoragePort::get(&**self, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        StoragePort::set(&**self, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        StoragePort::remove(&**self, key)
    }
}

impl<T: StoragePort + ?Sized> StoragePort for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        StoragePort::get(&**self, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        StoragePort::set(&**self, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        StoragePort::remove(&**self, key)
    }
}

/// Asynchronous key-value store, for networked or otherwise deferred backends.
#[async_trait::async_trait(?Send)]
pub trait AsyncStoragePort {
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend rejects the write.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend rejects the removal.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait::async_trait(?Send)]
impl<T: AsyncStoragePort + ?Sized> AsyncStoragePort for &T {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        AsyncStoragePort::get(&**self, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        AsyncStoragePort::set(&**self, key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        AsyncStoragePort::remove(&**self, key).await
    }
}

#[async_trait::async_trait(?Send)]
impl<T: AsyncStoragePort + ?Sized> AsyncStoragePort for Rc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        AsyncStoragePort::get(&**self, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        AsyncStoragePort::set(&**self, key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        AsyncStoragePort::remove(&**self, key).await
    }
}

#[async_trait::async_trait(?Send)]
impl<T: AsyncStoragePort + ?Sized> AsyncStoragePort for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        AsyncStoragePort::get(&**self, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        AsyncStoragePort::set(&**self, key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        AsyncStoragePort::remove(&**self, key).await
    }
}

/// Storage used when the host has no preference: the browser's
/// `sessionStorage` under the `web` feature on wasm32, otherwise the
/// process-wide [`MemoryStorage::session`].
///
/// # Errors
///
/// Under `web`, returns [`StorageError::Unavailable`] when the window or its
/// session storage cannot be reached.
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub fn default_storage() -> Result<WebStorage, StorageError> {
    WebStorage::session()
}

/// Storage used when the host has no preference: the browser's
/// `sessionStorage` under the `web` feature on wasm32, otherwise the
/// process-wide [`MemoryStorage::session`].
///
/// # Errors
///
/// Never fails on this target.
#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
#[allow(clippy::unnecessary_wraps)]
pub fn default_storage() -> Result<MemoryStorage, StorageError> {
    Ok(MemoryStorage::session())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
