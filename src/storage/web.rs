//! Browser `sessionStorage` / `localStorage` via `web-sys`.
//!
//! TRADE-OFFS
//! ==========
//! JS exceptions (quota exceeded, storage disabled by privacy settings) are
//! flattened into [`StorageError::Unavailable`] with their debug rendering;
//! the original `JsValue` is not kept.

use super::StoragePort;
use crate::error::{StorageError, StorageOp};

#[derive(Clone, Debug)]
pub struct WebStorage {
    storage: web_sys::Storage,
}

impl WebStorage {
    /// The window's `sessionStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when there is no window or the
    /// browser refuses access.
    pub fn session() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::unavailable(StorageOp::Open, "", "no window"))?;
        let storage = window
            .session_storage()
            .map_err(|e| StorageError::unavailable(StorageOp::Open, "", format!("{e:?}")))?
            .ok_or_else(|| StorageError::unavailable(StorageOp::Open, "", "sessionStorage unavailable"))?;
        Ok(Self { storage })
    }

    /// The window's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when there is no window or the
    /// browser refuses access.
    pub fn local() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::unavailable(StorageOp::Open, "", "no window"))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::unavailable(StorageOp::Open, "", format!("{e:?}")))?
            .ok_or_else(|| StorageError::unavailable(StorageOp::Open, "", "localStorage unavailable"))?;
        Ok(Self { storage })
    }

    #[must_use]
    pub fn from_storage(storage: web_sys::Storage) -> Self {
        Self { storage }
    }
}

impl StoragePort for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::unavailable(StorageOp::Get, key, format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::unavailable(StorageOp::Set, key, format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::unavailable(StorageOp::Remove, key, format!("{e:?}")))
    }
}
