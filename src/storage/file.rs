//! Filesystem-backed storage: one file per key under a base directory.
//!
//! DESIGN
//! ======
//! Keys are percent-encoded into file names so any key maps to exactly one
//! file inside `base`. Writes go to a temporary sibling and are renamed into
//! place, so a crash mid-write never leaves a truncated record behind.

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::StoragePort;
use crate::error::{StorageError, StorageOp};

#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `base`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Init`] when the directory cannot be created.
    pub fn new(base: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base = base.into();
        fs::create_dir_all(&base).map_err(|e| StorageError::init(&base, e))?;
        Ok(Self { base })
    }

    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{}.json", encode_key(key)))
    }
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io(StorageOp::Get, key, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StorageError::io(StorageOp::Set, key, e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::io(StorageOp::Set, key, e))?;
        debug!(key, path = %path.display(), bytes = value.len(), "file storage write");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::io(StorageOp::Remove, key, err)),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl super::AsyncStoragePort for FileStorage {
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

/// Percent-encode every byte outside `[A-Za-z0-9_-]`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
