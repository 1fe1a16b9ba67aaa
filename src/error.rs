//! Error taxonomy for storage access, record parsing, and controller operations.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures surface to the host unchanged. Record parse failures
//! never leave the controller; they are logged and the record is treated as
//! absent.

use std::fmt;
use std::path::PathBuf;

/// Stable machine-readable classification for errors in this crate.
pub trait ErrorCode: fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// The storage operation that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageOp {
    /// Preparing the backend before any key is touched.
    Open,
    Get,
    Set,
    Remove,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Open => "open",
            Self::Get => "get",
            Self::Set => "set",
            Self::Remove => "remove",
        };
        f.write_str(label)
    }
}

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend refused or could not perform the operation.
    #[error("storage {op} failed for key {key}: {reason}")]
    Unavailable { op: StorageOp, key: String, reason: String },

    /// Filesystem I/O failed.
    #[error("storage {op} io failed for key {key}: {source}")]
    Io {
        op: StorageOp,
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend's root location could not be prepared.
    #[error("storage root {} could not be opened: {source}", path.display())]
    Init {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    #[must_use]
    pub fn unavailable(op: StorageOp, key: &str, reason: impl Into<String>) -> Self {
        Self::Unavailable { op, key: key.to_owned(), reason: reason.into() }
    }

    #[must_use]
    pub fn io(op: StorageOp, key: &str, source: std::io::Error) -> Self {
        Self::Io { op, key: key.to_owned(), source }
    }

    #[must_use]
    pub fn init(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Init { path: path.into(), source }
    }

    /// The operation that failed.
    #[must_use]
    pub fn op(&self) -> StorageOp {
        match self {
            Self::Unavailable { op, .. } | Self::Io { op, .. } => *op,
            Self::Init { .. } => StorageOp::Open,
        }
    }
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "E_STORAGE_UNAVAILABLE",
            Self::Io { .. } => "E_STORAGE_IO",
            Self::Init { .. } => "E_STORAGE_INIT",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Io { source, .. } | Self::Init { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ),
            Self::Unavailable { .. } => false,
        }
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// A stored value could not be read back as a record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("stored record is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("stored record is not a JSON object")]
    NotAnObject,
}

impl ErrorCode for RecordError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "E_RECORD_MALFORMED",
            Self::NotAnObject => "E_RECORD_NOT_OBJECT",
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Errors returned by controller operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ErrorCode for PersistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(err) => err.error_code(),
            Self::Serialize(_) => "E_SERIALIZE",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Storage(err) => err.retryable(),
            Self::Serialize(_) => false,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
