//! Persist in-progress form field values to a key-value store and restore
//! them when the form comes back.
//!
//! A [`PersistController`] sits between a form (reached through a
//! [`FieldBridge`]) and a store (a [`StoragePort`]). The host feeds it
//! [`PersistEvent`]s; it restores once per key, writes the filtered values as
//! a JSON object on every change, and discards records older than the
//! configured timeout. [`AsyncPersistController`] does the same over an
//! [`AsyncStoragePort`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | Sync and async controllers, events, outcomes |
//! | [`config`] | [`PersistOptions`] builder and environment overrides |
//! | [`filter`] | Include/exclude field filtering |
//! | [`record`] | Stored JSON record and `_timestamp` expiry |
//! | [`bridge`] | Field Bridge trait and an in-memory form |
//! | [`storage`] | Storage Port traits and memory, file, and browser stores |
//! | [`lifecycle`] | Disposal latch |
//! | [`clock`] | Wall-clock source, swappable in tests |
//! | [`error`] | Error enums and stable error codes |

pub mod bridge;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod record;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use bridge::{FieldBridge, FieldState, FieldValues, MemoryForm, SetValueOptions};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PersistOptions;
pub use controller::{
    AsyncPersistController, EventOutcome, PersistController, PersistEvent, PersistOutcome, RestoreOutcome,
};
pub use error::{ErrorCode, PersistError, RecordError, StorageError, StorageOp};
pub use filter::{FieldFilter, FieldSet};
pub use lifecycle::DisposeHandle;
pub use record::{PersistedRecord, TIMESTAMP_FIELD};
pub use storage::{AsyncStoragePort, FileStorage, MemoryStorage, StoragePort, default_storage};
#[cfg(feature = "web")]
pub use storage::WebStorage;
