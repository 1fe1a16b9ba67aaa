//! Persistence controller: restores a form from storage once per key and
//! writes it back on every change.
//!
//! DESIGN
//! ======
//! The host drives the controller with [`PersistEvent`]s in arrival order.
//! `Mounted` and `KeyChanged` restore then persist; `ValuesChanged` persists.
//! Restoration runs at most once per (key, bridge) association and always
//! completes before the first write to a key.
//!
//! ERROR HANDLING
//! ==============
//! Storage errors propagate. Unreadable records are logged and treated as
//! absent. Callback panics unwind through the controller untouched.
//!
//! TRADE-OFFS
//! ==========
//! Identical payloads are detected by fingerprint and skipped, so a host may
//! dispatch `ValuesChanged` liberally without multiplying writes.

mod asynchronous;
mod policy;

use tracing::{debug, info};

use crate::bridge::{FieldBridge, FieldValues};
use crate::config::PersistOptions;
use crate::error::PersistError;
use crate::lifecycle::DisposeHandle;
use crate::storage::StoragePort;

use policy::RestorePlan;

pub use asynchronous::AsyncPersistController;

// =============================================================================
// EVENTS & OUTCOMES
// =============================================================================

/// Host notifications, delivered in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersistEvent {
    /// The form was mounted.
    Mounted,
    /// The storage key changed; `None` disables persistence.
    KeyChanged(Option<String>),
    /// A watched value changed.
    ValuesChanged,
    /// The form is being torn down.
    Disposed,
}

/// Result of a restore attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum RestoreOutcome {
    /// The controller was disposed; nothing was touched.
    Disposed,
    /// No key; nothing was touched.
    Disabled,
    /// This association was already restored.
    AlreadyRestored,
    /// Nothing stored under the key.
    Absent,
    /// The stored value was unreadable and ignored.
    Malformed,
    /// The stored record was past its timeout and was removed.
    Expired,
    /// These fields were applied to the form.
    Restored(FieldValues),
}

impl RestoreOutcome {
    #[must_use]
    pub fn restored(&self) -> Option<&FieldValues> {
        match self {
            Self::Restored(values) => Some(values),
            _ => None,
        }
    }
}

/// Result of a persist attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The controller was disposed; nothing was touched.
    Disposed,
    /// No key; nothing was touched.
    Disabled,
    /// The filtered values were empty; storage left as is.
    Empty,
    /// Same values as the last write; storage left as is.
    Unchanged,
    /// The record was written.
    Written,
}

/// What handling one event did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventOutcome {
    pub restore: Option<RestoreOutcome>,
    pub persist: Option<PersistOutcome>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RestoreState {
    Pending,
    Done,
}

/// `None` and the empty string both mean "no key".
fn normalize_key(key: Option<&str>) -> Option<String> {
    key.filter(|k| !k.is_empty()).map(str::to_owned)
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Synchronous persistence controller for one form.
pub struct PersistController<B, S> {
    key: Option<String>,
    bridge: B,
    storage: S,
    options: PersistOptions,
    restore_state: RestoreState,
    last_written: Option<u64>,
    lifecycle: DisposeHandle,
}

impl<B: FieldBridge, S: StoragePort> PersistController<B, S> {
    /// Build a controller. `key` of `None` (or `""`) leaves it inert.
    #[must_use]
    pub fn new(key: Option<&str>, bridge: B, storage: S, options: PersistOptions) -> Self {
        Self {
            key: normalize_key(key),
            bridge,
            storage,
            options,
            restore_state: RestoreState::Pending,
            last_written: None,
            lifecycle: DisposeHandle::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Whether events currently reach storage.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.key.is_some() && !self.lifecycle.is_disposed()
    }

    #[must_use]
    pub fn options(&self) -> &PersistOptions {
        &self.options
    }

    #[must_use]
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Handle onto the disposal latch, for hosts that tear down elsewhere.
    #[must_use]
    pub fn dispose_handle(&self) -> DisposeHandle {
        self.lifecycle.clone()
    }

    /// Apply one host event.
    ///
    /// # Errors
    ///
    /// Propagates storage and serialization failures from the operations the
    /// event triggers.
    pub fn handle(&mut self, event: PersistEvent) -> Result<EventOutcome, PersistError> {
        match event {
            PersistEvent::Mounted => self.sync_all(),
            PersistEvent::KeyChanged(key) => {
                if self.set_key(key.as_deref()) {
                    self.sync_all()
                } else {
                    Ok(EventOutcome::default())
                }
            }
            PersistEvent::ValuesChanged => Ok(EventOutcome { restore: None, persist: Some(self.persist()?) }),
            PersistEvent::Disposed => {
                self.dispose();
                Ok(EventOutcome::default())
            }
        }
    }

    fn sync_all(&mut self) -> Result<EventOutcome, PersistError> {
        let restore = self.restore()?;
        let persist = self.persist()?;
        Ok(EventOutcome { restore: Some(restore), persist: Some(persist) })
    }

    /// Restore stored values into the form, once per association.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Storage`] when reading, or removing an expired
    /// record, fails.
    pub fn restore(&mut self) -> Result<RestoreOutcome, PersistError> {
        if self.lifecycle.is_disposed() {
            return Ok(RestoreOutcome::Disposed);
        }
        let Some(key) = self.key.clone() else {
            return Ok(RestoreOutcome::Disabled);
        };
        if self.restore_state == RestoreState::Done {
            return Ok(RestoreOutcome::AlreadyRestored);
        }

        let raw = self.storage.get(&key)?;
        if self.lifecycle.is_disposed() {
            debug!(key = %key, "disposed during restore read; dropping result");
            return Ok(RestoreOutcome::Disposed);
        }
        self.restore_state = RestoreState::Done;

        match policy::plan_restore(raw, &self.options) {
            RestorePlan::Absent => {
                debug!(key = %key, "no stored form record");
                Ok(RestoreOutcome::Absent)
            }
            RestorePlan::Malformed(err) => {
                policy::log_malformed(&key, &err);
                Ok(RestoreOutcome::Malformed)
            }
            RestorePlan::Expired { age_ms } => {
                policy::log_expired(&key, age_ms, &self.options);
                policy::fire_timeout(&self.options);
                if !self.lifecycle.is_disposed() {
                    self.storage.remove(&key)?;
                }
                Ok(RestoreOutcome::Expired)
            }
            RestorePlan::Apply(values) => {
                if !policy::apply_values(&key, &self.bridge, &values, &self.options, &self.lifecycle) {
                    return Ok(RestoreOutcome::Disposed);
                }
                if !self.lifecycle.is_disposed() {
                    policy::fire_restored(&values, &self.options);
                }
                Ok(RestoreOutcome::Restored(values))
            }
        }
    }

    /// Write the current filtered values, restoring first if this
    /// association has not been restored yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Storage`] when storage fails and
    /// [`PersistError::Serialize`] when the payload cannot be encoded.
    pub fn persist(&mut self) -> Result<PersistOutcome, PersistError> {
        if self.lifecycle.is_disposed() {
            return Ok(PersistOutcome::Disposed);
        }
        let Some(key) = self.key.clone() else {
            return Ok(PersistOutcome::Disabled);
        };
        if self.restore_state == RestoreState::Pending {
            self.restore()?;
            if self.lifecycle.is_disposed() {
                return Ok(PersistOutcome::Disposed);
            }
        }

        let Some(payload) = policy::build_payload(&key, &self.bridge, &self.options)? else {
            return Ok(PersistOutcome::Empty);
        };
        if self.last_written == Some(payload.fingerprint) {
            return Ok(PersistOutcome::Unchanged);
        }

        self.storage.set(&key, &payload.json)?;
        self.last_written = Some(payload.fingerprint);
        debug!(key = %key, bytes = payload.json.len(), "persisted form record");
        Ok(PersistOutcome::Written)
    }

    /// Remove the stored record regardless of its age. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Storage`] when the removal fails.
    pub fn clear(&mut self) -> Result<(), PersistError> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        let Some(key) = self.key.as_deref() else {
            return Ok(());
        };
        self.storage.remove(key)?;
        self.last_written = None;
        info!(key = %key, "cleared form record");
        Ok(())
    }

    /// Point the controller at a different key. Returns whether it changed;
    /// a change re-arms restoration.
    pub fn set_key(&mut self, key: Option<&str>) -> bool {
        let key = normalize_key(key);
        if key == self.key {
            return false;
        }
        debug!(from = ?self.key, to = ?key, "form persistence key changed");
        self.key = key;
        self.restore_state = RestoreState::Pending;
        self.last_written = None;
        true
    }

    /// Swap in a different bridge, re-arming restoration. Returns the old one.
    pub fn rebind(&mut self, bridge: B) -> B {
        self.restore_state = RestoreState::Pending;
        self.last_written = None;
        std::mem::replace(&mut self.bridge, bridge)
    }

    /// Flip the disposal latch. Every later call is a no-op.
    pub fn dispose(&mut self) {
        self.lifecycle.dispose();
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
