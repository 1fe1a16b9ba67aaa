//! Persistence controller over an [`AsyncStoragePort`].
//!
//! Same policy as [`PersistController`](super::PersistController). The
//! disposal latch is checked again after every storage await, so a form torn
//! down while a read is in flight is never mutated and its callbacks never
//! fire. Dropping a `restore` future before the read resolves leaves the
//! association unrestored; the next persist restores first.

use tracing::{debug, info};

use super::policy::{self, RestorePlan};
use super::{EventOutcome, PersistEvent, PersistOutcome, RestoreOutcome, RestoreState, normalize_key};
use crate::bridge::FieldBridge;
use crate::config::PersistOptions;
use crate::error::PersistError;
use crate::lifecycle::DisposeHandle;
use crate::storage::AsyncStoragePort;

/// Asynchronous persistence controller for one form.
pub struct AsyncPersistController<B, S> {
    key: Option<String>,
    bridge: B,
    storage: S,
    options: PersistOptions,
    restore_state: RestoreState,
    last_written: Option<u64>,
    lifecycle: DisposeHandle,
}

impl<B: FieldBridge, S: AsyncStoragePort> AsyncPersistController<B, S> {
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

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.key.is_some() && !self.lifecycle.is_disposed()
    }

    #[must_use]
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Handle onto the disposal latch. Flipping it while an operation is
    /// suspended makes that operation finish without side effects.
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
    pub async fn handle(&mut self, event: PersistEvent) -> Result<EventOutcome, PersistError> {
        match event {
            PersistEvent::Mounted => self.sync_all().await,
            PersistEvent::KeyChanged(key) => {
                if self.set_key(key.as_deref()) {
                    self.sync_all().await
                } else {
                    Ok(EventOutcome::default())
                }
            }
            PersistEvent::ValuesChanged => Ok(EventOutcome { restore: None, persist: Some(self.persist().await?) }),
            PersistEvent::Disposed => {
                self.dispose();
                Ok(EventOutcome::default())
            }
        }
    }

    async fn sync_all(&mut self) -> Result<EventOutcome, PersistError> {
        let restore = self.restore().await?;
        let persist = self.persist().await?;
        Ok(EventOutcome { restore: Some(restore), persist: Some(persist) })
    }

    /// Restore stored values into the form, once per association.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Storage`] when reading, or removing an expired
    /// record, fails.
    pub async fn restore(&mut self) -> Result<RestoreOutcome, PersistError> {
        if self.lifecycle.is_disposed() {
            return Ok(RestoreOutcome::Disposed);
        }
        let Some(key) = self.key.clone() else {
            return Ok(RestoreOutcome::Disabled);
        };
        if self.restore_state == RestoreState::Done {
            return Ok(RestoreOutcome::AlreadyRestored);
        }

        let raw = self.storage.get(&key).await?;
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
                    self.storage.remove(&key).await?;
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

    /// Write the current filtered values, restoring first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Storage`] when storage fails and
    /// [`PersistError::Serialize`] when the payload cannot be encoded.
    pub async fn persist(&mut self) -> Result<PersistOutcome, PersistError> {
        if self.lifecycle.is_disposed() {
            return Ok(PersistOutcome::Disposed);
        }
        let Some(key) = self.key.clone() else {
            return Ok(PersistOutcome::Disabled);
        };
        if self.restore_state == RestoreState::Pending {
            self.restore().await?;
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

        self.storage.set(&key, &payload.json).await?;
        self.last_written = Some(payload.fingerprint);
        debug!(key = %key, bytes = payload.json.len(), "persisted form record");
        Ok(PersistOutcome::Written)
    }

    /// Remove the stored record regardless of its age. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Storage`] when the removal fails.
    pub async fn clear(&mut self) -> Result<(), PersistError> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        let Some(key) = self.key.clone() else {
            return Ok(());
        };
        self.storage.remove(&key).await?;
        self.last_written = None;
        info!(key = %key, "cleared form record");
        Ok(())
    }

    /// Point the controller at a different key. Returns whether it changed.
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

    pub fn dispose(&mut self) {
        self.lifecycle.dispose();
    }
}

#[cfg(test)]
#[path = "asynchronous_test.rs"]
mod tests;
