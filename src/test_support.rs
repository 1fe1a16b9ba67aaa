//! Shared test doubles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

use crate::bridge::FieldValues;
use crate::config::PersistOptions;
use crate::error::{StorageError, StorageOp};
use crate::storage::{MemoryStorage, StoragePort};

/// Storage wrapper that logs every call and can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingStorage {
    pub inner: MemoryStorage,
    calls: Rc<RefCell<Vec<(StorageOp, String)>>>,
    fail_on: Rc<Cell<Option<StorageOp>>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(StorageOp, String)> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, op: StorageOp) -> usize {
        self.calls.borrow().iter().filter(|(o, _)| *o == op).count()
    }

    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn fail_on(&self, op: Option<StorageOp>) {
        self.fail_on.set(op);
    }

    /// Raw stored string, bypassing the call log.
    pub fn raw(&self, key: &str) -> Option<String> {
        StoragePort::get(&self.inner, key).expect("memory get")
    }

    /// Stored record parsed as JSON, bypassing the call log.
    pub fn json(&self, key: &str) -> Option<Value> {
        self.raw(key).map(|raw| serde_json::from_str(&raw).expect("stored json"))
    }

    pub fn seed(&self, key: &str, raw: &str) {
        StoragePort::set(&self.inner, key, raw).expect("memory set");
    }

    fn record(&self, op: StorageOp, key: &str) -> Result<(), StorageError> {
        self.calls.borrow_mut().push((op, key.to_owned()));
        if self.fail_on.get() == Some(op) {
            return Err(StorageError::unavailable(op, key, "injected failure"));
        }
        Ok(())
    }
}

impl StoragePort for RecordingStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.record(StorageOp::Get, key)?;
        StoragePort::get(&self.inner, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.record(StorageOp::Set, key)?;
        StoragePort::set(&self.inner, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.record(StorageOp::Remove, key)?;
        StoragePort::remove(&self.inner, key)
    }
}

/// Collects every `on_data_restored` payload and `on_timeout` call.
#[derive(Clone, Default)]
pub struct CallbackLog {
    pub restored: Rc<RefCell<Vec<FieldValues>>>,
    pub timeouts: Rc<Cell<usize>>,
}

impl CallbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restored_calls(&self) -> Vec<FieldValues> {
        self.restored.borrow().clone()
    }

    pub fn timeout_calls(&self) -> usize {
        self.timeouts.get()
    }

    /// Wire both callbacks of `options` into this log.
    pub fn attach(&self, options: PersistOptions) -> PersistOptions {
        let restored = Rc::clone(&self.restored);
        let timeouts = Rc::clone(&self.timeouts);
        options
            .on_data_restored(move |values| restored.borrow_mut().push(values.clone()))
            .on_timeout(move || timeouts.set(timeouts.get() + 1))
    }
}

pub fn fields(value: Value) -> FieldValues {
    value.as_object().cloned().expect("object literal")
}
