//! In-memory form state implementing [`FieldBridge`].
//!
//! DESIGN
//! ======
//! Cloneable handle over `Arc<Mutex<..>>`, so a host can hand one clone to a
//! controller and keep another to feed user input. `input` reports whether a
//! value actually changed, which is the signal a host uses to dispatch
//! `PersistEvent::ValuesChanged`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FieldBridge, FieldValues, SetValueOptions};

/// Per-field state tracked by [`MemoryForm`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    pub value: Value,
    pub dirty: bool,
    pub touched: bool,
    /// Number of times validation was requested for this field.
    pub validations: u32,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryForm {
    inner: Arc<Mutex<BTreeMap<String, FieldState>>>,
}

impl MemoryForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Form with `names` registered, each defaulting to an empty string.
    #[must_use]
    pub fn with_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let form = Self::new();
        for name in names {
            form.register(name, Value::String(String::new()));
        }
        form
    }

    /// Register a field with a default value. Existing fields are left alone.
    pub fn register(&self, name: impl Into<String>, default: Value) {
        let mut fields = self.lock();
        fields
            .entry(name.into())
            .or_insert_with(|| FieldState { value: default, ..FieldState::default() });
    }

    /// Apply a user edit: sets the value and marks the field dirty.
    /// Returns `false` when the value was already equal.
    pub fn input(&self, name: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        let mut fields = self.lock();
        let field = fields.entry(name.to_owned()).or_default();
        if field.value == value {
            return false;
        }
        field.value = value;
        field.dirty = true;
        true
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldState> {
        self.lock().get(name).cloned()
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<Value> {
        self.lock().get(name).map(|f| f.value.clone())
    }

    /// Snapshot of every field value.
    #[must_use]
    pub fn values(&self) -> FieldValues {
        self.watch(None)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, FieldState>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FieldBridge for MemoryForm {
    fn watch(&self, names: Option<&[String]>) -> FieldValues {
        let fields = self.lock();
        match names {
            None => fields.iter().map(|(k, f)| (k.clone(), f.value.clone())).collect(),
            Some(names) => names
                .iter()
                .filter_map(|name| fields.get(name).map(|f| (name.clone(), f.value.clone())))
                .collect(),
        }
    }

    fn set_value(&self, name: &str, value: Value, options: SetValueOptions) {
        let mut fields = self.lock();
        let field = fields.entry(name.to_owned()).or_default();
        field.value = value;
        if options.dirty {
            field.dirty = true;
        }
        if options.touch {
            field.touched = true;
        }
        if options.validate {
            field.validations += 1;
        }
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
