//! Field Bridge: the seam onto the host's form-state manager.
//!
//! SYSTEM CONTEXT
//! ==============
//! The form-state manager owns live field values. The controller only reads
//! them through `watch` and writes restored values back through `set_value`;
//! it never caches values between events.

mod memory;

use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use memory::{FieldState, MemoryForm};

/// Field name to value mapping as read from the form or a stored record.
pub type FieldValues = Map<String, Value>;

/// Behavioral flags forwarded to the form when a value is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetValueOptions {
    /// Run field validation after setting.
    pub validate: bool,
    /// Mark the field dirty.
    pub dirty: bool,
    /// Mark the field touched.
    pub touch: bool,
}

/// Read/write access to a form's field values.
pub trait FieldBridge {
    /// Current values of `names`, or of every field when `None`.
    /// Names the form does not know are omitted.
    fn watch(&self, names: Option<&[String]>) -> FieldValues;

    /// Set one field's value, applying `options`.
    fn set_value(&self, name: &str, value: Value, options: SetValueOptions);
}

impl<T: FieldBridge + ?Sized> FieldBridge for &T {
    fn watch(&self, names: Option<&[String]>) -> FieldValues {
        (**self).watch(names)
    }

    fn set_value(&self, name: &str, value: Value, options: SetValueOptions) {
        (**self).set_value(name, value, options);
    }
}

impl<T: FieldBridge + ?Sized> FieldBridge for Rc<T> {
    fn watch(&self, names: Option<&[String]>) -> FieldValues {
        (**self).watch(names)
    }

    fn set_value(&self, name: &str, value: Value, options: SetValueOptions) {
        (**self).set_value(name, value, options);
    }
}

impl<T: FieldBridge + ?Sized> FieldBridge for Arc<T> {
    fn watch(&self, names: Option<&[String]>) -> FieldValues {
        (**self).watch(names)
    }

    fn set_value(&self, name: &str, value: Value, options: SetValueOptions) {
        (**self).set_value(name, value, options);
    }
}
