//! Field selection shared by the restore and persist paths.
//!
//! DESIGN
//! ======
//! `include` and `exclude` are one tagged variant, so "both supplied" cannot
//! be expressed. One filter governs both directions: the values watched and
//! written on persist, and the entries applied on restore.

use crate::bridge::FieldValues;
use crate::record::TIMESTAMP_FIELD;

/// Ordered, de-duplicated field names. First occurrence wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSet {
    names: Vec<String>,
}

impl FieldSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` unless already present. Returns whether it was added.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Which fields a controller watches, writes, and restores.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldFilter {
    /// Every field the bridge reports.
    #[default]
    All,
    /// Only the named fields.
    Include(FieldSet),
    /// Every field except the named ones.
    Exclude(FieldSet),
}

impl FieldFilter {
    /// Whether `name` passes the filter. The reserved timestamp key never does.
    #[must_use]
    pub fn admits(&self, name: &str) -> bool {
        if name == TIMESTAMP_FIELD {
            return false;
        }
        match self {
            Self::All => true,
            Self::Include(set) => set.contains(name),
            Self::Exclude(set) => !set.contains(name),
        }
    }

    /// Names to scope the bridge watch to, or `None` to watch everything.
    #[must_use]
    pub fn watch_names(&self) -> Option<&[String]> {
        match self {
            Self::Include(set) => Some(set.as_slice()),
            Self::All | Self::Exclude(_) => None,
        }
    }

    /// Drop every entry the filter does not admit.
    #[must_use]
    pub fn retain(&self, mut values: FieldValues) -> FieldValues {
        values.retain(|name, _| self.admits(name));
        values
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
