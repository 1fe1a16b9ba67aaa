//! Controller options.
//!
//! DESIGN
//! ======
//! Options are built once and moved into the controller, which exposes no
//! setters. Filter lists therefore cannot change under a live controller;
//! a new filter means a new controller.
//!
//! Environment:
//! - `FORM_PERSIST_TIMEOUT_MS`: expiry window, `0` or unset disables expiry
//! - `FORM_PERSIST_VALIDATE`: request validation on restore (default false)
//! - `FORM_PERSIST_DIRTY`: mark restored fields dirty (default false)
//! - `FORM_PERSIST_TOUCH`: mark restored fields touched (default false)

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::bridge::{FieldValues, SetValueOptions};
use crate::clock::{Clock, SystemClock};
use crate::filter::{FieldFilter, FieldSet};

/// Invoked once with the fields a restore applied.
pub type RestoredCallback = Box<dyn Fn(&FieldValues)>;
/// Invoked when a stored record is discarded as expired.
pub type TimeoutCallback = Box<dyn Fn()>;

/// Options snapshot owned by a controller.
pub struct PersistOptions {
    pub(crate) filter: FieldFilter,
    pub(crate) set_value: SetValueOptions,
    pub(crate) timeout: Option<Duration>,
    pub(crate) on_data_restored: Option<RestoredCallback>,
    pub(crate) on_timeout: Option<TimeoutCallback>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            filter: FieldFilter::All,
            set_value: SetValueOptions::default(),
            timeout: None,
            on_data_restored: None,
            on_timeout: None,
            clock: Arc::new(SystemClock),
        }
    }
}

impl fmt::Debug for PersistOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistOptions")
            .field("filter", &self.filter)
            .field("set_value", &self.set_value)
            .field("timeout", &self.timeout)
            .field("on_data_restored", &self.on_data_restored.is_some())
            .field("on_timeout", &self.on_timeout.is_some())
            .finish_non_exhaustive()
    }
}

impl PersistOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed flags and timeout from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Seed flags and timeout from an arbitrary variable source.
    /// Unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timeout_ms: u64 = lookup_parse(&lookup, "FORM_PERSIST_TIMEOUT_MS", 0);
        Self::new()
            .timeout(Duration::from_millis(timeout_ms))
            .validate(lookup_parse(&lookup, "FORM_PERSIST_VALIDATE", false))
            .dirty(lookup_parse(&lookup, "FORM_PERSIST_DIRTY", false))
            .touch(lookup_parse(&lookup, "FORM_PERSIST_TOUCH", false))
    }

    /// Restrict watching and restoring to `names`. Replaces any exclude list.
    #[must_use]
    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = FieldFilter::Include(names.into_iter().collect::<FieldSet>());
        self
    }

    /// Omit `names` from watching and restoring. Replaces any include list.
    #[must_use]
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = FieldFilter::Exclude(names.into_iter().collect::<FieldSet>());
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn validate(mut self, validate: bool) -> Self {
        self.set_value.validate = validate;
        self
    }

    #[must_use]
    pub fn dirty(mut self, dirty: bool) -> Self {
        self.set_value.dirty = dirty;
        self
    }

    #[must_use]
    pub fn touch(mut self, touch: bool) -> Self {
        self.set_value.touch = touch;
        self
    }

    /// Enable expiry. A zero duration disables it.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    #[must_use]
    pub fn on_data_restored(mut self, callback: impl Fn(&FieldValues) + 'static) -> Self {
        self.on_data_restored = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_timeout(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_timeout = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    #[must_use]
    pub fn field_filter(&self) -> &FieldFilter {
        &self.filter
    }

    #[must_use]
    pub fn set_value_options(&self) -> SetValueOptions {
        self.set_value
    }

    #[must_use]
    pub fn expiry(&self) -> Option<Duration> {
        self.timeout
    }
}

fn lookup_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
