//! Persisted record wire format.
//!
//! A record is a flat JSON object mapping field names to values, plus an
//! optional `_timestamp` (milliseconds since the Unix epoch) written when
//! expiry is enabled. The timestamp is split off on parse so it can never be
//! mistaken for a field.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::bridge::FieldValues;
use crate::error::RecordError;

/// Reserved key carrying the write time of a record.
pub const TIMESTAMP_FIELD: &str = "_timestamp";

/// Field values as stored under one key.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PersistedRecord {
    #[serde(flatten)]
    fields: FieldValues,
    #[serde(rename = "_timestamp", skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
}

impl PersistedRecord {
    /// Build an unstamped record. A `_timestamp` entry in `fields` is dropped.
    #[must_use]
    pub fn new(mut fields: FieldValues) -> Self {
        fields.remove(TIMESTAMP_FIELD);
        Self { fields, timestamp: None }
    }

    #[must_use]
    pub fn with_timestamp(mut self, now_ms: i64) -> Self {
        self.timestamp = Some(now_ms);
        self
    }

    /// Parse a stored string.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Malformed`] for invalid JSON and
    /// [`RecordError::NotAnObject`] for JSON that is not an object.
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        let Value::Object(mut fields) = serde_json::from_str::<Value>(raw)? else {
            return Err(RecordError::NotAnObject);
        };

        // EDGE: a non-numeric stamp is stripped but treated as missing.
        let timestamp = fields.remove(TIMESTAMP_FIELD).and_then(|v| timestamp_from_value(&v));
        Ok(Self { fields, timestamp })
    }

    /// Serialize to the stored string form.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> FieldValues {
        self.fields
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Age relative to `now_ms`, when stamped.
    #[must_use]
    pub fn age_ms(&self, now_ms: i64) -> Option<i64> {
        self.timestamp.map(|ts| now_ms.saturating_sub(ts))
    }

    /// True when stamped and strictly older than `timeout`.
    ///
    /// Unstamped records never expire.
    #[must_use]
    pub fn is_expired(&self, now_ms: i64, timeout: Duration) -> bool {
        let limit = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
        self.age_ms(now_ms).is_some_and(|age| age > limit)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn timestamp_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
