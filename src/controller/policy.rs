//! Storage-independent halves of restore and persist.
//!
//! Both controllers fetch and write through their own port flavor and defer
//! every decision in between to these functions, so sync and async hosts
//! observe identical policy.

use std::hash::{DefaultHasher, Hash, Hasher};

use tracing::{debug, info, warn};

use crate::bridge::{FieldBridge, FieldValues};
use crate::config::PersistOptions;
use crate::error::{ErrorCode, RecordError};
use crate::lifecycle::DisposeHandle;
use crate::record::PersistedRecord;

/// What a restore should do with the raw value read from storage.
#[derive(Debug)]
pub(crate) enum RestorePlan {
    Absent,
    Malformed(RecordError),
    Expired { age_ms: i64 },
    Apply(FieldValues),
}

pub(crate) fn plan_restore(raw: Option<String>, options: &PersistOptions) -> RestorePlan {
    let Some(raw) = raw else {
        return RestorePlan::Absent;
    };
    let record = match PersistedRecord::parse(&raw) {
        Ok(record) => record,
        Err(err) => return RestorePlan::Malformed(err),
    };

    if let Some(timeout) = options.timeout {
        let now = options.clock.now_ms();
        if record.is_expired(now, timeout) {
            return RestorePlan::Expired { age_ms: record.age_ms(now).unwrap_or_default() };
        }
    }

    RestorePlan::Apply(options.filter.retain(record.into_fields()))
}

pub(crate) fn log_malformed(key: &str, err: &RecordError) {
    warn!(key, error = %err, code = err.error_code(), "stored form record unreadable; treating as absent");
}

pub(crate) fn log_expired(key: &str, age_ms: i64, options: &PersistOptions) {
    let timeout_ms = options.timeout.map(|t| t.as_millis()).unwrap_or_default();
    info!(key, age_ms, timeout_ms = %timeout_ms, "stored form record expired; discarding");
}

pub(crate) fn fire_timeout(options: &PersistOptions) {
    if let Some(callback) = &options.on_timeout {
        callback();
    }
}

/// Push restored values into the form, one `set_value` per field.
/// Stops at the first field after `lifecycle` flips; returns whether every
/// field was applied.
pub(crate) fn apply_values<B: FieldBridge>(
    key: &str,
    bridge: &B,
    values: &FieldValues,
    options: &PersistOptions,
    lifecycle: &DisposeHandle,
) -> bool {
    for (applied, (name, value)) in values.iter().enumerate() {
        if lifecycle.is_disposed() {
            debug!(key, applied, remaining = values.len() - applied, "disposed while restoring; stopping");
            return false;
        }
        bridge.set_value(name, value.clone(), options.set_value);
    }
    info!(key, count = values.len(), "restored form fields");
    true
}

pub(crate) fn fire_restored(values: &FieldValues, options: &PersistOptions) {
    if let Some(callback) = &options.on_data_restored {
        callback(values);
    }
}

/// Serialized record ready to write, with the fingerprint of its fields.
#[derive(Debug)]
pub(crate) struct Payload {
    pub(crate) json: String,
    pub(crate) fingerprint: u64,
}

/// Read, filter, and stamp the watched values.
/// `Ok(None)` means nothing to write.
pub(crate) fn build_payload<B: FieldBridge>(
    key: &str,
    bridge: &B,
    options: &PersistOptions,
) -> Result<Option<Payload>, serde_json::Error> {
    let watched = bridge.watch(options.filter.watch_names());
    let values = options.filter.retain(watched);
    if values.is_empty() {
        debug!(key, "no watched values; skipping write");
        return Ok(None);
    }

    let record = PersistedRecord::new(values);
    let fingerprint = fingerprint(record.fields())?;
    let record = match options.timeout {
        Some(_) => record.with_timestamp(options.clock.now_ms()),
        None => record,
    };

    Ok(Some(Payload { json: record.to_json()?, fingerprint }))
}

// Only this hash of the last payload is kept; field values never outlive
// the event that read them.
fn fingerprint(fields: &FieldValues) -> Result<u64, serde_json::Error> {
    let canonical = serde_json::to_string(fields)?;
    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    Ok(hasher.finish())
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;
