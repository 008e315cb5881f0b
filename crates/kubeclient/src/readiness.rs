//! Readiness predicates over a resource's JSON state.
//!
//! Each predicate looks only at the fields it needs and treats a missing
//! field as "not ready".

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Layout of `.metadata.creationTimestamp` once punctuation is stripped.
const COMPACT_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

fn status_int(state: &Value, field: &str) -> Option<i64> {
    state.get("status")?.get(field)?.as_i64()
}

/// Deployment: `.status.replicas` and `.status.readyReplicas` present and equal.
pub fn deployment_ready(state: &Value) -> bool {
    match (
        status_int(state, "replicas"),
        status_int(state, "readyReplicas"),
    ) {
        (Some(replicas), Some(ready)) => replicas == ready,
        _ => false,
    }
}

/// Pod: every entry of `.status.containerStatuses` has `ready: true`.
///
/// A pod that reports no container statuses yet is not ready.
pub fn pod_ready(state: &Value) -> bool {
    state
        .get("status")
        .and_then(|status| status.get("containerStatuses"))
        .and_then(Value::as_array)
        .is_some_and(|statuses| {
            statuses
                .iter()
                .all(|s| s.get("ready").and_then(Value::as_bool).unwrap_or(false))
        })
}

/// Stateful set: `.status.currentReplicas` matches `.status.replicas`.
///
/// With `expected` set, both must also equal it; `None` means any count.
pub fn stateful_set_ready(state: &Value, expected: Option<u32>) -> bool {
    let (Some(replicas), Some(current)) = (
        status_int(state, "replicas"),
        status_int(state, "currentReplicas"),
    ) else {
        return false;
    };

    match expected {
        Some(expected) => {
            let expected = i64::from(expected);
            replicas == expected && current == expected
        }
        None => replicas == current,
    }
}

/// Parse a timestamp such as `2018-03-20T10:15:30Z` by stripping punctuation
/// and reading the compact `yyyyMMddTHHmmssZ` form as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let compact: String = raw.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    NaiveDateTime::parse_from_str(&compact, COMPACT_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::InvalidState(format!("unparsable timestamp {raw:?}: {e}")))
}

/// Read and parse `.metadata.creationTimestamp`.
pub fn creation_timestamp(state: &Value) -> Result<DateTime<Utc>> {
    let raw = state
        .pointer("/metadata/creationTimestamp")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidState("missing .metadata.creationTimestamp".to_string()))?;
    parse_timestamp(raw)
}
