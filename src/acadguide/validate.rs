//! Record validation.
//!
//! Every record entering either tier passes through [`is_valid`]. Validation
//! never raises: a malformed record is dropped (and logged), never surfaced
//! as an error to the caller. Departments and courses get shape checks on
//! their required fields; everything else only needs a non-empty string `id`.
//! All records must additionally survive a lossless JSON round trip.

use crate::model::Collection;
use log::warn;
use serde_json::Value;

/// Decides whether `record` is well-formed for `collection`.
pub fn is_valid(record: &Value, collection: Collection) -> bool {
    match collection {
        Collection::Departments => is_valid_department(record),
        Collection::Courses => is_valid_course(record),
        _ => is_valid_generic(record, collection),
    }
}

fn is_valid_department(record: &Value) -> bool {
    record.is_object()
        && has_non_empty_str(record, "id")
        && has_non_empty_str(record, "name")
        && has_non_empty_str(record, "code")
        && survives_round_trip(record, "department")
}

fn is_valid_course(record: &Value) -> bool {
    record.is_object()
        && has_non_empty_str(record, "id")
        && has_non_empty_str(record, "name")
        && has_non_empty_str(record, "departmentId")
        && survives_round_trip(record, "course")
}

fn is_valid_generic(record: &Value, collection: Collection) -> bool {
    record.is_object()
        && has_non_empty_str(record, "id")
        && survives_round_trip(record, collection.as_str())
}

fn has_non_empty_str(record: &Value, field: &str) -> bool {
    record
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

fn survives_round_trip(record: &Value, what: &str) -> bool {
    match serde_json::to_string(record) {
        Ok(text) => serde_json::from_str::<Value>(&text).is_ok(),
        Err(err) => {
            warn!("{what} validation failed for {}: {err}", record_id(record).unwrap_or("?"));
            false
        }
    }
}

/// The record's `id` field, if it is a string.
pub(crate) fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Keeps the valid subset of `records`, logging how many were dropped.
pub(crate) fn filter_valid(collection: Collection, records: &[Value]) -> Vec<Value> {
    let kept: Vec<Value> = records
        .iter()
        .filter(|r| is_valid(r, collection))
        .cloned()
        .collect();
    if kept.len() < records.len() {
        warn!(
            "filtered out {} invalid {collection} records",
            records.len() - kept.len()
        );
    }
    kept
}
