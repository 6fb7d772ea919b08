//! Entities returned by the API.
//!
//! # Design
//! The remote service owns the schema, so entities stay untyped JSON objects.
//! The client only ever reads a project's `id` and `name`; everything else is
//! passed through to the caller untouched.

use serde_json::{Map, Value};

/// One JSON object from a response array.
pub type Record = Map<String, Value>;

pub type Project = Record;
pub type Context = Record;
pub type Task = Record;

/// Render a scalar field the way it would appear in a URL segment.
///
/// Ids come back as strings from the public API and as numbers from some
/// mirrors; both render to the same text.
pub fn field_text(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Split a decoded body into records.
///
/// Returns `None` unless the value is an array whose every element is an
/// object.
pub fn into_records(value: Value) -> Option<Vec<Record>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}
