//! Schemaless row representation.
//!
//! Rows come back from the REST gateway as JSON objects and are kept that way:
//! no column set is assumed beyond what individual commands look up by name.

use serde_json::{Map, Value};

/// A single table row as returned by the database gateway.
pub type Record = Map<String, Value>;

/// Whether a value counts as "present" for reporting purposes.
///
/// Null, `false`, zero, and empty strings/arrays/objects are all treated as absent.
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Whether the named field exists on the record and is populated.
pub fn field_populated(record: &Record, field: &str) -> bool {
    record.get(field).is_some_and(is_populated)
}

/// String value of a field, if present and a string.
pub fn text<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

/// Copy of the named fields, with null for any that are absent.
pub fn project(record: &Record, fields: &[&str]) -> Record {
    fields
        .iter()
        .map(|&f| (f.to_string(), record.get(f).cloned().unwrap_or(Value::Null)))
        .collect()
}
