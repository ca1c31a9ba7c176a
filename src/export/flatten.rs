//! Flattens nested JSON values into single-level rows keyed by dotted path.

use crate::error::AppError;
use indexmap::IndexMap;
use serde_json::Value;

/// A flattened record: dotted key path → cell text, in first-traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRow {
    cells: IndexMap<String, String>,
    collisions: Vec<String>,
}

impl FlatRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cell; an existing key is overwritten in place and reported.
    pub fn insert(&mut self, key: String, value: String) {
        if let Some(previous) = self.cells.get_mut(&key) {
            log::warn!(
                "Flattened key '{}' produced by more than one path; keeping the last value",
                key
            );
            *previous = value;
            self.collisions.push(key);
        } else {
            self.cells.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Keys that were written by more than one original path.
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }
}

/// Flattens any JSON value.
///
/// Objects and arrays contribute `parent.child` keys (array indexes act as
/// keys); a bare scalar yields a single entry under the empty key.
pub fn flatten(value: &Value) -> FlatRow {
    let mut row = FlatRow::new();
    flatten_into(None, value, &mut row);
    row
}

/// Flattens one top-level record, which must be an object or an array.
pub fn flatten_record(index: usize, value: &Value) -> Result<FlatRow, AppError> {
    match value {
        Value::Object(_) | Value::Array(_) => Ok(flatten(value)),
        other => Err(AppError::MalformedRecord {
            index,
            kind: json_kind(other),
        }),
    }
}

fn flatten_into(prefix: Option<&str>, value: &Value, row: &mut FlatRow) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = join_path(prefix, key);
                flatten_into(Some(&path), child, row);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let path = join_path(prefix, &index.to_string());
                flatten_into(Some(&path), child, row);
            }
        }
        scalar => row.insert(prefix.unwrap_or_default().to_string(), stringify(scalar)),
    }
}

fn join_path(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(parent) => format!("{}.{}", parent, key),
        None => key.to_string(),
    }
}

/// Canonical cell text of a JSON scalar.
///
/// Strings are kept verbatim, numbers use `serde_json`'s formatting
/// (`1.0` stays `1.0`), booleans become `true`/`false` and `null` is empty.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // Containers never reach here from flatten_into.
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
