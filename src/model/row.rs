//! Raw rows and defaulting field access

use serde_json::{Map, Value};

/// A loosely-typed record as returned by a data source
///
/// Column presence is not guaranteed and cell values may be strings, numbers,
/// booleans or null.
pub type Row = Map<String, Value>;

/// Render a cell as a string
///
/// Null becomes `""`; numbers and booleans use their display form; nested
/// values fall back to their JSON text.
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Read a column as a string, defaulting to `""` when absent
pub fn field(row: &Row, key: &str) -> String {
    row.get(key).map(cell_to_string).unwrap_or_default()
}

/// Read a column that only counts when it holds text
///
/// Anything other than a string cell reads as `""`.
pub fn text_field(row: &Row, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Read the first non-empty column out of `keys`
///
/// Mirrors the `row.get('a', row.get('b'))` fallbacks used for renamed
/// columns (e.g. `profile_name` / `name`).
pub fn field_any(row: &Row, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| field(row, key))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Case-insensitive substring match across every cell of a row
///
/// An empty query matches every row.
pub fn row_contains(row: &Row, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    row.values()
        .any(|value| cell_to_string(value).to_lowercase().contains(&needle))
}
