pub mod analysis;
pub mod resume;

use serde_json::Value;

/// Reads `key` as a string. Wrong-typed values are treated as absent.
pub(crate) fn str_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

/// Reads `key` as a list of strings, dropping non-string items.
pub(crate) fn str_list_field(obj: &Value, key: &str) -> Option<Vec<String>> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).map(String::from).collect())
}
