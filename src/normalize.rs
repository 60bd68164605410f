//! Canonical form for graph keys and query keys.

use serde_json::Value as JsonValue;

/// Normalize free text into a graph key.
///
/// Trims, collapses every internal whitespace run to a single space and
/// upper-cases the result. Every node key and every query key goes through
/// this function, so two source values that normalize identically are the
/// same entity.
pub fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Normalize a JSON cell; non-string values are stringified first.
pub fn normalize_value(value: &JsonValue) -> String {
    normalize(&value_to_text(value))
}

/// String form of a JSON cell as it appears in a table.
pub fn value_to_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
