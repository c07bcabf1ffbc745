//! Pure value coercion.
//!
//! Conversions from raw token strings to typed values. The `Result` forms
//! are strict; message constructors apply them leniently (`.ok()`) so a
//! malformed optional field degrades to absent instead of failing the line.

use crate::error::LogParseError;

pub fn to_long(value: &str) -> Result<i64, LogParseError> {
    value
        .parse::<i64>()
        .map_err(|_| LogParseError::FieldCoercion(format!("expected an integer, got {value:?}")))
}

pub fn to_int(value: &str) -> Result<i32, LogParseError> {
    value
        .parse::<i32>()
        .map_err(|_| LogParseError::FieldCoercion(format!("expected an integer, got {value:?}")))
}

pub fn to_double(value: &str) -> Result<f64, LogParseError> {
    value
        .parse::<f64>()
        .map_err(|_| LogParseError::FieldCoercion(format!("expected a number, got {value:?}")))
}

/// Exact `"true"` / `"false"` only.
pub fn to_boolean(value: &str) -> Result<bool, LogParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(LogParseError::FieldCoercion(format!(
            "expected true or false, got {other:?}"
        ))),
    }
}

/// Split a comma-separated value into an ordered list. The empty string is
/// an empty list, not a list holding one empty element.
pub fn to_string_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}
