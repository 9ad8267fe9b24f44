//! Field extraction from success envelopes.

use mpkit_client::ApiError;
use serde_json::Value;

/// Read `field` as a string. Numeric IDs are rendered in decimal.
pub(crate) fn id_field(value: &Value, field: &'static str) -> Result<String, ApiError> {
    match value.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(ApiError::MissingField(field)),
    }
}

/// Read `field` as an unsigned integer.
pub(crate) fn u64_field(value: &Value, field: &'static str) -> Result<u64, ApiError> {
    value
        .get(field)
        .and_then(Value::as_u64)
        .ok_or(ApiError::MissingField(field))
}

/// Batch listings accept 1..=20 items; anything else asks for the maximum.
pub(crate) fn clamp_page_size(count: u32) -> u32 {
    if (1..=20).contains(&count) { count } else { 20 }
}
