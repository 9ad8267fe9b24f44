//! The `{errcode, errmsg}` envelope laid over every API response.
//!
//! `errcode` absent, null or 0 means success. Everything else is a remote
//! rejection, whether the host sends the code as an integer, a float or a
//! string; a small fixed set of codes means the token was invalid.

use serde_json::Value;

use crate::errors::ApiError;

/// Codes meaning "access token invalid or expired".
///
/// - 40001: invalid credential
/// - 40014: invalid access token
/// - 42001: access token expired
pub const AUTH_FAILURE_CODES: [i64; 3] = [40001, 40014, 42001];

/// Code reported for an `errcode` that is set but not a readable integer.
pub const UNKNOWN_ERROR_CODE: i64 = -1;

/// Non-zero `errcode` carried by `value`, if any.
pub fn error_code(value: &Value) -> Option<i64> {
    let code = match value.get("errcode")? {
        Value::Null => return None,
        Value::Bool(set) => i64::from(*set),
        Value::Number(n) => n.as_i64().unwrap_or_else(|| float_code(n.as_f64())),
        Value::String(s) => s.trim().parse().unwrap_or(UNKNOWN_ERROR_CODE),
        Value::Array(_) | Value::Object(_) => UNKNOWN_ERROR_CODE,
    };
    (code != 0).then_some(code)
}

// Integral floats map to their value; fractional ones cannot be a real code.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn float_code(value: Option<f64>) -> i64 {
    match value {
        Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => f as i64,
        Some(_) => UNKNOWN_ERROR_CODE,
        None => 0,
    }
}

/// Fail with [`ApiError::Remote`] if `value` carries a non-zero `errcode`.
pub fn check_envelope(value: &Value) -> Result<(), ApiError> {
    match error_code(value) {
        Some(code) => Err(ApiError::Remote {
            code,
            message: value
                .get("errmsg")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        None => Ok(()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_errcode_is_success() {
        assert!(check_envelope(&json!({"media_id": "M1"})).is_ok());
    }

    #[test]
    fn zero_errcode_is_success() {
        assert!(check_envelope(&json!({"errcode": 0, "errmsg": "ok"})).is_ok());
    }

    #[test]
    fn nonzero_errcode_is_remote() {
        let err = check_envelope(&json!({"errcode": 40007, "errmsg": "invalid media_id"}))
            .unwrap_err();
        assert_matches!(err, ApiError::Remote { code: 40007, message } if message == "invalid media_id");
    }

    #[test]
    fn missing_errmsg_is_empty() {
        let err = check_envelope(&json!({"errcode": 45009})).unwrap_err();
        assert_matches!(err, ApiError::Remote { code: 45009, message } if message.is_empty());
    }

    #[test]
    fn float_and_string_codes_are_errors() {
        assert_eq!(error_code(&json!({"errcode": 40001.0})), Some(40001));
        assert_eq!(error_code(&json!({"errcode": "40001"})), Some(40001));
        assert_eq!(error_code(&json!({"errcode": " 42001 "})), Some(42001));
        assert_eq!(error_code(&json!({"errcode": 0.5})), Some(UNKNOWN_ERROR_CODE));
        assert_eq!(error_code(&json!({"errcode": "busy"})), Some(UNKNOWN_ERROR_CODE));
        assert_eq!(error_code(&json!({"errcode": [1]})), Some(UNKNOWN_ERROR_CODE));
        assert_eq!(error_code(&json!({"errcode": true})), Some(1));

        let err = check_envelope(&json!({"errcode": "40014", "errmsg": "expired"})).unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[test]
    fn zero_like_codes_are_success() {
        assert_eq!(error_code(&json!({"errcode": 0.0})), None);
        assert_eq!(error_code(&json!({"errcode": "0"})), None);
        assert_eq!(error_code(&json!({"errcode": null})), None);
        assert_eq!(error_code(&json!({"errcode": false})), None);
    }

    #[test]
    fn non_object_bodies_are_success() {
        assert_eq!(error_code(&json!([1, 2])), None);
        assert_eq!(error_code(&json!("ok")), None);
    }
}
