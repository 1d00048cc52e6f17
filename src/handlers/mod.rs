// handlers/mod.rs - one module per service, plus the service-wide root/health endpoints
//
// Public routes take no identity. Protected routes are wrapped with a
// `ScopeGuard` in the router and receive `Extension<Identity>`.
pub mod donors;
pub mod drinks;
pub mod greeting;
pub mod root;
pub mod trivia;

use serde_json::Value;

use crate::error::ApiError;

/// Required string field: absent, null or blank is a 422
pub(crate) fn required_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ApiError::missing_field(field)),
    }
}

/// Integer carried either as a JSON number or a numeric string
pub(crate) fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Required integer field: absent or null is a 422, as is anything non-numeric
pub(crate) fn required_integer(value: Option<Value>, field: &str) -> Result<i64, ApiError> {
    match value {
        None | Some(Value::Null) => Err(ApiError::missing_field(field)),
        Some(v) => integer(&v).ok_or_else(|| {
            ApiError::unprocessable_entity(format!("unprocessable: '{}' must be an integer", field))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_accept_numbers_and_numeric_strings() {
        assert_eq!(integer(&json!(3)), Some(3));
        assert_eq!(integer(&json!("4")), Some(4));
        assert_eq!(integer(&json!("four")), None);
        assert_eq!(integer(&json!(1.5)), None);
        assert_eq!(integer(&json!(null)), None);
    }

    #[test]
    fn required_fields_reject_null_and_blank() {
        assert!(required_text(Some("x".into()), "answer").is_ok());
        assert_eq!(required_text(Some("  ".into()), "answer").unwrap_err().status_code(), 422);
        assert_eq!(required_text(None, "answer").unwrap_err().status_code(), 422);
        assert_eq!(required_integer(Some(json!(null)), "difficulty").unwrap_err().status_code(), 422);
        assert_eq!(required_integer(Some(json!("x")), "difficulty").unwrap_err().status_code(), 422);
        assert_eq!(required_integer(Some(json!("2")), "difficulty").unwrap(), 2);
    }
}
