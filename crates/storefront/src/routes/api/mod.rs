//! JSON API routes used by the bundle listing's checkout script.
//!
//! Every failure renders as `{"success": false, "error": "..."}` through
//! [`AppError`](crate::error::AppError). Bodies are decoded by hand so a
//! malformed body answers 500 like any other unexpected failure.

pub mod checkout;
pub mod order;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// Decode a JSON request body.
fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| AppError::Internal(format!("invalid JSON body: {e}")))
}

/// A required text field: present and not blank.
///
/// The value is returned as sent; validators see surrounding whitespace.
fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Reference {
        reference: Option<String>,
    }

    #[test]
    fn test_json_body() {
        let body: Reference = json_body(&Bytes::from_static(br#"{"reference":"r1"}"#)).unwrap();
        assert_eq!(body.reference.as_deref(), Some("r1"));

        let err = json_body::<Reference>(&Bytes::from_static(b"not json")).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_required() {
        assert_eq!(required(Some("r1")), Some("r1"));
        assert_eq!(required(Some(" r1 ")), Some(" r1 "));
        assert_eq!(required(Some("  ")), None);
        assert_eq!(required(None), None);
    }
}
