//! Uniform response wrapper.
//!
//! Every command produces exactly one envelope:
//!
//! ```json
//! {"status":"ok","result":{"moved_to":[10,20]}}
//! {"status":"error","error":{"message":"invalid_params","details":"Requires 'x' and 'y'"}}
//! ```
//!
//! `error.message` is a stable machine-readable [`ErrorCode`]; `error.details`
//! is free-form diagnostic data (an empty string when there is nothing to add).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable error codes clients match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Missing or wrong auth token.
    #[serde(rename = "unauthorized")]
    Unauthorized,
    /// `action` missing, empty, or not a string.
    #[serde(rename = "invalid_action")]
    InvalidAction,
    /// No handler is registered under the requested name.
    #[serde(rename = "unsupported_action")]
    UnsupportedAction,
    /// A handler rejected its parameters.
    #[serde(rename = "invalid_params")]
    InvalidParams,
    /// The frame was not valid JSON.
    #[serde(rename = "invalid_json")]
    InvalidJson,
    /// The frame was JSON but not a command object.
    #[serde(rename = "malformed_message")]
    MalformedMessage,
    /// Rebuilding the action registry failed.
    #[serde(rename = "reload_failed")]
    ReloadFailed,
    /// The handler or the driver underneath it failed.
    #[serde(rename = "executionerror")]
    ExecutionError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::InvalidAction => "invalid_action",
            Self::UnsupportedAction => "unsupported_action",
            Self::InvalidParams => "invalid_params",
            Self::InvalidJson => "invalid_json",
            Self::MalformedMessage => "malformed_message",
            Self::ReloadFailed => "reload_failed",
            Self::ExecutionError => "executionerror",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `error` object of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: ErrorCode,
    #[serde(default = "empty_details")]
    pub details: Value,
}

fn empty_details() -> Value {
    Value::String(String::new())
}

/// One response, tagged by `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Ok { result: Value },
    Error { error: ErrorBody },
}

/// Used if serialization ever fails so the client still gets a response.
const SERIALIZE_FALLBACK: &str =
    r#"{"status":"error","error":{"message":"executionerror","details":"response serialization failed"}}"#;

impl Envelope {
    /// A success envelope.  A `null` result is sent as an empty object.
    pub fn ok(result: Value) -> Self {
        let result = if result.is_null() {
            Value::Object(Default::default())
        } else {
            result
        };
        Self::Ok { result }
    }

    /// An error envelope with diagnostic details.  `null` details are sent as
    /// an empty string.
    pub fn error(code: ErrorCode, details: impl Into<Value>) -> Self {
        let details = details.into();
        let details = if details.is_null() {
            empty_details()
        } else {
            details
        };
        Self::Error {
            error: ErrorBody {
                message: code,
                details,
            },
        }
    }

    /// An error envelope with empty details.
    pub fn bare_error(code: ErrorCode) -> Self {
        Self::error(code, empty_details())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The error code, or `None` for a success envelope.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Ok { .. } => None,
            Self::Error { error } => Some(error.message),
        }
    }

    /// Serializes to the JSON text sent on the wire.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| SERIALIZE_FALLBACK.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_serializes_status_and_result() {
        // Arrange
        let env = Envelope::ok(json!({"clicked": [100, 200], "button": "left"}));

        // Act
        let value: Value = serde_json::from_str(&env.to_json()).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({"status": "ok", "result": {"clicked": [100, 200], "button": "left"}})
        );
    }

    #[test]
    fn test_ok_with_null_result_sends_empty_object() {
        let value: Value = serde_json::from_str(&Envelope::ok(Value::Null).to_json()).unwrap();
        assert_eq!(value, json!({"status": "ok", "result": {}}));
    }

    #[test]
    fn test_bare_error_has_empty_details() {
        let value: Value =
            serde_json::from_str(&Envelope::bare_error(ErrorCode::Unauthorized).to_json()).unwrap();
        assert_eq!(
            value,
            json!({"status": "error", "error": {"message": "unauthorized", "details": ""}})
        );
    }

    #[test]
    fn test_error_keeps_structured_details() {
        let env = Envelope::error(
            ErrorCode::ExecutionError,
            json!({"exception": "boom", "traceback": []}),
        );
        let value: Value = serde_json::from_str(&env.to_json()).unwrap();
        assert_eq!(value["error"]["details"]["exception"], "boom");
    }

    #[test]
    fn test_error_codes_serialize_to_stable_strings() {
        let cases = [
            (ErrorCode::Unauthorized, "unauthorized"),
            (ErrorCode::InvalidAction, "invalid_action"),
            (ErrorCode::UnsupportedAction, "unsupported_action"),
            (ErrorCode::InvalidParams, "invalid_params"),
            (ErrorCode::InvalidJson, "invalid_json"),
            (ErrorCode::MalformedMessage, "malformed_message"),
            (ErrorCode::ReloadFailed, "reload_failed"),
            (ErrorCode::ExecutionError, "executionerror"),
        ];
        for (code, expected) in cases {
            assert_eq!(serde_json::to_value(code).unwrap(), json!(expected));
            assert_eq!(code.as_str(), expected);
        }
    }

    #[test]
    fn test_error_code_accessor() {
        assert_eq!(Envelope::ok(json!({})).error_code(), None);
        assert_eq!(
            Envelope::bare_error(ErrorCode::InvalidJson).error_code(),
            Some(ErrorCode::InvalidJson)
        );
    }
}
