//! Typed accessors over an incoming command frame.
//!
//! The protocol is deliberately loose: every action reads its own fields from
//! the same flat JSON object.  Rather than one serde struct per action,
//! [`CommandMessage`] keeps the raw object and offers accessors that apply the
//! coercion rules uniformly:
//!
//! - Numbers are accepted as JSON integers or floats.  Strings holding digits
//!   are **not** coerced.
//! - Pixel coordinates are truncated toward zero ([`to_pixel`]).
//! - Durations and intervals default to `0.0` and must be finite and
//!   non-negative.
//!
//! Every accessor distinguishes "absent" (`Ok(None)` or the default) from
//! "present but wrong type" (`Err(ParamError)`), except
//! [`CommandMessage::lenient_coordinate`] which folds the latter into absent.

use serde_json::{Map, Value};
use thiserror::Error;

/// A received frame could not be turned into a command.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The frame is not valid UTF-8 or not valid JSON.
    #[error("frame is not valid JSON: {0}")]
    InvalidJson(String),

    /// The frame is valid JSON but not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A command field is present but unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("'{0}' must be a number")]
    NotANumber(String),
    #[error("'{0}' must be an integer")]
    NotAnInteger(String),
    #[error("'{0}' must be a string")]
    NotAString(String),
    #[error("'{0}' must be a list of strings")]
    NotAStringList(String),
    #[error("'{0}' must be a finite, non-negative number of seconds")]
    InvalidSeconds(String),
    #[error("'{field}' is out of range: {reason}")]
    OutOfRange { field: String, reason: String },
    #[error("unknown mouse button '{0}' (expected left, right, or middle)")]
    UnknownButton(String),
}

/// Mouse buttons a command may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Parses a button name.  `primary` and `secondary` alias left and right.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "left" | "primary" => Some(Self::Left),
            "right" | "secondary" => Some(Self::Right),
            "middle" => Some(Self::Middle),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Middle => "middle",
        }
    }
}

/// A rectangular screen area in pixels, as `[left, top, width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Parses the four-element array form used on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::OutOfRange`] unless `value` is an array of exactly
    /// four non-negative integers with non-zero width and height.
    pub fn from_value(field: &str, value: &Value) -> Result<Self, ParamError> {
        let out_of_range = |reason: &str| ParamError::OutOfRange {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        let items = value
            .as_array()
            .filter(|items| items.len() == 4)
            .ok_or_else(|| out_of_range("expected [left, top, width, height]"))?;

        let mut parts = [0u32; 4];
        for (slot, item) in parts.iter_mut().zip(items) {
            *slot = item
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| out_of_range("components must be non-negative integers"))?;
        }

        let [left, top, width, height] = parts;
        if width == 0 || height == 0 {
            return Err(out_of_range("width and height must be positive"));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }
}

/// Truncates a JSON number to an integer pixel coordinate.
///
/// Truncation is toward zero; values beyond the `i32` range saturate.
pub fn to_pixel(value: f64) -> i32 {
    value.trunc() as i32
}

/// One decoded command frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandMessage {
    fields: Map<String, Value>,
}

impl CommandMessage {
    /// Decodes a text frame.
    ///
    /// # Errors
    ///
    /// [`FrameError::InvalidJson`] for unparsable input and
    /// [`FrameError::NotAnObject`] for valid JSON that is not an object.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| FrameError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decodes a binary frame holding UTF-8 JSON.
    ///
    /// # Errors
    ///
    /// Same as [`CommandMessage::parse`].
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| FrameError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Wraps an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// [`FrameError::NotAnObject`] unless `value` is an object.
    pub fn from_value(value: Value) -> Result<Self, FrameError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Err(FrameError::NotAnObject("null")),
            Value::Bool(_) => Err(FrameError::NotAnObject("a boolean")),
            Value::Number(_) => Err(FrameError::NotAnObject("a number")),
            Value::String(_) => Err(FrameError::NotAnObject("a string")),
            Value::Array(_) => Err(FrameError::NotAnObject("an array")),
        }
    }

    /// The supplied auth token, if it is a string.
    pub fn token(&self) -> Option<&str> {
        self.fields.get("token").and_then(Value::as_str)
    }

    /// The action name, if it is a non-empty string.
    pub fn action(&self) -> Option<&str> {
        self.fields
            .get("action")
            .and_then(Value::as_str)
            .filter(|action| !action.is_empty())
    }

    /// Raw access to any field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// Reads a numeric field.
    ///
    /// # Errors
    ///
    /// [`ParamError::NotANumber`] if the field is present but not a number.
    pub fn number(&self, key: &str) -> Result<Option<f64>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| ParamError::NotANumber(key.to_string())),
        }
    }

    /// Reads a numeric field as a truncated pixel coordinate.
    ///
    /// # Errors
    ///
    /// [`ParamError::NotANumber`] if the field is present but not a number.
    pub fn coordinate(&self, key: &str) -> Result<Option<i32>, ParamError> {
        Ok(self.number(key)?.map(to_pixel))
    }

    /// Like [`CommandMessage::coordinate`], but a non-numeric value reads as
    /// absent instead of failing.
    pub fn lenient_coordinate(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(Value::as_f64).map(to_pixel)
    }

    /// Reads a duration or interval in seconds, defaulting to `0.0`.
    ///
    /// # Errors
    ///
    /// [`ParamError::InvalidSeconds`] if the field is present but not a
    /// finite, non-negative number.
    pub fn seconds(&self, key: &str) -> Result<f64, ParamError> {
        match self.get(key) {
            None => Ok(0.0),
            Some(value) => value
                .as_f64()
                .filter(|s| s.is_finite() && *s >= 0.0)
                .ok_or_else(|| ParamError::InvalidSeconds(key.to_string())),
        }
    }

    /// Reads an integer field.  Floats with a fractional part are rejected.
    ///
    /// # Errors
    ///
    /// [`ParamError::NotAnInteger`] if the field is present but not an integer.
    pub fn integer(&self, key: &str) -> Result<Option<i64>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => {
                if let Some(i) = value.as_i64() {
                    return Ok(Some(i));
                }
                value
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| Some(f as i64))
                    .ok_or_else(|| ParamError::NotAnInteger(key.to_string()))
            }
        }
    }

    /// Reads a string field.
    ///
    /// # Errors
    ///
    /// [`ParamError::NotAString`] if the field is present but not a string.
    pub fn string(&self, key: &str) -> Result<Option<&str>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| ParamError::NotAString(key.to_string())),
        }
    }

    /// Reads a list-of-strings field.
    ///
    /// # Errors
    ///
    /// [`ParamError::NotAStringList`] if the field is present but not an
    /// array whose every element is a string.
    pub fn string_list(&self, key: &str) -> Result<Option<Vec<&str>>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_array()
                .and_then(|items| items.iter().map(Value::as_str).collect::<Option<Vec<_>>>())
                .map(Some)
                .ok_or_else(|| ParamError::NotAStringList(key.to_string())),
        }
    }

    /// Reads the `button` field, defaulting to `"left"`.
    ///
    /// Returns the parsed button together with the exact label the client
    /// sent, so results can echo it back unchanged.
    ///
    /// # Errors
    ///
    /// [`ParamError::NotAString`] or [`ParamError::UnknownButton`].
    pub fn button(&self) -> Result<(MouseButton, String), ParamError> {
        let label = self.string("button")?.unwrap_or("left");
        let button = MouseButton::from_name(label)
            .ok_or_else(|| ParamError::UnknownButton(label.to_string()))?;
        Ok((button, label.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
