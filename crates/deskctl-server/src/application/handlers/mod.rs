//! The handler capability set.
//!
//! Each action is one [`ActionHandler`]: a synchronous function of the
//! command's parameters and the shared [`HandlerContext`] that returns a JSON
//! result payload or a [`HandlerError`].  Handlers validate their own
//! parameters before calling the driver, and never touch the registry or any
//! other session's state.
//!
//! | Module     | Actions                                          |
//! |------------|--------------------------------------------------|
//! | `pointer`  | move, click, dragto, dragrel, scroll             |
//! | `keyboard` | type, keydown, keyup, press, hotkey              |
//! | `screen`   | screenshot                                       |

pub mod keyboard;
pub mod pointer;
pub mod screen;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use deskctl_core::{CommandMessage, ErrorCode, ParamError};
use serde_json::Value;
use thiserror::Error;

use crate::application::driver::{DriverError, InputDriver};

/// Error type for handler invocations.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The command's parameters failed validation.  Reported as `invalid_params`.
    #[error("{0}")]
    InvalidParams(String),

    /// The driver failed while carrying out the action.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A captured frame could not be encoded as PNG.
    #[error("failed to encode screenshot: {0}")]
    Encode(#[from] image::ImageError),

    /// Writing handler output to disk failed.
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HandlerError {
    /// The wire code this error is reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidParams(_) => ErrorCode::InvalidParams,
            Self::Driver(_) | Self::Encode(_) | Self::Io { .. } => ErrorCode::ExecutionError,
        }
    }

    pub fn invalid(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}

impl From<ParamError> for HandlerError {
    fn from(err: ParamError) -> Self {
        Self::InvalidParams(err.to_string())
    }
}

/// Everything a handler may use besides its own parameters.
pub struct HandlerContext {
    /// Shared input/display driver.
    pub driver: Arc<dyn InputDriver>,
    /// Directory screenshots are written to.
    pub screenshot_dir: PathBuf,
}

/// One named action.
pub trait ActionHandler: Send + Sync {
    /// The `action` string this handler answers to.
    fn name(&self) -> &'static str;

    /// Runs the action.
    ///
    /// # Errors
    ///
    /// [`HandlerError::InvalidParams`] for bad parameters, any other variant
    /// for failures while executing.
    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError>;
}

/// Every handler shipped with the server, in registration order.
pub fn builtin_handlers() -> Vec<Arc<dyn ActionHandler>> {
    vec![
        Arc::new(pointer::MoveHandler),
        Arc::new(pointer::ClickHandler),
        Arc::new(pointer::DragToHandler),
        Arc::new(pointer::DragRelHandler),
        Arc::new(pointer::ScrollHandler),
        Arc::new(keyboard::TypeHandler),
        Arc::new(keyboard::KeyDownHandler),
        Arc::new(keyboard::KeyUpHandler),
        Arc::new(keyboard::PressHandler),
        Arc::new(keyboard::HotkeyHandler),
        Arc::new(screen::ScreenshotHandler),
    ]
}

/// Reads a duration/interval field in seconds, defaulting to zero.
pub(crate) fn seconds(cmd: &CommandMessage, key: &str) -> Result<Duration, HandlerError> {
    let secs = cmd.seconds(key)?;
    Duration::try_from_secs_f64(secs).map_err(|_| ParamError::InvalidSeconds(key.to_string()).into())
}

/// Reads a required `(x, y)`-style coordinate pair.
///
/// Both fields must be present and numeric.  The error message names the
/// pair, e.g. `"Requires 'x' and 'y'"`.
pub(crate) fn required_point(
    cmd: &CommandMessage,
    x_key: &str,
    y_key: &str,
) -> Result<(i32, i32), HandlerError> {
    match (cmd.coordinate(x_key)?, cmd.coordinate(y_key)?) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(HandlerError::invalid(format!(
            "Requires '{x_key}' and '{y_key}'"
        ))),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    use crate::infrastructure::driver::mock::RecordingDriver;

    /// Builds a context around a fresh recording driver.
    pub(crate) fn context() -> (Arc<RecordingDriver>, HandlerContext) {
        let driver = Arc::new(RecordingDriver::new());
        let ctx = HandlerContext {
            driver: Arc::clone(&driver) as Arc<dyn InputDriver>,
            screenshot_dir: std::env::temp_dir(),
        };
        (driver, ctx)
    }

    pub(crate) fn cmd(value: Value) -> CommandMessage {
        CommandMessage::from_value(value).unwrap()
    }

    #[test]
    fn test_builtin_handler_names_are_unique() {
        let handlers = builtin_handlers();
        let mut names: Vec<_> = handlers.iter().map(|h| h.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), handlers.len());
    }

    #[test]
    fn test_builtin_handlers_cover_every_action() {
        let names: Vec<_> = builtin_handlers().iter().map(|h| h.name()).collect();
        for expected in [
            "move", "click", "type", "keydown", "keyup", "hotkey", "dragto", "dragrel",
            "screenshot", "scroll", "press",
        ] {
            assert!(names.contains(&expected), "missing handler '{expected}'");
        }
    }

    #[test]
    fn test_param_errors_map_to_invalid_params() {
        let err: HandlerError = ParamError::NotANumber("x".into()).into();
        assert_eq!(err.code(), ErrorCode::InvalidParams);
        assert_eq!(err.to_string(), "'x' must be a number");
    }

    #[test]
    fn test_driver_errors_map_to_execution_error() {
        let err: HandlerError = DriverError::Platform("display gone".into()).into();
        assert_eq!(err.code(), ErrorCode::ExecutionError);
    }

    #[test]
    fn test_seconds_converts_to_duration() {
        let c = cmd(json!({"duration": 0.25}));
        assert_eq!(seconds(&c, "duration").unwrap(), Duration::from_millis(250));
        assert_eq!(seconds(&c, "interval").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_seconds_rejects_durations_too_large_to_represent() {
        let c = cmd(json!({"duration": 1e300}));
        assert!(matches!(
            seconds(&c, "duration"),
            Err(HandlerError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_required_point_names_both_fields() {
        let err = required_point(&cmd(json!({"x": 50})), "x", "y").unwrap_err();
        assert_eq!(err.to_string(), "Requires 'x' and 'y'");
    }
}
