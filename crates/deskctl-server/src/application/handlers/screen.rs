//! `screenshot`: capture the screen and save it as a PNG.

use std::path::{Path, PathBuf};

use deskctl_core::{CommandMessage, Region};
use image::{ImageFormat, RgbImage};
use serde_json::{json, Value};
use tracing::debug;

use super::{ActionHandler, HandlerContext, HandlerError};
use crate::application::driver::DriverError;

/// Captures the whole screen, or `region` when given, into the screenshot
/// directory under `name` (a bare file name) or a generated one.
pub struct ScreenshotHandler;

impl ActionHandler for ScreenshotHandler {
    fn name(&self) -> &'static str {
        "screenshot"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let file_name = match cmd.string("name")? {
            Some(name) => validate_file_name(name)?.to_string(),
            None => format!("screenshot-{}.png", uuid::Uuid::new_v4()),
        };
        let region = cmd
            .get("region")
            .map(|value| Region::from_value("region", value))
            .transpose()?;

        let frame = ctx.driver.capture(region)?;
        let (width, height) = (frame.width, frame.height);
        let image = RgbImage::from_raw(width, height, frame.rgb).ok_or_else(|| {
            DriverError::Platform(format!(
                "captured frame does not match its {width}x{height} size"
            ))
        })?;

        let path = ctx.screenshot_dir.join(file_name);
        std::fs::create_dir_all(&ctx.screenshot_dir).map_err(|source| HandlerError::Io {
            path: ctx.screenshot_dir.clone(),
            source,
        })?;
        image.save_with_format(&path, ImageFormat::Png)?;

        debug!(path = %path.display(), width, height, "screenshot saved");
        Ok(json!({ "saved": path.display().to_string() }))
    }
}

/// Accepts only a plain file name that stays inside the screenshot directory.
fn validate_file_name(name: &str) -> Result<&str, HandlerError> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().map(PathBuf::from) == Some(PathBuf::from(name));
    if plain {
        Ok(name)
    } else {
        Err(HandlerError::invalid(format!(
            "'name' must be a plain file name, got '{name}'"
        )))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::driver::InputDriver;
    use crate::application::handlers::tests::cmd;
    use crate::infrastructure::driver::mock::{DriverCall, RecordingDriver};

    fn context_in(dir: &Path) -> (Arc<RecordingDriver>, HandlerContext) {
        let driver = Arc::new(RecordingDriver::new());
        let ctx = HandlerContext {
            driver: Arc::clone(&driver) as Arc<dyn InputDriver>,
            screenshot_dir: dir.to_path_buf(),
        };
        (driver, ctx)
    }

    #[test]
    fn test_screenshot_writes_named_png() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let (_, ctx) = context_in(dir.path());

        // Act
        let result = ScreenshotHandler
            .handle(&cmd(json!({"name": "shot.png"})), &ctx)
            .unwrap();

        // Assert
        let expected = dir.path().join("shot.png");
        assert_eq!(result, json!({"saved": expected.display().to_string()}));
        let bytes = std::fs::read(&expected).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_screenshot_generates_a_name_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let (_, ctx) = context_in(dir.path());

        let result = ScreenshotHandler.handle(&cmd(json!({})), &ctx).unwrap();

        let saved = PathBuf::from(result["saved"].as_str().unwrap());
        let file_name = saved.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("screenshot-") && file_name.ends_with(".png"));
        assert!(saved.exists());
    }

    #[test]
    fn test_screenshot_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let (_, ctx) = context_in(&nested);

        ScreenshotHandler
            .handle(&cmd(json!({"name": "x.png"})), &ctx)
            .unwrap();

        assert!(nested.join("x.png").exists());
    }

    #[test]
    fn test_screenshot_passes_region_to_driver() {
        let dir = tempfile::tempdir().unwrap();
        let (driver, ctx) = context_in(dir.path());

        ScreenshotHandler
            .handle(
                &cmd(json!({"name": "r.png", "region": [10, 20, 30, 40]})),
                &ctx,
            )
            .unwrap();

        assert_eq!(
            driver.calls(),
            vec![DriverCall::Capture(Some(Region {
                left: 10,
                top: 20,
                width: 30,
                height: 40
            }))]
        );
    }

    #[test]
    fn test_screenshot_rejects_bad_region() {
        let dir = tempfile::tempdir().unwrap();
        let (driver, ctx) = context_in(dir.path());

        let err = ScreenshotHandler
            .handle(&cmd(json!({"region": [0, 0, 0, 10]})), &ctx)
            .unwrap_err();

        assert!(matches!(err, HandlerError::InvalidParams(_)));
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn test_screenshot_rejects_names_that_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (driver, ctx) = context_in(dir.path());

        for name in ["../evil.png", "sub/x.png", "..", ".", "", "a\\b.png"] {
            let err = ScreenshotHandler
                .handle(&cmd(json!({ "name": name })), &ctx)
                .unwrap_err();
            assert!(
                matches!(err, HandlerError::InvalidParams(_)),
                "'{name}' should be rejected"
            );
        }
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn test_screenshot_driver_failure_is_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let (driver, ctx) = context_in(dir.path());
        driver.set_should_fail(true);

        let err = ScreenshotHandler.handle(&cmd(json!({})), &ctx).unwrap_err();

        assert_eq!(err.code(), deskctl_core::ErrorCode::ExecutionError);
    }
}
