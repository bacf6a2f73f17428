//! The input/display driver seam.
//!
//! Handlers never talk to the OS directly.  They call an [`InputDriver`]
//! trait object, and the infrastructure layer supplies the implementation
//! (a recording mock in tests, the headless virtual display in the binary).
//!
//! # Concurrency contract
//!
//! Several sessions may call the same driver at once from the blocking
//! thread pool.  Implementations that need exclusive access to the underlying
//! device must serialize internally; the dispatcher does not do it for them.
//!
//! Calls that take a `Duration` block the calling thread for (roughly) that
//! long.  That is why the dispatcher runs handlers on the blocking pool.

use std::time::Duration;

use deskctl_core::{HidKeyCode, MouseButton, Region};
use thiserror::Error;

/// Error type for driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The pointer sits in a screen corner while fail-safe is enabled.
    #[error("fail-safe triggered: pointer is at screen corner ({x}, {y})")]
    FailSafe { x: i32, y: i32 },

    /// A requested area lies outside the screen.
    #[error("region {left},{top} {width}x{height} is outside the {screen_width}x{screen_height} screen")]
    OutOfBounds {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        screen_width: u32,
        screen_height: u32,
    },

    /// The platform backend reported a failure.
    #[error("platform error: {0}")]
    Platform(String),
}

/// One captured screen area as tightly packed RGB8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Platform-agnostic input injection and screen capture.
///
/// Coordinates are absolute screen pixels with the origin at the top-left of
/// the primary display.
pub trait InputDriver: Send + Sync {
    /// Current pointer position.
    fn position(&self) -> Result<(i32, i32), DriverError>;

    /// Primary screen size in pixels.
    fn screen_size(&self) -> Result<(u32, u32), DriverError>;

    /// Moves the pointer to `(x, y)`, gliding over `duration`.
    fn move_to(&self, x: i32, y: i32, duration: Duration) -> Result<(), DriverError>;

    /// Presses and releases `button` at the current pointer position.
    fn click(&self, button: MouseButton) -> Result<(), DriverError>;

    /// Holds `button`, glides to `(x, y)`, and releases.
    fn drag_to(
        &self,
        x: i32,
        y: i32,
        duration: Duration,
        button: MouseButton,
    ) -> Result<(), DriverError>;

    /// Holds `button`, glides by `(dx, dy)` from the current position, and releases.
    fn drag_rel(
        &self,
        dx: i32,
        dy: i32,
        duration: Duration,
        button: MouseButton,
    ) -> Result<(), DriverError>;

    /// Turns the wheel by `clicks` notches.  Positive scrolls up.
    fn scroll(&self, clicks: i32) -> Result<(), DriverError>;

    /// Types `text` character by character, waiting `interval` between characters.
    fn type_text(&self, text: &str, interval: Duration) -> Result<(), DriverError>;

    /// Presses `key` without releasing it.
    fn key_down(&self, key: HidKeyCode) -> Result<(), DriverError>;

    /// Releases `key`.
    fn key_up(&self, key: HidKeyCode) -> Result<(), DriverError>;

    /// Taps `key` `presses` times, waiting `interval` between taps.
    fn press(&self, key: HidKeyCode, presses: u32, interval: Duration) -> Result<(), DriverError>;

    /// Presses `keys` in order and releases them in reverse order.
    fn hotkey(&self, keys: &[HidKeyCode], interval: Duration) -> Result<(), DriverError>;

    /// Captures `region`, or the whole screen when `None`.
    fn capture(&self, region: Option<Region>) -> Result<Frame, DriverError>;
}
