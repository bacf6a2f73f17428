//! Recording driver for tests.
//!
//! [`RecordingDriver`] performs no OS calls.  Every trait call is appended to
//! an in-memory log so tests can assert exactly which driver operations a
//! command produced, and in what order.  The pointer position is tracked so
//! that `position` and `drag_rel` behave plausibly.
//!
//! ```ignore
//! let driver = Arc::new(RecordingDriver::new());
//! // ... dispatch a click through a HandlerContext built around `driver` ...
//! assert_eq!(driver.calls(), vec![DriverCall::Click(MouseButton::Left)]);
//! ```
//!
//! Call [`RecordingDriver::set_should_fail`] to make every call return
//! [`DriverError::Platform`], which exercises the `executionerror` path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use deskctl_core::{HidKeyCode, MouseButton, Region};

use crate::application::driver::{DriverError, Frame, InputDriver};

/// Screen size reported by the recording driver.  Kept small so captured
/// frames stay cheap to encode in tests.
pub const MOCK_SCREEN: (u32, u32) = (64, 48);

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    MoveTo {
        x: i32,
        y: i32,
        duration: Duration,
    },
    Click(MouseButton),
    DragTo {
        x: i32,
        y: i32,
        duration: Duration,
        button: MouseButton,
    },
    DragRel {
        dx: i32,
        dy: i32,
        duration: Duration,
        button: MouseButton,
    },
    Scroll(i32),
    TypeText {
        text: String,
        interval: Duration,
    },
    KeyDown(HidKeyCode),
    KeyUp(HidKeyCode),
    Press {
        key: HidKeyCode,
        presses: u32,
        interval: Duration,
    },
    Hotkey {
        keys: Vec<HidKeyCode>,
        interval: Duration,
    },
    Capture(Option<Region>),
}

/// A driver that records calls instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    calls: Mutex<Vec<DriverCall>>,
    cursor: Mutex<(i32, i32)>,
    should_fail: AtomicBool,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver whose every call fails.
    pub fn failing() -> Self {
        let driver = Self::default();
        driver.set_should_fail(true);
        driver
    }

    /// When `true`, every call returns [`DriverError::Platform`] without
    /// being recorded.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every call recorded so far.
    pub fn calls(&self) -> Vec<DriverCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: DriverCall) -> Result<(), DriverError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DriverError::Platform("mock failure".into()));
        }
        lock(&self.calls).push(call);
        Ok(())
    }

    fn set_cursor(&self, x: i32, y: i32) {
        *lock(&self.cursor) = (x, y);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InputDriver for RecordingDriver {
    fn position(&self) -> Result<(i32, i32), DriverError> {
        Ok(*lock(&self.cursor))
    }

    fn screen_size(&self) -> Result<(u32, u32), DriverError> {
        Ok(MOCK_SCREEN)
    }

    fn move_to(&self, x: i32, y: i32, duration: Duration) -> Result<(), DriverError> {
        self.record(DriverCall::MoveTo { x, y, duration })?;
        self.set_cursor(x, y);
        Ok(())
    }

    fn click(&self, button: MouseButton) -> Result<(), DriverError> {
        self.record(DriverCall::Click(button))
    }

    fn drag_to(
        &self,
        x: i32,
        y: i32,
        duration: Duration,
        button: MouseButton,
    ) -> Result<(), DriverError> {
        self.record(DriverCall::DragTo {
            x,
            y,
            duration,
            button,
        })?;
        self.set_cursor(x, y);
        Ok(())
    }

    fn drag_rel(
        &self,
        dx: i32,
        dy: i32,
        duration: Duration,
        button: MouseButton,
    ) -> Result<(), DriverError> {
        self.record(DriverCall::DragRel {
            dx,
            dy,
            duration,
            button,
        })?;
        let (x, y) = *lock(&self.cursor);
        self.set_cursor(x.saturating_add(dx), y.saturating_add(dy));
        Ok(())
    }

    fn scroll(&self, clicks: i32) -> Result<(), DriverError> {
        self.record(DriverCall::Scroll(clicks))
    }

    fn type_text(&self, text: &str, interval: Duration) -> Result<(), DriverError> {
        self.record(DriverCall::TypeText {
            text: text.to_string(),
            interval,
        })
    }

    fn key_down(&self, key: HidKeyCode) -> Result<(), DriverError> {
        self.record(DriverCall::KeyDown(key))
    }

    fn key_up(&self, key: HidKeyCode) -> Result<(), DriverError> {
        self.record(DriverCall::KeyUp(key))
    }

    fn press(&self, key: HidKeyCode, presses: u32, interval: Duration) -> Result<(), DriverError> {
        self.record(DriverCall::Press {
            key,
            presses,
            interval,
        })
    }

    fn hotkey(&self, keys: &[HidKeyCode], interval: Duration) -> Result<(), DriverError> {
        self.record(DriverCall::Hotkey {
            keys: keys.to_vec(),
            interval,
        })
    }

    fn capture(&self, region: Option<Region>) -> Result<Frame, DriverError> {
        self.record(DriverCall::Capture(region))?;
        let (width, height) = region.map_or(MOCK_SCREEN, |r| (r.width, r.height));
        Ok(Frame {
            width,
            height,
            rgb: vec![0; width as usize * height as usize * 3],
        })
    }
}
