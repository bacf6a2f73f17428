//! Fail-safe and pacing wrapper around any [`InputDriver`].
//!
//! Before each input call, [`SafetyDriver`] checks whether the pointer sits
//! in one of the four screen corners and, if fail-safe is enabled, refuses the
//! call with [`DriverError::FailSafe`].  Slamming the mouse into a corner is
//! how an operator at the machine stops a runaway client.  After each input
//! call it sleeps for the configured pause.
//!
//! A plain `move_to` is exempt from the corner check.  It is the only way out
//! of a corner when no operator is at the machine, as with the headless
//! display.  Drags still press a button at the current position and stay
//! guarded.
//!
//! Queries (`position`, `screen_size`) and `capture` pass straight through.

use std::thread;
use std::time::Duration;

use deskctl_core::{HidKeyCode, MouseButton, Region};

use crate::application::driver::{DriverError, Frame, InputDriver};

/// Wraps `D` with fail-safe corner detection and a post-action pause.
#[derive(Debug)]
pub struct SafetyDriver<D> {
    inner: D,
    failsafe: bool,
    pause: Duration,
}

impl<D: InputDriver> SafetyDriver<D> {
    pub fn new(inner: D, failsafe: bool, pause: Duration) -> Self {
        Self {
            inner,
            failsafe,
            pause,
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    fn guarded<T>(&self, action: impl FnOnce(&D) -> Result<T, DriverError>) -> Result<T, DriverError> {
        if self.failsafe {
            self.check_corner()?;
        }
        self.paced(action)
    }

    fn paced<T>(&self, action: impl FnOnce(&D) -> Result<T, DriverError>) -> Result<T, DriverError> {
        let out = action(&self.inner)?;
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
        Ok(out)
    }

    fn check_corner(&self) -> Result<(), DriverError> {
        let (x, y) = self.inner.position()?;
        let (width, height) = self.inner.screen_size()?;
        let right = i64::from(width) - 1;
        let bottom = i64::from(height) - 1;
        let at_edge_x = x == 0 || i64::from(x) == right;
        let at_edge_y = y == 0 || i64::from(y) == bottom;
        if at_edge_x && at_edge_y {
            return Err(DriverError::FailSafe { x, y });
        }
        Ok(())
    }
}

impl<D: InputDriver> InputDriver for SafetyDriver<D> {
    fn position(&self) -> Result<(i32, i32), DriverError> {
        self.inner.position()
    }

    fn screen_size(&self) -> Result<(u32, u32), DriverError> {
        self.inner.screen_size()
    }

    fn move_to(&self, x: i32, y: i32, duration: Duration) -> Result<(), DriverError> {
        self.paced(|d| d.move_to(x, y, duration))
    }

    fn click(&self, button: MouseButton) -> Result<(), DriverError> {
        self.guarded(|d| d.click(button))
    }

    fn drag_to(
        &self,
        x: i32,
        y: i32,
        duration: Duration,
        button: MouseButton,
    ) -> Result<(), DriverError> {
        self.guarded(|d| d.drag_to(x, y, duration, button))
    }

    fn drag_rel(
        &self,
        dx: i32,
        dy: i32,
        duration: Duration,
        button: MouseButton,
    ) -> Result<(), DriverError> {
        self.guarded(|d| d.drag_rel(dx, dy, duration, button))
    }

    fn scroll(&self, clicks: i32) -> Result<(), DriverError> {
        self.guarded(|d| d.scroll(clicks))
    }

    fn type_text(&self, text: &str, interval: Duration) -> Result<(), DriverError> {
        self.guarded(|d| d.type_text(text, interval))
    }

    fn key_down(&self, key: HidKeyCode) -> Result<(), DriverError> {
        self.guarded(|d| d.key_down(key))
    }

    fn key_up(&self, key: HidKeyCode) -> Result<(), DriverError> {
        self.guarded(|d| d.key_up(key))
    }

    fn press(&self, key: HidKeyCode, presses: u32, interval: Duration) -> Result<(), DriverError> {
        self.guarded(|d| d.press(key, presses, interval))
    }

    fn hotkey(&self, keys: &[HidKeyCode], interval: Duration) -> Result<(), DriverError> {
        self.guarded(|d| d.hotkey(keys, interval))
    }

    fn capture(&self, region: Option<Region>) -> Result<Frame, DriverError> {
        self.inner.capture(region)
    }
}
