//! Virtual-display driver.
//!
//! [`HeadlessDriver`] keeps an in-process model of a screen: a pointer
//! clamped to the configured size, the set of held keys and buttons, and a
//! solid-colour framebuffer.  It lets the server run end-to-end on machines
//! without a desktop session (CI, containers) while honouring the timing
//! parameters of every action.
//!
//! Sleeps happen outside the state lock, so one session's long glide never
//! blocks another session's `position` query.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use deskctl_core::{HidKeyCode, MouseButton, Region};
use tracing::trace;

use crate::application::driver::{DriverError, Frame, InputDriver};

/// Framebuffer colour (RGB).
const BACKGROUND: [u8; 3] = [0x20, 0x24, 0x2b];

#[derive(Debug, Default)]
struct DisplayState {
    cursor: (i32, i32),
    held_keys: HashSet<HidKeyCode>,
    held_buttons: HashSet<MouseButton>,
}

/// A headless virtual display.
#[derive(Debug)]
pub struct HeadlessDriver {
    width: u32,
    height: u32,
    state: Mutex<DisplayState>,
}

impl HeadlessDriver {
    /// Creates a `width` × `height` display with the pointer at the centre.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let state = DisplayState {
            cursor: (half(width), half(height)),
            ..DisplayState::default()
        };
        Self {
            width,
            height,
            state: Mutex::new(state),
        }
    }

    /// Keys currently held by `key_down` without a matching `key_up`.
    pub fn held_keys(&self) -> Vec<HidKeyCode> {
        self.lock().held_keys.iter().copied().collect()
    }

    fn lock(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x.clamp(0, max_coord(self.width)),
            y.clamp(0, max_coord(self.height)),
        )
    }

    fn glide(&self, x: i32, y: i32, duration: Duration) -> (i32, i32) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
        let target = self.clamp(x, y);
        self.lock().cursor = target;
        target
    }

    fn drag(&self, x: i32, y: i32, duration: Duration, button: MouseButton) {
        self.lock().held_buttons.insert(button);
        let target = self.glide(x, y, duration);
        self.lock().held_buttons.remove(&button);
        trace!(?button, x = target.0, y = target.1, "drag");
    }
}

fn half(n: u32) -> i32 {
    i32::try_from(n / 2).unwrap_or(i32::MAX)
}

fn max_coord(n: u32) -> i32 {
    i32::try_from(n.saturating_sub(1)).unwrap_or(i32::MAX)
}

impl InputDriver for HeadlessDriver {
    fn position(&self) -> Result<(i32, i32), DriverError> {
        Ok(self.lock().cursor)
    }

    fn screen_size(&self) -> Result<(u32, u32), DriverError> {
        Ok((self.width, self.height))
    }

    fn move_to(&self, x: i32, y: i32, duration: Duration) -> Result<(), DriverError> {
        let (x, y) = self.glide(x, y, duration);
        trace!(x, y, "move");
        Ok(())
    }

    fn click(&self, button: MouseButton) -> Result<(), DriverError> {
        trace!(?button, "click");
        Ok(())
    }

    fn drag_to(
        &self,
        x: i32,
        y: i32,
        duration: Duration,
        button: MouseButton,
    ) -> Result<(), DriverError> {
        self.drag(x, y, duration, button);
        Ok(())
    }

    fn drag_rel(
        &self,
        dx: i32,
        dy: i32,
        duration: Duration,
        button: MouseButton,
    ) -> Result<(), DriverError> {
        let (x, y) = self.lock().cursor;
        self.drag(x.saturating_add(dx), y.saturating_add(dy), duration, button);
        Ok(())
    }

    fn scroll(&self, clicks: i32) -> Result<(), DriverError> {
        trace!(clicks, "scroll");
        Ok(())
    }

    fn type_text(&self, text: &str, interval: Duration) -> Result<(), DriverError> {
        if !interval.is_zero() {
            for _ in text.chars().skip(1) {
                thread::sleep(interval);
            }
        }
        trace!(chars = text.chars().count(), "type");
        Ok(())
    }

    fn key_down(&self, key: HidKeyCode) -> Result<(), DriverError> {
        self.lock().held_keys.insert(key);
        Ok(())
    }

    fn key_up(&self, key: HidKeyCode) -> Result<(), DriverError> {
        self.lock().held_keys.remove(&key);
        Ok(())
    }

    fn press(&self, key: HidKeyCode, presses: u32, interval: Duration) -> Result<(), DriverError> {
        for i in 0..presses {
            if i > 0 && !interval.is_zero() {
                thread::sleep(interval);
            }
            trace!(key = key.as_u16(), "press");
        }
        Ok(())
    }

    fn hotkey(&self, keys: &[HidKeyCode], interval: Duration) -> Result<(), DriverError> {
        for &key in keys {
            self.key_down(key)?;
            if !interval.is_zero() {
                thread::sleep(interval);
            }
        }
        for &key in keys.iter().rev() {
            self.key_up(key)?;
        }
        Ok(())
    }

    fn capture(&self, region: Option<Region>) -> Result<Frame, DriverError> {
        let region = region.unwrap_or(Region {
            left: 0,
            top: 0,
            width: self.width,
            height: self.height,
        });

        let fits = |start: u32, len: u32, limit: u32| {
            start.checked_add(len).is_some_and(|end| end <= limit)
        };
        if !fits(region.left, region.width, self.width)
            || !fits(region.top, region.height, self.height)
        {
            return Err(DriverError::OutOfBounds {
                left: region.left,
                top: region.top,
                width: region.width,
                height: region.height,
                screen_width: self.width,
                screen_height: self.height,
            });
        }

        let pixels = region.width as usize * region.height as usize;
        Ok(Frame {
            width: region.width,
            height: region.height,
            rgb: BACKGROUND.repeat(pixels),
        })
    }
}
