//! Pointer actions: move, click, dragto, dragrel, scroll.

use std::time::Duration;

use deskctl_core::CommandMessage;
use serde_json::{json, Value};

use super::{required_point, seconds, ActionHandler, HandlerContext, HandlerError};

/// `move`: glide the pointer to absolute `(x, y)`.
///
/// `moved_to` reports where the driver left the pointer, which differs from
/// the request when the target is off screen and gets clamped.
pub struct MoveHandler;

impl ActionHandler for MoveHandler {
    fn name(&self) -> &'static str {
        "move"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let (x, y) = required_point(cmd, "x", "y")?;
        let duration = seconds(cmd, "duration")?;
        ctx.driver.move_to(x, y, duration)?;
        let (x, y) = ctx.driver.position()?;
        Ok(json!({ "moved_to": [x, y] }))
    }
}

/// `click`: optionally move to `(x, y)`, then click `button`.
///
/// Coordinates that are missing or not numbers are ignored rather than
/// rejected: the move is skipped and the click lands wherever the pointer
/// already is.  The result echoes the coordinates as sent in that case.
pub struct ClickHandler;

impl ActionHandler for ClickHandler {
    fn name(&self) -> &'static str {
        "click"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let (button, label) = cmd.button()?;

        let clicked = match (cmd.lenient_coordinate("x"), cmd.lenient_coordinate("y")) {
            (Some(x), Some(y)) => {
                ctx.driver.move_to(x, y, Duration::ZERO)?;
                json!([x, y])
            }
            _ => json!([raw(cmd, "x"), raw(cmd, "y")]),
        };

        ctx.driver.click(button)?;
        Ok(json!({ "clicked": clicked, "button": label }))
    }
}

/// `dragto`: hold `button` and glide to absolute `(x, y)`.
pub struct DragToHandler;

impl ActionHandler for DragToHandler {
    fn name(&self) -> &'static str {
        "dragto"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let (x, y) = required_point(cmd, "x", "y")?;
        let duration = seconds(cmd, "duration")?;
        let (button, label) = cmd.button()?;
        ctx.driver.drag_to(x, y, duration, button)?;
        Ok(json!({ "dragged_to": [x, y], "button": label }))
    }
}

/// `dragrel`: hold `button` and glide by `(dx, dy)`.
///
/// `x`/`y` are accepted in place of `dx`/`dy` when neither of the latter is sent.
pub struct DragRelHandler;

impl ActionHandler for DragRelHandler {
    fn name(&self) -> &'static str {
        "dragrel"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let (dx, dy) = if cmd.get("dx").is_some() || cmd.get("dy").is_some() {
            required_point(cmd, "dx", "dy")?
        } else {
            required_point(cmd, "x", "y")
                .map_err(|_| HandlerError::invalid("Requires 'dx' and 'dy'"))?
        };
        let duration = seconds(cmd, "duration")?;
        let (button, _) = cmd.button()?;
        ctx.driver.drag_rel(dx, dy, duration, button)?;
        Ok(json!({ "dragged_rel": [dx, dy] }))
    }
}

/// `scroll`: turn the wheel by `clicks` notches, optionally at `(x, y)`.
pub struct ScrollHandler;

impl ActionHandler for ScrollHandler {
    fn name(&self) -> &'static str {
        "scroll"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let clicks = cmd
            .integer("clicks")?
            .ok_or_else(|| HandlerError::invalid("Requires 'clicks'"))?;
        let clicks = i32::try_from(clicks)
            .map_err(|_| HandlerError::invalid("'clicks' is out of range"))?;

        if let (Some(x), Some(y)) = (cmd.coordinate("x")?, cmd.coordinate("y")?) {
            ctx.driver.move_to(x, y, Duration::ZERO)?;
        }

        ctx.driver.scroll(clicks)?;
        Ok(json!({ "scrolled": clicks }))
    }
}

fn raw(cmd: &CommandMessage, key: &str) -> Value {
    cmd.get(key).cloned().unwrap_or(Value::Null)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
