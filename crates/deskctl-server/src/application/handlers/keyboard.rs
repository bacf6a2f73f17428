//! Keyboard actions: type, keydown, keyup, press, hotkey.

use deskctl_core::keymap::KeyMapper;
use deskctl_core::{CommandMessage, HidKeyCode};
use serde_json::{json, Value};

use super::{seconds, ActionHandler, HandlerContext, HandlerError};

/// Reads the required `key` field and resolves it against the key table.
fn required_key<'a>(cmd: &'a CommandMessage) -> Result<(HidKeyCode, &'a str), HandlerError> {
    let name = cmd
        .string("key")?
        .ok_or_else(|| HandlerError::invalid("Requires 'key'"))?;
    let key = KeyMapper::key_from_name(name)
        .ok_or_else(|| HandlerError::invalid(format!("Unknown key '{name}'")))?;
    Ok((key, name))
}

/// `type`: types `text` one character at a time.
pub struct TypeHandler;

impl ActionHandler for TypeHandler {
    fn name(&self) -> &'static str {
        "type"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let text = cmd.string("text")?.unwrap_or_default();
        if text.is_empty() {
            return Err(HandlerError::invalid("No text to type"));
        }
        let interval = seconds(cmd, "interval")?;
        ctx.driver.type_text(text, interval)?;
        Ok(json!({ "typed": text }))
    }
}

/// `keydown`: presses `key` and leaves it held.
pub struct KeyDownHandler;

impl ActionHandler for KeyDownHandler {
    fn name(&self) -> &'static str {
        "keydown"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let (key, name) = required_key(cmd)?;
        ctx.driver.key_down(key)?;
        Ok(json!({ "keydown": name }))
    }
}

/// `keyup`: releases `key`.
pub struct KeyUpHandler;

impl ActionHandler for KeyUpHandler {
    fn name(&self) -> &'static str {
        "keyup"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let (key, name) = required_key(cmd)?;
        ctx.driver.key_up(key)?;
        Ok(json!({ "keyup": name }))
    }
}

/// `press`: taps `key` `presses` times (default once).
pub struct PressHandler;

impl ActionHandler for PressHandler {
    fn name(&self) -> &'static str {
        "press"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let (key, name) = required_key(cmd)?;
        let presses = match cmd.integer("presses")? {
            None => 1,
            Some(n) => u32::try_from(n)
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| HandlerError::invalid("'presses' must be a positive integer"))?,
        };
        let interval = seconds(cmd, "interval")?;
        ctx.driver.press(key, presses, interval)?;
        Ok(json!({ "pressed": name }))
    }
}

/// `hotkey`: presses `keys` in order, then releases them in reverse.
pub struct HotkeyHandler;

impl ActionHandler for HotkeyHandler {
    fn name(&self) -> &'static str {
        "hotkey"
    }

    fn handle(&self, cmd: &CommandMessage, ctx: &HandlerContext) -> Result<Value, HandlerError> {
        let names = cmd.string_list("keys")?.unwrap_or_default();
        if names.is_empty() {
            return Err(HandlerError::invalid("Requires 'keys'"));
        }
        let keys = KeyMapper::keys_from_names(names.iter().copied())
            .map_err(|name| HandlerError::invalid(format!("Unknown key '{name}'")))?;
        let interval = seconds(cmd, "interval")?;
        ctx.driver.hotkey(&keys, interval)?;
        Ok(json!({ "hotkey": names }))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::application::handlers::tests::{cmd, context};
    use crate::infrastructure::driver::mock::DriverCall;

    #[test]
    fn test_type_echoes_text() {
        // Arrange
        let (driver, ctx) = context();

        // Act
        let result = TypeHandler
            .handle(&cmd(json!({"text": "hello", "interval": 0.05})), &ctx)
            .unwrap();

        // Assert
        assert_eq!(result, json!({"typed": "hello"}));
        assert_eq!(
            driver.calls(),
            vec![DriverCall::TypeText {
                text: "hello".to_string(),
                interval: Duration::from_millis(50)
            }]
        );
    }

    #[test]
    fn test_type_rejects_empty_or_missing_text() {
        let (driver, ctx) = context();

        for params in [json!({}), json!({"text": ""})] {
            let err = TypeHandler.handle(&cmd(params), &ctx).unwrap_err();
            assert_eq!(err.to_string(), "No text to type");
        }
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn test_type_rejects_non_string_text() {
        let (_, ctx) = context();
        let err = TypeHandler.handle(&cmd(json!({"text": 42})), &ctx).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidParams(_)));
    }

    #[test]
    fn test_keydown_and_keyup_echo_key_as_sent() {
        let (driver, ctx) = context();

        let down = KeyDownHandler
            .handle(&cmd(json!({"key": "Shift"})), &ctx)
            .unwrap();
        let up = KeyUpHandler.handle(&cmd(json!({"key": "Shift"})), &ctx).unwrap();

        assert_eq!(down, json!({"keydown": "Shift"}));
        assert_eq!(up, json!({"keyup": "Shift"}));
        assert_eq!(
            driver.calls(),
            vec![
                DriverCall::KeyDown(HidKeyCode::ShiftLeft),
                DriverCall::KeyUp(HidKeyCode::ShiftLeft),
            ]
        );
    }

    #[test]
    fn test_keydown_unknown_key_is_invalid_params() {
        let (driver, ctx) = context();
        let err = KeyDownHandler
            .handle(&cmd(json!({"key": "hyper"})), &ctx)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown key 'hyper'");
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn test_keyup_missing_key_is_invalid_params() {
        let (_, ctx) = context();
        let err = KeyUpHandler.handle(&cmd(json!({})), &ctx).unwrap_err();
        assert_eq!(err.to_string(), "Requires 'key'");
    }

    #[test]
    fn test_press_defaults_to_one_press() {
        let (driver, ctx) = context();

        let result = PressHandler.handle(&cmd(json!({"key": "enter"})), &ctx).unwrap();

        assert_eq!(result, json!({"pressed": "enter"}));
        assert_eq!(
            driver.calls(),
            vec![DriverCall::Press {
                key: HidKeyCode::Enter,
                presses: 1,
                interval: Duration::ZERO
            }]
        );
    }

    #[test]
    fn test_press_rejects_zero_presses() {
        let (_, ctx) = context();
        let err = PressHandler
            .handle(&cmd(json!({"key": "a", "presses": 0})), &ctx)
            .unwrap_err();
        assert!(matches!(err, HandlerError::InvalidParams(_)));
    }

    #[test]
    fn test_hotkey_resolves_every_key() {
        let (driver, ctx) = context();

        let result = HotkeyHandler
            .handle(&cmd(json!({"keys": ["ctrl", "c"]})), &ctx)
            .unwrap();

        assert_eq!(result, json!({"hotkey": ["ctrl", "c"]}));
        assert_eq!(
            driver.calls(),
            vec![DriverCall::Hotkey {
                keys: vec![HidKeyCode::ControlLeft, HidKeyCode::KeyC],
                interval: Duration::ZERO
            }]
        );
    }

    #[test]
    fn test_hotkey_names_the_unknown_key() {
        let (driver, ctx) = context();
        let err = HotkeyHandler
            .handle(&cmd(json!({"keys": ["ctrl", "nope"]})), &ctx)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown key 'nope'");
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn test_hotkey_requires_a_non_empty_list() {
        let (_, ctx) = context();
        assert!(HotkeyHandler.handle(&cmd(json!({})), &ctx).is_err());
        assert!(HotkeyHandler.handle(&cmd(json!({"keys": []})), &ctx).is_err());
        assert!(HotkeyHandler
            .handle(&cmd(json!({"keys": "ctrl"})), &ctx)
            .is_err());
    }
}
