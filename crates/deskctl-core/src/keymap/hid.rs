//! USB HID Usage IDs (page 0x07, Keyboard/Keypad page).
//!
//! This is the canonical key representation passed from the keyboard handlers
//! to the input driver.  Client-facing key names are resolved to HID codes at
//! the protocol boundary so drivers only ever see validated, typed keys.
//!
//! Reference: USB HID Usage Tables 1.3, Section 10 (Keyboard/Keypad page 0x07).
//!
//! # Key names
//!
//! The accepted names follow the vocabulary desktop-automation clients
//! already use:
//!
//! | Name(s)                     | Key            |
//! |-----------------------------|----------------|
//! | `a`..`z`, `0`..`9`          | letters/digits |
//! | `enter`, `return`           | Enter          |
//! | `esc`, `escape`             | Escape         |
//! | `ctrl`, `ctrlleft`          | Left Control   |
//! | `win`, `command`, `cmd`     | Left Meta      |
//! | `num0`..`num9`              | Numpad digits  |
//!
//! Names are matched case-insensitively.  Single punctuation characters
//! (`-`, `=`, `[`, `;`, ...) map to the key that produces them unshifted on a
//! US layout.

/// USB HID Usage ID for keyboard keys (page 0x07).
///
/// The numeric value of each variant is its HID Usage ID on the keyboard/keypad page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum HidKeyCode {
    // Letters (HID 0x04..=0x1D)
    KeyA = 0x04,
    KeyB = 0x05,
    KeyC = 0x06,
    KeyD = 0x07,
    KeyE = 0x08,
    KeyF = 0x09,
    KeyG = 0x0A,
    KeyH = 0x0B,
    KeyI = 0x0C,
    KeyJ = 0x0D,
    KeyK = 0x0E,
    KeyL = 0x0F,
    KeyM = 0x10,
    KeyN = 0x11,
    KeyO = 0x12,
    KeyP = 0x13,
    KeyQ = 0x14,
    KeyR = 0x15,
    KeyS = 0x16,
    KeyT = 0x17,
    KeyU = 0x18,
    KeyV = 0x19,
    KeyW = 0x1A,
    KeyX = 0x1B,
    KeyY = 0x1C,
    KeyZ = 0x1D,

    // Digits (HID 0x1E..=0x27)
    Digit1 = 0x1E,
    Digit2 = 0x1F,
    Digit3 = 0x20,
    Digit4 = 0x21,
    Digit5 = 0x22,
    Digit6 = 0x23,
    Digit7 = 0x24,
    Digit8 = 0x25,
    Digit9 = 0x26,
    Digit0 = 0x27,

    // Control keys (HID 0x28..=0x38)
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Backquote = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,

    CapsLock = 0x39,

    // Function keys (HID 0x3A..=0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation cluster (HID 0x46..=0x52)
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,

    // Numpad (HID 0x53..=0x63)
    NumLock = 0x53,
    NumpadDivide = 0x54,
    NumpadMultiply = 0x55,
    NumpadSubtract = 0x56,
    NumpadAdd = 0x57,
    NumpadEnter = 0x58,
    Numpad1 = 0x59,
    Numpad2 = 0x5A,
    Numpad3 = 0x5B,
    Numpad4 = 0x5C,
    Numpad5 = 0x5D,
    Numpad6 = 0x5E,
    Numpad7 = 0x5F,
    Numpad8 = 0x60,
    Numpad9 = 0x61,
    Numpad0 = 0x62,
    NumpadDecimal = 0x63,

    ContextMenu = 0x65,

    // Modifier keys (HID 0xE0..=0xE7)
    ControlLeft = 0xE0,
    ShiftLeft = 0xE1,
    AltLeft = 0xE2,
    MetaLeft = 0xE3,
    ControlRight = 0xE4,
    ShiftRight = 0xE5,
    AltRight = 0xE6,
    MetaRight = 0xE7,
}

impl HidKeyCode {
    /// Resolves a client-facing key name (see module docs) to a key code.
    ///
    /// Returns `None` when the name has no mapping.
    pub fn from_key_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        let code = match lower.as_str() {
            "a" => Self::KeyA,
            "b" => Self::KeyB,
            "c" => Self::KeyC,
            "d" => Self::KeyD,
            "e" => Self::KeyE,
            "f" => Self::KeyF,
            "g" => Self::KeyG,
            "h" => Self::KeyH,
            "i" => Self::KeyI,
            "j" => Self::KeyJ,
            "k" => Self::KeyK,
            "l" => Self::KeyL,
            "m" => Self::KeyM,
            "n" => Self::KeyN,
            "o" => Self::KeyO,
            "p" => Self::KeyP,
            "q" => Self::KeyQ,
            "r" => Self::KeyR,
            "s" => Self::KeyS,
            "t" => Self::KeyT,
            "u" => Self::KeyU,
            "v" => Self::KeyV,
            "w" => Self::KeyW,
            "x" => Self::KeyX,
            "y" => Self::KeyY,
            "z" => Self::KeyZ,
            "1" => Self::Digit1,
            "2" => Self::Digit2,
            "3" => Self::Digit3,
            "4" => Self::Digit4,
            "5" => Self::Digit5,
            "6" => Self::Digit6,
            "7" => Self::Digit7,
            "8" => Self::Digit8,
            "9" => Self::Digit9,
            "0" => Self::Digit0,
            "enter" | "return" | "\n" => Self::Enter,
            "esc" | "escape" => Self::Escape,
            "backspace" => Self::Backspace,
            "tab" | "\t" => Self::Tab,
            "space" | " " => Self::Space,
            "-" => Self::Minus,
            "=" => Self::Equal,
            "[" => Self::BracketLeft,
            "]" => Self::BracketRight,
            "\\" => Self::Backslash,
            ";" => Self::Semicolon,
            "'" => Self::Quote,
            "`" => Self::Backquote,
            "," => Self::Comma,
            "." => Self::Period,
            "/" => Self::Slash,
            "capslock" => Self::CapsLock,
            "f1" => Self::F1,
            "f2" => Self::F2,
            "f3" => Self::F3,
            "f4" => Self::F4,
            "f5" => Self::F5,
            "f6" => Self::F6,
            "f7" => Self::F7,
            "f8" => Self::F8,
            "f9" => Self::F9,
            "f10" => Self::F10,
            "f11" => Self::F11,
            "f12" => Self::F12,
            "printscreen" | "prtsc" | "prntscrn" => Self::PrintScreen,
            "scrolllock" => Self::ScrollLock,
            "pause" => Self::Pause,
            "insert" => Self::Insert,
            "home" => Self::Home,
            "pageup" | "pgup" => Self::PageUp,
            "delete" | "del" => Self::Delete,
            "end" => Self::End,
            "pagedown" | "pgdn" => Self::PageDown,
            "right" => Self::ArrowRight,
            "left" => Self::ArrowLeft,
            "down" => Self::ArrowDown,
            "up" => Self::ArrowUp,
            "numlock" => Self::NumLock,
            "divide" => Self::NumpadDivide,
            "multiply" => Self::NumpadMultiply,
            "subtract" => Self::NumpadSubtract,
            "add" => Self::NumpadAdd,
            "num1" => Self::Numpad1,
            "num2" => Self::Numpad2,
            "num3" => Self::Numpad3,
            "num4" => Self::Numpad4,
            "num5" => Self::Numpad5,
            "num6" => Self::Numpad6,
            "num7" => Self::Numpad7,
            "num8" => Self::Numpad8,
            "num9" => Self::Numpad9,
            "num0" => Self::Numpad0,
            "decimal" => Self::NumpadDecimal,
            "apps" => Self::ContextMenu,
            "ctrl" | "ctrlleft" => Self::ControlLeft,
            "shift" | "shiftleft" => Self::ShiftLeft,
            "alt" | "altleft" | "option" => Self::AltLeft,
            "win" | "winleft" | "command" | "cmd" => Self::MetaLeft,
            "ctrlright" => Self::ControlRight,
            "shiftright" => Self::ShiftRight,
            "altright" | "optionright" => Self::AltRight,
            "winright" => Self::MetaRight,
            _ => return None,
        };
        Some(code)
    }

    /// Returns the raw USB HID Usage ID value for this key code.
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Names that must resolve, paired with the expected key code.
    const STANDARD_NAMES: &[(&str, HidKeyCode)] = &[
        ("a", HidKeyCode::KeyA),
        ("z", HidKeyCode::KeyZ),
        ("1", HidKeyCode::Digit1),
        ("0", HidKeyCode::Digit0),
        ("enter", HidKeyCode::Enter),
        ("return", HidKeyCode::Enter),
        ("esc", HidKeyCode::Escape),
        ("backspace", HidKeyCode::Backspace),
        ("tab", HidKeyCode::Tab),
        ("space", HidKeyCode::Space),
        (" ", HidKeyCode::Space),
        ("capslock", HidKeyCode::CapsLock),
        ("f1", HidKeyCode::F1),
        ("f12", HidKeyCode::F12),
        ("prtsc", HidKeyCode::PrintScreen),
        ("pgup", HidKeyCode::PageUp),
        ("del", HidKeyCode::Delete),
        ("left", HidKeyCode::ArrowLeft),
        ("up", HidKeyCode::ArrowUp),
        ("num5", HidKeyCode::Numpad5),
        ("apps", HidKeyCode::ContextMenu),
        ("ctrl", HidKeyCode::ControlLeft),
        ("shiftright", HidKeyCode::ShiftRight),
        ("cmd", HidKeyCode::MetaLeft),
        (";", HidKeyCode::Semicolon),
        ("/", HidKeyCode::Slash),
    ];

    #[test]
    fn test_from_key_name_resolves_all_standard_names() {
        for &(name, expected) in STANDARD_NAMES {
            // Arrange / Act
            let result = HidKeyCode::from_key_name(name);

            // Assert
            assert_eq!(result, Some(expected), "'{name}' should map to {expected:?}");
        }
    }

    #[test]
    fn test_from_key_name_ignores_ascii_case() {
        assert_eq!(HidKeyCode::from_key_name("PageDown"), Some(HidKeyCode::PageDown));
        assert_eq!(HidKeyCode::from_key_name("A"), Some(HidKeyCode::KeyA));
    }

    #[test]
    fn test_unknown_names_return_none() {
        for unknown in ["", "hyper", "f13", "ctrl+c", "enterr", "ä"] {
            assert_eq!(
                HidKeyCode::from_key_name(unknown),
                None,
                "'{unknown}' should not resolve"
            );
        }
    }

    #[test]
    fn test_as_u16_returns_hid_usage_id() {
        assert_eq!(HidKeyCode::KeyA.as_u16(), 0x04);
        assert_eq!(HidKeyCode::Enter.as_u16(), 0x28);
        assert_eq!(HidKeyCode::MetaRight.as_u16(), 0xE7);
    }
}
