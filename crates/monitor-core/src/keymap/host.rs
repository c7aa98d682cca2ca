//! Host key identifiers.
//!
//! A [`HostKey`] names a key on the *viewer's* keyboard, before it is mapped
//! onto the emulated machine's 8×8 matrix.  The set covers every key the
//! built-in C64 matrix uses, plus the cursor keys and the numeric keypad so
//! that aliases and joystick emulation have something to bind to.
//!
//! # Symbol keys
//!
//! Some entries (`At`, `Asterisk`, `Caret`, `Dollar`, `Colon`, `Plus`) are
//! *symbols* rather than physical key positions.  The C64 has dedicated keys
//! for them, so the viewer binds them directly; an input source that only
//! sees physical positions simply never produces them.
//!
//! # The `Unknown` sentinel
//!
//! [`HostKey::Unknown`] stands for any key an input source could not
//! translate.  It never appears in a matrix, so applying it is a no-op.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A key on the host keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HostKey {
    // Letters
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,

    // Digits
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,

    // Punctuation and symbols
    At,
    Asterisk,
    Caret,
    Colon,
    Comma,
    Dollar,
    Equals,
    Minus,
    Period,
    Plus,
    Semicolon,
    Slash,

    // Control keys
    Backspace,
    Delete,
    Escape,
    Home,
    Return,
    Space,
    Tab,

    // Modifiers
    LeftCtrl,
    LeftShift,
    RightShift,
    RightAlt,

    // Cursor keys
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    // Function keys
    F1,
    F3,
    F5,
    F7,

    // Numeric keypad
    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,

    /// No mapping.
    Unknown,
}

/// Returned when a key name does not match any [`HostKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key name: {0:?}")]
pub struct KeyParseError(pub String);

impl HostKey {
    /// Every named key, in declaration order.  `Unknown` is not included.
    pub const ALL: &'static [HostKey] = &[
        HostKey::KeyA,
        HostKey::KeyB,
        HostKey::KeyC,
        HostKey::KeyD,
        HostKey::KeyE,
        HostKey::KeyF,
        HostKey::KeyG,
        HostKey::KeyH,
        HostKey::KeyI,
        HostKey::KeyJ,
        HostKey::KeyK,
        HostKey::KeyL,
        HostKey::KeyM,
        HostKey::KeyN,
        HostKey::KeyO,
        HostKey::KeyP,
        HostKey::KeyQ,
        HostKey::KeyR,
        HostKey::KeyS,
        HostKey::KeyT,
        HostKey::KeyU,
        HostKey::KeyV,
        HostKey::KeyW,
        HostKey::KeyX,
        HostKey::KeyY,
        HostKey::KeyZ,
        HostKey::Digit0,
        HostKey::Digit1,
        HostKey::Digit2,
        HostKey::Digit3,
        HostKey::Digit4,
        HostKey::Digit5,
        HostKey::Digit6,
        HostKey::Digit7,
        HostKey::Digit8,
        HostKey::Digit9,
        HostKey::At,
        HostKey::Asterisk,
        HostKey::Caret,
        HostKey::Colon,
        HostKey::Comma,
        HostKey::Dollar,
        HostKey::Equals,
        HostKey::Minus,
        HostKey::Period,
        HostKey::Plus,
        HostKey::Semicolon,
        HostKey::Slash,
        HostKey::Backspace,
        HostKey::Delete,
        HostKey::Escape,
        HostKey::Home,
        HostKey::Return,
        HostKey::Space,
        HostKey::Tab,
        HostKey::LeftCtrl,
        HostKey::LeftShift,
        HostKey::RightShift,
        HostKey::RightAlt,
        HostKey::ArrowDown,
        HostKey::ArrowLeft,
        HostKey::ArrowRight,
        HostKey::ArrowUp,
        HostKey::F1,
        HostKey::F3,
        HostKey::F5,
        HostKey::F7,
        HostKey::Keypad0,
        HostKey::Keypad1,
        HostKey::Keypad2,
        HostKey::Keypad3,
        HostKey::Keypad4,
        HostKey::Keypad5,
        HostKey::Keypad6,
        HostKey::Keypad7,
        HostKey::Keypad8,
        HostKey::Keypad9,
    ];

    /// The key's canonical name, identical to the variant name.
    pub fn name(self) -> &'static str {
        match self {
            HostKey::KeyA => "KeyA",
            HostKey::KeyB => "KeyB",
            HostKey::KeyC => "KeyC",
            HostKey::KeyD => "KeyD",
            HostKey::KeyE => "KeyE",
            HostKey::KeyF => "KeyF",
            HostKey::KeyG => "KeyG",
            HostKey::KeyH => "KeyH",
            HostKey::KeyI => "KeyI",
            HostKey::KeyJ => "KeyJ",
            HostKey::KeyK => "KeyK",
            HostKey::KeyL => "KeyL",
            HostKey::KeyM => "KeyM",
            HostKey::KeyN => "KeyN",
            HostKey::KeyO => "KeyO",
            HostKey::KeyP => "KeyP",
            HostKey::KeyQ => "KeyQ",
            HostKey::KeyR => "KeyR",
            HostKey::KeyS => "KeyS",
            HostKey::KeyT => "KeyT",
            HostKey::KeyU => "KeyU",
            HostKey::KeyV => "KeyV",
            HostKey::KeyW => "KeyW",
            HostKey::KeyX => "KeyX",
            HostKey::KeyY => "KeyY",
            HostKey::KeyZ => "KeyZ",
            HostKey::Digit0 => "Digit0",
            HostKey::Digit1 => "Digit1",
            HostKey::Digit2 => "Digit2",
            HostKey::Digit3 => "Digit3",
            HostKey::Digit4 => "Digit4",
            HostKey::Digit5 => "Digit5",
            HostKey::Digit6 => "Digit6",
            HostKey::Digit7 => "Digit7",
            HostKey::Digit8 => "Digit8",
            HostKey::Digit9 => "Digit9",
            HostKey::At => "At",
            HostKey::Asterisk => "Asterisk",
            HostKey::Caret => "Caret",
            HostKey::Colon => "Colon",
            HostKey::Comma => "Comma",
            HostKey::Dollar => "Dollar",
            HostKey::Equals => "Equals",
            HostKey::Minus => "Minus",
            HostKey::Period => "Period",
            HostKey::Plus => "Plus",
            HostKey::Semicolon => "Semicolon",
            HostKey::Slash => "Slash",
            HostKey::Backspace => "Backspace",
            HostKey::Delete => "Delete",
            HostKey::Escape => "Escape",
            HostKey::Home => "Home",
            HostKey::Return => "Return",
            HostKey::Space => "Space",
            HostKey::Tab => "Tab",
            HostKey::LeftCtrl => "LeftCtrl",
            HostKey::LeftShift => "LeftShift",
            HostKey::RightShift => "RightShift",
            HostKey::RightAlt => "RightAlt",
            HostKey::ArrowDown => "ArrowDown",
            HostKey::ArrowLeft => "ArrowLeft",
            HostKey::ArrowRight => "ArrowRight",
            HostKey::ArrowUp => "ArrowUp",
            HostKey::F1 => "F1",
            HostKey::F3 => "F3",
            HostKey::F5 => "F5",
            HostKey::F7 => "F7",
            HostKey::Keypad0 => "Keypad0",
            HostKey::Keypad1 => "Keypad1",
            HostKey::Keypad2 => "Keypad2",
            HostKey::Keypad3 => "Keypad3",
            HostKey::Keypad4 => "Keypad4",
            HostKey::Keypad5 => "Keypad5",
            HostKey::Keypad6 => "Keypad6",
            HostKey::Keypad7 => "Keypad7",
            HostKey::Keypad8 => "Keypad8",
            HostKey::Keypad9 => "Keypad9",
            HostKey::Unknown => "Unknown",
        }
    }

    /// Looks up a key by name, ignoring ASCII case.
    ///
    /// A single character is also accepted for letters and digits, so `"a"`
    /// and `"7"` resolve to [`HostKey::KeyA`] and [`HostKey::Digit7`].
    pub fn from_name(name: &str) -> Option<HostKey> {
        let name = name.trim();
        if let [c] = name.as_bytes() {
            return match c.to_ascii_uppercase() {
                c @ b'A'..=b'Z' => HostKey::ALL.get(usize::from(c - b'A')).copied(),
                c @ b'0'..=b'9' => HostKey::ALL.get(26 + usize::from(c - b'0')).copied(),
                _ => None,
            };
        }
        HostKey::ALL
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HostKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostKey::from_name(s).ok_or_else(|| KeyParseError(s.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
