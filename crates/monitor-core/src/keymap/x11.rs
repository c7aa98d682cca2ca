//! X11 KeySym to [`HostKey`] translation table for Linux input sources.
//!
//! X11 KeySym values are defined in X11/keysymdef.h.
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! # Letters in both cases
//!
//! An X11 client reports the *shifted* KeySym when Shift is held (`XK_A`
//! instead of `XK_a`).  The C64 matrix cares about key positions, so both
//! cases map to the same [`HostKey`] letter.

use super::host::HostKey;

/// Translates an X11 KeySym value to a [`HostKey`].
///
/// Returns [`HostKey::Unknown`] if the KeySym has no mapping.
pub fn keysym_to_host(keysym: u32) -> HostKey {
    match keysym {
        // Letters, lowercase (XK_a..XK_z) and uppercase (XK_A..XK_Z)
        0x0061..=0x007A => letter(keysym - 0x0061),
        0x0041..=0x005A => letter(keysym - 0x0041),

        // Digits (XK_0..XK_9)
        0x0030..=0x0039 => HostKey::ALL
            .get(26 + (keysym - 0x0030) as usize)
            .copied()
            .unwrap_or(HostKey::Unknown),

        // Punctuation and symbols
        0x0040 => HostKey::At,        // XK_at
        0x002A => HostKey::Asterisk,  // XK_asterisk
        0x005E => HostKey::Caret,     // XK_asciicircum
        0x003A => HostKey::Colon,     // XK_colon
        0x002C => HostKey::Comma,     // XK_comma
        0x0024 => HostKey::Dollar,    // XK_dollar
        0x003D => HostKey::Equals,    // XK_equal
        0x002D => HostKey::Minus,     // XK_minus
        0x002E => HostKey::Period,    // XK_period
        0x002B => HostKey::Plus,      // XK_plus
        0x003B => HostKey::Semicolon, // XK_semicolon
        0x002F => HostKey::Slash,     // XK_slash

        // Control keys
        0xFF08 => HostKey::Backspace, // XK_BackSpace
        0xFFFF => HostKey::Delete,    // XK_Delete
        0xFF1B => HostKey::Escape,    // XK_Escape
        0xFF50 => HostKey::Home,      // XK_Home
        0xFF0D => HostKey::Return,    // XK_Return
        0x0020 => HostKey::Space,     // XK_space
        0xFF09 => HostKey::Tab,       // XK_Tab

        // Modifiers
        0xFFE3 => HostKey::LeftCtrl,   // XK_Control_L
        0xFFE1 => HostKey::LeftShift,  // XK_Shift_L
        0xFFE2 => HostKey::RightShift, // XK_Shift_R
        0xFFEA => HostKey::RightAlt,   // XK_Alt_R

        // Cursor keys
        0xFF51 => HostKey::ArrowLeft,  // XK_Left
        0xFF52 => HostKey::ArrowUp,    // XK_Up
        0xFF53 => HostKey::ArrowRight, // XK_Right
        0xFF54 => HostKey::ArrowDown,  // XK_Down

        // Function keys
        0xFFBE => HostKey::F1, // XK_F1
        0xFFC0 => HostKey::F3, // XK_F3
        0xFFC2 => HostKey::F5, // XK_F5
        0xFFC4 => HostKey::F7, // XK_F7

        // Keypad digits (XK_KP_0..XK_KP_9)
        0xFFB0 => HostKey::Keypad0,
        0xFFB1 => HostKey::Keypad1,
        0xFFB2 => HostKey::Keypad2,
        0xFFB3 => HostKey::Keypad3,
        0xFFB4 => HostKey::Keypad4,
        0xFFB5 => HostKey::Keypad5,
        0xFFB6 => HostKey::Keypad6,
        0xFFB7 => HostKey::Keypad7,
        0xFFB8 => HostKey::Keypad8,
        0xFFB9 => HostKey::Keypad9,

        _ => HostKey::Unknown,
    }
}

fn letter(offset: u32) -> HostKey {
    HostKey::ALL
        .get(offset as usize)
        .copied()
        .unwrap_or(HostKey::Unknown)
}
