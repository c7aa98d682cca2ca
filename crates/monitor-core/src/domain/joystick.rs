//! Joystick emulation on the numeric keypad.
//!
//! The emulator reserves one byte per joystick port right after the keyboard
//! status bytes.  Keypad 8/2/4/6 are up/down/left/right and keypad 0 is fire;
//! each sets one bit while held:
//!
//! | Bit | Direction |
//! |-----|-----------|
//! | 0   | up        |
//! | 1   | down      |
//! | 2   | left      |
//! | 3   | right     |
//! | 4   | fire      |
//!
//! Bits are active-high.  Held keys are tracked the same way the keyboard
//! encoder tracks them, so repeats and stray releases change nothing.
//!
//! This byte layout is the viewer's own convention: the emulator reserves
//! the bytes but defines no format for them, and it is not the CIA's
//! active-low port register.

use std::collections::BTreeSet;

use thiserror::Error;

use super::encoder::Transition;
use crate::keymap::host::HostKey;

/// Error type for joystick port selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("joystick port must be 1 or 2, got {0}")]
pub struct InvalidPort(pub u8);

/// Which joystick port the keypad drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoystickPort {
    One,
    #[default]
    Two,
}

impl JoystickPort {
    /// Port number as the emulator counts them (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            JoystickPort::One => 1,
            JoystickPort::Two => 2,
        }
    }
}

impl TryFrom<u8> for JoystickPort {
    type Error = InvalidPort;

    fn try_from(port: u8) -> Result<Self, Self::Error> {
        match port {
            1 => Ok(JoystickPort::One),
            2 => Ok(JoystickPort::Two),
            other => Err(InvalidPort(other)),
        }
    }
}

fn direction_bit(key: HostKey) -> Option<u8> {
    match key {
        HostKey::Keypad8 => Some(0),
        HostKey::Keypad2 => Some(1),
        HostKey::Keypad4 => Some(2),
        HostKey::Keypad6 => Some(3),
        HostKey::Keypad0 => Some(4),
        _ => None,
    }
}

/// Returns `true` if `key` is one of the keypad keys a joystick takes over.
pub fn is_joystick_key(key: HostKey) -> bool {
    direction_bit(key).is_some()
}

/// What [`JoystickEncoder::apply`] did with a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickOutcome {
    /// The key does not drive the joystick.
    NotJoystick,
    /// Repeat or stray release; the port byte is unchanged.
    Unchanged,
    /// The new port byte to publish.
    Changed(u8),
}

/// Tracks held keypad keys and produces the port byte.
#[derive(Debug, Clone, Default)]
pub struct JoystickEncoder {
    port: JoystickPort,
    held: BTreeSet<HostKey>,
}

impl JoystickEncoder {
    pub fn new(port: JoystickPort) -> Self {
        Self {
            port,
            held: BTreeSet::new(),
        }
    }

    pub fn port(&self) -> JoystickPort {
        self.port
    }

    /// Returns `true` if `key` drives the joystick.
    pub fn handles(&self, key: HostKey) -> bool {
        is_joystick_key(key)
    }

    /// Applies a transition for `key`.
    pub fn apply(&mut self, transition: Transition, key: HostKey) -> JoystickOutcome {
        if !is_joystick_key(key) {
            return JoystickOutcome::NotJoystick;
        }
        let changed = match transition {
            Transition::Down => self.held.insert(key),
            Transition::Up => self.held.remove(&key),
        };
        if changed {
            JoystickOutcome::Changed(self.state())
        } else {
            JoystickOutcome::Unchanged
        }
    }

    /// The current port byte.
    pub fn state(&self) -> u8 {
        self.held
            .iter()
            .filter_map(|&key| direction_bit(key))
            .fold(0, |byte, bit| byte | (1 << bit))
    }

    /// Releases everything and returns the (zero) port byte.
    pub fn release_all(&mut self) -> u8 {
        self.held.clear();
        self.state()
    }
}
