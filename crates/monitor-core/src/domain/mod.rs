//! Domain entities for the SHM monitor.
//!
//! This module contains the shared-memory protocol itself with no
//! infrastructure dependencies: nothing here maps memory, opens windows, or
//! reads input devices.  Everything operates on plain byte slices and values,
//! so every rule of the protocol can be unit-tested in isolation.
//!
//! - [`layout`] – byte offsets of the grid, keyboard, and joystick fields.
//! - [`palette`] – the 16-entry color table and its hex byte-swap.
//! - [`grid`] – the column-major pixel grid handed to renderers.
//! - [`decoder`] – raw grid bytes to colors.
//! - [`matrix`] – the 8×8 keyboard matrix table.
//! - [`encoder`] – hold counters and packed status bytes.
//! - [`joystick`] – keypad keys to joystick port bits.

pub mod decoder;
pub mod encoder;
pub mod grid;
pub mod joystick;
pub mod layout;
pub mod matrix;
pub mod palette;
