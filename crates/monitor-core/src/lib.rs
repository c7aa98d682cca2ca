//! # monitor-core
//!
//! Shared library for the SHM monitor containing the frame store layout, the
//! color palette, host key identifiers, and the keyboard matrix encoder.
//!
//! This crate is used by the viewer binary and by anything else that needs to
//! speak the emulator's shared-memory contract.  It has zero dependencies on
//! OS APIs, shared-memory syscalls, or windowing.
//!
//! # Architecture overview (for beginners)
//!
//! A C64 emulator process renders its video output into a block of System V
//! shared memory.  A separate *viewer* process maps the same block, turns the
//! raw bytes into pixels, and draws them.  Keyboard input flows the other way:
//! the viewer packs the currently held keys into two bytes at the end of the
//! block, and the emulator reads them as if a real keyboard matrix were wired
//! to its CIA chip.
//!
//! This crate (`monitor-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure protocol logic: where every byte lives in the segment
//!   ([`FrameLayout`]), how a byte becomes a color ([`ColorTable`],
//!   [`FrameDecoder`]), and how key transitions become packed matrix bytes
//!   ([`KeyboardMatrixEncoder`], [`JoystickEncoder`]).
//!
//! - **`keymap`** – The host key identifiers ([`HostKey`]) the viewer feeds
//!   into the encoder, plus translation from X11 KeySyms.

pub mod domain;
pub mod keymap;

pub use domain::decoder::{DecodeError, FrameDecoder};
pub use domain::encoder::{
    EncodeOutcome, HoldCounters, KeyTransition, KeyboardMatrixEncoder, MatrixStatus, Transition,
};
pub use domain::grid::Grid;
pub use domain::joystick::{
    is_joystick_key, InvalidPort, JoystickEncoder, JoystickOutcome, JoystickPort,
};
pub use domain::layout::{FrameLayout, LayoutError, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use domain::matrix::{KeyboardMatrix, MatrixCell, MatrixError, MATRIX_SIZE};
pub use domain::palette::{swap_rgb_hex, Color, ColorTable, PaletteError};
pub use keymap::host::{HostKey, KeyParseError};
pub use keymap::KeyMapper;
