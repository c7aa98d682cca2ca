//! Frame store layout: where every field lives inside the shared segment.
//!
//! ```text
//! offset 0                         width*height   +1     +2     +3
//! ├──────────── grid (row-major) ──────────────┼──────┼──────┼──────┼──────┤
//!                                              │ cols │ rows │ joy1 │ joy2 │
//! ```
//!
//! The grid holds one byte per pixel; only the low four bits are a color
//! index.  The two bytes right after the grid are the packed keyboard column
//! and row status.  The emulator allocates two more bytes for the joystick
//! ports, but a segment is valid as long as it carries the grid and the two
//! keyboard bytes.

use thiserror::Error;

/// Default grid width: a 320-pixel screen plus border.
pub const DEFAULT_WIDTH: usize = 402;

/// Default grid height: a 200-line screen plus border.
pub const DEFAULT_HEIGHT: usize = 292;

/// Number of trailing bytes carrying keyboard state.
pub const KEYBOARD_STATUS_LEN: usize = 2;

/// Number of trailing bytes carrying joystick state.
pub const JOYSTICK_STATUS_LEN: usize = 2;

/// Error type for layout construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("frame dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("frame dimensions {width}x{height} overflow the address space")]
    Overflow { width: usize, height: usize },
}

/// Fixed byte layout of the shared frame store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    width: usize,
    height: usize,
}

impl FrameLayout {
    /// Creates a layout for a `width × height` grid.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyGrid`] if either dimension is zero and
    /// [`LayoutError::Overflow`] if the segment size would not fit in `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::EmptyGrid { width, height });
        }
        width
            .checked_mul(height)
            .and_then(|n| n.checked_add(KEYBOARD_STATUS_LEN + JOYSTICK_STATUS_LEN))
            .ok_or(LayoutError::Overflow { width, height })?;
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of grid bytes, `width * height`.
    pub fn grid_len(&self) -> usize {
        self.width * self.height
    }

    /// Offset of the packed keyboard column byte.
    pub fn col_status_offset(&self) -> usize {
        self.grid_len()
    }

    /// Offset of the packed keyboard row byte.
    pub fn row_status_offset(&self) -> usize {
        self.grid_len() + 1
    }

    /// Offset of the joystick byte for port 1 or 2.
    ///
    /// Returns `None` for any other port number.
    pub fn joystick_offset(&self, port: u8) -> Option<usize> {
        match port {
            1 | 2 => Some(self.grid_len() + KEYBOARD_STATUS_LEN + usize::from(port - 1)),
            _ => None,
        }
    }

    /// Smallest segment that satisfies the contract: grid plus keyboard bytes.
    pub fn min_segment_len(&self) -> usize {
        self.grid_len() + KEYBOARD_STATUS_LEN
    }

    /// Segment size the emulator allocates: grid, keyboard, and joystick bytes.
    pub fn full_segment_len(&self) -> usize {
        self.min_segment_len() + JOYSTICK_STATUS_LEN
    }
}

impl Default for FrameLayout {
    /// The 402×292 layout every emulator build uses.
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
