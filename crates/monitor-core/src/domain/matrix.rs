//! The 8×8 keyboard matrix table.
//!
//! # What is a keyboard matrix? (for beginners)
//!
//! The C64 keyboard is wired as a grid of 8 column lines and 8 row lines.
//! Each key sits at one crossing.  The CIA chip drives a column low and reads
//! which rows come back low, so the machine only ever sees *which columns and
//! rows* have a key down, never the key itself.  The viewer reproduces that
//! by publishing one bit per column and one bit per row.
//!
//! # Cell order
//!
//! The built-in table uses the machine's own order: row 0 / column 0 is
//! `DEL`, row 7 / column 7 is `RUN/STOP`.  Bit `n` of a packed status byte is
//! row or column `n`, least significant bit first.
//!
//! # Aliases
//!
//! A key may sit in more than one cell.  Lookups scan every entry and return
//! all matches, so an alias such as "cursor up = right shift + cursor down"
//! is simply two entries for the same [`HostKey`].

use thiserror::Error;

use crate::keymap::host::HostKey;

/// Number of rows and of columns in the matrix.
pub const MATRIX_SIZE: usize = 8;

/// Error type for matrix construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("matrix cell ({row}, {col}) is outside the 8x8 matrix")]
    CellOutOfRange { row: u8, col: u8 },
    #[error("{0} cannot be placed in the matrix")]
    UnmappableKey(HostKey),
}

/// A (row, column) coordinate in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatrixCell {
    row: u8,
    col: u8,
}

impl MatrixCell {
    /// Creates a cell, validating both coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::CellOutOfRange`] if `row` or `col` is 8 or more.
    pub fn new(row: u8, col: u8) -> Result<Self, MatrixError> {
        if usize::from(row) >= MATRIX_SIZE || usize::from(col) >= MATRIX_SIZE {
            return Err(MatrixError::CellOutOfRange { row, col });
        }
        Ok(Self { row, col })
    }

    pub fn row(self) -> usize {
        usize::from(self.row)
    }

    pub fn col(self) -> usize {
        usize::from(self.col)
    }
}

/// The built-in C64 layout, `[row][col]`.
const C64_TABLE: [[HostKey; MATRIX_SIZE]; MATRIX_SIZE] = {
    use crate::keymap::host::HostKey::*;
    [
        [Delete, Return, RightAlt, F7, F1, F3, F5, ArrowDown],
        [Digit3, KeyW, KeyA, Digit4, KeyZ, KeyS, KeyE, LeftShift],
        [Digit5, KeyR, KeyD, Digit6, KeyC, KeyF, KeyT, KeyX],
        [Digit7, KeyY, KeyG, Digit8, KeyB, KeyH, KeyU, KeyV],
        [Digit9, KeyI, KeyJ, Digit0, KeyM, KeyK, KeyO, KeyN],
        [Plus, KeyP, KeyL, Minus, Period, Colon, At, Comma],
        [Dollar, Asterisk, Semicolon, Home, RightShift, Equals, Caret, Slash],
        [Digit1, Backspace, LeftCtrl, Digit2, Space, Tab, KeyQ, Escape],
    ]
};

/// Mapping from host keys to one or more matrix cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardMatrix {
    entries: Vec<(MatrixCell, HostKey)>,
}

impl KeyboardMatrix {
    /// A matrix with no keys at all.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The built-in C64 layout.
    pub fn c64() -> Self {
        let mut entries = Vec::with_capacity(MATRIX_SIZE * MATRIX_SIZE);
        for (row, keys) in C64_TABLE.iter().enumerate() {
            for (col, &key) in keys.iter().enumerate() {
                entries.push((
                    MatrixCell {
                        row: row as u8,
                        col: col as u8,
                    },
                    key,
                ));
            }
        }
        Self { entries }
    }

    /// Adds `key` at `cell`, in addition to any cells it already occupies.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::UnmappableKey`] for [`HostKey::Unknown`].
    pub fn add(&mut self, key: HostKey, cell: MatrixCell) -> Result<(), MatrixError> {
        if key == HostKey::Unknown {
            return Err(MatrixError::UnmappableKey(key));
        }
        if !self.entries.contains(&(cell, key)) {
            self.entries.push((cell, key));
        }
        Ok(())
    }

    /// Returns every cell `key` occupies, in table order.
    ///
    /// The whole table is scanned; an empty result means the key is not part
    /// of the matrix and should be ignored.
    pub fn cells_for(&self, key: HostKey) -> Vec<MatrixCell> {
        self.entries
            .iter()
            .filter(|(_, k)| *k == key)
            .map(|(cell, _)| *cell)
            .collect()
    }

    /// Returns `true` if `key` occupies at least one cell.
    pub fn contains(&self, key: HostKey) -> bool {
        self.entries.iter().any(|(_, k)| *k == key)
    }

    /// Number of (cell, key) entries, aliases included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KeyboardMatrix {
    fn default() -> Self {
        Self::c64()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
