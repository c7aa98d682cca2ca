//! Keyboard matrix encoder: key transitions to packed status bytes.
//!
//! # Why counters instead of bits? (for beginners)
//!
//! Suppose `A` and `B` share row 2.  Press `A`, press `B`, release `A`.  If
//! the row were a single on/off bit, releasing `A` would clear row 2 even
//! though `B` is still down, and the emulator would see `B` vanish.  The
//! encoder instead counts held keys per row and per column, and a status bit
//! is set whenever its count is above zero.  Releasing `A` drops row 2 from 2
//! to 1 and the bit stays set.
//!
//! # Repeats and unbalanced releases
//!
//! The encoder remembers which keys are held.  A key-down for a key that is
//! already held (auto-repeat) changes nothing, and a key-up for a key that is
//! not held (a lost key-down) changes nothing.  Counters therefore never go
//! below zero and never drift above the number of distinct held keys.

use std::collections::BTreeSet;

use tracing::trace;

use super::matrix::{KeyboardMatrix, MatrixCell, MATRIX_SIZE};
use crate::keymap::host::HostKey;

/// Direction of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Down,
    Up,
}

/// A single key-down or key-up event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyTransition {
    pub transition: Transition,
    pub key: HostKey,
}

impl KeyTransition {
    pub fn down(key: HostKey) -> Self {
        Self {
            transition: Transition::Down,
            key,
        }
    }

    pub fn up(key: HostKey) -> Self {
        Self {
            transition: Transition::Up,
            key,
        }
    }
}

/// The two packed bytes written after the grid.
///
/// Bit `n` of `col_status` is set iff at least one held key sits in column
/// `n`; `row_status` is the same for rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatrixStatus {
    pub col_status: u8,
    pub row_status: u8,
}

/// Packs eight counters into a byte, LSB first: bit `n` is `counts[n] > 0`.
pub fn pack_counts(counts: &[u32; MATRIX_SIZE]) -> u8 {
    counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .fold(0u8, |byte, (bit, _)| byte | (1 << bit))
}

/// Per-row and per-column hold counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoldCounters {
    rows: [u32; MATRIX_SIZE],
    cols: [u32; MATRIX_SIZE],
}

impl HoldCounters {
    pub fn press(&mut self, cell: MatrixCell) {
        self.rows[cell.row()] += 1;
        self.cols[cell.col()] += 1;
    }

    /// Decrements the cell's row and column, clamping each at zero.
    ///
    /// Returns `false` if either counter was already zero.
    pub fn release(&mut self, cell: MatrixCell) -> bool {
        let row = &mut self.rows[cell.row()];
        let row_ok = *row > 0;
        *row = row.saturating_sub(1);

        let col = &mut self.cols[cell.col()];
        let col_ok = *col > 0;
        *col = col.saturating_sub(1);

        row_ok && col_ok
    }

    pub fn row_count(&self, row: usize) -> u32 {
        self.rows[row]
    }

    pub fn col_count(&self, col: usize) -> u32 {
        self.cols[col]
    }

    pub fn status(&self) -> MatrixStatus {
        MatrixStatus {
            col_status: pack_counts(&self.cols),
            row_status: pack_counts(&self.rows),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        self.rows.iter().chain(&self.cols).all(|&c| c == 0)
    }
}

/// What [`KeyboardMatrixEncoder::apply`] did with a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOutcome {
    /// Counters changed; `status` is the new packed state to publish.
    Applied { status: MatrixStatus, cells: usize },
    /// The key is not part of the matrix.
    Unmapped,
    /// Key-down for a key that is already held.
    Repeat,
    /// Key-up for a key that is not held.
    Unbalanced,
}

impl EncodeOutcome {
    /// The status to publish, if anything changed.
    pub fn status(&self) -> Option<MatrixStatus> {
        match self {
            EncodeOutcome::Applied { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Owns the matrix table, the hold counters, and the set of held keys.
#[derive(Debug, Clone)]
pub struct KeyboardMatrixEncoder {
    matrix: KeyboardMatrix,
    counters: HoldCounters,
    held: BTreeSet<HostKey>,
}

impl KeyboardMatrixEncoder {
    pub fn new(matrix: KeyboardMatrix) -> Self {
        Self {
            matrix,
            counters: HoldCounters::default(),
            held: BTreeSet::new(),
        }
    }

    /// Applies one transition for `key` to every cell it occupies.
    pub fn apply(&mut self, transition: Transition, key: HostKey) -> EncodeOutcome {
        let cells = self.matrix.cells_for(key);
        if cells.is_empty() {
            return EncodeOutcome::Unmapped;
        }

        match transition {
            Transition::Down => {
                if !self.held.insert(key) {
                    return EncodeOutcome::Repeat;
                }
                for &cell in &cells {
                    self.counters.press(cell);
                }
            }
            Transition::Up => {
                if !self.held.remove(&key) {
                    return EncodeOutcome::Unbalanced;
                }
                for &cell in &cells {
                    self.counters.release(cell);
                }
            }
        }

        let status = self.counters.status();
        trace!(
            %key,
            ?transition,
            cells = cells.len(),
            col_status = status.col_status,
            row_status = status.row_status,
            "matrix updated"
        );
        EncodeOutcome::Applied {
            status,
            cells: cells.len(),
        }
    }

    /// Releases every held key and returns the (all-zero) status.
    pub fn release_all(&mut self) -> MatrixStatus {
        self.held.clear();
        self.counters.clear();
        self.counters.status()
    }

    pub fn status(&self) -> MatrixStatus {
        self.counters.status()
    }

    pub fn counters(&self) -> &HoldCounters {
        &self.counters
    }

    pub fn matrix(&self) -> &KeyboardMatrix {
        &self.matrix
    }

    pub fn held_keys(&self) -> impl Iterator<Item = HostKey> + '_ {
        self.held.iter().copied()
    }
}

impl Default for KeyboardMatrixEncoder {
    fn default() -> Self {
        Self::new(KeyboardMatrix::c64())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
