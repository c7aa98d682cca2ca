//! Frame decoder: raw grid bytes to a grid of colors.
//!
//! The emulator writes one byte per pixel, row-major.  The decoder masks each
//! byte to its low nibble, resolves it through the [`ColorTable`], and stores
//! it at `[x][y]` in a column-major [`Grid`].  Since the mask always yields an
//! index in `0..16`, every byte resolves to a color; the only failure is being
//! handed fewer bytes than the grid needs.

use thiserror::Error;

use super::grid::Grid;
use super::layout::FrameLayout;
use super::palette::{Color, ColorTable};

/// Error type for frame decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("short frame: expected {expected} grid bytes, got {actual}")]
    ShortFrame { expected: usize, actual: usize },
    #[error("target grid is {actual_width}x{actual_height}, layout is {width}x{height}")]
    GridMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}

/// Decodes raw grid bytes for one [`FrameLayout`].
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    layout: FrameLayout,
    colors: ColorTable,
}

impl FrameDecoder {
    pub fn new(layout: FrameLayout, colors: ColorTable) -> Self {
        Self { layout, colors }
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Decodes the first `width * height` bytes of `raw` into a new grid.
    ///
    /// Bytes past the grid (the status bytes, if the caller passed the whole
    /// segment) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ShortFrame`] if `raw` is shorter than the grid.
    pub fn decode(&self, raw: &[u8]) -> Result<Grid<Color>, DecodeError> {
        let mut grid = Grid::filled(self.layout.width(), self.layout.height(), Color::default());
        self.decode_into(raw, &mut grid)?;
        Ok(grid)
    }

    /// Decodes into an existing grid, reusing its allocation.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ShortFrame`] if `raw` is shorter than the grid,
    /// or [`DecodeError::GridMismatch`] if `grid` has the wrong dimensions.
    pub fn decode_into(&self, raw: &[u8], grid: &mut Grid<Color>) -> Result<(), DecodeError> {
        let (width, height) = (self.layout.width(), self.layout.height());
        if grid.width() != width || grid.height() != height {
            return Err(DecodeError::GridMismatch {
                width,
                height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        let expected = self.layout.grid_len();
        if raw.len() < expected {
            return Err(DecodeError::ShortFrame {
                expected,
                actual: raw.len(),
            });
        }

        for (y, row) in raw[..expected].chunks_exact(width).enumerate() {
            for (x, &byte) in row.iter().enumerate() {
                grid[x][y] = self.colors.lookup(byte);
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn small_decoder() -> FrameDecoder {
        FrameDecoder::new(FrameLayout::new(3, 2).unwrap(), ColorTable::c64())
    }

    #[test]
    fn test_zeroed_default_frame_decodes_to_color_zero() {
        // Arrange
        let decoder = FrameDecoder::new(FrameLayout::default(), ColorTable::c64());
        let raw = vec![0u8; FrameLayout::default().grid_len()];

        // Act
        let grid = decoder.decode(&raw).unwrap();

        // Assert
        let black = ColorTable::c64().lookup(0);
        assert_eq!(grid.width(), 402);
        assert_eq!(grid.height(), 292);
        assert!(grid.cells().all(|&c| c == black));
    }

    #[test]
    fn test_row_major_input_lands_at_x_y() {
        // Arrange: byte at row 1, column 2 is color 5
        let decoder = small_decoder();
        let raw = [0, 0, 0, 0, 0, 5];

        // Act
        let grid = decoder.decode(&raw).unwrap();

        // Assert
        assert_eq!(grid[2][1], ColorTable::c64().lookup(5));
        assert_eq!(grid[1][1], ColorTable::c64().lookup(0));
    }

    #[test]
    fn test_high_nibble_is_masked() {
        let decoder = small_decoder();
        let raw = [0xF3, 0x13, 0x03, 0xA3, 0x53, 0x33];
        let grid = decoder.decode(&raw).unwrap();
        let cyan = ColorTable::c64().lookup(3);
        assert!(grid.cells().all(|&c| c == cyan));
    }

    #[test]
    fn test_trailing_status_bytes_are_ignored() {
        let decoder = small_decoder();
        let raw = [1, 1, 1, 1, 1, 1, 0xFF, 0xFF];
        let grid = decoder.decode(&raw).unwrap();
        assert!(grid.cells().all(|&c| c == ColorTable::c64().lookup(1)));
    }

    #[test]
    fn test_short_frame_is_rejected() {
        let decoder = small_decoder();
        assert_eq!(
            decoder.decode(&[0; 5]),
            Err(DecodeError::ShortFrame {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_decode_into_rejects_mismatched_grid() {
        let decoder = small_decoder();
        let mut grid = Grid::filled(2, 3, Color::default());
        assert!(matches!(
            decoder.decode_into(&[0; 6], &mut grid),
            Err(DecodeError::GridMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_into_overwrites_previous_frame() {
        let decoder = small_decoder();
        let mut grid = decoder.decode(&[1; 6]).unwrap();
        decoder.decode_into(&[2; 6], &mut grid).unwrap();
        assert!(grid.cells().all(|&c| c == ColorTable::c64().lookup(2)));
    }
}
