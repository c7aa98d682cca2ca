//! Column-major pixel grid.
//!
//! Renderers address pixels as `grid[x][y]`, so storage is one contiguous
//! column after another.  Indexing a [`Grid`] with `x` yields the column
//! slice, and indexing that slice with `y` yields the pixel.

use std::ops::{Index, IndexMut};

/// A `width × height` grid stored column by column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `fill`.
    pub fn filled(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.cells.get(x * self.height + y)
        } else {
            None
        }
    }

    /// Sets the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self[x][y] = value;
    }

    /// Iterates over every cell in row-major order (`y` outer, `x` inner),
    /// the order image formats write pixels in.
    pub fn rows(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| &self.cells[x * self.height + y]))
    }

    /// Iterates over every cell in storage (column-major) order.
    pub fn cells(&self) -> impl Iterator<Item = &T> + '_ {
        self.cells.iter()
    }
}

impl<T> Index<usize> for Grid<T> {
    type Output = [T];

    /// Returns column `x`.
    fn index(&self, x: usize) -> &[T] {
        assert!(x < self.width, "column {x} out of range (width {})", self.width);
        &self.cells[x * self.height..(x + 1) * self.height]
    }
}

impl<T> IndexMut<usize> for Grid<T> {
    fn index_mut(&mut self, x: usize) -> &mut [T] {
        assert!(x < self.width, "column {x} out of range (width {})", self.width);
        &mut self.cells[x * self.height..(x + 1) * self.height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_x_then_y() {
        // Arrange
        let mut grid = Grid::filled(3, 2, 0u8);

        // Act
        grid[2][1] = 7;

        // Assert
        assert_eq!(grid.get(2, 1), Some(&7));
        assert_eq!(grid[2], [0, 7]);
    }

    #[test]
    fn test_get_outside_grid_is_none() {
        let grid = Grid::filled(3, 2, 0u8);
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn test_rows_iterates_row_major() {
        let mut grid = Grid::filled(2, 2, 0u8);
        grid.set(0, 0, 1);
        grid.set(1, 0, 2);
        grid.set(0, 1, 3);
        grid.set(1, 1, 4);
        assert_eq!(grid.rows().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(grid.cells().copied().collect::<Vec<_>>(), vec![1, 3, 2, 4]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_past_width_panics() {
        let grid = Grid::filled(2, 2, 0u8);
        let _ = &grid[2];
    }
}
