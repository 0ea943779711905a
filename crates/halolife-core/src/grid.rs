//! Toroidal grid of binary cells.
//!
//! [`Grid`] owns a row-major `height * width` buffer of cell bytes
//! (`0` dead, `1` alive). Every coordinate access wraps: rows are taken
//! modulo `height` and columns modulo `width`, with non-negative results
//! for negative inputs. [`Grid::index`] is the single place that
//! resolution happens, so periodicity holds for every accessor.
//!
//! Rows are stored contiguously, which lets the halo exchange and the
//! gather ship whole rows (or a contiguous row range) as byte slices.

use std::ops::Range;

use crate::error::FormatError;

/// Byte value of a dead cell.
pub const DEAD: u8 = 0;
/// Byte value of a live cell.
pub const ALIVE: u8 = 1;

/// A `height x width` toroidal grid of cells.
///
/// Each worker holds its own private grids; they are never shared across
/// workers and change only through the owning worker's code path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Create an all-dead grid.
    ///
    /// Returns `Err(FormatError::EmptyGrid)` if either dimension is zero.
    pub fn new(height: usize, width: usize) -> Result<Self, FormatError> {
        let len = checked_len(height, width)?;
        Ok(Self {
            height,
            width,
            cells: vec![DEAD; len],
        })
    }

    /// Build a grid from a row-major cell buffer.
    ///
    /// The buffer must hold exactly `height * width` bytes, each `0` or `1`.
    pub fn from_cells(height: usize, width: usize, cells: Vec<u8>) -> Result<Self, FormatError> {
        let len = checked_len(height, width)?;
        if cells.len() != len {
            return Err(FormatError::CellCount {
                expected: len,
                found: cells.len(),
            });
        }
        if let Some((index, &value)) = cells.iter().enumerate().find(|&(_, &v)| v > ALIVE) {
            return Err(FormatError::InvalidCellValue { index, value });
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Build a grid with the given `(row, col)` cells alive.
    ///
    /// Coordinates wrap like every other accessor.
    pub fn with_live_cells(
        height: usize,
        width: usize,
        live: impl IntoIterator<Item = (isize, isize)>,
    ) -> Result<Self, FormatError> {
        let mut grid = Self::new(height, width)?;
        for (i, j) in live {
            grid.set(i, j, true);
        }
        Ok(grid)
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether `other` has the same shape as `self`.
    pub fn same_shape(&self, other: &Grid) -> bool {
        self.height == other.height && self.width == other.width
    }

    /// Resolve a row index modulo `height`.
    #[inline]
    pub fn wrap_row(&self, i: isize) -> usize {
        wrap(i, self.height)
    }

    /// Resolve a column index modulo `width`.
    #[inline]
    pub fn wrap_col(&self, j: isize) -> usize {
        wrap(j, self.width)
    }

    /// Linear buffer index of `(i, j)` after toroidal resolution.
    #[inline]
    pub fn index(&self, i: isize, j: isize) -> usize {
        self.wrap_row(i) * self.width + self.wrap_col(j)
    }

    /// Raw cell byte at `(i, j)`.
    #[inline]
    pub fn cell(&self, i: isize, j: isize) -> u8 {
        self.cells[self.index(i, j)]
    }

    /// Whether the cell at `(i, j)` is alive.
    #[inline]
    pub fn get(&self, i: isize, j: isize) -> bool {
        self.cell(i, j) == ALIVE
    }

    /// Set the cell at `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: isize, j: isize, alive: bool) {
        let idx = self.index(i, j);
        self.cells[idx] = if alive { ALIVE } else { DEAD };
    }

    /// The cells of row `i` (wrapped).
    pub fn row(&self, i: isize) -> &[u8] {
        let start = self.index(i, 0);
        &self.cells[start..start + self.width]
    }

    /// Mutable cells of row `i` (wrapped).
    pub fn row_mut(&mut self, i: isize) -> &mut [u8] {
        let start = self.index(i, 0);
        let width = self.width;
        &mut self.cells[start..start + width]
    }

    /// Contiguous cells of the absolute row range `rows`.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is not within `[0, height]`. Ranges never wrap.
    pub fn rows(&self, rows: Range<usize>) -> &[u8] {
        assert!(rows.start <= rows.end && rows.end <= self.height);
        &self.cells[rows.start * self.width..rows.end * self.width]
    }

    /// Mutable contiguous cells of the absolute row range `rows`.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is not within `[0, height]`.
    pub fn rows_mut(&mut self, rows: Range<usize>) -> &mut [u8] {
        assert!(rows.start <= rows.end && rows.end <= self.height);
        &mut self.cells[rows.start * self.width..rows.end * self.width]
    }

    /// The whole row-major buffer.
    pub fn as_cells(&self) -> &[u8] {
        &self.cells
    }

    /// Overwrite whole rows starting at `first_row` with `cells`.
    ///
    /// `cells` must hold a whole number of rows that fit below
    /// `first_row`, and every byte must be `0` or `1`. On error the grid
    /// is unchanged.
    pub fn copy_rows_from(&mut self, first_row: usize, cells: &[u8]) -> Result<(), FormatError> {
        let start = first_row.saturating_mul(self.width);
        let room = self.cells.len().saturating_sub(start);
        if cells.len() % self.width != 0 || cells.len() > room {
            return Err(FormatError::CellCount {
                expected: room,
                found: cells.len(),
            });
        }
        if let Some((offset, &value)) = cells.iter().enumerate().find(|&(_, &v)| v > ALIVE) {
            return Err(FormatError::InvalidCellValue {
                index: start + offset,
                value,
            });
        }
        self.cells[start..start + cells.len()].copy_from_slice(cells);
        Ok(())
    }

    /// Consume the grid, returning its cell buffer.
    pub fn into_cells(self) -> Vec<u8> {
        self.cells
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c == ALIVE).count()
    }

    /// Iterate over the `(row, col)` coordinates of live cells in
    /// row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == ALIVE)
            .map(move |(idx, _)| (idx / width, idx % width))
    }
}

/// Non-negative `value mod len`.
#[inline]
fn wrap(value: isize, len: usize) -> usize {
    value.rem_euclid(len as isize) as usize
}

/// Length of a `height x width` buffer.
///
/// Rejects zero axes, axes that do not fit in `isize` (coordinates are
/// signed), and products beyond `isize::MAX`, the largest allocation a
/// `Vec` can hold.
pub(crate) fn checked_len(height: usize, width: usize) -> Result<usize, FormatError> {
    if height == 0 || width == 0 {
        return Err(FormatError::EmptyGrid { height, width });
    }
    height
        .checked_mul(width)
        .filter(|&len| isize::try_from(len).is_ok())
        .ok_or(FormatError::DimensionOverflow { height, width })
}
