//! Canonical Life patterns as `(row, col)` offsets.

use halolife_core::Grid;

/// The five cells of a south-east travelling glider.
pub const GLIDER: [(isize, isize); 5] = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];

/// A horizontal period-2 blinker.
pub const BLINKER: [(isize, isize); 3] = [(0, 0), (0, 1), (0, 2)];

/// A 2x2 still life.
pub const BLOCK: [(isize, isize); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];

/// A `height x width` grid with `pattern` placed at `(row, col)`.
pub fn place(
    height: usize,
    width: usize,
    pattern: &[(isize, isize)],
    row: isize,
    col: isize,
) -> Grid {
    let cells = pattern.iter().map(|&(i, j)| (i + row, j + col));
    Grid::with_live_cells(height, width, cells).expect("dimensions are positive")
}

/// A glider at the top-left corner of a `height x width` grid.
pub fn glider(height: usize, width: usize) -> Grid {
    place(height, width, &GLIDER, 0, 0)
}
