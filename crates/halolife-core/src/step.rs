//! The Game of Life transition rule.
//!
//! [`step`] reads only from the source grid and writes only into the
//! destination, so each cell's neighbor count sees the previous
//! generation. A worker only ever steps its own [`Partition`].

use std::ops::Range;

use crate::grid::{Grid, ALIVE, DEAD};
use crate::partition::Partition;

/// Next state of a cell given its current state and live-neighbor count.
///
/// Fewer than two or more than three neighbors kill the cell, exactly
/// three bring it to life, and exactly two leave it unchanged.
#[inline]
pub fn next_state(current: u8, neighbors: u8) -> u8 {
    match neighbors {
        3 => ALIVE,
        2 => current,
        _ => DEAD,
    }
}

/// Advance rows `rows` of `grid` by one generation into `destination`.
///
/// Rows outside `rows` in `destination` are left untouched. Neighbor
/// lookups wrap at every edge.
///
/// # Panics
///
/// Panics if the grids differ in shape or `rows` exceeds the height.
pub fn step(grid: &Grid, destination: &mut Grid, rows: Range<usize>) {
    assert!(
        grid.same_shape(destination),
        "step: source {}x{} and destination {}x{} differ",
        grid.height(),
        grid.width(),
        destination.height(),
        destination.width(),
    );
    assert!(rows.end <= grid.height(), "step: rows {rows:?} out of range");

    let width = grid.width() as isize;
    for i in rows {
        let i = i as isize;
        let above = grid.row(i - 1);
        let here = grid.row(i);
        let below = grid.row(i + 1);
        let out = destination.row_mut(i);
        for j in 0..width {
            let l = grid.wrap_col(j - 1);
            let c = j as usize;
            let r = grid.wrap_col(j + 1);
            let neighbors = above[l] + above[c] + above[r] + here[l] + here[r] + below[l]
                + below[c]
                + below[r];
            out[c] = next_state(here[c], neighbors);
        }
    }
}

/// Advance the rows owned by `partition`.
pub fn step_partition(grid: &Grid, destination: &mut Grid, partition: &Partition) {
    step(grid, destination, partition.rows());
}

/// Advance a whole grid by one generation on a single worker.
pub fn advance(grid: &Grid) -> Grid {
    let mut next = grid.clone();
    step(grid, &mut next, 0..grid.height());
    next
}
