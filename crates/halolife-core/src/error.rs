//! Error types for grid construction and domain decomposition.
//!
//! Both families are input-validation failures: neither is retried, and
//! either one aborts the whole run.

use std::io;

use thiserror::Error;

/// A malformed initial grid: bad text, wrong dimensions, or a cell
/// buffer whose length disagrees with the declared shape.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The input ended before the `<height> <width>` header.
    #[error("missing `<height> <width>` header")]
    MissingHeader,
    /// The header line could not be parsed as two integers.
    #[error("invalid header {line:?}: expected `<height> <width>`")]
    InvalidHeader {
        /// The offending header line.
        line: String,
    },
    /// Height or width is zero.
    #[error("grid dimensions must be positive, got {height}x{width}")]
    EmptyGrid {
        /// Declared height.
        height: usize,
        /// Declared width.
        width: usize,
    },
    /// `height * width` exceeds `isize::MAX` cells.
    #[error("grid dimensions {height}x{width} exceed the addressable size")]
    DimensionOverflow {
        /// Declared height.
        height: usize,
        /// Declared width.
        width: usize,
    },
    /// A character other than `.` or `*` appeared in a row.
    #[error("invalid cell {found:?} at row {row}, column {col}")]
    InvalidCell {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        col: usize,
        /// The character found.
        found: char,
    },
    /// A raw cell byte was neither 0 nor 1.
    #[error("invalid cell value {value} at index {index}")]
    InvalidCellValue {
        /// Linear index into the buffer.
        index: usize,
        /// The byte found.
        value: u8,
    },
    /// A row has the wrong number of characters.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        /// Zero-based row.
        row: usize,
        /// Declared width.
        expected: usize,
        /// Characters actually present.
        found: usize,
    },
    /// The input ended before `height` rows were read.
    #[error("expected {expected} rows, found {found}")]
    RowCount {
        /// Declared height.
        expected: usize,
        /// Rows actually present.
        found: usize,
    },
    /// Non-blank text follows the last declared row.
    #[error("unexpected content after row {rows}: {line:?}")]
    TrailingContent {
        /// Number of declared rows.
        rows: usize,
        /// The first extra line.
        line: String,
    },
    /// A cell buffer's length disagrees with `height * width`.
    #[error("cell buffer has {found} cells, expected {expected}")]
    CellCount {
        /// `height * width`.
        expected: usize,
        /// Buffer length.
        found: usize,
    },
    /// Reading or writing the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The grid cannot be split evenly across the worker group.
///
/// Uneven decompositions are unsupported; every worker detects this
/// during setup, before any generation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error(
    "uneven decomposition: {height} rows cannot be split evenly across {workers} workers"
)]
pub struct DecompositionError {
    /// Grid height.
    pub height: usize,
    /// Worker count.
    pub workers: usize,
}

/// A worker identity outside its group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("rank {rank} is not valid for a group of {size} workers")]
pub struct TopologyError {
    /// The requested rank.
    pub rank: usize,
    /// The group size.
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposition_error_display_names_both_counts() {
        let msg = DecompositionError {
            height: 10,
            workers: 3,
        }
        .to_string();
        assert!(msg.contains("10 rows"));
        assert!(msg.contains("3 workers"));
    }

    #[test]
    fn format_error_wraps_io() {
        let err: FormatError = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, FormatError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
