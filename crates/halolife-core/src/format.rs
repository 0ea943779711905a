//! Text codec for initial configurations.
//!
//! ```text
//! <height> <width>
//! <height rows of exactly <width> characters: '.' dead, '*' alive>
//! ```
//!
//! A trailing `\r` on any line is ignored. Blank lines after the last
//! row are allowed; anything else there is rejected.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::FormatError;
use crate::grid::{checked_len, Grid, ALIVE, DEAD};

/// Character for a live cell.
pub const ALIVE_CHAR: char = '*';
/// Character for a dead cell.
pub const DEAD_CHAR: char = '.';

/// Read a grid from `reader`.
///
/// The header is validated before any row is read, and cell storage
/// grows with the rows actually present, so a header that overstates
/// the input fails with [`FormatError::RowCount`] without allocating
/// the declared size.
pub fn read_grid(reader: impl BufRead) -> Result<Grid, FormatError> {
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(FormatError::MissingHeader),
    };
    let (height, width) = parse_header(trim_cr(&header))?;
    checked_len(height, width)?;

    let mut cells = Vec::new();
    for row in 0..height {
        let line = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(FormatError::RowCount {
                    expected: height,
                    found: row,
                })
            }
        };
        parse_row(trim_cr(&line), row, width, &mut cells)?;
    }

    for line in lines {
        let line = line?;
        if !line.trim().is_empty() {
            return Err(FormatError::TrailingContent { rows: height, line });
        }
    }

    Grid::from_cells(height, width, cells)
}

/// Write `grid` in the text format, header included.
pub fn write_grid(grid: &Grid, mut writer: impl Write) -> Result<(), FormatError> {
    writeln!(writer, "{} {}", grid.height(), grid.width())?;
    write_rows(grid, &mut writer)?;
    Ok(())
}

/// Write only the cell rows of `grid`, one line per row.
pub fn write_rows(grid: &Grid, writer: &mut impl Write) -> std::io::Result<()> {
    let mut line = Vec::with_capacity(grid.width() + 1);
    for i in 0..grid.height() {
        line.clear();
        line.extend(grid.row(i as isize).iter().map(|&c| cell_char(c) as u8));
        line.push(b'\n');
        writer.write_all(&line)?;
    }
    Ok(())
}

impl Grid {
    /// Parse a grid from its text form.
    pub fn from_text(text: &str) -> Result<Self, FormatError> {
        read_grid(text.as_bytes())
    }

    /// Render the grid in its text form, header included.
    pub fn to_text(&self) -> String {
        format!("{} {}\n{self}", self.height(), self.width())
    }
}

impl FromStr for Grid {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

/// Displays the cell rows only, without the header.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.height() {
            for &c in self.row(i as isize) {
                write!(f, "{}", cell_char(c))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn cell_char(cell: u8) -> char {
    if cell == ALIVE {
        ALIVE_CHAR
    } else {
        DEAD_CHAR
    }
}

fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn parse_header(line: &str) -> Result<(usize, usize), FormatError> {
    let invalid = || FormatError::InvalidHeader {
        line: line.to_string(),
    };
    let mut fields = line.split_whitespace();
    let height = fields.next().ok_or_else(invalid)?;
    let width = fields.next().ok_or_else(invalid)?;
    if fields.next().is_some() {
        return Err(invalid());
    }
    let height = height.parse::<usize>().map_err(|_| invalid())?;
    let width = width.parse::<usize>().map_err(|_| invalid())?;
    Ok((height, width))
}

fn parse_row(
    line: &str,
    row: usize,
    width: usize,
    cells: &mut Vec<u8>,
) -> Result<(), FormatError> {
    let found = line.chars().count();
    if found != width {
        return Err(FormatError::RowLength {
            row,
            expected: width,
            found,
        });
    }
    cells.reserve(width);
    for (col, ch) in line.chars().enumerate() {
        cells.push(match ch {
            ALIVE_CHAR => ALIVE,
            DEAD_CHAR => DEAD,
            found => return Err(FormatError::InvalidCell { row, col, found }),
        });
    }
    Ok(())
}
