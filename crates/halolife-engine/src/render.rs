//! Renderers for the presenting worker.

use std::io::{self, Write};

use halolife_core::format::write_rows;
use halolife_core::{Grid, Renderer};

/// Writes each frame as `Generation <n>` followed by the grid rows.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    writer: W,
}

impl<W: Write> TextRenderer<W> {
    /// Render into `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl TextRenderer<io::Stdout> {
    /// Render to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, grid: &Grid, generation: u64) -> io::Result<()> {
        writeln!(self.writer, "Generation {generation}")?;
        write_rows(grid, &mut self.writer)?;
        self.writer.flush()
    }
}

/// Discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _grid: &Grid, _generation: u64) -> io::Result<()> {
        Ok(())
    }
}
