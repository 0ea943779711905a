//! Presentation seam.

use std::io;

use crate::grid::Grid;

/// Sink for full-grid frames, driven only by the presenting worker.
pub trait Renderer {
    /// Present `grid` as the state after `generation` steps.
    fn render(&mut self, grid: &Grid, generation: u64) -> io::Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, grid: &Grid, generation: u64) -> io::Result<()> {
        (**self).render(grid, generation)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, grid: &Grid, generation: u64) -> io::Result<()> {
        (**self).render(grid, generation)
    }
}
