//! Test fixtures and helpers for halolife development.
//!
//! Provides canonical patterns, a [`RecordingRenderer`] that keeps every
//! frame it is handed, deterministic pseudo-random grids, and
//! [`with_watchdog`] for turning a deadlocked worker ring into a test
//! failure instead of a hung test binary.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod patterns;

use std::collections::BTreeSet;
use std::io;
use std::thread;
use std::time::Duration;

use halolife_core::{Grid, Renderer, ALIVE, DEAD};

/// Live cells of `grid` as a set, for order-independent comparisons.
pub fn live_set(grid: &Grid) -> BTreeSet<(usize, usize)> {
    grid.live_cells().collect()
}

/// A `height x width` grid filled from a fixed-seed LCG.
///
/// Roughly `density_percent`% of cells are alive. The same arguments
/// always give the same grid.
pub fn random_grid(height: usize, width: usize, density_percent: u64, seed: u64) -> Grid {
    let mut state = seed;
    let cells = (0..height * width)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            if (state >> 33) % 100 < density_percent {
                ALIVE
            } else {
                DEAD
            }
        })
        .collect();
    Grid::from_cells(height, width, cells).expect("dimensions are positive")
}

/// Run `f` on a helper thread and panic if it has not finished within
/// `limit`.
///
/// Used around worker rings: a protocol bug shows up as a deadlock, and
/// the watchdog reports it as a failure. The stuck thread is leaked.
pub fn with_watchdog<T, F>(limit: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    let handle = thread::Builder::new()
        .name("watchdog-subject".into())
        .spawn(move || {
            let _ = tx.send(f());
        })
        .expect("failed to spawn watchdog subject");
    match rx.recv_timeout(limit) {
        Ok(value) => {
            handle.join().expect("watchdog subject panicked");
            value
        }
        Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
            panic!("deadlock: no progress within {limit:?}")
        }
        Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
            match handle.join() {
                Err(payload) => std::panic::resume_unwind(payload),
                Ok(()) => unreachable!("subject exited without reporting"),
            }
        }
    }
}

/// Renderer that keeps a copy of every frame.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<(u64, Grid)>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation numbers in the order they were rendered.
    pub fn generations(&self) -> Vec<u64> {
        self.frames.iter().map(|(g, _)| *g).collect()
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<&Grid> {
        self.frames.last().map(|(_, grid)| grid)
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, grid: &Grid, generation: u64) -> io::Result<()> {
        self.frames.push((generation, grid.clone()));
        Ok(())
    }
}

/// Renderer whose every call fails, for error-path tests.
#[derive(Debug, Default)]
pub struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&mut self, _grid: &Grid, _generation: u64) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "renderer closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_grid_is_deterministic() {
        let a = random_grid(8, 8, 30, 7);
        let b = random_grid(8, 8, 30, 7);
        let c = random_grid(8, 8, 30, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn watchdog_returns_value() {
        assert_eq!(with_watchdog(Duration::from_secs(5), || 41 + 1), 42);
    }

    #[test]
    #[should_panic(expected = "deadlock")]
    fn watchdog_reports_stall() {
        let (_tx, rx) = crossbeam_channel::bounded::<()>(0);
        with_watchdog(Duration::from_millis(50), move || {
            let _ = rx.recv();
        });
    }

    #[test]
    fn recording_renderer_keeps_frames() {
        let mut r = RecordingRenderer::new();
        let g = Grid::new(1, 1).unwrap();
        r.render(&g, 0).unwrap();
        r.render(&g, 1).unwrap();
        assert_eq!(r.generations(), vec![0, 1]);
        assert_eq!(r.last(), Some(&g));
    }
}
