//! Core types for the halolife distributed Game of Life.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! toroidal grid, the row decomposition across workers, the generation
//! rule, and the text codec for initial configurations. It also holds the
//! presentation seam and the error types shared by the rest of the
//! workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod format;
pub mod grid;
pub mod partition;
pub mod render;
pub mod step;
pub mod topology;

pub use error::{DecompositionError, FormatError, TopologyError};
pub use format::{read_grid, write_grid};
pub use grid::{Grid, ALIVE, DEAD};
pub use partition::{check_decomposition, lower_bound, upper_bound, Partition};
pub use render::Renderer;
pub use step::{advance, next_state, step, step_partition};
pub use topology::WorkerTopology;
