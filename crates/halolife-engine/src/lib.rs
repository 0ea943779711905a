//! Generation loop and worker orchestration for halolife.
//!
//! Every worker runs the same [`Coordinator`] state machine in lockstep:
//! setup (broadcast the initial grid, validate the decomposition), a
//! fixed number of generations (step, swap, halo exchange, gather), and
//! termination (final render). [`run_local`] launches a whole group as
//! threads in this process.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod coordinator;
pub mod error;
pub mod launch;
pub mod metrics;
pub mod render;

pub use config::{ConfigError, GatherPolicy, RunConfig};
pub use coordinator::{Coordinator, RunReport};
pub use error::RunError;
pub use launch::run_local;
pub use metrics::RunMetrics;
pub use render::{NullRenderer, TextRenderer};
