//! halolife: Conway's Game of Life on a torus, split into horizontal row
//! bands across a group of workers.
//!
//! This is the facade crate that re-exports the public API of the
//! halolife sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use halolife::prelude::*;
//!
//! let grid = Grid::from_text("4 4\n.*..\n..*.\n***.\n....\n").unwrap();
//! let config = RunConfig {
//!     generations: 4,
//!     ..RunConfig::default()
//! };
//! let report = run_local(&config, 2, move || Ok(grid), NullRenderer).unwrap();
//! assert_eq!(report.grid.population(), 4);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`life`] | `halolife-core` | Grid, Life rule, partitioning, text codec |
//! | [`comm`] | `halolife-comm` | Point-to-point transport, collectives, halo exchange |
//! | [`engine`] | `halolife-engine` | Coordinator, renderers, local launcher |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid storage, the Life rule, and row partitioning (`halolife-core`).
pub use halolife_core as life;

/// Worker transport and halo exchange (`halolife-comm`).
///
/// [`comm::LocalComm`] connects a group of in-process workers;
/// [`comm::HaloExchanger`] swaps boundary rows between ring neighbors.
pub use halolife_comm as comm;

/// Generation loop and orchestration (`halolife-engine`).
pub use halolife_engine as engine;

/// Common imports for typical halolife usage.
pub mod prelude {
    // Grid and rule
    pub use halolife_core::{advance, read_grid, write_grid, Grid, Partition, WorkerTopology};

    // Errors
    pub use halolife_core::{DecompositionError, FormatError};
    pub use halolife_comm::CommError;
    pub use halolife_engine::RunError;

    // Transport
    pub use halolife_comm::{Communicator, LocalComm};

    // Engine
    pub use halolife_core::Renderer;
    pub use halolife_engine::{
        run_local, Coordinator, GatherPolicy, NullRenderer, RunConfig, RunMetrics, RunReport,
        TextRenderer,
    };
}
