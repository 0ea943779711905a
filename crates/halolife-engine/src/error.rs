//! Errors that end a run.

use std::io;

use halolife_comm::CommError;
use halolife_core::{DecompositionError, FormatError, TopologyError};
use thiserror::Error;

/// Why a worker's run ended early.
///
/// Every variant is fatal for the whole group: a partially running group
/// would leave the remaining workers blocked in a collective.
#[derive(Debug, Error)]
pub enum RunError {
    /// The run configuration is invalid for this group.
    #[error("config: {0}")]
    Config(#[from] crate::config::ConfigError),
    /// The initial grid could not be acquired.
    #[error("initial grid: {0}")]
    Format(#[from] FormatError),
    /// The grid height is not a multiple of the worker count.
    #[error(transparent)]
    Decomposition(#[from] DecompositionError),
    /// The worker group could not be formed.
    #[error("topology: {0}")]
    Topology(#[from] TopologyError),
    /// A peer vanished or the exchange protocol was violated.
    #[error("communication failure: {0}")]
    Comm(#[from] CommError),
    /// The presenter failed to load its grid and told everyone to stop.
    #[error("setup aborted by root rank {root}")]
    SetupAborted {
        /// Rank that aborted.
        root: usize,
    },
    /// The root broadcast a setup header this worker cannot decode.
    #[error("malformed setup header ({len} bytes)")]
    MalformedSetup {
        /// Length of the received header.
        len: usize,
    },
    /// The presenter was started without an initial grid to distribute.
    #[error("presenter rank {rank} has no initial grid")]
    MissingInitialGrid {
        /// The presenter's rank.
        rank: usize,
    },
    /// Rendering a frame failed.
    #[error("render failed: {0}")]
    Render(#[source] io::Error),
    /// A worker thread could not be spawned.
    #[error("failed to spawn worker {rank}: {source}")]
    ThreadSpawnFailed {
        /// Rank of the worker.
        rank: usize,
        /// The spawn error.
        #[source]
        source: io::Error,
    },
    /// A worker thread panicked.
    #[error("worker {rank} panicked")]
    WorkerPanicked {
        /// Rank of the worker.
        rank: usize,
    },
}

impl RunError {
    /// Whether this error is only a consequence of another worker failing.
    ///
    /// Used to report the root cause when several workers fail together.
    pub fn is_secondary(&self) -> bool {
        matches!(
            self,
            Self::Comm(CommError::Disconnected { .. }) | Self::SetupAborted { .. }
        )
    }
}
