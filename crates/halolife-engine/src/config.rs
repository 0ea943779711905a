//! Run configuration and validation.
//!
//! [`RunConfig`] is identical on every worker. [`validate()`](RunConfig::validate)
//! is pure, so all workers reach the same verdict without talking to
//! each other.

use thiserror::Error;

// ── GatherPolicy ───────────────────────────────────────────────────

/// When owned rows are collected onto the presenter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GatherPolicy {
    /// Gather after every generation and render every generation.
    #[default]
    EveryGeneration,
    /// Gather once at termination; only the final state is rendered.
    Final,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`RunConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The worker group is empty.
    #[error("worker count must be at least 1")]
    NoWorkers,
    /// The presenter rank is not part of the group.
    #[error("presenter rank {presenter} is outside a group of {workers} workers")]
    PresenterOutOfRange {
        /// Configured presenter rank.
        presenter: usize,
        /// Group size.
        workers: usize,
    },
}

// ── RunConfig ──────────────────────────────────────────────────────

/// Configuration shared by every worker of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of generations to simulate. Default: 64.
    pub generations: u64,
    /// Rank that loads the initial grid, receives gathers, and renders.
    /// Default: 0.
    pub presenter: usize,
    /// When to collect the full grid onto the presenter.
    pub gather: GatherPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generations: 64,
            presenter: 0,
            gather: GatherPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Check the configuration against a group of `workers`.
    pub fn validate(&self, workers: usize) -> Result<(), ConfigError> {
        if workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.presenter >= workers {
            return Err(ConfigError::PresenterOutOfRange {
                presenter: self.presenter,
                workers,
            });
        }
        Ok(())
    }
}
