//! Per-worker run metrics.
//!
//! [`RunMetrics`] accumulates timing and traffic for one worker across
//! a whole run. All durations are in microseconds.

/// Timing and traffic totals for one worker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Generations completed.
    pub generations: u64,
    /// Time spent applying the rule to owned rows.
    pub step_us: u64,
    /// Time spent in halo exchanges, including waiting for neighbors.
    pub exchange_us: u64,
    /// Time spent in gathers onto the presenter.
    pub gather_us: u64,
    /// Time spent rendering (presenter only).
    pub render_us: u64,
    /// Halo bytes received.
    pub halo_bytes: u64,
}

impl RunMetrics {
    /// Mean time per generation spent stepping, in microseconds.
    pub fn mean_step_us(&self) -> u64 {
        self.step_us.checked_div(self.generations).unwrap_or(0)
    }

    /// Mean time per generation spent exchanging halos, in microseconds.
    pub fn mean_exchange_us(&self) -> u64 {
        self.exchange_us.checked_div(self.generations).unwrap_or(0)
    }
}
