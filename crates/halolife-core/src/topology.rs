//! Worker identity within a fixed-size ring.

use crate::error::TopologyError;

/// A worker's `(rank, size)` in a flat ring of workers.
///
/// Established once at setup and fixed for the life of the run. Rank
/// `r` owns the row range directly below rank `r + 1`'s, with the last
/// rank wrapping around to rank 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkerTopology {
    rank: usize,
    size: usize,
}

impl WorkerTopology {
    /// Create a topology, rejecting `size == 0` or `rank >= size`.
    pub fn new(rank: usize, size: usize) -> Result<Self, TopologyError> {
        if rank >= size {
            return Err(TopologyError { rank, size });
        }
        Ok(Self { rank, size })
    }

    /// The single-worker topology.
    pub fn solo() -> Self {
        Self { rank: 0, size: 1 }
    }

    /// This worker's rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of workers in the group.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The neighbor owning the rows after ours: `(rank + 1) mod size`.
    pub fn up_neighbor(&self) -> usize {
        (self.rank + 1) % self.size
    }

    /// The neighbor owning the rows before ours: `(rank - 1) mod size`.
    pub fn down_neighbor(&self) -> usize {
        (self.rank + self.size - 1) % self.size
    }

    /// Even ranks send first in each exchange; odd ranks receive first.
    pub fn sends_first(&self) -> bool {
        self.rank % 2 == 0
    }

    /// Whether this worker is alone, in which case it is its own neighbor.
    pub fn is_solo(&self) -> bool {
        self.size == 1
    }
}
