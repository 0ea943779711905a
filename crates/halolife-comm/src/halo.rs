//! Boundary-row exchange between row-neighbors.
//!
//! After a worker steps its rows `[lower, upper)`, the rows just outside
//! that range (`lower - 1` and `upper`, wrapped) hold stale values that
//! the neighbors own. Each generation the exchanger refreshes them in
//! two phases:
//!
//! - **Exchange A**: send row `upper - 1` to the up neighbor
//!   (`rank + 1`) and receive row `lower - 1` from the down neighbor.
//! - **Exchange B**: send row `lower` to the down neighbor (`rank - 1`)
//!   and receive row `upper` from the up neighbor.
//!
//! Sends are rendezvous sends, so two neighbors that both send first
//! would deadlock. Even ranks therefore send then receive, and odd ranks
//! receive then send, in both phases. For any adjacent pair one side is
//! sending while the other is receiving. With an odd group size, ranks
//! `size - 1` and `0` are both even; the chain still resolves because
//! rank 1 receives first and unblocks rank 0, which then receives from
//! `size - 1`.
//!
//! A single worker exchanges nothing: wrapped indexing over its own grid
//! already supplies the halo.

use halolife_core::{Grid, Partition, WorkerTopology};
use tracing::trace;

use crate::comm::{Communicator, Tag};
use crate::error::CommError;

/// Order of the two halves of one exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Send, then receive (even ranks).
    SendFirst,
    /// Receive, then send (odd ranks).
    ReceiveFirst,
}

/// One phase of the halo protocol, as seen by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exchange {
    /// Absolute row sent.
    pub send_row: usize,
    /// Rank the row is sent to.
    pub dest: usize,
    /// Absolute row overwritten by the received row.
    pub recv_row: usize,
    /// Rank the row is received from.
    pub source: usize,
    /// Whether this worker sends or receives first.
    pub order: Order,
}

/// Runs the two-phase halo exchange for one worker.
#[derive(Clone, Copy, Debug)]
pub struct HaloExchanger {
    topology: WorkerTopology,
    partition: Partition,
    height: usize,
}

impl HaloExchanger {
    /// Create an exchanger for the worker `topology` owning `partition`
    /// of a grid with `height` rows.
    pub fn new(topology: WorkerTopology, partition: Partition, height: usize) -> Self {
        Self {
            topology,
            partition,
            height,
        }
    }

    /// The worker this exchanger serves.
    pub fn topology(&self) -> WorkerTopology {
        self.topology
    }

    /// The two phases `[A, B]` this worker runs each generation, or
    /// `None` for a single worker.
    pub fn plan(&self) -> Option<[Exchange; 2]> {
        if self.topology.is_solo() {
            return None;
        }
        let up = self.topology.up_neighbor();
        let down = self.topology.down_neighbor();
        let order = if self.topology.sends_first() {
            Order::SendFirst
        } else {
            Order::ReceiveFirst
        };
        let lower = self.partition.lower();
        let upper = self.partition.upper();
        let a = Exchange {
            send_row: upper - 1,
            dest: up,
            recv_row: (lower + self.height - 1) % self.height,
            source: down,
            order,
        };
        let b = Exchange {
            send_row: lower,
            dest: down,
            recv_row: upper % self.height,
            source: up,
            order,
        };
        Some([a, b])
    }

    /// Refresh this worker's halo rows in `grid` from its neighbors.
    ///
    /// Blocks until both neighbors have run their matching phases.
    /// Returns the number of bytes received.
    pub fn exchange<C>(&self, comm: &C, grid: &mut Grid) -> Result<usize, CommError>
    where
        C: Communicator + ?Sized,
    {
        debug_assert_eq!(comm.topology(), self.topology);
        debug_assert_eq!(grid.height(), self.height);
        let Some(phases) = self.plan() else {
            return Ok(0);
        };
        for phase in &phases {
            run_phase(comm, grid, phase)?;
        }
        Ok(2 * grid.width())
    }
}

fn run_phase<C>(comm: &C, grid: &mut Grid, phase: &Exchange) -> Result<(), CommError>
where
    C: Communicator + ?Sized,
{
    trace!(
        rank = comm.rank(),
        send_row = phase.send_row,
        dest = phase.dest,
        recv_row = phase.recv_row,
        source = phase.source,
        order = ?phase.order,
        "halo phase"
    );
    let send_row = phase.send_row as isize;
    let recv_row = phase.recv_row as isize;
    match phase.order {
        Order::SendFirst => {
            comm.send(grid.row(send_row), phase.dest, Tag::Halo)?;
            comm.recv(grid.row_mut(recv_row), phase.source, Tag::Halo)?;
        }
        Order::ReceiveFirst => {
            comm.recv(grid.row_mut(recv_row), phase.source, Tag::Halo)?;
            comm.send(grid.row(send_row), phase.dest, Tag::Halo)?;
        }
    }
    Ok(())
}
