//! The per-worker generation loop.
//!
//! A [`Coordinator`] moves through three phases, encoded in ownership:
//!
//! 1. **Setup**: [`Coordinator::setup`] receives the initial grid from
//!    the presenter by broadcast, validates the decomposition, and
//!    computes this worker's partition. It returns a running coordinator.
//! 2. **Running**: each [`step_generation()`](Coordinator::step_generation)
//!    renders (presenter only), steps the owned rows into the scratch
//!    buffer, swaps active and scratch, exchanges halos, and gathers.
//! 3. **Terminated**: [`terminate()`](Coordinator::terminate) renders
//!    the final state and consumes the coordinator, releasing both
//!    buffers.
//!
//! Every worker executes the same sequence, so collectives and halo
//! exchanges line up across the group without any extra barrier.
//!
//! # Setup protocol
//!
//! The presenter broadcasts a 24-byte header of three little-endian
//! `u64`s `[status, height, width]`, then (if status is OK) the cell
//! bytes. A presenter that failed to load its grid broadcasts an abort
//! status so the other workers stop with
//! [`RunError::SetupAborted`] instead of waiting forever.

use std::time::{Duration, Instant};

use halolife_comm::{Communicator, HaloExchanger};
use halolife_core::{
    check_decomposition, step_partition, FormatError, Grid, Partition, Renderer, WorkerTopology,
};
use tracing::{debug, info, warn};

use crate::config::{GatherPolicy, RunConfig};
use crate::error::RunError;
use crate::metrics::RunMetrics;

const STATUS_OK: u64 = 0;
const STATUS_ABORT: u64 = 1;
const HEADER_LEN: usize = 24;

/// `[status, height, width]` sent ahead of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SetupHeader {
    status: u64,
    height: u64,
    width: u64,
}

impl SetupHeader {
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        for word in [self.status, self.height, self.width] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out
    }

    fn decode(bytes: &[u8]) -> Result<Self, RunError> {
        if bytes.len() != HEADER_LEN {
            return Err(RunError::MalformedSetup { len: bytes.len() });
        }
        let word = |k: usize| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[k * 8..(k + 1) * 8]);
            u64::from_le_bytes(buf)
        };
        Ok(Self {
            status: word(0),
            height: word(1),
            width: word(2),
        })
    }

    fn dims(&self) -> Result<(usize, usize), RunError> {
        let malformed = |_| RunError::MalformedSetup { len: HEADER_LEN };
        let height = usize::try_from(self.height).map_err(malformed)?;
        let width = usize::try_from(self.width).map_err(malformed)?;
        Ok((height, width))
    }
}

/// Outcome of a completed run on one worker.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// The worker that produced this report.
    pub rank: usize,
    /// The worker's active grid at termination. On the presenter this is
    /// the full, gathered state; elsewhere only the owned rows (and halo
    /// rows) are current.
    pub grid: Grid,
    /// Generations simulated.
    pub generations: u64,
    /// Timing and traffic totals.
    pub metrics: RunMetrics,
}

/// One worker's state machine over a run.
pub struct Coordinator<C: Communicator, R: Renderer> {
    comm: C,
    config: RunConfig,
    topology: WorkerTopology,
    partition: Partition,
    halo: HaloExchanger,
    active: Grid,
    scratch: Grid,
    generation: u64,
    renderer: Option<R>,
    metrics: RunMetrics,
    /// Staging buffer for gathers; received rows are validated before
    /// they reach `active`.
    gather_buf: Vec<u8>,
}

impl<C: Communicator, R: Renderer> Coordinator<C, R> {
    /// Run the setup phase and return a coordinator ready for generation 0.
    ///
    /// `initial` is the presenter's grid (or its load failure); other ranks
    /// pass `None` and receive the grid by broadcast. `renderer` is only
    /// used on the presenter.
    ///
    /// # Errors
    ///
    /// All workers fail together: a presenter load failure returns the
    /// [`FormatError`] on the presenter and [`RunError::SetupAborted`]
    /// elsewhere, a presenter given no grid at all returns
    /// [`RunError::MissingInitialGrid`], and an uneven decomposition
    /// returns [`RunError::Decomposition`] on every rank.
    pub fn setup(
        comm: C,
        config: RunConfig,
        renderer: Option<R>,
        initial: Option<Result<Grid, FormatError>>,
    ) -> Result<Self, RunError> {
        let topology = comm.topology();
        config.validate(topology.size())?;
        let root = config.presenter;

        let grid = if topology.rank() == root {
            Self::broadcast_from_root(&comm, root, initial)?
        } else {
            Self::receive_from_root(&comm, root)?
        };

        let partition = Partition::for_worker(grid.height(), topology)?;
        let halo = HaloExchanger::new(topology, partition, grid.height());
        info!(
            rank = topology.rank(),
            size = topology.size(),
            lower = partition.lower(),
            upper = partition.upper(),
            height = grid.height(),
            width = grid.width(),
            "worker ready"
        );

        Ok(Self {
            comm,
            topology,
            partition,
            halo,
            scratch: grid.clone(),
            active: grid,
            generation: 0,
            renderer: if topology.rank() == root { renderer } else { None },
            metrics: RunMetrics::default(),
            gather_buf: Vec::new(),
            config,
        })
    }

    fn broadcast_from_root(
        comm: &C,
        root: usize,
        initial: Option<Result<Grid, FormatError>>,
    ) -> Result<Grid, RunError> {
        let grid = match initial {
            Some(Ok(grid)) => grid,
            Some(Err(err)) => {
                warn!(rank = root, error = %err, "initial grid rejected, aborting run");
                Self::broadcast_abort(comm, root)?;
                return Err(err.into());
            }
            None => {
                warn!(rank = root, "presenter has no initial grid, aborting run");
                Self::broadcast_abort(comm, root)?;
                return Err(RunError::MissingInitialGrid { rank: root });
            }
        };

        let mut header = SetupHeader {
            status: STATUS_OK,
            height: grid.height() as u64,
            width: grid.width() as u64,
        }
        .encode();
        comm.broadcast(&mut header, root)?;
        check_decomposition(grid.height(), comm.size())?;

        let (height, width) = (grid.height(), grid.width());
        let mut cells = grid.into_cells();
        comm.broadcast(&mut cells, root)?;
        Ok(Grid::from_cells(height, width, cells)?)
    }

    fn broadcast_abort(comm: &C, root: usize) -> Result<(), RunError> {
        let mut header = SetupHeader {
            status: STATUS_ABORT,
            height: 0,
            width: 0,
        }
        .encode();
        comm.broadcast(&mut header, root)?;
        Ok(())
    }

    fn receive_from_root(comm: &C, root: usize) -> Result<Grid, RunError> {
        let mut header = Vec::new();
        comm.broadcast(&mut header, root)?;
        let decoded = SetupHeader::decode(&header)?;
        if decoded.status != STATUS_OK {
            warn!(rank = comm.rank(), root, "setup aborted by presenter");
            return Err(RunError::SetupAborted { root });
        }
        let (height, width) = decoded.dims()?;
        check_decomposition(height, comm.size())?;

        let mut cells = Vec::new();
        comm.broadcast(&mut cells, root)?;
        Ok(Grid::from_cells(height, width, cells)?)
    }

    /// This worker's identity.
    pub fn topology(&self) -> WorkerTopology {
        self.topology
    }

    /// Rows this worker owns.
    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Generations completed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current active grid.
    pub fn grid(&self) -> &Grid {
        &self.active
    }

    /// Whether this worker renders and receives gathers.
    pub fn is_presenter(&self) -> bool {
        self.topology.rank() == self.config.presenter
    }

    /// Metrics accumulated so far.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Run one generation: render, step, swap, exchange, gather.
    pub fn step_generation(&mut self) -> Result<(), RunError> {
        let every = self.config.gather == GatherPolicy::EveryGeneration;
        if every {
            self.render()?;
        }

        let start = Instant::now();
        step_partition(&self.active, &mut self.scratch, &self.partition);
        std::mem::swap(&mut self.active, &mut self.scratch);
        let step_us = elapsed_us(start);

        let start = Instant::now();
        let received = self.halo.exchange(&self.comm, &mut self.active)?;
        let exchange_us = elapsed_us(start);

        let gather_us = if every { self.gather()? } else { 0 };

        self.generation += 1;
        self.metrics.generations = self.generation;
        self.metrics.step_us += step_us;
        self.metrics.exchange_us += exchange_us;
        self.metrics.halo_bytes += received as u64;
        debug!(
            rank = self.topology.rank(),
            generation = self.generation,
            step_us,
            exchange_us,
            gather_us,
            "generation complete"
        );
        Ok(())
    }

    /// Run the remaining configured generations, then terminate.
    pub fn run(mut self) -> Result<RunReport, RunError> {
        while self.generation < self.config.generations {
            self.step_generation()?;
        }
        self.terminate()
    }

    /// Render the final state and release the buffers.
    pub fn terminate(mut self) -> Result<RunReport, RunError> {
        if self.config.gather == GatherPolicy::Final {
            self.gather()?;
        }
        self.render()?;
        info!(
            rank = self.topology.rank(),
            generations = self.generation,
            step_us = self.metrics.step_us,
            exchange_us = self.metrics.exchange_us,
            "run terminated"
        );
        Ok(RunReport {
            rank: self.topology.rank(),
            grid: self.active,
            generations: self.generation,
            metrics: self.metrics,
        })
    }

    fn render(&mut self) -> Result<(), RunError> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        let start = Instant::now();
        renderer
            .render(&self.active, self.generation)
            .map_err(RunError::Render)?;
        self.metrics.render_us += elapsed_us(start);
        Ok(())
    }

    /// Collect every worker's owned rows onto the presenter.
    fn gather(&mut self) -> Result<u64, RunError> {
        let start = Instant::now();
        let chunk = self.partition.len() * self.active.width();
        let width = self.active.width();
        let owned = self.partition.rows();
        self.gather_buf.resize(self.active.as_cells().len(), 0);
        self.gather_buf[owned.start * width..owned.end * width]
            .copy_from_slice(self.active.rows(owned));
        self.comm
            .gather(&mut self.gather_buf, chunk, self.config.presenter)?;
        if self.is_presenter() {
            self.active.copy_rows_from(0, &self.gather_buf)?;
        }
        let us = elapsed_us(start);
        self.metrics.gather_us += us;
        Ok(us)
    }
}

impl<C: Communicator, R: Renderer> std::fmt::Debug for Coordinator<C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("rank", &self.topology.rank())
            .field("size", &self.topology.size())
            .field("partition", &self.partition)
            .field("generation", &self.generation)
            .field("presenter", &self.is_presenter())
            .finish()
    }
}

fn elapsed_us(start: Instant) -> u64 {
    micros(start.elapsed())
}

/// Whole microseconds in `d`, saturating at `u64::MAX`.
fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use halolife_comm::LocalComm;
    use halolife_core::advance;
    use halolife_test_utils::{patterns, RecordingRenderer};

    fn solo() -> LocalComm {
        LocalComm::group(1).unwrap().pop().unwrap()
    }

    #[test]
    fn header_round_trips() {
        let h = SetupHeader {
            status: STATUS_OK,
            height: 12,
            width: 7,
        };
        let bytes = h.encode();
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(SetupHeader::decode(&bytes).unwrap(), h);
        assert_eq!(h.dims().unwrap(), (12, 7));
    }

    #[test]
    fn short_header_is_malformed() {
        match SetupHeader::decode(&[0u8; 10]) {
            Err(RunError::MalformedSetup { len: 10 }) => {}
            other => panic!("expected MalformedSetup, got {other:?}"),
        }
    }

    #[test]
    fn solo_setup_owns_all_rows() {
        let grid = patterns::glider(6, 6);
        let c = Coordinator::<_, RecordingRenderer>::setup(
            solo(),
            RunConfig::default(),
            None,
            Some(Ok(grid.clone())),
        )
        .unwrap();
        assert_eq!(c.partition().rows(), 0..6);
        assert_eq!(c.generation(), 0);
        assert!(c.is_presenter());
        assert_eq!(c.grid(), &grid);
    }

    #[test]
    fn solo_run_matches_sequential_and_renders_each_generation() {
        let grid = patterns::glider(6, 6);
        let config = RunConfig {
            generations: 3,
            ..RunConfig::default()
        };
        let mut recorder = RecordingRenderer::new();
        let report = Coordinator::setup(solo(), config, Some(&mut recorder), Some(Ok(grid.clone())))
            .unwrap()
            .run()
            .unwrap();

        let mut expected = grid;
        for _ in 0..3 {
            expected = advance(&expected);
        }
        assert_eq!(report.grid, expected);
        assert_eq!(report.generations, 3);
        assert_eq!(report.metrics.generations, 3);
        assert_eq!(report.metrics.halo_bytes, 0);
        assert_eq!(recorder.generations(), vec![0, 1, 2, 3]);
        assert_eq!(recorder.last(), Some(&expected));
    }

    #[test]
    fn final_policy_renders_once() {
        let config = RunConfig {
            generations: 4,
            gather: GatherPolicy::Final,
            ..RunConfig::default()
        };
        let mut recorder = RecordingRenderer::new();
        Coordinator::setup(
            solo(),
            config,
            Some(&mut recorder),
            Some(Ok(patterns::glider(8, 8))),
        )
        .unwrap()
        .run()
        .unwrap();
        assert_eq!(recorder.generations(), vec![4]);
    }

    #[test]
    fn step_generation_advances_counter() {
        let mut c = Coordinator::<_, RecordingRenderer>::setup(
            solo(),
            RunConfig::default(),
            None,
            Some(Ok(patterns::place(5, 5, &patterns::BLINKER, 2, 1))),
        )
        .unwrap();
        c.step_generation().unwrap();
        c.step_generation().unwrap();
        assert_eq!(c.generation(), 2);
        assert_eq!(c.metrics().generations, 2);
        // Period 2: back to the start.
        assert_eq!(c.grid(), &patterns::place(5, 5, &patterns::BLINKER, 2, 1));
    }

    #[test]
    fn load_failure_is_reported_by_presenter() {
        let err = Coordinator::<_, RecordingRenderer>::setup(
            solo(),
            RunConfig::default(),
            None,
            Some(Err(FormatError::MissingHeader)),
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Format(FormatError::MissingHeader)));
    }

    #[test]
    fn presenter_without_grid_reports_missing_grid() {
        let err =
            Coordinator::<_, RecordingRenderer>::setup(solo(), RunConfig::default(), None, None)
                .unwrap_err();
        match err {
            RunError::MissingInitialGrid { rank: 0 } => {}
            other => panic!("expected MissingInitialGrid, got {other:?}"),
        }
    }

    #[test]
    fn micros_saturates_instead_of_truncating() {
        assert_eq!(micros(Duration::from_millis(3)), 3_000);
        assert_eq!(micros(Duration::MAX), u64::MAX);
    }

    #[test]
    fn invalid_presenter_is_a_config_error() {
        let config = RunConfig {
            presenter: 1,
            ..RunConfig::default()
        };
        let err = Coordinator::<_, RecordingRenderer>::setup(
            solo(),
            config,
            None,
            Some(Ok(patterns::glider(4, 4))),
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
    }

    #[test]
    fn render_failure_stops_the_run() {
        let err = Coordinator::setup(
            solo(),
            RunConfig::default(),
            Some(halolife_test_utils::FailingRenderer),
            Some(Ok(patterns::glider(4, 4))),
        )
        .unwrap()
        .run()
        .unwrap_err();
        assert!(matches!(err, RunError::Render(_)));
    }
}
