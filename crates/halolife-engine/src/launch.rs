//! Launching a worker group as threads in this process.
//!
//! [`run_local`] wires a [`LocalComm`] group, spawns one named thread
//! per rank, runs a [`Coordinator`] on each, and joins them. The
//! presenter thread loads the initial grid and owns the renderer.

use std::thread;

use halolife_comm::{Communicator, LocalComm};
use halolife_core::{FormatError, Grid, Renderer};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::coordinator::{Coordinator, RunReport};
use crate::error::RunError;

/// Run a full simulation on `workers` threads and return the presenter's
/// report.
///
/// `load` is called once, on the presenter's thread. If any worker fails,
/// the error that caused the failure is returned in preference to the
/// disconnects it triggered on the other workers.
pub fn run_local<L, R>(
    config: &RunConfig,
    workers: usize,
    load: L,
    renderer: R,
) -> Result<RunReport, RunError>
where
    L: FnOnce() -> Result<Grid, FormatError> + Send,
    R: Renderer + Send,
{
    config.validate(workers)?;
    let comms = LocalComm::group(workers)?;
    info!(workers, generations = config.generations, "launching local group");

    let mut load = Some(load);
    let mut renderer = Some(renderer);

    let outcomes: Vec<(usize, Result<RunReport, RunError>)> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        let mut failed = Vec::new();
        for comm in comms {
            let rank = comm.rank();
            let (load, renderer) = if rank == config.presenter {
                (load.take(), renderer.take())
            } else {
                (None, None)
            };
            let spawned = thread::Builder::new()
                .name(format!("halolife-worker-{rank}"))
                .spawn_scoped(scope, move || {
                    let initial = load.map(|load| load());
                    Coordinator::setup(comm, config.clone(), renderer, initial)?.run()
                });
            match spawned {
                Ok(handle) => handles.push((rank, handle)),
                // The closure, and with it this rank's endpoint, is dropped
                // here, so its peers see a disconnect instead of hanging.
                Err(source) => {
                    failed.push((rank, Err(RunError::ThreadSpawnFailed { rank, source })));
                }
            }
        }
        handles
            .into_iter()
            .map(|(rank, handle)| {
                let outcome = handle
                    .join()
                    .unwrap_or(Err(RunError::WorkerPanicked { rank }));
                (rank, outcome)
            })
            .chain(failed)
            .collect()
    });

    select_outcome(config.presenter, outcomes)
}

/// Pick the presenter's report, or the most informative error.
fn select_outcome(
    presenter: usize,
    outcomes: Vec<(usize, Result<RunReport, RunError>)>,
) -> Result<RunReport, RunError> {
    let mut report = None;
    let mut primary = None;
    let mut secondary = None;
    for (rank, outcome) in outcomes {
        match outcome {
            Ok(r) if rank == presenter => report = Some(r),
            Ok(_) => {}
            Err(err) => {
                warn!(rank, error = %err, "worker failed");
                let slot = if err.is_secondary() {
                    &mut secondary
                } else {
                    &mut primary
                };
                if slot.is_none() {
                    *slot = Some(err);
                }
            }
        }
    }
    if let Some(err) = primary.or(secondary) {
        return Err(err);
    }
    report.ok_or(RunError::WorkerPanicked { rank: presenter })
}
