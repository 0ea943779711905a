//! Criterion benchmarks for distributed runs over the in-process transport.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use halolife_bench::reference_grid;
use halolife_comm::{Communicator, HaloExchanger, LocalComm};
use halolife_core::Partition;
use halolife_engine::{run_local, GatherPolicy, NullRenderer, RunConfig};

/// Benchmark: 16 generations of a 256x256 soup on 1, 2, 4 and 8 workers.
fn bench_run_local(c: &mut Criterion) {
    let grid = reference_grid(42);
    let config = RunConfig {
        generations: 16,
        gather: GatherPolicy::Final,
        ..RunConfig::default()
    };

    let mut group = c.benchmark_group("run_local_256x256_16gen");
    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &w| {
            b.iter(|| {
                let initial = grid.clone();
                let report = run_local(&config, w, move || Ok(initial), NullRenderer).unwrap();
                black_box(report.grid.population())
            });
        });
    }
    group.finish();
}

/// Benchmark: a single halo exchange between two workers.
fn bench_pair_exchange(c: &mut Criterion) {
    let grid = reference_grid(7);
    let height = grid.height();

    c.bench_function("halo_exchange_pair_256", |b| {
        b.iter_batched(
            || {
                LocalComm::group(2)
                    .unwrap()
                    .into_iter()
                    .map(|comm| (comm, grid.clone()))
                    .collect::<Vec<_>>()
            },
            |workers| {
                std::thread::scope(|s| {
                    for (comm, mut local) in workers {
                        s.spawn(move || {
                            let topology = comm.topology();
                            let partition = Partition::for_worker(height, topology).unwrap();
                            let halo = HaloExchanger::new(topology, partition, height);
                            black_box(halo.exchange(&comm, &mut local).unwrap())
                        });
                    }
                });
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_run_local, bench_pair_exchange);
criterion_main!(benches);
