//! Full threshold-sweep benchmarks.
//!
//! Compares a single dedicated worker with the global rayon pool on the same
//! seeded connectivity sweep.
#![allow(missing_docs, reason = "Criterion macros generate undocumented items")]
#![allow(
    clippy::expect_used,
    reason = "benchmark setup is infallible for valid constants"
)]
#![allow(
    clippy::excessive_nesting,
    reason = "Criterion bench_with_input + b.iter pattern requires deep nesting"
)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use renyi_benches::{
    params::SweepBenchParams,
    setup::{connectivity_harness, connectivity_sweep},
};
use renyi_core::{NoProgress, SeededSource};

const SEED: u64 = 7;

const CONFIGS: &[(usize, usize)] = &[(100, 50), (300, 20)];

fn run_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold_sweep");
    group.sample_size(10);

    for &(vertex_count, trials) in CONFIGS {
        for threads in [Some(1), None] {
            let params = SweepBenchParams {
                vertex_count,
                trials,
                threads,
                seed: SEED,
            };
            let points = connectivity_sweep(&params).expect("sweep setup must succeed");
            let harness = connectivity_harness(&params).expect("harness setup must succeed");
            let source = SeededSource::new(params.seed);
            group.bench_with_input(BenchmarkId::from_parameter(&params), &points, |b, points| {
                b.iter(|| {
                    let table = harness
                        .run_sweep(points, &source, &mut NoProgress)
                        .expect("sweep must succeed");
                    black_box(table.rows().len())
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, run_sweep);
criterion_main!(benches);
