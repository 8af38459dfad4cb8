//! Criterion benchmarks for whole epochs under both policies.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use throng_bench::{populated, reference_profile, stress_profile, DEFAULT_DENSITY};

fn bench_parallel_epoch_10k(c: &mut Criterion) {
    let mut sim = populated(reference_profile(42), DEFAULT_DENSITY).unwrap();
    sim.step_parallel(10.0, 0.8, 0.3).unwrap();

    c.bench_function("parallel_epoch_10k", |b| {
        b.iter(|| {
            let m = sim.step_parallel(10.0, 0.8, 0.3).unwrap();
            black_box(&m);
        });
    });
}

fn bench_sequential_epoch_10k(c: &mut Criterion) {
    let mut sim = populated(reference_profile(42), DEFAULT_DENSITY).unwrap();
    sim.step_sequential(10.0, 0.3).unwrap();

    c.bench_function("sequential_epoch_10k", |b| {
        b.iter(|| {
            let m = sim.step_sequential(10.0, 0.3).unwrap();
            black_box(&m);
        });
    });
}

fn bench_parallel_epoch_100k(c: &mut Criterion) {
    let mut sim = populated(stress_profile(42), DEFAULT_DENSITY).unwrap();
    sim.step_parallel(10.0, 0.8, 0.3).unwrap();

    c.bench_function("parallel_epoch_100k", |b| {
        b.iter(|| {
            let m = sim.step_parallel(10.0, 0.8, 0.3).unwrap();
            black_box(&m);
        });
    });
}

criterion_group!(
    benches,
    bench_parallel_epoch_10k,
    bench_sequential_epoch_10k,
    bench_parallel_epoch_100k
);
criterion_main!(benches);
