//! Criterion micro-benchmarks for field and grid maintenance.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use throng_bench::{populated, reference_profile, DEFAULT_DENSITY};
use throng_core::{CellId, ClassId};
use throng_grid::TrailField;

/// Benchmark: one diffusion pass over three 100x100 trail layers.
fn bench_trail_diffusion_10k(c: &mut Criterion) {
    let mut trail = TrailField::new(100, 100, 3);
    for i in (0..10_000).step_by(7) {
        trail.deposit(ClassId((i % 3) as u8), CellId(i), 1.0);
    }

    c.bench_function("trail_diffusion_10k", |b| {
        b.iter(|| {
            trail.diffuse(0.1, 0.11);
            black_box(&trail);
        });
    });
}

/// Benchmark: rebuild the obstacle gradient at radius 2.
fn bench_gradient_recompute(c: &mut Criterion) {
    let mut sim = populated(reference_profile(42), DEFAULT_DENSITY).unwrap();

    c.bench_function("gradient_recompute_r2", |b| {
        b.iter(|| {
            sim.recompute_gradient(0.5, 2).unwrap();
        });
    });
}

/// Benchmark: relocate an attractor back and forth, refreshing distances.
fn bench_relocate_attractor(c: &mut Criterion) {
    let mut sim = populated(reference_profile(42), 0.0).unwrap();
    let mut flip = false;

    c.bench_function("relocate_attractor_10k", |b| {
        b.iter(|| {
            flip = !flip;
            let x = if flip { 20 } else { 80 };
            sim.relocate_attractor(ClassId(0), x, 50).unwrap();
        });
    });
}

/// Benchmark: full max-density scan of a crowded 100x100 grid.
fn bench_max_density(c: &mut Criterion) {
    let sim = populated(reference_profile(42), DEFAULT_DENSITY).unwrap();

    c.bench_function("max_density_10k", |b| {
        b.iter(|| black_box(sim.max_density()));
    });
}

criterion_group!(
    benches,
    bench_trail_diffusion_10k,
    bench_gradient_recompute,
    bench_relocate_attractor,
    bench_max_density
);
criterion_main!(benches);
