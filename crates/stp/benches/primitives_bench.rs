//! Criterion benchmarks for geometry primitives.
//! Focus: erase with k disks, proximity query over m points.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use stp::api::{GeometryEngine, PlanarEngine, Polyline};

fn wiggly_line(vertices: usize, seed: u64) -> Polyline {
    let mut rng = StdRng::seed_from_u64(seed);
    let pts = (0..vertices)
        .map(|i| Vector2::new(i as f64 * 10.0, rng.gen_range(-3.0..3.0)))
        .collect();
    Polyline::new(pts)
}

fn scattered(m: usize, seed: u64) -> Vec<Vector2<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..m)
        .map(|_| Vector2::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
        .collect()
}

fn bench_primitives(c: &mut Criterion) {
    let engine = PlanarEngine;
    let mut group = c.benchmark_group("primitives");
    for &k in &[1usize, 10, 100] {
        group.bench_with_input(BenchmarkId::new("erase_disks", k), &k, |b, &k| {
            let line = wiggly_line(101, 7);
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(k as u64);
                    (0..k)
                        .map(|_| Vector2::new(rng.gen_range(0.0..1000.0), 0.0))
                        .collect::<Vec<_>>()
                },
                |centers| {
                    let region = engine.buffer(&centers, 4.0).unwrap();
                    let _parts = engine.explode(engine.difference(&line, &region).unwrap());
                },
                BatchSize::SmallInput,
            )
        });
    }
    for &m in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("proximity_query", m), &m, |b, &m| {
            b.iter_batched(
                || scattered(m, 11),
                |pts| {
                    let _pairs = engine.proximity_query(&pts, 8.0);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_primitives);
criterion_main!(benches);
