//! Benchmarks for galaxy generation and planet mesh construction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use galaxy::generator::generate_seeded;
use galaxy::options::GalaxyOptions;
use galaxy::renderer::planet::sphere_mesh;

fn generate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for count in [1_000_u32, 100_000, 1_000_000] {
        let options = GalaxyOptions {
            count,
            ..GalaxyOptions::default()
        };
        let _ = group.bench_with_input(BenchmarkId::from_parameter(count), &options, |b, o| {
            b.iter(|| black_box(generate_seeded(black_box(o), 7)));
        });
    }
    group.finish();
}

fn sphere_benchmark(c: &mut Criterion) {
    let _ = c.bench_function("sphere_mesh_64x64", |b| {
        b.iter(|| black_box(sphere_mesh(black_box(64), black_box(64))));
    });
}

#[allow(missing_docs)]
mod bench_main {
    use super::*;
    criterion_group!(benches, generate_benchmark, sphere_benchmark);
}
criterion_main!(bench_main::benches);
