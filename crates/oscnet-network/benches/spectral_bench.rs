// ─────────────────────────────────────────────────────────────────────
// OscNet — Spectral Layer Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for topology construction and the Jacobi
//! spectral path at the kernel's working size (N = 20).

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use oscnet_network::{laplacian_spectrum, topology_properties, Adjacency};

const N: usize = 20;

fn bench_build_small_world(c: &mut Criterion) {
    c.bench_function("build_small_world_20", |b| {
        b.iter(|| Adjacency::small_world(black_box(N), 4, 0.3, 42).unwrap())
    });
}

fn bench_laplacian_spectrum_complete(c: &mut Criterion) {
    let a = Adjacency::complete(N).unwrap();
    c.bench_function("laplacian_spectrum_complete_20", |b| {
        b.iter(|| laplacian_spectrum(black_box(&a)).unwrap())
    });
}

fn bench_laplacian_spectrum_small_world(c: &mut Criterion) {
    let a = Adjacency::small_world(N, 4, 0.3, 42).unwrap();
    c.bench_function("laplacian_spectrum_small_world_20", |b| {
        b.iter(|| laplacian_spectrum(black_box(&a)).unwrap())
    });
}

fn bench_topology_properties(c: &mut Criterion) {
    let a = Adjacency::ring(N, 2).unwrap();
    c.bench_function("topology_properties_ring_20", |b| {
        b.iter(|| topology_properties(black_box(&a), "ring_k2").unwrap())
    });
}

criterion_group!(
    spectral,
    bench_build_small_world,
    bench_laplacian_spectrum_complete,
    bench_laplacian_spectrum_small_world,
    bench_topology_properties,
);
criterion_main!(spectral);
