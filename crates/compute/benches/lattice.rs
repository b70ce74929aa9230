//! Benchmark for lattice noise and transform tiers
//!
//! Compares the CPU tiers directly and the dispatcher end-to-end on the
//! largest supported lattice.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fluxcube_compute::backend::{parallel, scalar};
use fluxcube_compute::{ComputeEngine, LatticeSize, NoiseKind, NoiseParams};

fn bench_params() -> NoiseParams {
    NoiseParams {
        kind: NoiseKind::Gradient,
        size: LatticeSize::Size32,
        scale: 6.0,
        octaves: 4,
        persistence: 0.5,
        seed: 42,
    }
}

fn bench_noise_tiers(c: &mut Criterion) {
    let params = bench_params();

    c.bench_function("noise_scalar_32", |b| {
        b.iter(|| scalar::fill_noise(black_box(&params)))
    });
    c.bench_function("noise_parallel_32", |b| {
        b.iter(|| parallel::fill_noise(black_box(&params)))
    });
}

fn bench_fft_tiers(c: &mut Criterion) {
    let n = 32usize;
    let total = n * n * n;
    let real: Vec<f32> = (0..total).map(|i| ((i * 31 % 97) as f32) * 0.01).collect();
    let imag = vec![0.0f32; total];

    c.bench_function("fft_scalar_32", |b| {
        b.iter(|| scalar::fft_forward(black_box(&real), black_box(&imag), n))
    });
    c.bench_function("fft_parallel_32", |b| {
        b.iter(|| parallel::fft_forward(black_box(&real), black_box(&imag), n))
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let engine = ComputeEngine::new();
    engine.initialize();
    let params = bench_params();

    c.bench_function("dispatched_noise_32", |b| {
        b.iter(|| engine.compute_noise(black_box(&params)))
    });
}

criterion_group!(benches, bench_noise_tiers, bench_fft_tiers, bench_dispatch);
criterion_main!(benches);
