//! Benchmarks for pairwise kernels and the MMD loss

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mindiff::{GaussKernel, Kernel, LaplaceKernel, MMDLoss, MinDiffLoss};
use ndarray::Array2;

fn batch(n: usize) -> (Array2<f64>, Array2<f64>) {
    let membership = Array2::from_shape_fn((n, 1), |(i, _)| (i % 2) as f64);
    let predictions = Array2::from_shape_fn((n, 1), |(i, _)| ((i * 37) % 101) as f64 / 101.0);
    (membership, predictions)
}

fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairwise_kernel");
    for &n in &[32, 128, 256] {
        let (_, predictions) = batch(n);

        group.bench_with_input(BenchmarkId::new("gauss", n), &predictions, |b, p| {
            let kernel = GaussKernel::default();
            b.iter(|| kernel.pairwise(black_box(p.view())))
        });
        group.bench_with_input(BenchmarkId::new("laplace", n), &predictions, |b, p| {
            let kernel = LaplaceKernel::default();
            b.iter(|| kernel.pairwise(black_box(p.view())))
        });
    }
    group.finish();
}

fn bench_mmd_loss(c: &mut Criterion) {
    let mut group = c.benchmark_group("mmd_loss");
    let loss = MMDLoss::new();
    for &n in &[32, 128, 256] {
        let (membership, predictions) = batch(n);

        group.bench_function(BenchmarkId::new("value", n), |b| {
            b.iter(|| {
                loss.compute(black_box(membership.view()), black_box(predictions.view()), None)
            })
        });
        group.bench_function(BenchmarkId::new("value_and_gradient", n), |b| {
            b.iter(|| {
                loss.compute_with_gradient(
                    black_box(membership.view()),
                    black_box(predictions.view()),
                    None,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kernels, bench_mmd_loss);
criterion_main!(benches);
