//! Criterion benchmarks for KDE self-evaluation and m-tuple rates.
//!
//! Benchmarks the sliding-window self-evaluation for each kernel shape, the
//! chunked variant, and `MTupleRates::compute` on a synthetic stream of
//! background photons with periodic bursts.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use photon_rates::{
    kde::{KdeOptions, KernelShape, kde_self, kde_self_chunked},
    mtuple::MTupleRates,
};

// ── Helpers ──────────────────────────────────────────────────────────

/// Background gaps of ~100 ticks with a dense burst (gap 2) every 5000
/// photons. Deterministic; no RNG.
fn synthetic_stream(n: usize) -> Vec<i64> {
    let mut t = 0_i64;
    (0..n)
        .map(|i| {
            let gap = if i % 5_000 < 400 { 2 } else { 37 + ((i as i64 * 7_919) % 127) };
            t += gap;
            t
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_kde_self(c: &mut Criterion) {
    let mut group = c.benchmark_group("kde/self");

    for &n in &[10_000_usize, 1_000_000] {
        let ph = synthetic_stream(n);
        group.throughput(Throughput::Elements(n as u64));
        for shape in [KernelShape::Laplace, KernelShape::Gaussian, KernelShape::Rect] {
            let opts = KdeOptions::new(shape, 30.0).unwrap().with_sort_check(false);
            group.bench_with_input(BenchmarkId::new(shape.name(), n), &ph, |b, ph| {
                b.iter(|| kde_self(black_box(ph), &opts).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_kde_self_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("kde/self_chunked");
    let n = 1_000_000;
    let ph = synthetic_stream(n);
    let opts = KdeOptions::new(KernelShape::Laplace, 30.0).unwrap().with_sort_check(false);
    group.throughput(Throughput::Elements(n as u64));

    for &chunk in &[16_384_usize, 131_072] {
        group.bench_with_input(BenchmarkId::new("laplace", chunk), &ph, |b, ph| {
            b.iter(|| kde_self_chunked(black_box(ph), &opts, chunk).unwrap());
        });
    }

    group.finish();
}

fn bench_mtuple(c: &mut Criterion) {
    let mut group = c.benchmark_group("mtuple/compute");
    let n = 1_000_000;
    let ph = synthetic_stream(n);
    group.throughput(Throughput::Elements(n as u64));

    for &m in &[3_usize, 10] {
        group.bench_with_input(BenchmarkId::new("m", m), &ph, |b, ph| {
            b.iter(|| MTupleRates::compute(black_box(ph), m).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kde_self, bench_kde_self_chunked, bench_mtuple);
criterion_main!(benches);
