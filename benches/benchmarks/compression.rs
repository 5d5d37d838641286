use criterion::{criterion_group, Criterion};

use parhuff::pipeline::orchestrator::Compressor;
use parhuff::DEFAULT_OVERFLOW_MARGIN_BITS;

use crate::benchmarks::skewed_input;

fn compression_benchmark(c: &mut Criterion) {
    let input = skewed_input(0);
    let compressor = Compressor::default();

    let mut group = c.benchmark_group("compression");
    group.bench_function("plain", |b| b.iter(|| compressor.compress(&input).unwrap()));
    group.finish();
}

fn chunked_compression_benchmark(c: &mut Criterion) {
    let input = skewed_input(1);
    // A budget a quarter of the input size forces several chunks per run.
    let compressor = Compressor::new(input.len() / 4, DEFAULT_OVERFLOW_MARGIN_BITS);

    let mut group = c.benchmark_group("compression");
    group.bench_function("chunked", |b| {
        b.iter(|| compressor.compress(&input).unwrap())
    });
    group.finish();
}

criterion_group! {
    name = compression_benches;
    config = Criterion::default();
    targets = compression_benchmark, chunked_compression_benchmark
}
