use criterion::{criterion_group, Criterion};

use parhuff::huffman::decoder::decompress;
use parhuff::pipeline::orchestrator::Compressor;

use crate::benchmarks::skewed_input;

fn decompression_benchmark(c: &mut Criterion) {
    let input = skewed_input(2);
    let compressed = Compressor::default().compress(&input).unwrap();

    let mut group = c.benchmark_group("decompression");
    group.bench_function("sequential walk", |b| {
        b.iter(|| decompress(&compressed).unwrap())
    });
    group.finish();
}

criterion_group! {
    name = decompression_benches;
    config = Criterion::default();
    targets = decompression_benchmark
}
