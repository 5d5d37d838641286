use criterion::criterion_main;

mod benchmarks;

criterion_main! {
    benchmarks::compression::compression_benches,
    benchmarks::decompression::decompression_benches,
}
