pub mod compression;
pub mod decompression;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Size of the input used to bench.
const INPUT_LENGTH: usize = 1 << 20;

/// A skewed input, cubing a uniform draw so low byte values dominate the way
/// letters dominate text.
fn skewed_input(seed: u64) -> Vec<u8> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..INPUT_LENGTH)
        .map(|_| {
            let draw: f64 = rng.gen();
            (draw * draw * draw * 255.0) as u8
        })
        .collect()
}
