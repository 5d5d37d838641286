/*
 * Utility functions and consts used by the tests.
 *
 */

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Bytes drawn uniformly from the whole 0..=255 range.
pub fn uniform_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

/// Bytes with a heavily skewed distribution, cubing a uniform draw so low byte
/// values dominate the way letters dominate text.
pub fn skewed_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let draw: f64 = rng.gen();
            (draw * draw * draw * 255.0) as u8
        })
        .collect()
}

/// An input alternating between exactly two byte values, so both codes are one
/// bit long and cumulative bit positions are trivially predictable.
pub fn two_symbol_bytes(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| if i % 2 == 0 { b'a' } else { b'b' })
        .collect()
}
