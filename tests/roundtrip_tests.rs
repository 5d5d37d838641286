mod common;

use parhuff::huffman::decoder::decompress;
use parhuff::huffman::HEADER_BYTES;
use parhuff::pipeline::orchestrator::Compressor;
use parhuff::{DEFAULT_MEMORY_BUDGET, DEFAULT_OVERFLOW_MARGIN_BITS};

use rstest::rstest;

use crate::common::*;

/// A three-symbol input whose code lengths (1, 2, 2 bits) keep the cumulative bit
/// position drifting across byte boundaries, so chunk and overflow seams land
/// mid-byte as often as not.
fn three_symbol_bytes(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| match i % 7 {
            0..=3 => b'a',
            4 | 5 => b'b',
            _ => b'c',
        })
        .collect()
}

#[rstest]
#[case::tiny(1)]
#[case::sub_byte_stream(3)]
#[case::small(100)]
#[case::medium(10_000)]
#[case::large(300_000)]
fn uniform_input_round_trips(#[case] len: usize) {
    let input = uniform_bytes(len, 31);
    let compressed = Compressor::default().compress(&input).unwrap();
    assert_eq!(decompress(&compressed).unwrap(), input);
}

#[rstest]
#[case::small(100)]
#[case::medium(10_000)]
#[case::large(300_000)]
fn skewed_input_round_trips(#[case] len: usize) {
    let input = skewed_bytes(len, 77);
    let compressed = Compressor::default().compress(&input).unwrap();
    assert_eq!(decompress(&compressed).unwrap(), input);
}

#[test]
fn input_covering_all_byte_values_round_trips() {
    let input: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let compressed = Compressor::default().compress(&input).unwrap();
    assert_eq!(decompress(&compressed).unwrap(), input);
}

#[test]
fn compression_is_deterministic() {
    let input = skewed_bytes(50_000, 3);
    let first = Compressor::default().compress(&input).unwrap();
    let second = Compressor::default().compress(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_input_is_rejected() {
    assert!(Compressor::default().compress(&[]).is_err());
}

#[test]
fn single_distinct_byte_gets_one_bit_codes() {
    let input = vec![b'z'; 10_000];
    let compressed = Compressor::default().compress(&input).unwrap();

    // 10 000 forced 1-bit codes pack into exactly 1250 stream bytes.
    assert_eq!(compressed.len(), HEADER_BYTES + 1250);
    assert!(compressed[HEADER_BYTES..].iter().all(|&byte| byte == 0));
    assert_eq!(decompress(&compressed).unwrap(), input);
}

#[test]
fn single_byte_input_round_trips() {
    let compressed = Compressor::default().compress(b"q").unwrap();
    assert_eq!(decompress(&compressed).unwrap(), b"q");
}

/// Variant selection is a memory decision, never a semantic one: a memory budget
/// forcing chunks a few dozen input bytes long must reproduce the unchunked
/// output byte for byte.
#[test]
fn chunked_output_matches_plain_output() {
    let input = three_symbol_bytes(10_000);

    let plain = Compressor::default().compress(&input).unwrap();
    let chunked = Compressor::new(66, DEFAULT_OVERFLOW_MARGIN_BITS)
        .compress(&input)
        .unwrap();

    assert_eq!(chunked, plain);
    assert_eq!(decompress(&chunked).unwrap(), input);
}

/// A lowered offset ceiling forces overflow splits; the output must still match
/// the plain variant's byte for byte.
#[test]
fn overflow_split_output_matches_plain_output() {
    let input = two_symbol_bytes(10_000);

    let plain = Compressor::default().compress(&input).unwrap();
    let split = Compressor::with_parameters(DEFAULT_MEMORY_BUDGET, 64, 4096)
        .compress(&input)
        .unwrap();

    assert_eq!(split, plain);
    assert_eq!(decompress(&split).unwrap(), input);
}

/// Chunking and overflow splitting applied together, with seams landing mid-byte.
#[test]
fn chunked_and_overflow_output_matches_plain_output() {
    let input = three_symbol_bytes(10_000);

    let plain = Compressor::default().compress(&input).unwrap();
    let both = Compressor::with_parameters(1_100, 64, 4096)
        .compress(&input)
        .unwrap();

    assert_eq!(both, plain);
    assert_eq!(decompress(&both).unwrap(), input);
}

#[test]
fn compressed_stream_survives_a_disk_round_trip() {
    let input = skewed_bytes(20_000, 17);
    let compressed = Compressor::default().compress(&input).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.hf");
    std::fs::write(&path, &compressed).unwrap();
    let read_back = std::fs::read(&path).unwrap();

    assert_eq!(decompress(&read_back).unwrap(), input);
}

#[test]
fn truncated_stream_is_rejected() {
    let input = skewed_bytes(5_000, 9);
    let compressed = Compressor::default().compress(&input).unwrap();

    // Cut into the packed stream: the walk must fail closed, not return garbage.
    let truncated = &compressed[..HEADER_BYTES + 10];
    assert!(decompress(truncated).is_err());
}

#[test]
fn stream_shorter_than_header_is_rejected() {
    assert!(decompress(&[0u8; 100]).is_err());
}

#[test]
fn memory_budget_below_one_code_is_rejected() {
    let input = uniform_bytes(10_000, 5);
    // 16 bytes cannot hold even one worst-case code's output.
    assert!(Compressor::new(16, DEFAULT_OVERFLOW_MARGIN_BITS)
        .compress(&input)
        .is_err());
}
