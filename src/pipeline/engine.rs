use std::ops::Range;
use std::sync::atomic::{AtomicU8, Ordering};

use log::debug;

use rayon::prelude::*;

use crate::huffman::dictionary::Dictionary;
use crate::pipeline::OffsetPlan;
use crate::BitOffset;

/// Turns a plan into the packed output stream.
///
/// Chunks run strictly in index order, because each chunk's placement depends on
/// the carried-bit decision made at the end of the previous one. Within a chunk
/// every input byte is one independent lane: it looks its code up, and ORs each
/// 1-bit into the chunk buffer at its precomputed absolute bit position. Offsets
/// are strictly increasing and lanes only ever set bits, so no two lanes touch
/// the same bit and the buffer needs no coordination beyond the ORs themselves.
///
/// All four planning variants flow through this single path; the plan alone
/// decides how many buffers get packed and how they are stitched together, so the
/// output is bit-identical whichever variant produced the plan.
pub fn write(input: &[u8], dictionary: &Dictionary, plan: &OffsetPlan) -> Vec<u8> {
    let estimated_bytes: usize = plan
        .chunks
        .iter()
        .map(|chunk| chunk.total_bits.div_ceil(8) as usize)
        .sum();
    let mut out = Vec::with_capacity(estimated_bytes);

    for chunk in &plan.chunks {
        match chunk.split {
            None => {
                let segment = pack_segment(
                    input,
                    dictionary,
                    &plan.offsets,
                    chunk.lower..chunk.upper,
                    chunk.total_bits,
                );
                append_merged(&mut out, &segment, chunk.carried_bits);
            }
            Some(split) => {
                // The pre-split half writes into its own buffer; lanes past the
                // split point write into a second one starting over near zero.
                let head = pack_segment(
                    input,
                    dictionary,
                    &plan.offsets,
                    chunk.lower..split.at,
                    split.leading_bits,
                );
                let tail = pack_segment(
                    input,
                    dictionary,
                    &plan.offsets,
                    split.at..chunk.upper,
                    chunk.total_bits,
                );
                append_merged(&mut out, &head, chunk.carried_bits);
                append_merged(&mut out, &tail, split.carried_bits);
            }
        }
    }

    debug!(
        "packed {} input bytes into {} output bytes across {} chunk(s)",
        input.len(),
        out.len(),
        plan.chunks.len()
    );

    out
}

/// Packs the codes of `input[lanes]` into a fresh buffer of `total_bits` bits.
///
/// The buffer is a slab of atomics only because safe Rust demands it for shared
/// writes: the ORs are `Relaxed` and bit-disjoint, so there is nothing to order
/// and no lane can observe or clobber another lane's bits.
fn pack_segment(
    input: &[u8],
    dictionary: &Dictionary,
    offsets: &[BitOffset],
    lanes: Range<usize>,
    total_bits: u64,
) -> Vec<u8> {
    let buffer: Vec<AtomicU8> = (0..total_bits.div_ceil(8))
        .map(|_| AtomicU8::new(0))
        .collect();

    if dictionary.uses_overflow_tier() {
        lanes.into_par_iter().for_each(|lane| {
            let byte = input[lane];
            let start = offsets[lane] as usize;
            for j in 0..dictionary.code_len(byte) {
                if dictionary.bit(byte, j) == 1 {
                    set_bit(&buffer, start + j);
                }
            }
        });
    } else {
        // Every code fits the fast tier, so lanes never pay for the tier check.
        lanes.into_par_iter().for_each(|lane| {
            let byte = input[lane];
            let start = offsets[lane] as usize;
            let code = &dictionary.fast_bits(byte)[..dictionary.code_len(byte)];
            for (j, &bit) in code.iter().enumerate() {
                if bit == 1 {
                    set_bit(&buffer, start + j);
                }
            }
        });
    }

    buffer.into_iter().map(AtomicU8::into_inner).collect()
}

#[inline]
fn set_bit(buffer: &[AtomicU8], position: usize) {
    buffer[position >> 3].fetch_or(0x80 >> (position & 7), Ordering::Relaxed);
}

/// Appends a segment buffer to the output. A nonzero carried-bit count means the
/// segment's first byte holds the tail of the output's current last byte, filled
/// in by the lanes that wrote past the boundary; the two are ORed together so the
/// stream stays dense across the seam.
fn append_merged(out: &mut Vec<u8>, segment: &[u8], carried_bits: u8) {
    if carried_bits > 0 {
        if let (Some(last), Some(&first)) = (out.last_mut(), segment.first()) {
            *last |= first;
            out.extend_from_slice(&segment[1..]);
            return;
        }
    }
    out.extend_from_slice(segment);
}
