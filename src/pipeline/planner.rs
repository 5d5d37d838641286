use anyhow::{ensure, Result};

use itertools::{Itertools, MinMaxResult};

use log::info;

use crate::huffman::dictionary::Dictionary;
use crate::pipeline::{ChunkPlan, OffsetPlan, OverflowSplit, PlannerConfig};
use crate::{BitOffset, MAX_CODE_BITS};

/// Computes, for every input byte, the bit position at which its code begins in
/// the output, resolving the two independent boundary problems on the way: offset
/// counter overflow and chunk capacity. One function covers all four variants;
/// [`PlannerConfig`] decides which checks are live.
///
/// Offsets are segment-relative. Whenever a boundary closes a segment at input
/// index `i` (the boundary always falls between codes, never inside one), the
/// counter is rebased to `old % 8`: the new segment's first output byte carries
/// the tail bits of the previous segment's last partial byte, and the engine ORs
/// the overlapping byte on reassembly. The packed stream is therefore dense, and
/// identical no matter how many boundaries the plan needed.
///
/// # Errors
/// - the chunk capacity cannot hold even one worst-case code, which makes the
///   whole run impossible (a configuration error, reported before any parallel
///   work starts);
/// - a single chunk would need two overflow splits, which the orchestrator's
///   chunk sizing rules out.
pub fn plan(input: &[u8], dictionary: &Dictionary, config: &PlannerConfig) -> Result<OffsetPlan> {
    ensure!(!input.is_empty(), "cannot plan offsets for an empty input");

    if let Some(cap) = config.chunk_bits {
        // 7 carried bits plus the longest representable code is the worst case a
        // chunk must be able to hold on its own.
        ensure!(
            cap >= (MAX_CODE_BITS + 7) as u64,
            "memory budget too small: a {cap}-bit chunk cannot hold one worst-case code"
        );
    }
    if config.detect_overflow {
        ensure!(
            config.offset_ceiling > config.overflow_margin_bits + (MAX_CODE_BITS + 7) as u64,
            "overflow margin of {} bits leaves no room under the {}-bit offset ceiling",
            config.overflow_margin_bits,
            config.offset_ceiling
        );
    }

    let mut offsets: Vec<BitOffset> = Vec::with_capacity(input.len());
    let mut chunks: Vec<ChunkPlan> = Vec::new();

    let mut chunk_lower = 0usize;
    let mut chunk_carried = 0u8;
    let mut split: Option<OverflowSplit> = None;
    // Bit offset of the next code, relative to the current overflow segment.
    let mut seg_cursor: u64 = 0;
    // Bits accumulated in the current chunk, carried prefix included.
    let mut chunk_used: u64 = 0;

    for (i, &byte) in input.iter().enumerate() {
        let len = dictionary.code_len(byte) as u64;
        debug_assert!(len > 0, "input byte {byte} is absent from the dictionary");

        if let Some(cap) = config.chunk_bits {
            if chunk_used + len > cap {
                // The chunk closes before code i; code i opens the next chunk.
                let carried = (seg_cursor % 8) as u8;
                chunks.push(ChunkPlan {
                    lower: chunk_lower,
                    upper: i,
                    carried_bits: chunk_carried,
                    split: split.take(),
                    total_bits: seg_cursor,
                });
                chunk_lower = i;
                chunk_carried = carried;
                seg_cursor = carried as u64;
                chunk_used = carried as u64;
            }
        }

        if config.detect_overflow
            && seg_cursor + len + config.overflow_margin_bits > config.offset_ceiling
        {
            ensure!(
                split.is_none(),
                "chunk starting at input index {chunk_lower} needs a second overflow split; \
                 the chunk capacity is too large for the offset ceiling"
            );
            let carried = (seg_cursor % 8) as u8;
            split = Some(OverflowSplit {
                at: i,
                carried_bits: carried,
                leading_bits: seg_cursor,
            });
            seg_cursor = carried as u64;
        }

        debug_assert!(seg_cursor <= BitOffset::MAX as u64);
        offsets.push(seg_cursor as BitOffset);
        seg_cursor += len;
        chunk_used += len;
    }

    chunks.push(ChunkPlan {
        lower: chunk_lower,
        upper: input.len(),
        carried_bits: chunk_carried,
        split: split.take(),
        total_bits: seg_cursor,
    });

    let split_count = chunks.iter().filter(|chunk| chunk.split.is_some()).count();
    let sizes = match chunks.iter().map(|chunk| chunk.upper - chunk.lower).minmax() {
        MinMaxResult::NoElements => (0, 0),
        MinMaxResult::OneElement(size) => (size, size),
        MinMaxResult::MinMax(min, max) => (min, max),
    };
    info!(
        "planned {} chunk(s) (sizes {}..={} bytes) with {} overflow split(s) over {} input bytes",
        chunks.len(),
        sizes.0,
        sizes.1,
        split_count,
        input.len()
    );

    Ok(OffsetPlan { offsets, chunks })
}
