//! The module providing the offset planner, the lane-parallel write engine and the
//! host orchestrator that sequences them.

pub mod engine;
pub mod orchestrator;
pub mod planner;

use crate::{BitOffset, DEFAULT_OFFSET_CEILING, DEFAULT_OVERFLOW_MARGIN_BITS};

/// Configuration driving [`planner::plan`]. The four observable planning variants
/// (plain, overflow-aware, chunked, chunked + overflow) are all selections of
/// these fields; there is a single planning function.
#[derive(Clone, Copy, Debug)]
pub struct PlannerConfig {
    /// Whether the running offset must be checked against the ceiling. Off for
    /// inputs that provably cannot overflow.
    pub detect_overflow: bool,

    /// Output-bit capacity of one chunk, or `None` when the whole input is a
    /// single chunk.
    pub chunk_bits: Option<u64>,

    /// First bit position the per-segment offset counter cannot represent. The
    /// default matches the 32-bit offsets handed to the write lanes; tests inject
    /// a small ceiling to exercise splits without multi-gigabyte inputs.
    pub offset_ceiling: u64,

    /// Slack reserved under the ceiling: a split is planned as soon as
    /// `offset + code length + margin` would pass the ceiling.
    pub overflow_margin_bits: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            detect_overflow: false,
            chunk_bits: None,
            offset_ceiling: DEFAULT_OFFSET_CEILING,
            overflow_margin_bits: DEFAULT_OVERFLOW_MARGIN_BITS,
        }
    }
}

/// An overflow split inside one chunk: the point at which the offset counter was
/// rebased because it was about to pass the ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverflowSplit {
    /// First input index of the post-split half. The code of this byte starts the
    /// restarted offset sequence.
    pub at: usize,

    /// Bit position, inside the post-split half's first output byte, where its
    /// first code begins. Nonzero when the pre-split half ended mid-byte: the two
    /// halves then share that output byte and are OR-merged on reassembly, which
    /// is what keeps the final stream dense and byte-identical to an unsplit run.
    pub carried_bits: u8,

    /// Total bit length of the pre-split half, including its own carried prefix.
    /// Sizes the first output buffer.
    pub leading_bits: u64,
}

/// One `[lower, upper)` slice of the input, sized so its worst-case output fits
/// the memory budget, along with the boundary bookkeeping the engine needs to
/// reassemble chunk outputs into one dense stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    pub lower: usize,
    pub upper: usize,

    /// Bit position, inside this chunk's first output byte, where its first code
    /// begins (the tail of the previous chunk's last partial byte). Zero for the
    /// first chunk and whenever the previous chunk ended on a byte boundary.
    pub carried_bits: u8,

    /// At most one overflow split per chunk, guaranteed by the orchestrator's
    /// chunk sizing.
    pub split: Option<OverflowSplit>,

    /// Total bit length of this chunk's final (or only) half, including its
    /// carried prefix. Sizes the (second) output buffer.
    pub total_bits: u64,
}

/// The planner's product: one segment-relative start offset per input byte, plus
/// the chunk/split boundary metadata. Offsets are strictly increasing within a
/// segment and `offsets[i] + code_len(input[i])` is exactly where the next code
/// begins, so the write lanes never target the same output bit twice.
#[derive(Clone, Debug)]
pub struct OffsetPlan {
    pub offsets: Vec<BitOffset>,
    pub chunks: Vec<ChunkPlan>,
}

impl OffsetPlan {
    /// Whether any chunk carries an overflow split.
    pub fn has_overflow_split(&self) -> bool {
        self.chunks.iter().any(|chunk| chunk.split.is_some())
    }
}
