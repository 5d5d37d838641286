pub mod huffman;
pub mod pipeline;

/// The type representing symbol occurrence counts. Counts are deliberately 32-bit:
/// the compressed-file header stores the whole frequency table as 256 little-endian
/// u32 values and the decompressor rebuilds the tree from exactly those counts.
pub type Freq = u32;

/// The type representing a bit position inside one output segment.
///
/// # Note
/// This is the narrow, device-friendly offset the write lanes consume. A large input
/// can produce more bits than this type can count, which is why the planner splits
/// the offset sequence whenever the running position approaches [`DEFAULT_OFFSET_CEILING`].
pub type BitOffset = u32;

/// The number of representable byte values, i.e. the maximum number of leaves.
pub const MAX_SYMBOLS: usize = 256;

/// Capacity of the tree-node arena: 256 possible leaves plus up to 255 internal
/// nodes, rounded up to a power of two.
pub const NODE_ARENA_CAPACITY: usize = 512;

/// Code-length threshold (in bits) splitting the dictionary's two storage tiers.
/// Codes up to this length live entirely in the fast tier; longer codes spill
/// their remaining bits into the overflow tier.
pub const FAST_TIER_BITS: usize = 191;

/// The longest code the dictionary can represent. A 256-leaf tree cannot produce
/// a deeper path.
pub const MAX_CODE_BITS: usize = 255;

/// First bit position the segment-relative offset counter cannot represent.
/// Matches the wrap point of the 32-bit offsets handed to the write lanes.
pub const DEFAULT_OFFSET_CEILING: u64 = 1 << 32;

/// Default slack, in bits, reserved under the offset ceiling when deciding that
/// an overflow split is needed (8 KiB worth of bits).
pub const DEFAULT_OVERFLOW_MARGIN_BITS: u64 = 8 * 1024 * 8;

/// Default accelerator memory budget (bytes) used by the orchestrator to decide
/// whether the input must be chunked.
pub const DEFAULT_MEMORY_BUDGET: usize = 1 << 30;
