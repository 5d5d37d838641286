use crate::huffman::tree::{HuffmanTree, Node, NodeIdx};
use crate::{FAST_TIER_BITS, MAX_CODE_BITS, MAX_SYMBOLS};

/// Number of code bits each byte value can spill past the fast tier.
const OVERFLOW_TIER_BITS: usize = MAX_CODE_BITS - FAST_TIER_BITS;

/// The byte-value → code mapping, stored across two tiers split at
/// [`FAST_TIER_BITS`]: the first `min(len, 191)` bits of every code live in the
/// fast table, the remaining bits of codes longer than that in the overflow
/// table. Bits are kept unpacked, one byte holding 0 or 1, so a write lane can
/// address the j-th bit of a code without shifting.
///
/// The split mirrors the two memory tiers the write phase reads from: the fast
/// table is small enough to stage in fast shared capacity, while the rarely
/// touched overflow table stays in plain read-only memory behind a single flag
/// check.
pub struct Dictionary {
    fast: Box<[[u8; FAST_TIER_BITS]; MAX_SYMBOLS]>,
    overflow: Box<[[u8; OVERFLOW_TIER_BITS]; MAX_SYMBOLS]>,
    lengths: [u8; MAX_SYMBOLS],
    uses_overflow_tier: bool,
}

impl Dictionary {
    /// Walks the tree depth-first and records, for every leaf, the accumulated
    /// root-to-leaf path as that byte's code: 0 descending left, 1 descending
    /// right. A tree with a single leaf gets the forced 1-bit code `0`, since no
    /// left/right decision exists to traverse.
    pub fn build(tree: &HuffmanTree) -> Self {
        let mut dictionary = Self {
            fast: Box::new([[0; FAST_TIER_BITS]; MAX_SYMBOLS]),
            overflow: Box::new([[0; OVERFLOW_TIER_BITS]; MAX_SYMBOLS]),
            lengths: [0; MAX_SYMBOLS],
            uses_overflow_tier: false,
        };

        if tree.distinct_count() == 1 {
            let Node::Leaf { byte, .. } = *tree.node(tree.root()) else {
                unreachable!("a single-symbol tree has a leaf root");
            };
            dictionary.lengths[byte as usize] = 1;
            // The forced code is a single 0 bit; both tiers are already zeroed.
            return dictionary;
        }

        // Explicit-stack depth-first walk. The path buffer holds the bits of the
        // root-to-node path; depth is bounded by the number of leaves, so 255 is
        // the deepest a path can get. Each entry carries the edge bit leading to
        // it and writes it into the path buffer when popped, so the prefix is
        // intact even after a sibling subtree reused the deeper positions.
        let mut path = [0u8; MAX_CODE_BITS];
        let mut stack: Vec<(NodeIdx, usize, u8)> = vec![(tree.root(), 0, 0)];

        while let Some((idx, depth, edge_bit)) = stack.pop() {
            if depth > 0 {
                path[depth - 1] = edge_bit;
            }
            match *tree.node(idx) {
                Node::Leaf { byte, .. } => {
                    dictionary.record(byte, &path[..depth]);
                }
                Node::Internal { left, right, .. } => {
                    // The stack reverses visit order, so push right first to keep
                    // the left-then-right traversal order.
                    stack.push((right, depth + 1, 1));
                    stack.push((left, depth + 1, 0));
                }
            }
        }

        dictionary
    }

    fn record(&mut self, byte: u8, code: &[u8]) {
        debug_assert!(!code.is_empty() && code.len() <= MAX_CODE_BITS);

        self.lengths[byte as usize] = code.len() as u8;
        let fast_len = code.len().min(FAST_TIER_BITS);
        self.fast[byte as usize][..fast_len].copy_from_slice(&code[..fast_len]);

        if code.len() > FAST_TIER_BITS {
            let spill = &code[FAST_TIER_BITS..];
            self.overflow[byte as usize][..spill.len()].copy_from_slice(spill);
            self.uses_overflow_tier = true;
        }
    }

    /// The code length, in bits, of the given byte value. Zero for byte values
    /// absent from the input.
    #[inline]
    pub fn code_len(&self, byte: u8) -> usize {
        self.lengths[byte as usize] as usize
    }

    /// The `i`-th bit (0 or 1) of the given byte value's code.
    #[inline]
    pub fn bit(&self, byte: u8, i: usize) -> u8 {
        debug_assert!(i < self.code_len(byte));
        if i < FAST_TIER_BITS {
            self.fast[byte as usize][i]
        } else {
            self.overflow[byte as usize][i - FAST_TIER_BITS]
        }
    }

    /// The fast-tier row of the given byte value. Holds the complete code when
    /// `code_len(byte) <= FAST_TIER_BITS`, i.e. always when
    /// [`uses_overflow_tier`](Self::uses_overflow_tier) is false.
    #[inline]
    pub fn fast_bits(&self, byte: u8) -> &[u8; FAST_TIER_BITS] {
        &self.fast[byte as usize]
    }

    /// Whether any code spilled past [`FAST_TIER_BITS`]. When false the write
    /// lanes never touch the overflow table.
    #[inline]
    pub fn uses_overflow_tier(&self) -> bool {
        self.uses_overflow_tier
    }

    /// The longest code length in the dictionary, in bits.
    pub fn max_code_len(&self) -> usize {
        self.lengths.iter().map(|&len| len as usize).max().unwrap_or(0)
    }
}
