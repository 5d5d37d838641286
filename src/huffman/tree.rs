use anyhow::{ensure, Result};

use crate::huffman::FrequencyTable;
use crate::{Freq, NODE_ARENA_CAPACITY};

/// Index of a node inside the arena. Indices double as ownership handles: no node
/// is ever freed individually, the whole arena is dropped at the end of the run.
pub type NodeIdx = usize;

/// A node of the code tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf {
        byte: u8,
        freq: Freq,
    },
    Internal {
        freq: Freq,
        left: NodeIdx,
        right: NodeIdx,
    },
}

impl Node {
    #[inline]
    pub fn freq(&self) -> Freq {
        match *self {
            Node::Leaf { freq, .. } => freq,
            Node::Internal { freq, .. } => freq,
        }
    }

    /// The key used to order nodes with equal frequency: the byte value for leaves,
    /// zero for internal nodes. This makes the merge order, and thus the resulting
    /// code lengths, deterministic.
    #[inline]
    fn tie_key(&self) -> u16 {
        match *self {
            Node::Leaf { byte, .. } => byte as u16,
            Node::Internal { .. } => 0,
        }
    }
}

/// Fixed-capacity arena holding every node of one tree: at most 256 leaves plus
/// 255 internal nodes.
#[derive(Clone, Debug)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(NODE_ARENA_CAPACITY),
        }
    }

    pub fn push(&mut self, node: Node) -> NodeIdx {
        debug_assert!(self.nodes.len() < NODE_ARENA_CAPACITY);
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    #[inline]
    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully built code tree: the arena plus the index of its root.
#[derive(Clone, Debug)]
pub struct HuffmanTree {
    arena: NodeArena,
    root: NodeIdx,
    distinct_count: usize,
}

impl HuffmanTree {
    /// Builds the tree for the given frequency table.
    ///
    /// Leaves are seeded in ascending byte-value order, then `distinct − 1` merges
    /// are performed: each one sorts the still-unmerged suffix of the arena by
    /// `(frequency, byte-value-of-leaf-or-0)` ascending and replaces the two lowest
    /// entries with a new internal node appended at the next free slot. After the
    /// `i`-th merge the slots below `2 * (i + 1)` are frozen, so the child indices
    /// recorded by earlier merges stay valid while later sorts reorder the suffix.
    ///
    /// The quadratic sort-then-merge is intentional: with at most 256 leaves it is
    /// not worth a heap, and it reproduces the exact merge order the decoder relies
    /// on to rebuild an identical tree from the header's frequency table.
    ///
    /// # Errors
    /// When `frequencies` has no nonzero count, i.e. the input was empty.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let mut arena = NodeArena::new();

        for (byte, freq) in frequencies.present_symbols() {
            arena.push(Node::Leaf { byte, freq });
        }

        let distinct_count = arena.len();
        ensure!(
            distinct_count > 0,
            "cannot build a code tree out of an empty input"
        );

        // A single distinct byte needs no merge: the lone leaf is the root and the
        // dictionary will force a 1-bit code for it.
        if distinct_count == 1 {
            return Ok(Self {
                arena,
                root: 0,
                distinct_count,
            });
        }

        for merge in 0..distinct_count - 1 {
            // The two nodes merged so far per iteration occupy slots [0, 2 * merge);
            // everything above is still unmerged and free to reorder.
            let unmerged_from = 2 * merge;
            arena.nodes[unmerged_from..].sort_by_key(|node| (node.freq(), node.tie_key()));

            let left = unmerged_from;
            let right = unmerged_from + 1;
            let merged = Node::Internal {
                freq: arena.node(left).freq() + arena.node(right).freq(),
                left,
                right,
            };
            arena.push(merged);
        }

        let root = arena.len() - 1;
        Ok(Self {
            arena,
            root,
            distinct_count,
        })
    }

    /// Assembles a tree from an already laid-out arena. Meant for callers that need
    /// a specific shape, e.g. tests exercising pathological code lengths.
    pub fn from_parts(arena: NodeArena, root: NodeIdx, distinct_count: usize) -> Self {
        Self {
            arena,
            root,
            distinct_count,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeIdx {
        self.root
    }

    #[inline]
    pub fn node(&self, idx: NodeIdx) -> &Node {
        self.arena.node(idx)
    }

    /// The number of distinct byte values the tree encodes.
    pub fn distinct_count(&self) -> usize {
        self.distinct_count
    }
}
