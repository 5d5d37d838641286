use anyhow::{bail, Context, Result};

use crate::huffman::tree::{HuffmanTree, Node, NodeIdx};
use crate::huffman::{Header, HEADER_BYTES};

/// Decompresses a stream produced by [`Compressor::compress`](crate::pipeline::orchestrator::Compressor::compress).
///
/// The header's frequency table is fed through the same tree builder the encoder
/// used, which rebuilds a bit-identical tree; the packed stream is then walked one
/// bit at a time, MSB-first within each byte, emitting a byte at every leaf and
/// restarting from the root. Decoding stops after exactly `original_len` bytes, so
/// the trailing pad bits of the last stream byte are never consumed.
///
/// Fails closed on any malformed input: truncated header, inconsistent frequency
/// table, or a stream that runs out before the declared length is reproduced.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let header = Header::parse(data).context("while parsing the compressed header")?;
    let stream = &data[HEADER_BYTES..];

    let tree = HuffmanTree::build(&header.frequencies)?;
    let original_len = header.original_len as usize;

    // Single distinct byte: the stream is original_len forced 1-bit codes, all
    // zero. Nothing to walk, but the stream must still be long enough to have
    // carried them.
    if tree.distinct_count() == 1 {
        let Node::Leaf { byte, .. } = *tree.node(tree.root()) else {
            unreachable!("a single-symbol tree has a leaf root");
        };
        if stream.len() * 8 < original_len {
            bail!(
                "corrupted stream: {} bytes cannot hold {} single-bit codes",
                stream.len(),
                original_len
            );
        }
        return Ok(vec![byte; original_len]);
    }

    let mut output = Vec::with_capacity(original_len);
    let mut current: NodeIdx = tree.root();

    'outer: for &stream_byte in stream {
        for bit in 0..8 {
            let goes_right = stream_byte & (0x80 >> bit) != 0;

            current = match *tree.node(current) {
                Node::Internal { left, right, .. } => {
                    if goes_right {
                        right
                    } else {
                        left
                    }
                }
                Node::Leaf { .. } => unreachable!("the walk restarts at the root after a leaf"),
            };

            if let Node::Leaf { byte, .. } = *tree.node(current) {
                output.push(byte);
                if output.len() == original_len {
                    break 'outer;
                }
                current = tree.root();
            }
        }
    }

    if output.len() != original_len {
        bail!(
            "corrupted stream: ended after {} of {} expected bytes",
            output.len(),
            original_len
        );
    }

    Ok(output)
}
