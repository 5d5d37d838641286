use anyhow::{ensure, Result};

use dsi_progress_logger::{ProgressLog, ProgressLogger};

use log::info;

use crate::huffman::dictionary::Dictionary;
use crate::huffman::tree::HuffmanTree;
use crate::huffman::{FrequencyTable, Header, HEADER_BYTES};
use crate::pipeline::{engine, planner, PlannerConfig};
use crate::{
    DEFAULT_MEMORY_BUDGET, DEFAULT_OFFSET_CEILING, DEFAULT_OVERFLOW_MARGIN_BITS, MAX_CODE_BITS,
};

/// The host-side driver of one compression run. Owns the run configuration and
/// sequences the stages: frequency table → tree → dictionary → variant selection
/// → offset plan → parallel write → header assembly. Every run builds its state
/// fresh and discards it on return; nothing survives between invocations.
#[derive(Clone, Copy, Debug)]
pub struct Compressor {
    /// Bytes of accelerator memory available to one chunk's input slice, offsets
    /// and worst-case output.
    memory_budget: usize,

    /// Slack reserved under the offset ceiling when deciding a split is needed.
    overflow_margin_bits: u64,

    /// First unrepresentable segment-relative bit position. Configurable so tests
    /// can force splits on small inputs; defaults to the lanes' 32-bit wrap point.
    offset_ceiling: u64,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_BUDGET, DEFAULT_OVERFLOW_MARGIN_BITS)
    }
}

impl Compressor {
    pub fn new(memory_budget: usize, overflow_margin_bits: u64) -> Self {
        Self {
            memory_budget,
            overflow_margin_bits,
            offset_ceiling: DEFAULT_OFFSET_CEILING,
        }
    }

    /// Creates a compressor with an explicit offset ceiling. Mainly useful to
    /// exercise overflow splits without feeding in multiple gigabytes.
    pub fn with_parameters(
        memory_budget: usize,
        overflow_margin_bits: u64,
        offset_ceiling: u64,
    ) -> Self {
        Self {
            memory_budget,
            overflow_margin_bits,
            offset_ceiling,
        }
    }

    /// Compresses `input` into a self-describing stream: the [`Header`] (original
    /// length plus the full frequency table) followed by the packed codes,
    /// MSB-first within each byte.
    ///
    /// Either the whole stream is produced or an error is returned; no partial
    /// output exists. Empty inputs and inputs too long for the header's 32-bit
    /// length field are rejected up front.
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        ensure!(!input.is_empty(), "cannot compress an empty input");
        ensure!(
            input.len() <= u32::MAX as usize,
            "input of {} bytes does not fit the header's 32-bit length field",
            input.len()
        );

        let frequencies = FrequencyTable::from_bytes(input);
        let tree = HuffmanTree::build(&frequencies)?;
        let dictionary = Dictionary::build(&tree);

        let config = self.select_variant(input.len(), &dictionary)?;

        let mut pl = ProgressLogger::default();

        pl.start("Planning bit offsets...");
        let plan = planner::plan(input, &dictionary, &config)?;
        pl.done();

        pl.start("Packing output stream...");
        let stream = engine::write(input, &dictionary, &plan);
        pl.done();

        let mut out = Vec::with_capacity(HEADER_BYTES + stream.len());
        let header = Header {
            original_len: input.len() as u32,
            frequencies,
        };
        header.write_into(&mut out);
        out.extend_from_slice(&stream);

        info!(
            "compressed {} bytes into {} ({:.2}% of the original, header included)",
            input.len(),
            out.len(),
            out.len() as f64 / input.len() as f64 * 100.0
        );

        Ok(out)
    }

    /// Picks which of the two boundary checks the planner must run. The choice is
    /// purely about memory and counter width; any combination produces the same
    /// output bytes.
    fn select_variant(&self, input_len: usize, dictionary: &Dictionary) -> Result<PlannerConfig> {
        let worst_case_bits = input_len as u64 * dictionary.max_code_len() as u64;
        let detect_overflow =
            worst_case_bits + self.overflow_margin_bits > self.offset_ceiling;
        if detect_overflow {
            ensure!(
                self.offset_ceiling > self.overflow_margin_bits + (MAX_CODE_BITS + 7) as u64,
                "overflow margin of {} bits leaves no room under the {}-bit offset ceiling",
                self.overflow_margin_bits,
                self.offset_ceiling
            );
        }

        // A chunk small enough to never need a second overflow split.
        let overflow_safe_bits = 2 * self
            .offset_ceiling
            .saturating_sub(self.overflow_margin_bits + (MAX_CODE_BITS + 7) as u64);

        // One chunk must hold its input slice, one 32-bit offset per byte and the
        // worst-case output at the same time. Chunking is also forced when the
        // output could otherwise need two splits inside the single chunk.
        let footprint = input_len as u64 * 5 + worst_case_bits.div_ceil(8);
        let fits_budget = footprint <= self.memory_budget as u64;
        let single_split_safe = !detect_overflow || worst_case_bits < overflow_safe_bits;

        let chunk_bits = if fits_budget && single_split_safe {
            None
        } else {
            let mut cap = self.memory_budget as u64 * 8 / 2;
            if detect_overflow {
                cap = cap.min(overflow_safe_bits);
            }
            ensure!(
                cap >= (MAX_CODE_BITS + 7) as u64,
                "memory budget of {} bytes cannot fit even one byte's worst-case output",
                self.memory_budget
            );
            Some(cap)
        };

        info!(
            "variant selected: overflow detection {}, chunking {}",
            if detect_overflow { "on" } else { "off" },
            match chunk_bits {
                Some(cap) => format!("on ({cap} bits per chunk)"),
                None => "off".to_string(),
            }
        );

        Ok(PlannerConfig {
            detect_overflow,
            chunk_bits,
            offset_ceiling: self.offset_ceiling,
            overflow_margin_bits: self.overflow_margin_bits,
        })
    }
}
