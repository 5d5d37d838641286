//! The module providing the frequency model, the tree and dictionary builders and
//! the sequential decoder.

pub mod decoder;
pub mod dictionary;
pub mod tree;

use anyhow::{ensure, Result};

use crate::{Freq, MAX_SYMBOLS};

/// Number of bytes occupied by the serialized [`Header`]: a little-endian u32 with
/// the original length followed by 256 little-endian u32 frequency counts.
pub const HEADER_BYTES: usize = 4 + MAX_SYMBOLS * 4;

/// The occurrence count of every byte value in one input, built once per run and
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [Freq; MAX_SYMBOLS],
}

impl FrequencyTable {
    /// Counts the occurrences of each byte value in `input`.
    pub fn from_bytes(input: &[u8]) -> Self {
        let mut counts = [0 as Freq; MAX_SYMBOLS];
        for &byte in input {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    pub fn from_counts(counts: [Freq; MAX_SYMBOLS]) -> Self {
        Self { counts }
    }

    /// The occurrence count of the given byte value.
    #[inline]
    pub fn count(&self, byte: u8) -> Freq {
        self.counts[byte as usize]
    }

    /// The number of byte values with a nonzero count, i.e. the number of leaves
    /// the tree will have.
    pub fn distinct_count(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Iterates over `(byte value, count)` pairs with nonzero count, in ascending
    /// byte-value order.
    pub fn present_symbols(&self) -> impl Iterator<Item = (u8, Freq)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }
}

/// The metadata prefix of a compressed stream. It carries everything the decoder
/// needs to rebuild the exact tree used while encoding: the frequency table itself,
/// plus the original length telling the decoder when to stop so that trailing pad
/// bits are never consumed.
#[derive(Clone, Debug)]
pub struct Header {
    pub original_len: u32,
    pub frequencies: FrequencyTable,
}

impl Header {
    /// Appends the serialized header to `out`.
    pub fn write_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.original_len.to_le_bytes());
        for byte in 0..MAX_SYMBOLS {
            out.extend_from_slice(&self.frequencies.counts[byte].to_le_bytes());
        }
    }

    /// Parses the header from the front of a compressed stream.
    ///
    /// Fails closed when the stream is too short to contain a header or when the
    /// frequency table is inconsistent with the declared original length.
    pub fn parse(data: &[u8]) -> Result<Self> {
        ensure!(
            data.len() >= HEADER_BYTES,
            "compressed stream is {} bytes, shorter than the {}-byte header",
            data.len(),
            HEADER_BYTES
        );

        let original_len = u32::from_le_bytes(data[0..4].try_into().unwrap());

        let mut counts = [0 as Freq; MAX_SYMBOLS];
        for (byte, count) in counts.iter_mut().enumerate() {
            let start = 4 + byte * 4;
            *count = u32::from_le_bytes(data[start..start + 4].try_into().unwrap());
        }
        let frequencies = FrequencyTable::from_counts(counts);

        ensure!(
            original_len > 0,
            "corrupted header: original length is zero"
        );
        ensure!(
            frequencies.distinct_count() > 0,
            "corrupted header: nonzero original length but empty frequency table"
        );

        Ok(Self {
            original_len,
            frequencies,
        })
    }
}
