use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use parhuff::pipeline::orchestrator::Compressor;
use parhuff::{DEFAULT_MEMORY_BUDGET, DEFAULT_OVERFLOW_MARGIN_BITS};

#[derive(Parser, Debug)]
#[command(about = "Compress a file with lane-parallel Huffman coding", long_about = None)]
struct Args {
    /// The file to compress.
    input: PathBuf,

    /// Where to write the compressed stream.
    output: PathBuf,

    /// Accelerator memory budget in bytes; inputs whose worst-case footprint
    /// exceeds it are processed in chunks.
    #[arg(long, default_value_t = DEFAULT_MEMORY_BUDGET)]
    memory_budget: usize,

    /// Slack, in bits, reserved under the 32-bit offset ceiling before an
    /// overflow split is planned.
    #[arg(long, default_value_t = DEFAULT_OVERFLOW_MARGIN_BITS)]
    overflow_margin: u64,
}

pub fn main() -> Result<()> {
    stderrlog::new()
        .verbosity(2)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .unwrap();

    let args = Args::parse();

    let input = fs::read(&args.input)
        .with_context(|| format!("cannot read input file {}", args.input.display()))?;

    let start = Instant::now();
    let compressed = Compressor::new(args.memory_budget, args.overflow_margin).compress(&input)?;
    info!("compression took {:.3} s", start.elapsed().as_secs_f64());

    fs::write(&args.output, compressed)
        .with_context(|| format!("cannot write output file {}", args.output.display()))?;

    Ok(())
}
