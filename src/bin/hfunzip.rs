use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use parhuff::huffman::decoder::decompress;

#[derive(Parser, Debug)]
#[command(about = "Decompress a parhuff stream", long_about = None)]
struct Args {
    /// The compressed file.
    input: PathBuf,

    /// Where to write the restored data.
    output: PathBuf,
}

pub fn main() -> Result<()> {
    stderrlog::new()
        .verbosity(2)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .unwrap();

    let args = Args::parse();

    let compressed = fs::read(&args.input)
        .with_context(|| format!("cannot read input file {}", args.input.display()))?;

    let start = Instant::now();
    let restored = decompress(&compressed)?;
    info!("decompression took {:.3} s", start.elapsed().as_secs_f64());

    fs::write(&args.output, restored)
        .with_context(|| format!("cannot write output file {}", args.output.display()))?;

    Ok(())
}
