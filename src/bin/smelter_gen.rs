//! smelter-gen: generate synthetic transaction records as NDJSON
//!
//! Usage:
//!   # 10k records with the default seed, to stdout
//!   smelter-gen
//!
//!   # Reproducible sample to a file
//!   smelter-gen --count 1000 --seed 7 -o records.jsonl

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use smelter::RecordGenerator;
use std::fs::File;
use std::io::{BufWriter, Write};

#[derive(Parser, Debug)]
#[command(name = "smelter-gen")]
#[command(about = "Generate synthetic transaction records as NDJSON", long_about = None)]
struct Args {
    /// Number of records to generate
    #[arg(long, default_value_t = 10_000)]
    count: usize,

    /// RNG seed; the same seed reproduces the same records
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output file (stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut generator = RecordGenerator::new(args.seed);

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    for _ in 0..args.count {
        let record = generator.record();
        let line = serde_json::to_string(&record).context("Failed to serialize record")?;
        writeln!(writer, "{}", line).context("Failed to write record")?;
    }
    writer.flush().context("Failed to flush output")?;

    eprintln!("Generated {} records (seed {})", args.count, args.seed);

    Ok(())
}
