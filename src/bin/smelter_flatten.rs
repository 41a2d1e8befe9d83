//! smelter-flatten: flatten JSON-carrying transaction records into the
//! analytical schema
//!
//! Usage:
//!   # Read NDJSON from a file, write flat NDJSON to stdout
//!   smelter-flatten records.jsonl
//!
//!   # Read a JSON array from stdin, write to a file
//!   cat batch.json | smelter-flatten -o flat.jsonl
//!
//!   # Custom document columns
//!   smelter-flatten --object-columns "attrs,meta" records.jsonl

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{Map, Value};
use smelter::{Batch, BatchWriter, FlattenConfig, SchemaAssembler};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};

#[derive(Parser, Debug)]
#[command(name = "smelter-flatten")]
#[command(about = "Flatten records with JSON sub-documents into a flat schema", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Force newline-delimited JSON input (skips the array fast path)
    #[arg(long)]
    ndjson: bool,

    /// Output file for flat NDJSON (stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Separator between a source column and a derived field name (default: "_")
    #[arg(long)]
    separator: Option<String>,

    /// Comma-separated JSON-object columns to flatten
    #[arg(long)]
    object_columns: Option<String>,

    /// Scalar column to coerce to a date-time value (default: "timestamp")
    #[arg(long)]
    timestamp_column: Option<String>,

    /// Skip timestamp coercion entirely
    #[arg(long, conflicts_with = "timestamp_column")]
    no_timestamp: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Build config
    let mut config = FlattenConfig::default();
    if let Some(sep) = args.separator {
        config.separator = sep;
    }
    if let Some(cols) = args.object_columns {
        config.object_columns = cols
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();
    }
    if args.no_timestamp {
        config.timestamp_column = None;
    } else if let Some(column) = args.timestamp_column {
        config.timestamp_column = Some(column);
    }

    let rows = load_records(args.input.as_deref(), args.ndjson)?;
    let assembler = SchemaAssembler::new(config);
    let (flat, stats) = assembler.assemble(Batch::from_rows(rows));

    match args.output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            let mut writer = BatchWriter::new(BufWriter::new(file));
            writer.write_batch(&flat)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BatchWriter::new(stdout.lock());
            writer.write_batch(&flat)?;
            writer.flush()?;
        }
    }

    // Size metrics are informational only, never part of the data stream
    eprintln!(
        "Flattened {} rows: {} columns in, {} columns out",
        stats.rows, stats.columns_before, stats.columns_after
    );

    Ok(())
}

/// Load the raw batch using SIMD-accelerated parsing when the input is one
/// JSON document, falling back to per-line serde_json for NDJSON
fn load_records(input: Option<&str>, ndjson: bool) -> Result<Vec<Map<String, Value>>> {
    let mut content = Vec::new();
    let mut reader: Box<dyn Read> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open input file: {}", path))?,
        )),
        None => Box::new(std::io::stdin()),
    };
    reader
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    if !ndjson {
        // Fast path: the whole input is a JSON array (or single object)
        let mut simd_buf = content.clone();
        if let Ok(parsed) = simd_json::to_owned_value(&mut simd_buf) {
            return records_from_simd(parsed);
        }
    }

    // Fallback for NDJSON
    let text = String::from_utf8_lossy(&content);
    let mut rows = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).context("Failed to parse record")?;
        rows.push(as_object(value)?);
    }
    Ok(rows)
}

fn records_from_simd(parsed: simd_json::OwnedValue) -> Result<Vec<Map<String, Value>>> {
    match parsed {
        simd_json::OwnedValue::Array(arr) => arr
            .iter()
            .map(|elem| {
                // Convert simd_json value to serde_json::Value
                let json_str = simd_json::to_string(elem)?;
                let value: Value = serde_json::from_str(&json_str)?;
                as_object(value)
            })
            .collect(),
        elem => {
            let json_str = simd_json::to_string(&elem)?;
            let value: Value = serde_json::from_str(&json_str)?;
            Ok(vec![as_object(value)?])
        }
    }
}

fn as_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(obj) => Ok(obj),
        other => bail!("Expected a JSON object record, got: {}", other),
    }
}
