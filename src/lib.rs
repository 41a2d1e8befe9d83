//! # Smelter - Flat Analytical Schemas from Semi-Structured Records
//!
//! A library for flattening transactional records that carry JSON-encoded
//! sub-documents (product attributes, user-action logs, shipping metadata,
//! category hierarchy, price history) into one flat, columnar-storage-ready
//! schema.
//!
//! ## Modules
//!
//! - **flatten**: the object flattener, the two sequence summarizers, and
//!   the schema assembler that merges their outputs
//! - **generator**: seeded synthetic-record generation for testing and demos
//!
//! ## Quick Start
//!
//! ```rust
//! use smelter::{FlattenConfig, SchemaAssembler, Batch};
//! use serde_json::json;
//!
//! let record = serde_json::from_value(json!({
//!     "transaction_id": "t-1",
//!     "category_info": r#"{"main": "Fashion", "sub": "Shoes"}"#,
//!     "user_behavior": r#"[{"action_type": "view", "device": "mobile",
//!                           "session_duration": 120, "page_views": 4}]"#,
//! })).unwrap();
//!
//! let assembler = SchemaAssembler::new(FlattenConfig::default());
//! let (flat, stats) = assembler.assemble(Batch::from_rows(vec![record]));
//!
//! assert_eq!(stats.rows, 1);
//! assert_eq!(flat.rows[0].get("category_info_main").unwrap(), "Fashion");
//! assert_eq!(flat.rows[0].get("user_behavior_total_actions").unwrap(), 1);
//! ```

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::io::BufRead;

pub mod flatten;
pub mod generator;

// Re-export commonly used types for convenience
pub use flatten::{
    Batch, BatchWriter, BehaviorSummary, ConversionStats, Embedded, FlattenConfig, PriceSummary,
    SchemaAssembler, SummaryError,
};
pub use generator::RecordGenerator;

/// Main entry point: read newline-delimited raw records and flatten them
/// into the analytical schema.
///
/// Per-field defects degrade to nulls or fallback summaries; only a failure
/// to read or parse the batch itself is an error.
pub fn flatten_reader<R: BufRead>(
    reader: R,
    config: FlattenConfig,
) -> Result<(Batch, ConversionStats)> {
    let mut rows = Vec::new();

    for line in reader.lines() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).context("Failed to parse record")?;
        let Value::Object(obj) = value else {
            bail!("Expected a JSON object per line, got: {}", value);
        };
        rows.push(obj);
    }

    let assembler = SchemaAssembler::new(config);
    Ok(assembler.assemble(Batch::from_rows(rows)))
}
