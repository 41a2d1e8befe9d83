//! Schema assembly - orchestrate the flattener and the summarizers over a
//! batch and fix the final column order
//!
//! Output column order is deterministic: passthrough scalars in their
//! original batch order, then flattened-object columns in source-column
//! processing order, then the behavior summary, then the price summary.
//! Row count is always preserved; a defective field only nulls or zeroes
//! that field's derived columns.

use crate::flatten::behavior::{summarize_behavior, BehaviorSummary};
use crate::flatten::object::{flatten_object_column, ObjectExpansion};
use crate::flatten::price::{summarize_price, PriceSummary};
use crate::flatten::types::{Batch, ConversionStats, Embedded, FlattenConfig};
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

/// Converts a batch of raw records into the flat analytical schema
pub struct SchemaAssembler {
    config: FlattenConfig,
}

impl SchemaAssembler {
    pub fn new(config: FlattenConfig) -> Self {
        SchemaAssembler { config }
    }

    /// Flatten a whole batch.
    ///
    /// Infallible by design: per-field defects degrade to nulls or fallback
    /// summaries, and batch-level I/O lives with the caller.
    pub fn assemble(&self, batch: Batch) -> (Batch, ConversionStats) {
        let columns_before = batch.columns.len();

        // Passthrough scalars keep their original order; consumed document
        // columns never reach the output.
        let scalar_columns: Vec<String> = batch
            .columns
            .iter()
            .filter(|name| !self.is_document_column(name))
            .cloned()
            .collect();

        let expansions: Vec<ObjectExpansion> = self
            .config
            .object_columns
            .iter()
            .map(|column| flatten_object_column(&batch, column, &self.config.separator))
            .collect();

        let behavior: Vec<BehaviorSummary> = batch
            .rows
            .iter()
            .map(|row| {
                summarize_behavior(&Embedded::parse(row.get(&self.config.behavior_column)))
                    .unwrap_or_else(|_| BehaviorSummary::fallback())
            })
            .collect();

        let price: Vec<PriceSummary> = batch
            .rows
            .iter()
            .map(|row| {
                summarize_price(&Embedded::parse(row.get(&self.config.price_column)))
                    .unwrap_or_else(|_| PriceSummary::fallback())
            })
            .collect();

        let behavior_columns = self.prefixed(&self.config.behavior_column, &BehaviorSummary::FIELDS);
        let price_columns = self.prefixed(&self.config.price_column, &PriceSummary::FIELDS);

        let mut columns = scalar_columns.clone();
        for expansion in &expansions {
            columns.extend(expansion.columns.iter().cloned());
        }
        columns.extend(behavior_columns.iter().cloned());
        columns.extend(price_columns.iter().cloned());

        let mut rows: Vec<Map<String, Value>> = Vec::with_capacity(batch.len());
        for (idx, row) in batch.rows.iter().enumerate() {
            let mut flat = Map::new();

            for name in &scalar_columns {
                let value = row.get(name).cloned().unwrap_or(Value::Null);
                let value = if Some(name.as_str()) == self.config.timestamp_column.as_deref() {
                    coerce_timestamp(&value)
                } else {
                    value
                };
                flat.insert(name.clone(), value);
            }

            for expansion in &expansions {
                for name in &expansion.columns {
                    flat.insert(name.clone(), expansion.value(idx, name));
                }
            }

            for (name, value) in behavior_columns.iter().zip(behavior[idx].values()) {
                flat.insert(name.clone(), value);
            }
            for (name, value) in price_columns.iter().zip(price[idx].values()) {
                flat.insert(name.clone(), value);
            }

            rows.push(flat);
        }

        let stats = ConversionStats {
            rows: rows.len(),
            columns_before,
            columns_after: columns.len(),
        };

        (Batch::with_columns(columns, rows), stats)
    }

    fn is_document_column(&self, name: &str) -> bool {
        self.config.object_columns.iter().any(|c| c == name)
            || name == self.config.behavior_column
            || name == self.config.price_column
    }

    fn prefixed(&self, source: &str, fields: &[&str]) -> Vec<String> {
        fields
            .iter()
            .map(|field| format!("{}{}{}", source, self.config.separator, field))
            .collect()
    }
}

/// Coerce a timestamp field from text to a canonical date-time string.
///
/// Accepts RFC 3339 and naive ISO-8601 (`T` or space separated); anything
/// else becomes null rather than aborting the batch.
fn coerce_timestamp(value: &Value) -> Value {
    let Some(text) = value.as_str() else {
        return Value::Null;
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Value::String(dt.to_rfc3339());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Value::String(naive.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
        }
    }
    Value::Null
}
