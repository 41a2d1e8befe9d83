use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

/// A batch of records with an explicit, deterministic column order.
///
/// Rows are JSON objects; `columns` records the order in which fields were
/// first observed and is the order the writer emits fields in.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Column names in output order
    pub columns: Vec<String>,

    /// One JSON object per record
    pub rows: Vec<Map<String, Value>>,
}

impl Batch {
    /// Build a batch from rows, deriving the column order from the first
    /// observation of each key while scanning rows in order.
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        // Seen-set for O(1) membership; the Vec keeps first-observation order
        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for row in &rows {
            for key in row.keys() {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }
        Batch { columns, rows }
    }

    /// Build a batch with a caller-supplied column order.
    pub fn with_columns(columns: Vec<String>, rows: Vec<Map<String, Value>>) -> Self {
        Batch { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of parsing one embedded-document field.
///
/// All downstream logic matches on this variant instead of handling parse
/// errors mid-flight; parsing happens exactly once per field.
#[derive(Debug, Clone, PartialEq)]
pub enum Embedded {
    /// Field absent or JSON null
    Missing,
    /// Field present but not decodable as a JSON object or array
    Malformed,
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl Embedded {
    /// Parse an embedded-document field value.
    ///
    /// The canonical encoding is a JSON string holding the document, but
    /// records built in memory may carry the document pre-parsed; both are
    /// accepted.
    pub fn parse(value: Option<&Value>) -> Embedded {
        match value {
            None | Some(Value::Null) => Embedded::Missing,
            Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(obj)) => Embedded::Object(obj),
                Ok(Value::Array(arr)) => Embedded::Array(arr),
                _ => Embedded::Malformed,
            },
            Some(Value::Object(obj)) => Embedded::Object(obj.clone()),
            Some(Value::Array(arr)) => Embedded::Array(arr.clone()),
            Some(_) => Embedded::Malformed,
        }
    }
}

/// Why a summarizer could not produce a summary for one record.
///
/// Every variant maps to the same fixed fallback record at the assembler;
/// the distinction only matters for detection, never for output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("document is missing or not valid JSON")]
    Unparsable,
    #[error("document is not a JSON array")]
    NotAnArray,
    #[error("sequence is empty")]
    EmptySequence,
    #[error("sequence element is not an object")]
    NotAnObject,
    #[error("element is missing required key `{0}`")]
    MissingKey(&'static str),
    #[error("key `{0}` has an ill-typed value")]
    InvalidValue(&'static str),
}

/// Configuration for the schema assembler
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Columns holding JSON-object documents, in processing order
    pub object_columns: Vec<String>,

    /// Column holding the user-behavior action sequence
    pub behavior_column: String,

    /// Column holding the price-history snapshot sequence
    pub price_column: String,

    /// Scalar column to coerce from text to a date-time value, if any
    pub timestamp_column: Option<String>,

    /// Separator between a source column name and a derived field name
    pub separator: String,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            object_columns: vec![
                String::from("product_attributes"),
                String::from("shipping_info"),
                String::from("category_info"),
            ],
            behavior_column: String::from("user_behavior"),
            price_column: String::from("price_history"),
            timestamp_column: Some(String::from("timestamp")),
            separator: String::from("_"),
        }
    }
}

/// Before/after size metrics reported by the assembler (informational only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub rows: usize,
    pub columns_before: usize,
    pub columns_after: usize,
}
