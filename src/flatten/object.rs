//! Object flattening - expand a JSON-object column into scalar columns
//!
//! Each derived column is named `<column><sep><key>`; the set of derived
//! columns is the union of keys observed across the whole batch, so two rows
//! with disjoint keys both widen the schema and fill each other's gaps with
//! nulls.

use crate::flatten::types::{Batch, Embedded};
use serde_json::{Map, Value};

/// The derived columns produced by flattening one object column
#[derive(Debug, Clone)]
pub struct ObjectExpansion {
    /// Source column name
    pub source: String,

    /// Derived column names, ordered by first observation across the batch
    pub columns: Vec<String>,

    /// One map per input row; keys the row's object lacked are simply absent
    pub values: Vec<Map<String, Value>>,
}

impl ObjectExpansion {
    /// Look up a row's value for a derived column, null when absent
    pub fn value(&self, row: usize, column: &str) -> Value {
        self.values[row].get(column).cloned().unwrap_or(Value::Null)
    }
}

/// Flatten one JSON-object column across a batch.
///
/// Rows whose value is missing, malformed, or not an object contribute
/// nothing to the key union and receive nulls in every derived column. The
/// caller drops the source column regardless of how many rows parsed.
pub fn flatten_object_column(batch: &Batch, column: &str, separator: &str) -> ObjectExpansion {
    let mut columns: Vec<String> = Vec::new();
    let mut values: Vec<Map<String, Value>> = Vec::with_capacity(batch.len());

    for row in &batch.rows {
        let mut flat = Map::new();

        if let Embedded::Object(obj) = Embedded::parse(row.get(column)) {
            for (key, value) in obj {
                let name = format!("{}{}{}", column, separator, key);
                if !columns.iter().any(|c| c == &name) {
                    columns.push(name.clone());
                }
                // Array-valued keys (string sets) are kept as-is; exploding
                // them into rows is a downstream concern.
                flat.insert(name, value);
            }
        }

        values.push(flat);
    }

    ObjectExpansion {
        source: column.to_string(),
        columns,
        values,
    }
}
