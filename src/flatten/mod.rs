//! Schema flattening - turn records with JSON-encoded sub-documents into a
//! flat, strongly-typed tabular schema
//!
//! Three sub-engines cooperate over one in-memory batch: the object
//! flattener expands JSON objects into prefixed scalar columns, and two
//! summarizers collapse event/snapshot sequences into fixed statistics.
//! The assembler runs all three and fixes the final column order.

pub mod types;
pub mod object;
pub mod behavior;
pub mod price;
pub mod assembler;
pub mod writer;

pub use types::{Batch, ConversionStats, Embedded, FlattenConfig, SummaryError};
pub use object::{flatten_object_column, ObjectExpansion};
pub use behavior::{summarize_behavior, BehaviorSummary};
pub use price::{summarize_price, PriceSummary};
pub use assembler::SchemaAssembler;
pub use writer::BatchWriter;
