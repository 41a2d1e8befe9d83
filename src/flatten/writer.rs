use crate::flatten::types::Batch;
use anyhow::{Context, Result};
use std::io::Write;

/// Writes a flat batch as newline-delimited JSON.
///
/// Rows already carry their fields in the assembler's column order, so the
/// emitted lines are byte-stable across runs.
pub struct BatchWriter<W: Write> {
    writer: W,
}

impl<W: Write> BatchWriter<W> {
    pub fn new(writer: W) -> Self {
        BatchWriter { writer }
    }

    pub fn write_batch(&mut self, batch: &Batch) -> Result<()> {
        for row in &batch.rows {
            let json = serde_json::to_string(row)
                .context("Failed to serialize record")?;
            writeln!(self.writer, "{}", json)
                .context("Failed to write record")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}
