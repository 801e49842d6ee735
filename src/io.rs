//! Tab-separated corpus reader.
//!
//! The input format is the two-column SMS Spam Collection layout: one record
//! per line, `label<TAB>message`, no header, label in {"ham", "spam"}.
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data_handling::{Dataset, Label, Record};
use crate::error::PipelineError;

/// Read a labeled corpus from a tab-separated file.
pub fn read_corpus_tsv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open corpus file: {}", path.display()))?;
    read_corpus(file).with_context(|| format!("Failed to parse corpus file: {}", path.display()))
}

/// Read a labeled corpus from any reader producing the TSV layout.
///
/// A malformed row (missing tab, unknown label, empty message) aborts the
/// load with its 1-based line number; one bad record must never silently
/// vanish from the aggregate statistics.
pub fn read_corpus<R: Read>(reader: R) -> Result<Dataset, PipelineError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.map_err(|e| PipelineError::Data {
            line: e.position().map(|p| p.line() as usize),
            reason: e.to_string(),
        })?;
        // The reader skips blank lines, so the record position carries the
        // real 1-based file line.
        let line = row
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(records.len() + 1);

        let label_field = row
            .get(0)
            .ok_or_else(|| PipelineError::data_at(line, "missing label column"))?;
        let message = row
            .get(1)
            .ok_or_else(|| PipelineError::data_at(line, "missing message column"))?;
        if row.len() > 2 {
            return Err(PipelineError::data_at(line, "more than two columns"));
        }

        let label = Label::parse(label_field)
            .map_err(|e| PipelineError::data_at(line, e.to_string()))?;
        if message.trim().is_empty() {
            return Err(PipelineError::data_at(line, "empty message text"));
        }

        records.push(Record {
            message: message.to_string(),
            label,
        });
    }

    if records.is_empty() {
        return Err(PipelineError::data("corpus contains no records"));
    }
    log::info!("Loaded {} records from corpus", records.len());
    Dataset::new(records)
}
