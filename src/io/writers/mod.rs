pub mod csv;
pub mod json;

pub use self::csv::CsvWriter;
pub use json::JsonWriter;

use super::OutputFormat;
use crate::core::ClusterRecord;
use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Renders cluster records to some output.
pub trait RecordWriter {
    fn write_records(&mut self, records: &[ClusterRecord]) -> anyhow::Result<()>;
}

/// Writer for `format` over any byte sink.
pub fn create_writer<'a, W: std::io::Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn RecordWriter + 'a> {
    match format {
        OutputFormat::Csv => Box::new(CsvWriter::new(writer)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
    }
}

/// Write `records` to a file at `path`, replacing any existing file.
pub fn write_records(
    path: &Path,
    records: &[ClusterRecord],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    create_writer(format, BufWriter::new(file))
        .write_records(records)
        .with_context(|| format!("Failed to write {}", path.display()))
}
