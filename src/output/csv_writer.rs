//! CSV serialization of harvested records
//!
//! The file has a fixed header row `text,author,tags`, then one row per
//! record. Tags are flattened into one field joined with `", "`; standard CSV
//! quoting applies to fields containing commas, quotes or newlines.

use crate::output::{OutputError, OutputResult};
use crate::record::Record;
use std::fs::File;
use std::path::Path;

/// Header row of every CSV written by Quote-Harvest
pub const CSV_HEADER: [&str; 3] = ["text", "author", "tags"];

/// Writes records to a CSV file, truncating any existing content
///
/// The file handle is owned by the writer and released when this function
/// returns, whether it succeeds or fails.
///
/// # Arguments
///
/// * `records` - Records in output order
/// * `output_path` - Path of the CSV file
///
/// # Returns
///
/// * `Ok(())` - All rows written and flushed
/// * `Err(OutputError)` - The file could not be created or written
pub fn write_records(records: &[Record], output_path: &Path) -> OutputResult<()> {
    let file = File::create(output_path)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(CSV_HEADER)?;
    for record in records {
        let tags = record.joined_tags();
        writer.write_record([record.text(), record.author(), tags.as_str()])?;
    }
    writer.flush()?;

    tracing::debug!(
        "Wrote {} rows to {}",
        records.len(),
        output_path.display()
    );
    Ok(())
}

/// Reads records back from a CSV written by `write_records`
///
/// Fails with `OutputError::MissingHeader` if the first row is not the
/// expected header.
pub fn read_records(input_path: &Path) -> OutputResult<Vec<Record>> {
    let mut reader = csv::Reader::from_path(input_path)?;

    let headers = reader.headers()?;
    if !headers.iter().eq(CSV_HEADER) {
        return Err(OutputError::MissingHeader(
            headers.iter().collect::<Vec<_>>().join(","),
        ));
    }

    reader
        .records()
        .map(|row| -> OutputResult<Record> {
            let row = row?;
            let field = |i: usize| row.get(i).unwrap_or_default();
            Ok(Record::new(
                field(0),
                field(1),
                Record::split_tags(field(2)),
            ))
        })
        .collect()
}
