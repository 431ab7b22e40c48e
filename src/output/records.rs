//! JSON and CSV dumps of the record list

use crate::output::OutputResult;
use crate::search::SearchResultRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column header of the CSV dump
const CSV_HEADER: &str = "Repository,Owner,File Path,HTML URL,Size,Downloaded";

/// Writes records as a pretty-printed JSON array
pub fn write_json(records: &[SearchResultRecord], output_path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes the failed-download records as JSON
///
/// Nothing is written for an empty list, and a file left by an earlier run
/// is removed.
///
/// # Returns
///
/// * `Ok(true)` - The file was written
/// * `Ok(false)` - There were no failures
pub fn write_failed(failed: &[SearchResultRecord], output_path: &Path) -> OutputResult<bool> {
    if failed.is_empty() {
        match std::fs::remove_file(output_path) {
            Ok(()) => tracing::debug!("Removed stale {}", output_path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        return Ok(false);
    }
    write_json(failed, output_path)?;
    Ok(true)
}

/// Writes records as CSV with a fixed header
pub fn write_csv(records: &[SearchResultRecord], output_path: &Path) -> OutputResult<()> {
    let mut file = File::create(output_path)?;
    file.write_all(format_csv(records).as_bytes())?;
    Ok(())
}

/// Formats records as CSV text
pub fn format_csv(records: &[SearchResultRecord]) -> String {
    let mut csv = String::new();
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for record in records {
        let row = [
            csv_field(&record.repository),
            csv_field(&record.owner),
            csv_field(&record.path),
            csv_field(&record.html_url),
            record.size.to_string(),
            record.downloaded.to_string(),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

/// Quotes a field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
