//! Expense export
//!
//! Supports:
//! - CSV text with a `Date,Category,Amount` header (the downloadable artifact)
//! - Pretty-printed JSON for tooling

use std::io::Write;

use crate::error::{Error, Result};
use crate::models::{Calendar, ExpenseRecord};

/// MIME type of the CSV artifact
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Header row of the CSV artifact
pub const EXPORT_HEADER: [&str; 3] = ["Date", "Category", "Amount"];

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {} (valid: csv, json)", s)),
        }
    }
}

/// US short date (`1/15/2024`) in the given calendar
pub fn format_export_date(record: &ExpenseRecord, calendar: &Calendar) -> String {
    record.date_in(calendar).format("%-m/%-d/%Y").to_string()
}

/// Write the CSV artifact for `records` to `writer`
///
/// Rows keep the input order. Amounts use the shortest round-trip form of
/// the number (`20`, `20.5`), with no rounding or currency symbol. Records
/// are written as-is; nothing is rejected.
pub fn write_csv<W: Write>(
    records: &[ExpenseRecord],
    calendar: &Calendar,
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADER)?;
    for record in records {
        csv_writer.write_record([
            format_export_date(record, calendar),
            record.category.clone(),
            record.amount.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Build the CSV artifact as a single string
///
/// Lines are newline-joined with no trailing newline, so N records give
/// exactly N + 1 lines.
pub fn export_csv(records: &[ExpenseRecord], calendar: &Calendar) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(records, calendar, &mut buffer)?;

    let mut text = String::from_utf8(buffer)
        .map_err(|e| Error::InvalidData(format!("Export is not valid UTF-8: {}", e)))?;
    if text.ends_with('\n') {
        text.pop();
    }

    tracing::debug!(rows = records.len(), bytes = text.len(), "Exported expenses as CSV");
    Ok(text)
}

/// Pretty-printed JSON array of the records
pub fn export_json(records: &[ExpenseRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Export in the requested format
pub fn export(
    records: &[ExpenseRecord],
    format: ExportFormat,
    calendar: &Calendar,
) -> Result<String> {
    match format {
        ExportFormat::Csv => export_csv(records, calendar),
        ExportFormat::Json => export_json(records),
    }
}
