//! Export command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use financeflow_core::{export, ExpenseBook, ExpenseFilter, ExportFormat, EXPORT_MIME_TYPE};

pub fn cmd_export(
    book: &ExpenseBook,
    filter: &ExpenseFilter<'_>,
    format: ExportFormat,
    out: Option<&Path>,
) -> Result<()> {
    let filtered = filter.apply(&book.expenses);
    let text = export(&filtered, format, &filter.calendar).context("Failed to export expenses")?;

    match out {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let kind = match format {
                ExportFormat::Csv => EXPORT_MIME_TYPE,
                ExportFormat::Json => "application/json",
            };
            println!(
                "✓ Exported {} expenses to {} ({})",
                filtered.len(),
                path.display(),
                kind
            );
        }
        None => println!("{}", text),
    }
    Ok(())
}
