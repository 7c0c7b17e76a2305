//! Export
//!
//! Serializes a result row sequence as CSV or JSON, keeping the order the query
//! produced.

use crate::data::{ColumnSchema, Row};
use crate::error::{TabulaError, TabulaResult};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = TabulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(TabulaError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Render rows in `format`
pub fn export<'a, I>(rows: I, columns: &[ColumnSchema], format: ExportFormat) -> TabulaResult<String>
where
    I: IntoIterator<Item = &'a Row>,
{
    match format {
        ExportFormat::Csv => to_csv(rows, columns),
        ExportFormat::Json => to_json(rows),
    }
}

/// CSV with a header of column labels
///
/// Missing and null cells are empty. Lines are `\n`-separated with no trailing
/// newline; no rows yields an empty string.
pub fn to_csv<'a, I>(rows: I, columns: &[ColumnSchema]) -> TabulaResult<String>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut rows = rows.into_iter().peekable();
    if rows.peek().is_none() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.label.as_str()))?;

    for row in rows {
        writer.write_record(columns.iter().map(|c| match row.get(&c.key) {
            Some(value) if !value.is_null() => value.to_string(),
            _ => String::new(),
        }))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TabulaError::Csv(e.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|e| TabulaError::Csv(e.to_string()))?;

    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Pretty-printed JSON array of row objects
pub fn to_json<'a, I>(rows: I) -> TabulaResult<String>
where
    I: IntoIterator<Item = &'a Row>,
{
    let rows: Vec<&Row> = rows.into_iter().collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Timestamped download name, e.g. `tabula_export_20240115_093000.csv`
pub fn export_filename(format: ExportFormat) -> String {
    format!(
        "tabula_export_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Where an export lands: a directory gets a timestamped file inside it
pub fn export_path(output: &Path, format: ExportFormat) -> PathBuf {
    if output.is_dir() {
        output.join(export_filename(format))
    } else {
        output.to_path_buf()
    }
}
