//! Dataset loading
//!
//! Reads rows from JSON documents (an array of objects) or CSV files with a header
//! row. CSV cells are typed on the way in so that schema derivation sees numbers
//! and booleans rather than text.

use crate::data::value::{Row, Value};
use crate::error::{TabulaError, TabulaResult};
use std::io::Read;
use std::path::Path;

/// Supported dataset file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl DataFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> TabulaResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(TabulaError::UnsupportedFormat(format!(
                "cannot load '.{}' files (expected .json or .csv)",
                other
            ))),
        }
    }
}

/// Load all rows from a `.json` or `.csv` file
pub fn load_rows(path: &Path) -> TabulaResult<Vec<Row>> {
    let format = DataFormat::from_path(path)?;
    let file = std::fs::File::open(path)?;

    let rows = match format {
        DataFormat::Json => read_json_rows(file)?,
        DataFormat::Csv => read_csv_rows(file)?,
    };

    tracing::info!(path = %path.display(), rows = rows.len(), "Loaded dataset");
    Ok(rows)
}

/// Read a JSON array of objects
///
/// Array entries that are not objects are skipped with a warning.
pub fn read_json_rows<R: Read>(reader: R) -> TabulaResult<Vec<Row>> {
    let document: serde_json::Value = serde_json::from_reader(reader)?;

    let serde_json::Value::Array(items) = document else {
        return Err(TabulaError::Json(
            "expected a top-level array of row objects".to_string(),
        ));
    };

    let mut rows = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match Row::from_json(item) {
            Some(row) => rows.push(row),
            None => tracing::warn!(index = idx, "Skipping non-object entry in dataset"),
        }
    }
    Ok(rows)
}

/// Read CSV records keyed by the header row
pub fn read_csv_rows<R: Read>(reader: R) -> TabulaResult<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let cell = record.get(idx).map(infer_cell).unwrap_or(Value::Null);
                (header.to_string(), cell)
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Type a raw CSV cell: empty → null, true/false → bool, finite numbers → number
fn infer_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::String(raw.to_string()),
    }
}
