//! Crate-level error types
//!
//! The query core itself never fails on bad data; these errors cover the edges:
//! reading datasets, building schemas from host declarations, configuration and
//! export.

use crate::assist::{AgentError, TransformError};
use crate::config::ConfigError;
use crate::data::SchemaError;
use crate::query::QueryError;
use thiserror::Error;

/// Errors surfaced by Tabula outside the pure query core
#[derive(Error, Debug)]
pub enum TabulaError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON document could not be read or written
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV document could not be read or written
    #[error("CSV error: {0}")]
    Csv(String),

    /// Column declarations were inconsistent
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A host-built condition or sort was invalid
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A row agent could not run
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// A data transformation could not run
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// File or output format not supported
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Logging could not be initialised
    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<serde_json::Error> for TabulaError {
    fn from(err: serde_json::Error) -> Self {
        TabulaError::Json(err.to_string())
    }
}

impl From<csv::Error> for TabulaError {
    fn from(err: csv::Error) -> Self {
        TabulaError::Csv(err.to_string())
    }
}

/// Result type alias for Tabula operations
pub type TabulaResult<T> = Result<T, TabulaError>;
