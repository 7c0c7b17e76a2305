//! Dataset error types

use thiserror::Error;

/// Errors raised while building a schema from column declarations
///
/// These indicate a host integration bug rather than bad user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Two declarations share the same key
    #[error("Duplicate column key: {0}")]
    DuplicateColumn(String),

    /// A declaration has an empty key
    #[error("Column key must not be empty")]
    EmptyKey,

    /// A declaration names an unknown column type
    #[error("Unknown column type: {0}")]
    UnknownType(String),
}

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
