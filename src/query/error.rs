//! Query error types
//!
//! Parsing and evaluation never fail on user input: unmatched text becomes an
//! identity filter and malformed conditions evaluate to "no match". These errors
//! are only raised when a host builds conditions or sorts programmatically against
//! a schema.

use thiserror::Error;

/// Errors that can occur when constructing query parts against a schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Referenced column does not exist in the schema
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Condition value has the wrong shape for its operator
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Sort definition could not be resolved
    #[error("Invalid sort: {0}")]
    InvalidSort(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
