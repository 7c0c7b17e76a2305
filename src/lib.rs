//! # Tabula
//!
//! Natural-language table queries - turns free-text questions such as
//! `top 5 orders from India sort by total desc` into structured filter, sort and
//! limit plans over in-memory rows, with an explanation of how the text was read.
//!
//! ## Features
//!
//! - **Rule-based parsing**: an ordered, auditable cascade of query patterns
//! - **Total evaluation**: malformed conditions and bad data never error, they just don't match
//! - **Stable ordering**: ties keep their dataset order in both directions
//! - **Assistance**: local insights, row agents and data transformations over the same rows
//! - **Export**: CSV and JSON of any result sequence
//!
//! ## Modules
//!
//! - [`data`]: Rows, values, schemas and file loading
//! - [`query`]: Parser, evaluator, filter engine, pipeline and session state
//! - [`assist`]: Insights, row agents and transformations
//! - [`export`]: CSV and JSON serialization
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabula::data::{load_rows, Schema};
//! use tabula::query::run_query;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rows = load_rows("orders.json".as_ref())?;
//!     let schema = Schema::build(&rows, None)?;
//!
//!     let outcome = run_query(&rows, &schema, "status is shipped sort by total desc");
//!
//!     println!("{}", outcome.explanation());
//!     println!("{} matching rows", outcome.matched_count);
//!
//!     Ok(())
//! }
//! ```

pub mod assist;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod logging;
pub mod query;

// Re-export top-level types for convenience
pub use data::{ColumnDecl, ColumnSchema, ColumnType, Row, Schema, SchemaError, Value};

pub use query::{
    apply_filter, parse_query, run_query, FilterCondition, FilterDefinition, FilterOperator,
    LogicalOperator, ParsedQuery, QueryError, QueryOutcome, QueryParser, SortDefinition,
    SortOrder, TableSession,
};

pub use assist::{
    AgentError, AgentRunner, Insight, InsightCategory, RowAgent, TransformError, Transformation,
    Transformer,
};

pub use config::{Config, ConfigError, LoggingConfig};

pub use error::{TabulaError, TabulaResult};

pub use export::ExportFormat;
