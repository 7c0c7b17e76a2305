//! Dataset Model
//!
//! Rows, values and the schema that describes them:
//!
//! - **Value / Row**: tagged scalar cells in insertion-ordered records
//! - **Number**: script-style numeric coercion used by comparisons
//! - **Schema**: column metadata, lookup and validated condition construction
//! - **Loader**: reading rows from JSON and CSV files

mod error;
mod loader;
mod number;
mod schema;
mod value;

pub use error::{SchemaError, SchemaResult};
pub use loader::{load_rows, read_csv_rows, read_json_rows, DataFormat};
pub use number::{format_number, parse_number};
pub use schema::{
    label_from_key, ColumnDecl, ColumnSchema, ColumnType, Schema, DEFAULT_SAMPLE_SIZE,
};
pub use value::{Row, Value};
