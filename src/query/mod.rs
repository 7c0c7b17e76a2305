//! Tabula Query Engine
//!
//! Turns free-text table queries into structured filters and runs them over
//! in-memory rows:
//!
//! - **AST**: Filter, sort and parsed-query types
//! - **Evaluator**: Test a single value against a condition
//! - **Filter**: Apply a filter definition to a row sequence
//! - **Parser**: Interpret query text against a schema
//! - **Sort**: Stable row ordering
//! - **Pipeline**: parse → filter → sort → limit, plus pagination
//! - **Session**: Caller-owned table state (active query, header sort, page)
//!
//! # Query Language
//!
//! ```text
//! [sort|order [by] <column> [asc|desc]]
//! [top|first|limit <n>]
//! <column> is|named|contains|>|<|>=|<= <value> [and|or ...]
//! [from|in <place>] [<status word>] [<search term>]
//! ```
//!
//! # Examples
//!
//! ## Using Query Text
//!
//! ```rust,ignore
//! use tabula::query::run_query;
//!
//! let outcome = run_query(&rows, &schema, "total > 500 sort by total desc");
//! println!("{}", outcome.explanation()); // Sorted by Total (desc), Total > 500
//! ```
//!
//! ## Building Filters Directly
//!
//! ```rust,ignore
//! use tabula::query::{apply_filter, FilterDefinition, FilterOperator};
//!
//! let filter = FilterDefinition::all(vec![
//!     schema.condition("country", FilterOperator::Equals, "usa")?,
//!     schema.condition("total", FilterOperator::Between, (100, 900))?,
//! ]);
//! let rows = apply_filter(&rows, &filter);
//! ```

mod ast;
mod error;
mod evaluator;
mod filter;
mod parser;
mod pipeline;
mod session;
mod sort;

pub use ast::{
    FilterCondition, FilterDefinition, FilterOperator, FilterValue, LogicalOperator,
    ParsedQuery, SortDefinition, SortOrder, SHOW_ALL_EXPLANATION,
};
pub use error::{QueryError, QueryResult};
pub use evaluator::{evaluate, ConditionMatcher};
pub use filter::{apply_filter, filter_refs};
pub use parser::{parse_query, suggestions, QueryParser};
pub use pipeline::{run_parsed, run_query, total_pages, Page, QueryOutcome, DEFAULT_PAGE_SIZE};
pub use session::TableSession;
pub use sort::{compare_values, sort_rows, stable_sort_by};
