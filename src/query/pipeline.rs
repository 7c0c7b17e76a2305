//! Query Pipeline
//!
//! Runs a query end to end over an in-memory dataset:
//!
//! ```text
//! parse → filter → stable sort → limit → (caller) paginate
//! ```
//!
//! Results borrow from the input rows; nothing is copied or mutated, so running the
//! same query twice over the same rows yields the same sequence.

use crate::data::{Row, Schema};
use crate::query::ast::{ParsedQuery, SortDefinition};
use crate::query::filter::apply_filter;
use crate::query::parser::parse_query;
use crate::query::sort::sort_rows;
use serde::Serialize;

/// Rows per page when the caller does not choose
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Result of running one query
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutcome<'r> {
    /// How the query text was interpreted
    pub query: ParsedQuery,
    /// Filtered, sorted and limited rows
    pub rows: Vec<&'r Row>,
    /// Rows left after filtering, before the limit
    pub filtered_count: usize,
    /// Rows left after the limit, before pagination
    pub matched_count: usize,
}

impl<'r> QueryOutcome<'r> {
    pub fn explanation(&self) -> &str {
        &self.query.explanation
    }

    /// Slice out one page of the result
    pub fn page(&self, index: usize, size: usize) -> Page<'r> {
        Page::of(&self.rows, index, size)
    }
}

/// Parse `text` against `schema` and run it over `rows`
///
/// Blank text is not parsed: every row is returned with the show-all explanation.
pub fn run_query<'r>(rows: &'r [Row], schema: &Schema, text: &str) -> QueryOutcome<'r> {
    let query = if text.trim().is_empty() {
        ParsedQuery::show_all(text)
    } else {
        parse_query(text, schema)
    };
    execute(rows, query, None)
}

/// Run an already parsed query
pub fn run_parsed<'r>(rows: &'r [Row], query: &ParsedQuery) -> QueryOutcome<'r> {
    execute(rows, query.clone(), None)
}

/// Run `query`, sorting by `fallback_sort` when the query carries no sort of its own
pub(crate) fn execute<'r>(
    rows: &'r [Row],
    query: ParsedQuery,
    fallback_sort: Option<&SortDefinition>,
) -> QueryOutcome<'r> {
    let mut result: Vec<&Row> = match &query.filter {
        Some(filter) => apply_filter(rows, filter),
        None => rows.iter().collect(),
    };
    let filtered_count = result.len();

    if let Some(sort) = query.sort.as_ref().or(fallback_sort) {
        sort_rows(&mut result, sort);
    }

    if let Some(limit) = query.limit {
        result.truncate(limit);
    }
    let matched_count = result.len();

    tracing::debug!(
        total = rows.len(),
        filtered = filtered_count,
        matched = matched_count,
        "Ran table query"
    );

    QueryOutcome {
        query,
        rows: result,
        filtered_count,
        matched_count,
    }
}

/// One page of a result sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'r> {
    pub rows: Vec<&'r Row>,
    /// Zero-based page index
    pub index: usize,
    pub size: usize,
    /// Rows across all pages
    pub total: usize,
    pub total_pages: usize,
}

impl<'r> Page<'r> {
    /// Page `index` of `rows`, `size` rows per page
    ///
    /// A size of zero is treated as one; an index past the end yields an empty page.
    pub fn of(rows: &[&'r Row], index: usize, size: usize) -> Self {
        let size = size.max(1);
        let total = rows.len();
        let start = index.saturating_mul(size).min(total);
        let end = start.saturating_add(size).min(total);

        Self {
            rows: rows[start..end].to_vec(),
            index,
            size,
            total,
            total_pages: total_pages(total, size),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }
}

/// Pages needed for `total` rows
pub fn total_pages(total: usize, size: usize) -> usize {
    total.div_ceil(size.max(1))
}
