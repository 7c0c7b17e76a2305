//! Table session state
//!
//! The pipeline itself is stateless. A [`TableSession`] holds what a mounted table
//! owns between interactions: the dataset, its schema, the active query, the
//! column-header sort and the current page.

use crate::data::{ColumnDecl, Row, Schema, SchemaResult};
use crate::query::ast::{ParsedQuery, SortDefinition, SortOrder};
use crate::query::parser::QueryParser;
use crate::query::pipeline::{self, Page, QueryOutcome, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone)]
pub struct TableSession {
    rows: Vec<Row>,
    schema: Schema,
    active: Option<ParsedQuery>,
    header_sort: Option<SortDefinition>,
    page: usize,
    page_size: usize,
}

impl TableSession {
    pub fn new(rows: Vec<Row>, schema: Schema) -> Self {
        Self {
            rows,
            schema,
            active: None,
            header_sort: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Build the schema from the rows and optional declarations
    pub fn from_rows(rows: Vec<Row>, columns: Option<&[ColumnDecl]>) -> SchemaResult<Self> {
        let schema = Schema::build(&rows, columns)?;
        Ok(Self::new(rows, schema))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The query currently applied, if any
    pub fn active_query(&self) -> Option<&ParsedQuery> {
        self.active.as_ref()
    }

    pub fn header_sort(&self) -> Option<&SortDefinition> {
        self.header_sort.as_ref()
    }

    /// Parse and activate a query, returning to the first page
    ///
    /// Blank text is ignored and leaves the session unchanged.
    pub fn run_query(&mut self, text: &str) -> Option<&ParsedQuery> {
        if text.trim().is_empty() {
            return None;
        }

        let parsed = QueryParser::new(&self.schema).parse(text);
        tracing::info!(query = %text, explanation = %parsed.explanation, "Applied table query");

        self.page = 0;
        self.active = Some(parsed);
        self.active.as_ref()
    }

    /// Sort by a column header
    ///
    /// A new column starts ascending; clicking the same column again flips the order.
    pub fn toggle_sort(&mut self, column: &str) -> &SortDefinition {
        let next = match self.header_sort.take() {
            Some(current) if current.column == column => {
                SortDefinition::new(current.column, current.order.flipped())
            }
            _ => SortDefinition::new(column, SortOrder::Asc),
        };
        self.header_sort.insert(next)
    }

    /// Drop the active query and header sort, returning the full dataset
    pub fn clear(&mut self) -> &[Row] {
        self.active = None;
        self.header_sort = None;
        self.page = 0;
        tracing::debug!(rows = self.rows.len(), "Cleared table query");
        &self.rows
    }

    /// Current result before pagination
    ///
    /// The active query's sort takes precedence over the header sort.
    pub fn view(&self) -> QueryOutcome<'_> {
        let query = self
            .active
            .clone()
            .unwrap_or_else(|| ParsedQuery::show_all(""));
        pipeline::execute(&self.rows, query, self.header_sort.as_ref())
    }

    /// Current page of the result
    pub fn page(&self) -> Page<'_> {
        self.view().page(self.page, self.page_size)
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, index: usize) {
        self.page = index;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    pub fn total_pages(&self) -> usize {
        pipeline::total_pages(self.view().matched_count, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TableSession {
        let rows = (1..=25)
            .map(|i| {
                Row::new()
                    .with("id", i)
                    .with("name", format!("item-{:02}", 26 - i))
                    .with("price", f64::from(i % 5) * 10.0)
                    .with("status", if i % 2 == 0 { "active" } else { "inactive" })
            })
            .collect();
        TableSession::from_rows(rows, None).unwrap()
    }

    fn ids(rows: &[&Row]) -> Vec<f64> {
        rows.iter()
            .filter_map(|r| r.get("id").and_then(|v| v.as_f64()))
            .collect()
    }

    #[test]
    fn test_initial_view_is_everything() {
        let s = session();
        let view = s.view();

        assert_eq!(view.rows.len(), 25);
        assert!(s.active_query().is_none());
        assert_eq!(s.total_pages(), 3);
        assert_eq!(ids(&s.page().rows), (1..=10).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let mut s = session();
        s.run_query("price > 20");
        assert!(s.run_query("  ").is_none());
        assert_eq!(s.active_query().unwrap().query, "price > 20");
    }

    #[test]
    fn test_query_resets_page() {
        let mut s = session();
        s.set_page(2);
        s.run_query("price > 20");

        assert_eq!(s.page_index(), 0);
        assert_eq!(s.view().matched_count, 10);
        assert_eq!(s.total_pages(), 1);
    }

    #[test]
    fn test_toggle_sort_flips_same_column() {
        let mut s = session();

        assert_eq!(s.toggle_sort("price").order, SortOrder::Asc);
        assert_eq!(s.toggle_sort("price").order, SortOrder::Desc);
        assert_eq!(s.toggle_sort("price").order, SortOrder::Asc);
        assert_eq!(s.toggle_sort("name"), &SortDefinition::asc("name"));
    }

    #[test]
    fn test_header_sort_applies_without_query_sort() {
        let mut s = session();
        s.toggle_sort("name");

        let first = ids(&s.page().rows)[0];
        assert_eq!(first, 25.0);
    }

    #[test]
    fn test_query_sort_wins_over_header_sort() {
        let mut s = session();
        s.toggle_sort("name");
        s.run_query("sort by id desc");

        let view = s.view();
        assert_eq!(ids(&view.rows)[0], 25.0);
        assert_eq!(ids(&view.rows)[24], 1.0);
    }

    #[test]
    fn test_clear_restores_dataset() {
        let mut s = session();
        s.run_query("show active");
        s.toggle_sort("price");
        s.set_page(1);

        let all = s.clear();
        assert_eq!(all.len(), 25);
        assert!(s.active_query().is_none());
        assert!(s.header_sort().is_none());
        assert_eq!(s.page_index(), 0);
        assert_eq!(ids(&s.view().rows), (1..=25).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_page_size_change() {
        let mut s = session().with_page_size(20);
        assert_eq!(s.total_pages(), 2);

        s.set_page(1);
        assert_eq!(s.page().rows.len(), 5);

        s.set_page_size(0);
        assert_eq!(s.page_size(), 1);
        assert_eq!(s.page_index(), 0);
    }
}
