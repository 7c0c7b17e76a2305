//! Query Parser
//!
//! Interprets free-text table queries against a [`Schema`] using an ordered cascade
//! of pattern rules. Every rule that fires contributes one phrase to the
//! explanation, so the interpretation is always auditable.
//!
//! # Rule Cascade
//!
//! ```text
//! 1. sort      (sort|order) [by] <column> [asc|desc]
//! 2. limit     (top|first|limit) <n>
//! 3. columns   for each column in schema order, first matching rule wins:
//!              <col> named|called|as <v>         → contains
//!              <col> is|equals|=|== <v>          → equals
//!              <col> contains|like|has|includes <v> → contains
//!              find|show|get|search <col> <v>    → contains
//!              [where] <col> =|== <v>            → equals
//!              <col> >|greater than|more than|above <n> → gt
//!              <col> <|less than|below|under <n> → lt
//!              <col> >=|at least|minimum <n>     → gte
//!              <col> <=|at most|maximum <n>      → lte
//! 4. location  from|in <word>   → contains on country/location/region/city/state
//! 5. status    known status word → equals on status/state/order_status/orderstatus
//! 6. text      last meaningful word → contains on every string column (OR)
//! ```
//!
//! Steps 4-6 only run while no condition has been produced.
//!
//! # Examples
//!
//! ```text
//! total > 500               → total gt 500            "Total > 500"
//! sort by total desc        → sort total desc         "Sorted by Total (desc)"
//! top 3 orders              → limit 3                 "Top 3 results"
//! show completed orders     → status equals completed "Status = \"completed\""
//! ```

use crate::data::{ColumnSchema, ColumnType, Schema, Value};
use crate::query::ast::*;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static SORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:sort|order)\s+(?:by\s+)?(\w+)(?:\s+(asc|desc))?").expect("valid sort pattern")
});

static LIMIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:top|first|limit)\s*(\d+)").expect("valid limit pattern"));

static LOCATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:from|in)\s+([a-z]+)").expect("valid location pattern"));

/// Column keys treated as places by the location fallback
const LOCATION_KEYS: &[&str] = &["country", "location", "region", "city", "state"];

/// Column keys treated as a status by the status fallback
const STATUS_KEYS: &[&str] = &["status", "state", "order_status", "orderstatus"];

/// Status words recognised anywhere in the query, in priority order
const STATUS_WORDS: &[&str] = &[
    "completed",
    "pending",
    "shipped",
    "cancelled",
    "active",
    "inactive",
    "approved",
    "rejected",
];

/// Words ignored when picking a free-text search term
const STOPWORDS: &[&str] = &[
    "show", "find", "get", "list", "all", "the", "with", "where", "and", "or", "orders", "items",
    "data", "records", "me", "please", "can", "you",
];

/// How a rule's captured operand becomes a condition value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Text,
    Number,
}

/// One per-column rule: a pattern template and the condition it builds
///
/// `{col}` in the template is replaced by the column's escaped key and label.
#[derive(Debug)]
struct ColumnRule {
    template: &'static str,
    operator: FilterOperator,
    capture: Capture,
}

/// Per-column rules in priority order
const COLUMN_RULES: &[ColumnRule] = &[
    // customer named acme
    ColumnRule {
        template: r#"(?:{col})\s+(?:named|called|as)\s+(?:as\s+)?["']?([\w\s]+?)["']?(?:\s|$|,|\.)"#,
        operator: FilterOperator::Contains,
        capture: Capture::Text,
    },
    // status is completed
    ColumnRule {
        template: r#"(?:{col})\s+(?:is|equals?|=|==)\s+["']?([\w\s]+?)["']?(?:\s|$|,|\.)"#,
        operator: FilterOperator::Equals,
        capture: Capture::Text,
    },
    // customer contains acm
    ColumnRule {
        template: r#"(?:{col})\s+(?:contains?|like|has|includes?)\s+["']?([\w\s]+?)["']?(?:\s|$|,|\.)"#,
        operator: FilterOperator::Contains,
        capture: Capture::Text,
    },
    // find customer acme
    ColumnRule {
        template: r#"(?:find|show|get|search)\s+(?:{col})\s+["']?([\w\s]+?)["']?(?:\s|$|,|\.)"#,
        operator: FilterOperator::Contains,
        capture: Capture::Text,
    },
    // where status=shipped
    ColumnRule {
        template: r#"(?:where\s+)?(?:{col})\s*(?:=|==)\s*["']?(\w+)["']?"#,
        operator: FilterOperator::Equals,
        capture: Capture::Text,
    },
    ColumnRule {
        template: r"(?:{col})\s*(?:>|greater than|more than|above)\s*(\d+(?:\.\d+)?)",
        operator: FilterOperator::Gt,
        capture: Capture::Number,
    },
    ColumnRule {
        template: r"(?:{col})\s*(?:<|less than|below|under)\s*(\d+(?:\.\d+)?)",
        operator: FilterOperator::Lt,
        capture: Capture::Number,
    },
    ColumnRule {
        template: r"(?:{col})\s*(?:>=|at least|minimum)\s*(\d+(?:\.\d+)?)",
        operator: FilterOperator::Gte,
        capture: Capture::Number,
    },
    ColumnRule {
        template: r"(?:{col})\s*(?:<=|at most|maximum)\s*(\d+(?:\.\d+)?)",
        operator: FilterOperator::Lte,
        capture: Capture::Number,
    },
];

/// A column rule compiled for one schema column
#[derive(Debug)]
struct CompiledRule {
    pattern: Regex,
    rule: &'static ColumnRule,
}

/// Schema-bound query parser
///
/// Compiles the per-column patterns once; [`QueryParser::parse`] is then a pure
/// function of the query text.
#[derive(Debug)]
pub struct QueryParser<'s> {
    schema: &'s Schema,
    /// Compiled rules, parallel to `schema.columns`
    column_rules: Vec<Vec<CompiledRule>>,
}

impl<'s> QueryParser<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        let column_rules = schema.columns.iter().map(compile_column_rules).collect();
        Self {
            schema,
            column_rules,
        }
    }

    /// The schema this parser was built for
    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Interpret a free-text query
    ///
    /// Never fails: text that matches no rule yields a query without a filter.
    pub fn parse(&self, query: &str) -> ParsedQuery {
        let lower = query.to_lowercase();
        let mut conditions = Vec::new();
        let mut explanation = Vec::new();
        let mut consumed: Vec<Range<usize>> = Vec::new();

        // 1. Sort clause
        let mut sort = None;
        if let Some(caps) = SORT_PATTERN.captures(&lower) {
            if let Some(column) = self.schema.column(&caps[1]) {
                let order = caps
                    .get(2)
                    .and_then(|m| SortOrder::from_str(m.as_str()))
                    .unwrap_or_default();
                explanation.push(format!("Sorted by {} ({})", column.label, order));
                consumed.push(caps.get(0).map_or(0..0, |m| m.range()));
                sort = Some(SortDefinition::new(column.key.clone(), order));
            }
        }

        // 2. Limit clause
        let mut limit = None;
        if let Some(caps) = LIMIT_PATTERN.captures(&lower) {
            // Digits only, so the parse can fail only on overflow
            let n = caps[1].parse::<usize>().unwrap_or(usize::MAX);
            explanation.push(format!("Top {} results", n));
            consumed.push(caps.get(0).map_or(0..0, |m| m.range()));
            limit = Some(n);
        }

        // 3. Per-column clauses
        for (column, rules) in self.schema.columns.iter().zip(&self.column_rules) {
            if let Some((condition, phrase)) = match_column(column, rules, &lower) {
                conditions.push(condition);
                explanation.push(phrase);
            }
        }

        // 4. Location fallback
        if conditions.is_empty() {
            if let Some(caps) = LOCATION_PATTERN.captures(&lower) {
                if let Some(column) = self.find_column_by_key(LOCATION_KEYS) {
                    let place = caps[1].trim();
                    explanation.push(describe(&column.label, FilterOperator::Contains, place));
                    conditions.push(FilterCondition::new(
                        column.key.clone(),
                        FilterOperator::Contains,
                        place,
                    ));
                }
            }
        }

        // 5. Status fallback
        if conditions.is_empty() {
            let status = STATUS_WORDS.iter().find(|word| lower.contains(*word));
            if let (Some(status), Some(column)) = (status, self.find_column_by_key(STATUS_KEYS)) {
                explanation.push(describe(&column.label, FilterOperator::Equals, status));
                conditions.push(FilterCondition::new(
                    column.key.clone(),
                    FilterOperator::Equals,
                    *status,
                ));
            }
        }

        // 6. Free-text fallback across string columns
        let mut text_search = false;
        if conditions.is_empty() {
            let remaining = blank_out(&lower, &consumed);
            if let Some(term) = search_term(&remaining) {
                let string_columns: Vec<&ColumnSchema> =
                    self.schema.columns_of_type(ColumnType::String).collect();

                if !string_columns.is_empty() {
                    conditions.extend(string_columns.iter().map(|column| {
                        FilterCondition::new(column.key.clone(), FilterOperator::Contains, term)
                    }));
                    explanation.push(format!("Searching for \"{}\"", term));
                    text_search = true;
                }
            }
        }

        // 7. Logical operator
        let operator = if text_search || (conditions.len() > 1 && lower.contains(" or ")) {
            LogicalOperator::Or
        } else {
            LogicalOperator::And
        };

        let filter = if conditions.is_empty() {
            None
        } else {
            Some(FilterDefinition {
                conditions,
                operator,
            })
        };

        let explanation = if explanation.is_empty() {
            SHOW_ALL_EXPLANATION.to_string()
        } else {
            explanation.join(", ")
        };

        let parsed = ParsedQuery {
            query: query.to_string(),
            filter,
            sort,
            limit,
            explanation,
        };

        tracing::debug!(
            query = %query,
            conditions = parsed.condition_count(),
            sort = parsed.sort.is_some(),
            limit = ?parsed.limit,
            explanation = %parsed.explanation,
            "Parsed table query"
        );

        parsed
    }

    /// First column (schema order) whose lower-cased key is one of `keys`
    fn find_column_by_key(&self, keys: &[&str]) -> Option<&ColumnSchema> {
        self.schema
            .columns
            .iter()
            .find(|c| keys.contains(&c.key.to_lowercase().as_str()))
    }
}

/// Parse a query against a schema in one call
pub fn parse_query(query: &str, schema: &Schema) -> ParsedQuery {
    QueryParser::new(schema).parse(query)
}

/// Example queries offered to users, one per column
pub fn suggestions(schema: &Schema) -> Vec<String> {
    schema
        .columns
        .iter()
        .map(|c| format!("Show {}", c.label))
        .collect()
}

/// Compile the rule cascade for one column
fn compile_column_rules(column: &ColumnSchema) -> Vec<CompiledRule> {
    let mut names: Vec<String> = Vec::with_capacity(2);
    for name in [&column.key, &column.label] {
        let escaped = regex::escape(&name.to_lowercase());
        if !escaped.is_empty() && !names.contains(&escaped) {
            names.push(escaped);
        }
    }
    if names.is_empty() {
        return Vec::new();
    }
    let alternation = names.join("|");

    COLUMN_RULES
        .iter()
        .filter_map(|rule| {
            let source = rule.template.replace("{col}", &alternation);
            match Regex::new(&source) {
                Ok(pattern) => Some(CompiledRule { pattern, rule }),
                Err(e) => {
                    tracing::warn!(column = %column.key, error = %e, "Skipping query rule");
                    None
                }
            }
        })
        .collect()
}

/// Try a column's rules in order; the first that matches builds the condition
fn match_column(
    column: &ColumnSchema,
    rules: &[CompiledRule],
    query: &str,
) -> Option<(FilterCondition, String)> {
    rules.iter().find_map(|compiled| {
        let caps = compiled.pattern.captures(query)?;
        let literal = caps.get(1)?.as_str().trim();

        let value = match compiled.rule.capture {
            Capture::Text => Value::from(literal),
            Capture::Number => Value::Number(literal.parse::<f64>().ok()?),
        };

        let operator = compiled.rule.operator;
        Some((
            FilterCondition::new(column.key.clone(), operator, value),
            describe(&column.label, operator, literal),
        ))
    })
}

/// Explanation phrase for one condition
fn describe(label: &str, operator: FilterOperator, literal: &str) -> String {
    match operator {
        FilterOperator::Equals => format!("{} = \"{}\"", label, literal),
        FilterOperator::Gt => format!("{} > {}", label, literal),
        FilterOperator::Lt => format!("{} < {}", label, literal),
        FilterOperator::Gte => format!("{} >= {}", label, literal),
        FilterOperator::Lte => format!("{} <= {}", label, literal),
        other => format!("{} {} \"{}\"", label, other, literal),
    }
}

/// Replace the given byte spans with spaces
fn blank_out(text: &str, spans: &[Range<usize>]) -> String {
    let mut out = text.to_string();
    for span in spans {
        if out.is_char_boundary(span.start) && out.is_char_boundary(span.end) {
            out.replace_range(span.clone(), &" ".repeat(span.len()));
        }
    }
    out
}

/// Last word that is neither a stopword nor shorter than three characters
fn search_term(text: &str) -> Option<&str> {
    text.split_whitespace()
        .filter(|word| !STOPWORDS.contains(word) && word.chars().count() > 2)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Row;

    fn orders_schema() -> Schema {
        let rows = vec![Row::new()
            .with("id", 1)
            .with("customer", "Acme")
            .with("country", "USA")
            .with("total", 1299.0)
            .with("status", "completed")];
        Schema::build(&rows, None).unwrap()
    }

    fn only_condition(parsed: &ParsedQuery) -> &FilterCondition {
        let filter = parsed.filter.as_ref().expect("filter");
        assert_eq!(filter.conditions.len(), 1, "{:?}", filter.conditions);
        &filter.conditions[0]
    }

    #[test]
    fn test_greater_than() {
        let parsed = parse_query("total > 500", &orders_schema());

        let filter = parsed.filter.as_ref().unwrap();
        assert_eq!(
            filter,
            &FilterDefinition::all(vec![FilterCondition::new(
                "total",
                FilterOperator::Gt,
                500.0
            )])
        );
        assert!(parsed.explanation.contains("Total > 500"));
    }

    #[test]
    fn test_sort_clause_without_filter() {
        let parsed = parse_query("sort by total desc", &orders_schema());

        assert_eq!(parsed.sort, Some(SortDefinition::desc("total")));
        assert!(parsed.filter.is_none());
        assert_eq!(parsed.explanation, "Sorted by Total (desc)");
    }

    #[test]
    fn test_sort_defaults_to_ascending() {
        let parsed = parse_query("order by customer", &orders_schema());
        assert_eq!(parsed.sort, Some(SortDefinition::asc("customer")));
    }

    #[test]
    fn test_sort_on_unknown_column_is_ignored() {
        let parsed = parse_query("sort by colour", &orders_schema());
        assert!(parsed.sort.is_none());
    }

    #[test]
    fn test_limit_clause() {
        let parsed = parse_query("top 3 orders", &orders_schema());

        assert_eq!(parsed.limit, Some(3));
        assert!(parsed.filter.is_none());
        assert_eq!(parsed.explanation, "Top 3 results");
    }

    #[test]
    fn test_oversized_limit_saturates() {
        let parsed = parse_query("top 99999999999999999999999 orders", &orders_schema());

        assert_eq!(parsed.limit, Some(usize::MAX));
        assert!(parsed.filter.is_none());
    }

    fn schema_of(keys: &[&str]) -> Schema {
        let row: Row = keys.iter().map(|key| (*key, "x")).collect();
        Schema::build(&[row], None).unwrap()
    }

    #[test]
    fn test_location_fallback_keys() {
        let cases = [
            (&["customer", "region"][..], "orders from emea", "region", "emea"),
            (&["customer", "city"][..], "orders in paris", "city", "paris"),
            (&["customer", "state"][..], "orders in texas", "state", "texas"),
            (&["customer", "location"][..], "stores in lyon", "location", "lyon"),
            (&["Country", "city"][..], "orders from peru", "Country", "peru"),
        ];

        for (keys, query, column, place) in cases {
            let parsed = parse_query(query, &schema_of(keys));
            assert_eq!(
                only_condition(&parsed),
                &FilterCondition::new(column, FilterOperator::Contains, place),
                "query: {}",
                query
            );
        }
    }

    #[test]
    fn test_location_without_location_column_falls_through() {
        let schema = schema_of(&["customer", "status"]);

        let parsed = parse_query("completed orders from india", &schema);
        assert_eq!(
            only_condition(&parsed),
            &FilterCondition::new("status", FilterOperator::Equals, "completed")
        );

        let parsed = parse_query("orders from india", &schema);
        let filter = parsed.filter.unwrap();
        assert_eq!(filter.operator, LogicalOperator::Or);
        assert!(filter
            .conditions
            .iter()
            .all(|c| c.value == FilterValue::from("india")));
        assert_eq!(parsed.explanation, "Searching for \"india\"");
    }

    #[test]
    fn test_status_fallback_keys() {
        let cases = [
            (&["customer", "state"][..], "show pending", "state"),
            (&["customer", "order_status"][..], "show pending", "order_status"),
            (&["customer", "orderStatus"][..], "show pending", "orderStatus"),
            (&["customer", "OrderStatus"][..], "pending please", "OrderStatus"),
        ];

        for (keys, query, column) in cases {
            let parsed = parse_query(query, &schema_of(keys));
            assert_eq!(
                only_condition(&parsed),
                &FilterCondition::new(column, FilterOperator::Equals, "pending"),
                "query: {}",
                query
            );
        }
    }

    #[test]
    fn test_location_takes_precedence_over_status() {
        let parsed = parse_query("pending orders in texas", &schema_of(&["state"]));
        assert_eq!(
            only_condition(&parsed),
            &FilterCondition::new("state", FilterOperator::Contains, "texas")
        );

        let parsed = parse_query("pending orders", &schema_of(&["state"]));
        assert_eq!(
            only_condition(&parsed),
            &FilterCondition::new("state", FilterOperator::Equals, "pending")
        );
    }

    #[test]
    fn test_sort_by_label() {
        let rows = vec![Row::new().with("amt", 10.0)];
        let decls = vec![crate::data::ColumnDecl::new("amt")
            .column_type(ColumnType::Number)
            .label("Amount")];
        let schema = Schema::build(&rows, Some(&decls)).unwrap();

        let parsed = parse_query("sort by amount desc", &schema);
        assert_eq!(parsed.sort, Some(SortDefinition::desc("amt")));
        assert_eq!(parsed.explanation, "Sorted by Amount (desc)");
    }

    #[test]
    fn test_status_fallback() {
        let parsed = parse_query("show completed orders", &orders_schema());
        let cond = only_condition(&parsed);

        assert_eq!(
            cond,
            &FilterCondition::new("status", FilterOperator::Equals, "completed")
        );
        assert_eq!(parsed.explanation, "Status = \"completed\"");
    }

    #[test]
    fn test_location_fallback() {
        let parsed = parse_query("orders from India", &orders_schema());
        let cond = only_condition(&parsed);

        assert_eq!(
            cond,
            &FilterCondition::new("country", FilterOperator::Contains, "india")
        );
    }

    #[test]
    fn test_named_pattern() {
        let parsed = parse_query("show customer named acme", &orders_schema());
        let cond = only_condition(&parsed);

        assert_eq!(cond.operator, FilterOperator::Contains);
        assert_eq!(cond.value, FilterValue::from("acme"));
        assert_eq!(parsed.explanation, "Customer contains \"acme\"");
    }

    #[test]
    fn test_is_pattern() {
        let parsed = parse_query("status is shipped", &orders_schema());
        let cond = only_condition(&parsed);

        assert_eq!(
            cond,
            &FilterCondition::new("status", FilterOperator::Equals, "shipped")
        );
    }

    #[test]
    fn test_contains_and_find_patterns() {
        let parsed = parse_query("customer like glob", &orders_schema());
        assert_eq!(
            only_condition(&parsed),
            &FilterCondition::new("customer", FilterOperator::Contains, "glob")
        );

        let parsed = parse_query("find customer initech", &orders_schema());
        assert_eq!(
            only_condition(&parsed),
            &FilterCondition::new("customer", FilterOperator::Contains, "initech")
        );
    }

    #[test]
    fn test_compact_equals_pattern() {
        let parsed = parse_query("where customer=globex", &orders_schema());
        assert_eq!(
            only_condition(&parsed),
            &FilterCondition::new("customer", FilterOperator::Equals, "globex")
        );
    }

    #[test]
    fn test_comparison_phrases() {
        let schema = orders_schema();

        let cases = [
            ("total greater than 100", FilterOperator::Gt, 100.0, "Total > 100"),
            ("total below 99.5", FilterOperator::Lt, 99.5, "Total < 99.5"),
            ("total >= 250", FilterOperator::Gte, 250.0, "Total >= 250"),
            ("total at least 250", FilterOperator::Gte, 250.0, "Total >= 250"),
            ("total <= 40", FilterOperator::Lte, 40.0, "Total <= 40"),
            ("total maximum 40", FilterOperator::Lte, 40.0, "Total <= 40"),
        ];

        for (query, operator, value, phrase) in cases {
            let parsed = parse_query(query, &schema);
            assert_eq!(
                only_condition(&parsed),
                &FilterCondition::new("total", operator, value),
                "query: {}",
                query
            );
            assert_eq!(parsed.explanation, phrase);
        }
    }

    #[test]
    fn test_or_keyword_switches_operator() {
        let parsed = parse_query("total > 100 or status is pending", &orders_schema());
        let filter = parsed.filter.unwrap();

        assert_eq!(filter.operator, LogicalOperator::Or);
        assert_eq!(filter.conditions.len(), 2);
        assert_eq!(filter.conditions[0].column, "total");
        assert_eq!(filter.conditions[1].column, "status");
        assert_eq!(parsed.explanation, "Total > 100, Status = \"pending\"");
    }

    #[test]
    fn test_multiple_clauses_default_to_and() {
        let parsed = parse_query("total > 100 and status is pending", &orders_schema());
        assert_eq!(parsed.filter.unwrap().operator, LogicalOperator::And);
    }

    #[test]
    fn test_free_text_search_across_string_columns() {
        let parsed = parse_query("acme", &orders_schema());
        let filter = parsed.filter.unwrap();

        let columns: Vec<&str> = filter.conditions.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(columns, vec!["customer", "country", "status"]);
        assert!(filter
            .conditions
            .iter()
            .all(|c| c.operator == FilterOperator::Contains && c.value == FilterValue::from("acme")));
        assert_eq!(filter.operator, LogicalOperator::Or);
        assert_eq!(parsed.explanation, "Searching for \"acme\"");
    }

    #[test]
    fn test_free_text_uses_last_meaningful_word() {
        let parsed = parse_query("please show me all the widgets", &orders_schema());
        let cond = &parsed.filter.unwrap().conditions[0];
        assert_eq!(cond.value, FilterValue::from("widgets"));
    }

    #[test]
    fn test_free_text_needs_string_columns() {
        let rows = vec![Row::new().with("id", 1).with("total", 2.0)];
        let schema = Schema::build(&rows, None).unwrap();

        let parsed = parse_query("widgets", &schema);
        assert!(parsed.filter.is_none());
        assert_eq!(parsed.explanation, SHOW_ALL_EXPLANATION);
    }

    #[test]
    fn test_unmatched_query_shows_all() {
        let parsed = parse_query("?!", &orders_schema());
        assert!(parsed.filter.is_none());
        assert!(parsed.sort.is_none());
        assert!(parsed.limit.is_none());
        assert_eq!(parsed.explanation, SHOW_ALL_EXPLANATION);
        assert_eq!(parsed.query, "?!");
    }

    #[test]
    fn test_combined_clauses() {
        let parsed = parse_query("top 5 total > 100 sort by total desc", &orders_schema());

        assert_eq!(parsed.limit, Some(5));
        assert_eq!(parsed.sort, Some(SortDefinition::desc("total")));
        assert_eq!(
            only_condition(&parsed),
            &FilterCondition::new("total", FilterOperator::Gt, 100.0)
        );
        assert_eq!(
            parsed.explanation,
            "Sorted by Total (desc), Top 5 results, Total > 100"
        );
    }

    #[test]
    fn test_label_matches_like_key() {
        let rows = vec![Row::new().with("amt", 10.0)];
        let decls = vec![crate::data::ColumnDecl::new("amt")
            .column_type(ColumnType::Number)
            .label("Amount")];
        let schema = Schema::build(&rows, Some(&decls)).unwrap();

        let parsed = parse_query("Amount above 5", &schema);
        assert_eq!(
            only_condition(&parsed),
            &FilterCondition::new("amt", FilterOperator::Gt, 5.0)
        );
        assert_eq!(parsed.explanation, "Amount > 5");
    }

    #[test]
    fn test_odd_input_does_not_panic() {
        let schema = orders_schema();
        for query in ["", "   ", "ÜBER größe > 5", "total > > 5", "sort by", "(((", "İstanbul"] {
            let _ = parse_query(query, &schema);
        }
    }

    #[test]
    fn test_suggestions() {
        assert_eq!(
            suggestions(&orders_schema()),
            vec![
                "Show Id",
                "Show Customer",
                "Show Country",
                "Show Total",
                "Show Status"
            ]
        );
    }

    #[test]
    fn test_parser_is_reusable() {
        let schema = orders_schema();
        let parser = QueryParser::new(&schema);

        assert_eq!(parser.parse("total > 500"), parser.parse("total > 500"));
        assert_eq!(parser.schema().columns.len(), 5);
    }
}
