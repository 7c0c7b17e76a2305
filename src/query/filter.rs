//! Filter Engine
//!
//! Applies a [`FilterDefinition`] to a row collection, returning the matching rows
//! as an order-preserving subsequence of borrowed references. Input rows are never
//! copied or modified.

use crate::data::Row;
use crate::query::ast::{FilterDefinition, LogicalOperator};
use crate::query::evaluator::ConditionMatcher;

/// Keep the rows matching `filter`, in their original order
///
/// An identity filter (no conditions) keeps every row.
pub fn apply_filter<'r>(rows: &'r [Row], filter: &FilterDefinition) -> Vec<&'r Row> {
    filter_refs(rows.iter(), filter)
}

/// Same as [`apply_filter`] over rows that are already borrowed
pub fn filter_refs<'r, I>(rows: I, filter: &FilterDefinition) -> Vec<&'r Row>
where
    I: IntoIterator<Item = &'r Row>,
{
    if filter.is_identity() {
        return rows.into_iter().collect();
    }

    let matchers: Vec<ConditionMatcher<'_>> = filter
        .conditions
        .iter()
        .map(ConditionMatcher::new)
        .collect();

    rows.into_iter()
        .filter(|row| matches_row(row, &matchers, filter.operator))
        .collect()
}

/// Check one row against prepared conditions
fn matches_row(row: &Row, matchers: &[ConditionMatcher<'_>], operator: LogicalOperator) -> bool {
    let mut results = matchers
        .iter()
        .map(|m| m.matches(row.get(&m.condition().column)));

    match operator {
        LogicalOperator::And => results.all(|hit| hit),
        LogicalOperator::Or => results.any(|hit| hit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::{FilterCondition, FilterOperator};

    fn orders() -> Vec<Row> {
        vec![
            Row::new().with("id", 1).with("country", "USA").with("total", 1200.0),
            Row::new().with("id", 2).with("country", "India").with("total", 300.0),
            Row::new().with("id", 3).with("country", "USA").with("total", 80.0),
            Row::new().with("id", 4).with("total", 950.0),
        ]
    }

    fn ids(rows: &[&Row]) -> Vec<f64> {
        rows.iter()
            .filter_map(|r| r.get("id").and_then(|v| v.as_f64()))
            .collect()
    }

    #[test]
    fn test_identity_filter_keeps_everything_in_order() {
        let rows = orders();
        let result = apply_filter(&rows, &FilterDefinition::identity());

        assert_eq!(result.len(), rows.len());
        for (kept, original) in result.iter().zip(rows.iter()) {
            assert!(std::ptr::eq(*kept, original));
        }

        // An OR with nothing to satisfy is still the identity
        let empty_any = FilterDefinition::any(Vec::new());
        assert!(empty_any.is_identity());
        assert_eq!(apply_filter(&rows, &empty_any).len(), rows.len());
    }

    #[test]
    fn test_and_requires_every_condition() {
        let rows = orders();
        let filter = FilterDefinition::all(vec![
            FilterCondition::new("country", FilterOperator::Equals, "usa"),
            FilterCondition::new("total", FilterOperator::Gt, 500),
        ]);

        assert_eq!(ids(&apply_filter(&rows, &filter)), vec![1.0]);
    }

    #[test]
    fn test_or_accepts_any_condition() {
        let rows = orders();
        let filter = FilterDefinition::any(vec![
            FilterCondition::new("country", FilterOperator::Equals, "india"),
            FilterCondition::new("total", FilterOperator::Gt, 900),
        ]);

        assert_eq!(ids(&apply_filter(&rows, &filter)), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn test_unknown_column_never_matches() {
        let rows = orders();
        let filter = FilterDefinition::all(vec![FilterCondition::new(
            "region",
            FilterOperator::Contains,
            "",
        )]);

        assert!(apply_filter(&rows, &filter).is_empty());
    }

    #[test]
    fn test_filter_is_repeatable() {
        let rows = orders();
        let filter = FilterDefinition::all(vec![FilterCondition::new(
            "country",
            FilterOperator::Contains,
            "us",
        )]);

        let first = ids(&apply_filter(&rows, &filter));
        let second = ids(&apply_filter(&rows, &filter));
        assert_eq!(first, second);
        assert_eq!(first, vec![1.0, 3.0]);
    }

    #[test]
    fn test_filter_refs_chains() {
        let rows = orders();
        let usa = FilterDefinition::all(vec![FilterCondition::new(
            "country",
            FilterOperator::Equals,
            "usa",
        )]);
        let small = FilterDefinition::all(vec![FilterCondition::new(
            "total",
            FilterOperator::Lt,
            100,
        )]);

        let step = apply_filter(&rows, &usa);
        assert_eq!(ids(&filter_refs(step, &small)), vec![3.0]);
    }
}
