//! Structured query representation
//!
//! A free-text query is interpreted into a [`ParsedQuery`]: an optional filter
//! (conditions combined with AND/OR), an optional single-column sort and an
//! optional row limit, plus a human-readable explanation.
//!
//! # Example
//!
//! ```text
//! "show orders from usa where total > 500 sort by total desc"
//!   filter: country contains "usa" AND total > 500
//!   sort:   total desc
//! ```

use crate::data::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Explanation used when no clause of a query matched
pub const SHOW_ALL_EXPLANATION: &str = "Showing all results";

/// Comparison operators available in filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    /// Case-insensitive text equality
    Equals,
    /// Case-insensitive substring match
    Contains,
    /// Numeric greater than
    Gt,
    /// Numeric less than
    Lt,
    /// Numeric greater than or equal to
    Gte,
    /// Numeric less than or equal to
    Lte,
    /// Case-insensitive membership in a list
    In,
    /// Inclusive numeric range `[low, high]`
    Between,
    /// Case-insensitive regular expression
    Regex,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::In => "in",
            Self::Between => "between",
            Self::Regex => "regex",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "equals" | "eq" | "=" | "==" => Some(Self::Equals),
            "contains" | "like" => Some(Self::Contains),
            "gt" | ">" => Some(Self::Gt),
            "lt" | "<" => Some(Self::Lt),
            "gte" | ">=" => Some(Self::Gte),
            "lte" | "<=" => Some(Self::Lte),
            "in" => Some(Self::In),
            "between" => Some(Self::Between),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }

    /// Whether both sides are coerced to numbers before comparing
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Gt | Self::Lt | Self::Gte | Self::Lte | Self::Between
        )
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Right-hand side of a condition: a single value or a list
///
/// `between` expects a two-element list, `in` any list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(Value),
    List(Vec<Value>),
}

impl FilterValue {
    /// List elements, if this is a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            Self::Scalar(_) => None,
        }
    }

    /// Script-style stringification (lists join with `,`)
    pub fn to_text(&self) -> String {
        match self {
            Self::Scalar(v) => v.to_string(),
            Self::List(items) => items
                .iter()
                .map(|v| match v {
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Script-style numeric coercion (lists are `NaN`)
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Scalar(v) => v.to_number(),
            Self::List(_) => f64::NAN,
        }
    }
}

impl From<Value> for FilterValue {
    fn from(v: Value) -> Self {
        Self::Scalar(v)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Scalar(Value::from(s))
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Scalar(Value::from(s))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Scalar(Value::Number(n))
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Scalar(Value::from(n))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Scalar(Value::Bool(b))
    }
}

impl From<Vec<Value>> for FilterValue {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for FilterValue {
    fn from((low, high): (A, B)) -> Self {
        Self::List(vec![low.into(), high.into()])
    }
}

/// A single comparison test against one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Column key
    pub column: String,
    /// Comparison operator
    pub operator: FilterOperator,
    /// Value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn new(
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }
}

/// How the conditions of a filter combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    /// Every condition must hold
    #[default]
    And,
    /// At least one condition must hold
    Or,
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// Conditions combined with AND/OR
///
/// An empty condition list matches every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub conditions: Vec<FilterCondition>,
    pub operator: LogicalOperator,
}

impl FilterDefinition {
    /// The identity filter
    pub fn identity() -> Self {
        Self::default()
    }

    /// All conditions must match
    pub fn all(conditions: Vec<FilterCondition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::And,
        }
    }

    /// Any condition may match
    pub fn any(conditions: Vec<FilterCondition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::Or,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Apply this direction to an ascending ordering
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Single-column sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDefinition {
    pub column: String,
    pub order: SortOrder,
}

impl SortDefinition {
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Desc)
    }
}

/// The interpretation of one free-text query
///
/// Created fresh per query and superseded, never mutated, by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Original query text
    pub query: String,
    /// Filter to apply; `None` matches every row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterDefinition>,
    /// Sort to apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDefinition>,
    /// Maximum number of rows to keep after sorting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Human-readable summary of what matched
    pub explanation: String,
}

impl ParsedQuery {
    /// A query that leaves the dataset untouched
    pub fn show_all(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filter: None,
            sort: None,
            limit: None,
            explanation: SHOW_ALL_EXPLANATION.to_string(),
        }
    }

    /// Number of filter conditions
    pub fn condition_count(&self) -> usize {
        self.filter.as_ref().map_or(0, |f| f.conditions.len())
    }
}
