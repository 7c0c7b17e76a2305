//! Condition Evaluator
//!
//! Tests one row value against one [`FilterCondition`]. Evaluation is total: absent
//! values, malformed operands, failed numeric coercion and invalid patterns all
//! yield `false` instead of an error.
//!
//! | Operator | Semantics |
//! |----------|-----------|
//! | `equals` | lower-cased text equality |
//! | `contains` | lower-cased substring |
//! | `gt` `lt` `gte` `lte` | numeric comparison, `NaN` never matches |
//! | `in` | lower-cased membership in a list |
//! | `between` | inclusive numeric range over a `[low, high]` pair |
//! | `regex` | case-insensitive pattern over the lower-cased text |

use crate::data::Value;
use crate::query::ast::{FilterCondition, FilterOperator, FilterValue};
use regex::{Regex, RegexBuilder};

/// Evaluate a condition against a single value
///
/// `None` (missing field) and `Value::Null` never match, whatever the operator.
pub fn evaluate(value: Option<&Value>, condition: &FilterCondition) -> bool {
    ConditionMatcher::new(condition).matches(value)
}

/// A condition with its operand prepared once for repeated evaluation
///
/// The filter engine builds one matcher per condition so that lower-casing,
/// numeric coercion and regex compilation happen once per query rather than once
/// per row.
#[derive(Debug, Clone)]
pub struct ConditionMatcher<'a> {
    condition: &'a FilterCondition,
    operand: Operand,
}

#[derive(Debug, Clone)]
enum Operand {
    Text(String),
    Number(f64),
    Set(Vec<String>),
    Range(f64, f64),
    Pattern(Regex),
    /// Operand could not be prepared; the condition never matches
    Invalid,
}

impl<'a> ConditionMatcher<'a> {
    pub fn new(condition: &'a FilterCondition) -> Self {
        let operand = prepare_operand(condition.operator, &condition.value);
        Self { condition, operand }
    }

    /// The condition this matcher was built from
    pub fn condition(&self) -> &FilterCondition {
        self.condition
    }

    /// Test a row value
    pub fn matches(&self, value: Option<&Value>) -> bool {
        let value = match value {
            None | Some(Value::Null) => return false,
            Some(v) => v,
        };

        match (self.condition.operator, &self.operand) {
            (FilterOperator::Equals, Operand::Text(expected)) => lowered(value) == *expected,
            (FilterOperator::Contains, Operand::Text(needle)) => {
                lowered(value).contains(needle.as_str())
            }
            (FilterOperator::Gt, Operand::Number(n)) => value.to_number() > *n,
            (FilterOperator::Lt, Operand::Number(n)) => value.to_number() < *n,
            (FilterOperator::Gte, Operand::Number(n)) => value.to_number() >= *n,
            (FilterOperator::Lte, Operand::Number(n)) => value.to_number() <= *n,
            (FilterOperator::In, Operand::Set(options)) => {
                let text = lowered(value);
                options.iter().any(|o| *o == text)
            }
            (FilterOperator::Between, Operand::Range(low, high)) => {
                let n = value.to_number();
                n >= *low && n <= *high
            }
            (FilterOperator::Regex, Operand::Pattern(re)) => re.is_match(&lowered(value)),
            _ => false,
        }
    }
}

fn lowered(value: &Value) -> String {
    value.to_string().to_lowercase()
}

fn prepare_operand(operator: FilterOperator, value: &FilterValue) -> Operand {
    match operator {
        FilterOperator::Equals | FilterOperator::Contains => {
            Operand::Text(value.to_text().to_lowercase())
        }
        FilterOperator::Gt | FilterOperator::Lt | FilterOperator::Gte | FilterOperator::Lte => {
            Operand::Number(value.to_number())
        }
        FilterOperator::In => match value.as_list() {
            Some(items) => Operand::Set(
                items
                    .iter()
                    .map(|v| v.to_string().to_lowercase())
                    .collect(),
            ),
            None => Operand::Invalid,
        },
        FilterOperator::Between => match value.as_list() {
            Some([low, high]) => Operand::Range(low.to_number(), high.to_number()),
            _ => Operand::Invalid,
        },
        FilterOperator::Regex => {
            match RegexBuilder::new(&value.to_text())
                .case_insensitive(true)
                .build()
            {
                Ok(re) => Operand::Pattern(re),
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring invalid regex condition");
                    Operand::Invalid
                }
            }
        }
    }
}
