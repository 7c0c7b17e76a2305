//! Insight Engine
//!
//! Generates descriptive insights about a dataset with local, rule-based analysis:
//! column statistics, high outliers, dominant categorical values and data-volume
//! recommendations.

use crate::data::{format_number, ColumnSchema, ColumnType, Row, Schema, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;

/// Categories analysed when the caller does not choose
pub const DEFAULT_CATEGORIES: &[InsightCategory] = &[
    InsightCategory::Trends,
    InsightCategory::Outliers,
    InsightCategory::Patterns,
    InsightCategory::Recommendations,
    InsightCategory::Summary,
];

/// Rows below this count trigger the "add more data" recommendation
const SMALL_DATASET_ROWS: usize = 10;

/// Standard deviations above the mean that mark a value as an outlier
const OUTLIER_SIGMA: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Trends,
    Outliers,
    Patterns,
    Recommendations,
    Summary,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trends => "trends",
            Self::Outliers => "outliers",
            Self::Patterns => "patterns",
            Self::Recommendations => "recommendations",
            Self::Summary => "summary",
        }
    }
}

impl FromStr for InsightCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trends" => Ok(Self::Trends),
            "outliers" => Ok(Self::Outliers),
            "patterns" => Ok(Self::Patterns),
            "recommendations" => Ok(Self::Recommendations),
            "summary" => Ok(Self::Summary),
            other => Err(format!("unknown insight category '{}'", other)),
        }
    }
}

impl std::fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single generated insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    pub category: InsightCategory,
    pub title: String,
    pub description: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Figures behind the insight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Insight {
    fn new(
        category: InsightCategory,
        title: impl Into<String>,
        description: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            id: format!("insight-{}", uuid::Uuid::new_v4()),
            category,
            title: title.into(),
            description: description.into(),
            confidence,
            data: None,
        }
    }

    fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Analyse `rows` and produce insights for the requested categories
///
/// Insights come out in a fixed order: summary, then trends and outliers per
/// numeric column, then patterns per string column, then recommendations.
pub fn analyze(rows: &[Row], schema: &Schema, categories: &[InsightCategory]) -> Vec<Insight> {
    if rows.is_empty() {
        return vec![Insight::new(
            InsightCategory::Summary,
            "No Data Available",
            "The dataset is empty. Add some data to see insights.",
            1.0,
        )];
    }

    let wants = |category: InsightCategory| categories.contains(&category);
    let mut insights = Vec::new();

    if wants(InsightCategory::Summary) {
        insights.push(
            Insight::new(
                InsightCategory::Summary,
                "Data Overview",
                format!(
                    "Dataset contains {} records with {} columns.",
                    rows.len(),
                    schema.columns.len()
                ),
                1.0,
            )
            .with_data(json!({
                "rowCount": rows.len(),
                "columnCount": schema.columns.len(),
            })),
        );
    }

    for column in schema.columns_of_type(ColumnType::Number) {
        let Some(stats) = ColumnStats::collect(rows, &column.key) else {
            continue;
        };

        if wants(InsightCategory::Trends) {
            insights.push(trend_insight(column, &stats));
        }
        if wants(InsightCategory::Outliers) {
            insights.extend(outlier_insight(rows, column, &stats));
        }
    }

    if wants(InsightCategory::Patterns) {
        for column in schema.columns_of_type(ColumnType::String) {
            insights.extend(pattern_insight(rows, column));
        }
    }

    if wants(InsightCategory::Recommendations) && rows.len() < SMALL_DATASET_ROWS {
        insights.push(Insight::new(
            InsightCategory::Recommendations,
            "Add More Data",
            "Consider adding more records for more accurate insights.",
            0.9,
        ));
    }

    tracing::debug!(
        rows = rows.len(),
        insights = insights.len(),
        "Generated dataset insights"
    );

    insights
}

/// One-line description of a dataset
pub fn summarize(rows: &[Row], schema: &Schema) -> String {
    format!(
        "Dataset contains {} records across {} columns.",
        rows.len(),
        schema.columns.len()
    )
}

/// Summary statistics over the numeric values of one column
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColumnStats {
    count: usize,
    sum: f64,
    mean: f64,
    min: f64,
    max: f64,
    std_dev: f64,
}

impl ColumnStats {
    /// `None` when the column holds no finite numbers
    fn collect(rows: &[Row], key: &str) -> Option<Self> {
        let values: Vec<f64> = rows
            .iter()
            .filter_map(|row| match row.get(key) {
                Some(Value::Number(n)) if n.is_finite() => Some(*n),
                _ => None,
            })
            .collect();

        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let mean = sum / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            sum,
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
        })
    }
}

fn trend_insight(column: &ColumnSchema, stats: &ColumnStats) -> Insight {
    Insight::new(
        InsightCategory::Trends,
        format!("{} Statistics", column.label),
        format!(
            "Average: {:.2}, Range: {} - {}",
            stats.mean,
            format_number(stats.min),
            format_number(stats.max)
        ),
        0.85,
    )
    .with_data(json!({
        "column": column.key,
        "avg": stats.mean,
        "min": stats.min,
        "max": stats.max,
        "sum": stats.sum,
        "count": stats.count,
    }))
}

fn outlier_insight(rows: &[Row], column: &ColumnSchema, stats: &ColumnStats) -> Option<Insight> {
    let threshold = stats.mean + OUTLIER_SIGMA * stats.std_dev;
    let count = rows
        .iter()
        .filter(|row| matches!(row.get(&column.key), Some(Value::Number(n)) if *n > threshold))
        .count();

    if count == 0 {
        return None;
    }

    Some(
        Insight::new(
            InsightCategory::Outliers,
            format!("High {} Values Detected", column.label),
            format!(
                "{} records have {} values above {:.2} (2 standard deviations above average)",
                count, column.label, threshold
            ),
            0.75,
        )
        .with_data(json!({
            "column": column.key,
            "threshold": threshold,
            "count": count,
        })),
    )
}

fn pattern_insight(rows: &[Row], column: &ColumnSchema) -> Option<Insight> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for row in rows {
        let bucket = match row.get(&column.key) {
            Some(value) if !value.is_falsy() => value.to_string(),
            _ => String::new(),
        };
        *counts.entry(bucket).or_insert(0) += 1;
    }

    // First-seen value wins ties
    let mut top: Option<(&String, usize)> = None;
    for (value, &count) in &counts {
        if top.map_or(true, |(_, best)| count > best) {
            top = Some((value, count));
        }
    }
    let (value, count) = top?;

    let percentage = format!("{:.1}", count as f64 / rows.len() as f64 * 100.0);
    Some(
        Insight::new(
            InsightCategory::Patterns,
            format!("{} Distribution", column.label),
            format!(
                "\"{}\" is the most common value ({}% of records)",
                value, percentage
            ),
            0.8,
        )
        .with_data(json!({
            "column": column.key,
            "topValue": value,
            "count": count,
            "percentage": percentage,
        })),
    )
}
