//! Dataset schema
//!
//! A [`Schema`] describes the columns of a dataset (key, type, label, sample values)
//! and is built once per dataset. The query parser matches column names in free text
//! against it, and hosts use it to construct validated conditions and sorts.

use crate::data::error::{SchemaError, SchemaResult};
use crate::data::value::{Row, Value};
use crate::query::{
    FilterCondition, FilterOperator, FilterValue, QueryError, QueryResult, SortDefinition,
    SortOrder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Default number of sample rows and example values captured per schema
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Data type of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Number,
    Date,
    Boolean,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
        }
    }
}

impl FromStr for ColumnType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "text" => Ok(Self::String),
            "number" | "numeric" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "boolean" | "bool" => Ok(Self::Boolean),
            other => Err(SchemaError::UnknownType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A column declaration supplied by the host
///
/// Missing type defaults to `string`, missing label to the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDecl {
    pub key: String,
    #[serde(default, rename = "type")]
    pub column_type: Option<ColumnType>,
    #[serde(default)]
    pub label: Option<String>,
}

impl ColumnDecl {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            column_type: None,
            label: None,
        }
    }

    /// Builder method: set the column type
    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    /// Builder method: set the display label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Parses `key`, `key:type` or `key:type:label`
impl FromStr for ColumnDecl {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let key = parts.next().unwrap_or_default().trim();
        if key.is_empty() {
            return Err(SchemaError::EmptyKey);
        }

        let mut decl = ColumnDecl::new(key);
        if let Some(ty) = parts.next().filter(|t| !t.trim().is_empty()) {
            decl.column_type = Some(ty.trim().parse()?);
        }
        if let Some(label) = parts.next().filter(|l| !l.trim().is_empty()) {
            decl.label = Some(label.trim().to_string());
        }
        Ok(decl)
    }
}

/// Resolved metadata for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub key: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub label: String,
    #[serde(default)]
    pub examples: Vec<Value>,
}

impl ColumnSchema {
    /// Whether `name` (case-insensitive) is this column's key or label
    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.key.to_lowercase() == name || self.label.to_lowercase() == name
    }
}

/// Shape of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub columns: Vec<ColumnSchema>,
    pub row_count: usize,
    #[serde(default)]
    pub sample_rows: Vec<Row>,
}

impl Schema {
    /// Build a schema from rows and optional column declarations
    ///
    /// Without declarations (or with an empty list) the columns are derived from
    /// the first row.
    pub fn build(rows: &[Row], columns: Option<&[ColumnDecl]>) -> SchemaResult<Self> {
        Self::build_with_sample_size(rows, columns, DEFAULT_SAMPLE_SIZE)
    }

    /// Build a schema capturing `sample_size` sample rows and example values
    pub fn build_with_sample_size(
        rows: &[Row],
        columns: Option<&[ColumnDecl]>,
        sample_size: usize,
    ) -> SchemaResult<Self> {
        let decls = match columns {
            Some(decls) if !decls.is_empty() => decls.to_vec(),
            _ => auto_columns(rows),
        };

        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(decls.len());

        for decl in decls {
            if decl.key.is_empty() {
                return Err(SchemaError::EmptyKey);
            }
            if !seen.insert(decl.key.clone()) {
                return Err(SchemaError::DuplicateColumn(decl.key));
            }

            let examples = rows
                .iter()
                .take(sample_size)
                .map(|row| row.get(&decl.key).cloned().unwrap_or(Value::Null))
                .collect();

            resolved.push(ColumnSchema {
                label: decl.label.unwrap_or_else(|| decl.key.clone()),
                column_type: decl.column_type.unwrap_or_default(),
                key: decl.key,
                examples,
            });
        }

        tracing::debug!(
            columns = resolved.len(),
            rows = rows.len(),
            "Built table schema"
        );

        Ok(Self {
            columns: resolved,
            row_count: rows.len(),
            sample_rows: rows.iter().take(sample_size).cloned().collect(),
        })
    }

    /// Find a column by key or label, case-insensitively
    ///
    /// The first column in declared order wins.
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.matches_name(name))
    }

    /// Columns of the given type, in declared order
    pub fn columns_of_type(&self, column_type: ColumnType) -> impl Iterator<Item = &ColumnSchema> {
        self.columns
            .iter()
            .filter(move |c| c.column_type == column_type)
    }

    /// Build a condition whose column and value shape are checked against this schema
    pub fn condition(
        &self,
        column: &str,
        operator: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> QueryResult<FilterCondition> {
        let col = self
            .column(column)
            .ok_or_else(|| QueryError::UnknownColumn(column.to_string()))?;
        let value = value.into();

        match (operator, &value) {
            (FilterOperator::Between, FilterValue::List(items)) if items.len() == 2 => {}
            (FilterOperator::Between, _) => {
                return Err(QueryError::InvalidFilter(format!(
                    "between on '{}' requires a [low, high] pair",
                    col.key
                )));
            }
            (FilterOperator::In, FilterValue::List(_)) => {}
            (FilterOperator::In, _) => {
                return Err(QueryError::InvalidFilter(format!(
                    "in on '{}' requires a list of values",
                    col.key
                )));
            }
            (op, FilterValue::List(_)) => {
                return Err(QueryError::InvalidFilter(format!(
                    "{} on '{}' requires a single value",
                    op, col.key
                )));
            }
            (FilterOperator::Regex, FilterValue::Scalar(pattern)) => {
                regex::RegexBuilder::new(&pattern.to_string())
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| QueryError::InvalidFilter(e.to_string()))?;
            }
            _ => {}
        }

        Ok(FilterCondition::new(col.key.clone(), operator, value))
    }

    /// Build a sort definition on a known column
    pub fn sort(&self, column: &str, order: SortOrder) -> QueryResult<SortDefinition> {
        self.column(column)
            .map(|col| SortDefinition::new(col.key.clone(), order))
            .ok_or_else(|| QueryError::InvalidSort(format!("unknown column '{}'", column)))
    }
}

/// Derive column declarations from the first row's keys
fn auto_columns(rows: &[Row]) -> Vec<ColumnDecl> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    first
        .iter()
        .map(|(key, value)| {
            let column_type = match value {
                Value::Number(_) => ColumnType::Number,
                _ => ColumnType::String,
            };
            ColumnDecl::new(key)
                .column_type(column_type)
                .label(label_from_key(key))
        })
        .collect()
}

/// `orderDate` → `Order Date`
pub fn label_from_key(key: &str) -> String {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut label: String = first.to_uppercase().collect();
    for c in chars {
        if c.is_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label
}
