//! Data Transformations
//!
//! Column and row rewrites proposed by a [`TransformResponder`]. A transformation
//! never edits rows in place: it yields [`TransformationChange`]s, which can be held
//! as pending changes for review and applied later with [`apply_changes`].

use super::agents::interpolate_template;
use crate::data::{Row, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Most distinct column values sent for mapping in one column transformation
pub const MAX_UNIQUE_VALUES: usize = 50;

/// Transformation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Unknown transformation: {0}")]
    UnknownTransformation(String),

    #[error("Transformation '{0}' needs a target column")]
    MissingColumn(String),

    #[error("Transformation '{transformation}' failed: {message}")]
    Responder {
        transformation: String,
        message: String,
    },
}

/// What a transformation is meant to operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformScope {
    #[default]
    Column,
    Row,
    Selection,
    Table,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub scope: TransformScope,
    /// Column used when a column transformation is run without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_column: Option<String>,
    /// Prompt with `{{column}}` placeholders
    pub prompt_template: String,
    /// Hold the produced changes as pending for review
    #[serde(default)]
    pub preview: bool,
}

impl Transformation {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        prompt_template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            scope: TransformScope::Column,
            target_column: None,
            prompt_template: prompt_template.into(),
            preview: false,
        }
    }

    pub fn with_scope(mut self, scope: TransformScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

/// One proposed cell edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationChange {
    pub row_index: usize,
    pub column: String,
    pub old_value: Value,
    pub new_value: Value,
}

/// Produces new values for a transformation
///
/// Implement this to route transformations to a language-model provider.
pub trait TransformResponder: Send + Sync {
    /// Map each distinct column value to its replacement
    ///
    /// Values left out of the mapping are not changed.
    fn map_values(
        &self,
        transformation: &Transformation,
        column: &str,
        values: &[Value],
    ) -> Result<Vec<(Value, Value)>, TransformError>;

    /// New field values for one row, given the filled-in prompt
    fn rewrite_row(
        &self,
        prompt: &str,
        transformation: &Transformation,
        row: &Row,
    ) -> Result<Vec<(String, Value)>, TransformError>;
}

/// Offline mappings chosen by the transformation's id
///
/// `standardize`/`normalize` capitalise text values, `categorize`/`classify` put
/// every value in `Category A`, anything else keeps values as they are. Rows are
/// never rewritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTransformer;

impl TransformResponder for LocalTransformer {
    fn map_values(
        &self,
        transformation: &Transformation,
        _column: &str,
        values: &[Value],
    ) -> Result<Vec<(Value, Value)>, TransformError> {
        let id = transformation.id.as_str();
        let standardize = id.contains("standardize") || id.contains("normalize");

        let mapping: Vec<(Value, Value)> = if standardize {
            values
                .iter()
                .filter_map(|value| {
                    let text = value.as_str()?;
                    Some((value.clone(), Value::String(capitalize(text))))
                })
                .collect()
        } else if id.contains("categorize") || id.contains("classify") {
            values
                .iter()
                .map(|value| (value.clone(), Value::from("Category A")))
                .collect()
        } else {
            values.iter().map(|value| (value.clone(), value.clone())).collect()
        };

        Ok(mapping)
    }

    fn rewrite_row(
        &self,
        prompt: &str,
        transformation: &Transformation,
        _row: &Row,
    ) -> Result<Vec<(String, Value)>, TransformError> {
        tracing::debug!(
            transformation = %transformation.id,
            prompt = %prompt,
            "Row transformation prompt"
        );
        Ok(Vec::new())
    }
}

/// Upper-case the first character and lower-case the rest
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Set-membership equality: `NaN` equals itself and `-0` equals `0`
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => a == b,
    }
}

/// Registry of transformations plus the changes awaiting review
pub struct Transformer<R = LocalTransformer> {
    transformations: Vec<Transformation>,
    pending: Vec<TransformationChange>,
    responder: R,
}

impl Transformer<LocalTransformer> {
    pub fn new(transformations: Vec<Transformation>) -> Self {
        Self::with_responder(transformations, LocalTransformer)
    }
}

impl<R: TransformResponder> Transformer<R> {
    pub fn with_responder(transformations: Vec<Transformation>, responder: R) -> Self {
        Self {
            transformations,
            pending: Vec::new(),
            responder,
        }
    }

    pub fn transformations(&self) -> &[Transformation] {
        &self.transformations
    }

    pub fn transformation(&self, id: &str) -> Option<&Transformation> {
        self.transformations.iter().find(|t| t.id == id)
    }

    fn lookup(&self, id: &str) -> Result<&Transformation, TransformError> {
        self.transformation(id)
            .ok_or_else(|| TransformError::UnknownTransformation(id.to_string()))
    }

    /// Run a transformation over one column of `rows`
    ///
    /// `column` overrides the transformation's target column. Up to
    /// [`MAX_UNIQUE_VALUES`] distinct values (first-seen order, missing fields as
    /// null) are mapped; a change is produced for every row whose value maps to
    /// something different.
    pub fn transform_column(
        &mut self,
        id: &str,
        rows: &[Row],
        column: Option<&str>,
    ) -> Result<Vec<TransformationChange>, TransformError> {
        let transformation = self.lookup(id)?;
        let column = column
            .map(str::to_string)
            .or_else(|| transformation.target_column.clone())
            .ok_or_else(|| TransformError::MissingColumn(id.to_string()))?;

        let cell = |row: &Row| row.get(&column).cloned().unwrap_or(Value::Null);

        let mut unique: Vec<Value> = Vec::new();
        for value in rows.iter().map(cell) {
            if unique.len() == MAX_UNIQUE_VALUES {
                break;
            }
            if !unique.iter().any(|seen| same_value(seen, &value)) {
                unique.push(value);
            }
        }

        let mapping = self
            .responder
            .map_values(transformation, &column, &unique)?;

        let changes: Vec<TransformationChange> = rows
            .iter()
            .enumerate()
            .filter_map(|(row_index, row)| {
                let old_value = cell(row);
                let (_, new_value) = mapping
                    .iter()
                    .find(|(from, _)| same_value(from, &old_value))?;
                (!same_value(new_value, &old_value)).then(|| TransformationChange {
                    row_index,
                    column: column.clone(),
                    old_value,
                    new_value: new_value.clone(),
                })
            })
            .collect();

        tracing::debug!(
            transformation = %id,
            column = %column,
            distinct = unique.len(),
            changes = changes.len(),
            "Transformed column"
        );

        if transformation.preview {
            self.pending = changes.clone();
        }
        Ok(changes)
    }

    /// Run a transformation on a single row
    ///
    /// The row fills the prompt template; fields the responder returns with a
    /// different value become changes at `row_index`.
    pub fn transform_row(
        &mut self,
        id: &str,
        row: &Row,
        row_index: usize,
    ) -> Result<Vec<TransformationChange>, TransformError> {
        let transformation = self.lookup(id)?;
        let prompt = interpolate_template(&transformation.prompt_template, row);

        let changes: Vec<TransformationChange> = self
            .responder
            .rewrite_row(&prompt, transformation, row)?
            .into_iter()
            .filter_map(|(column, new_value)| {
                let old_value = row.get(&column).cloned().unwrap_or(Value::Null);
                (!same_value(&new_value, &old_value)).then_some(TransformationChange {
                    row_index,
                    column,
                    old_value,
                    new_value,
                })
            })
            .collect();

        if transformation.preview {
            self.pending = changes.clone();
        }
        Ok(changes)
    }

    /// Changes held back by the last preview transformation
    pub fn pending_changes(&self) -> &[TransformationChange] {
        &self.pending
    }

    pub fn clear_pending_changes(&mut self) {
        self.pending.clear();
    }
}

/// A copy of `rows` with `changes` applied in order
///
/// Changes pointing past the end of `rows` are skipped.
pub fn apply_changes(rows: &[Row], changes: &[TransformationChange]) -> Vec<Row> {
    let mut updated = rows.to_vec();
    for change in changes {
        match updated.get_mut(change.row_index) {
            Some(row) => row.insert(change.column.clone(), change.new_value.clone()),
            None => tracing::warn!(row = change.row_index, "Skipping change for missing row"),
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers() -> Vec<Row> {
        vec![
            Row::new().with("id", 1).with("name", "acme CORP").with("tier", "gold"),
            Row::new().with("id", 2).with("name", "Globex").with("tier", "silver"),
            Row::new().with("id", 3).with("name", "acme CORP").with("tier", Value::Null),
        ]
    }

    fn transformations() -> Vec<Transformation> {
        vec![
            Transformation::new("standardize-names", "Standardize", "Clean {{name}}")
                .with_target_column("name")
                .with_preview(true),
            Transformation::new("categorize", "Categorize", "Categorize {{tier}}"),
            Transformation::new("translate", "Translate", "Translate {{name}}"),
            Transformation::new("enrich", "Enrich", "Enrich {{name}}")
                .with_scope(TransformScope::Row),
        ]
    }

    struct Shouting;

    impl TransformResponder for Shouting {
        fn map_values(
            &self,
            _transformation: &Transformation,
            _column: &str,
            values: &[Value],
        ) -> Result<Vec<(Value, Value)>, TransformError> {
            Ok(values
                .iter()
                .map(|v| (v.clone(), Value::String(v.to_string().to_uppercase())))
                .collect())
        }

        fn rewrite_row(
            &self,
            prompt: &str,
            _transformation: &Transformation,
            row: &Row,
        ) -> Result<Vec<(String, Value)>, TransformError> {
            Ok(vec![
                ("name".to_string(), Value::from(prompt)),
                ("id".to_string(), row.get("id").cloned().unwrap_or(Value::Null)),
            ])
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("acme CORP"), "Acme corp");
        assert_eq!(capitalize("éCOLE"), "École");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_standardize_changes_only_differing_values() {
        let mut transformer = Transformer::new(transformations());
        let changes = transformer
            .transform_column("standardize-names", &customers(), None)
            .unwrap();

        assert_eq!(
            changes,
            vec![
                TransformationChange {
                    row_index: 0,
                    column: "name".to_string(),
                    old_value: Value::from("acme CORP"),
                    new_value: Value::from("Acme corp"),
                },
                TransformationChange {
                    row_index: 2,
                    column: "name".to_string(),
                    old_value: Value::from("acme CORP"),
                    new_value: Value::from("Acme corp"),
                },
            ]
        );
    }

    #[test]
    fn test_standardize_skips_non_text() {
        let mut transformer = Transformer::new(transformations());
        let changes = transformer
            .transform_column("standardize-names", &customers(), Some("id"))
            .unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_categorize_maps_every_value() {
        let mut transformer = Transformer::new(transformations());
        let changes = transformer
            .transform_column("categorize", &customers(), Some("tier"))
            .unwrap();

        assert_eq!(changes.len(), 3);
        assert!(changes
            .iter()
            .all(|c| c.new_value == Value::from("Category A")));
        assert_eq!(changes[2].old_value, Value::Null);
    }

    #[test]
    fn test_translate_and_unknown_ids_change_nothing() {
        let mut transformer = Transformer::new(transformations());
        assert!(transformer
            .transform_column("translate", &customers(), Some("name"))
            .unwrap()
            .is_empty());
        assert!(transformer
            .transform_column("enrich", &customers(), Some("name"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_distinct_values_are_capped() {
        let rows: Vec<Row> = (0..60)
            .map(|i| Row::new().with("code", format!("item-{}", i)))
            .collect();

        let mut transformer = Transformer::with_responder(transformations(), Shouting);
        let changes = transformer
            .transform_column("translate", &rows, Some("code"))
            .unwrap();

        assert_eq!(changes.len(), MAX_UNIQUE_VALUES);
        assert_eq!(changes.last().map(|c| c.row_index), Some(49));
    }

    #[test]
    fn test_preview_holds_pending_changes() {
        let mut transformer = Transformer::new(transformations());

        transformer
            .transform_column("standardize-names", &customers(), None)
            .unwrap();
        assert_eq!(transformer.pending_changes().len(), 2);

        // Non-preview runs leave the pending list alone
        transformer
            .transform_column("categorize", &customers(), Some("tier"))
            .unwrap();
        assert_eq!(transformer.pending_changes().len(), 2);

        transformer.clear_pending_changes();
        assert!(transformer.pending_changes().is_empty());
    }

    #[test]
    fn test_column_required() {
        let mut transformer = Transformer::new(transformations());

        assert_eq!(
            transformer.transform_column("categorize", &customers(), None),
            Err(TransformError::MissingColumn("categorize".to_string()))
        );
        assert_eq!(
            transformer.transform_column("dedupe", &customers(), Some("name")),
            Err(TransformError::UnknownTransformation("dedupe".to_string()))
        );
    }

    #[test]
    fn test_local_row_transformation_changes_nothing() {
        let mut transformer = Transformer::new(transformations());
        let changes = transformer.transform_row("enrich", &customers()[0], 0).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_row_transformation_uses_prompt() {
        let mut transformer = Transformer::with_responder(transformations(), Shouting);
        let changes = transformer.transform_row("enrich", &customers()[1], 1).unwrap();

        assert_eq!(
            changes,
            vec![TransformationChange {
                row_index: 1,
                column: "name".to_string(),
                old_value: Value::from("Globex"),
                new_value: Value::from("Enrich Globex"),
            }]
        );
    }

    #[test]
    fn test_apply_changes_copies_rows() {
        let rows = customers();
        let changes = vec![
            TransformationChange {
                row_index: 1,
                column: "tier".to_string(),
                old_value: Value::from("silver"),
                new_value: Value::from("platinum"),
            },
            TransformationChange {
                row_index: 9,
                column: "tier".to_string(),
                old_value: Value::Null,
                new_value: Value::from("ghost"),
            },
        ];

        let updated = apply_changes(&rows, &changes);

        assert_eq!(updated.len(), 3);
        assert_eq!(updated[1].get("tier"), Some(&Value::from("platinum")));
        assert_eq!(rows[1].get("tier"), Some(&Value::from("silver")));
        assert_eq!(updated[0], rows[0]);
    }

    #[test]
    fn test_change_json_shape() {
        let change = TransformationChange {
            row_index: 0,
            column: "name".to_string(),
            old_value: Value::from("a"),
            new_value: Value::from("A"),
        };

        assert_eq!(
            serde_json::to_string(&change).unwrap(),
            r#"{"rowIndex":0,"column":"name","oldValue":"a","newValue":"A"}"#
        );
    }
}
