//! Row values
//!
//! A [`Row`] maps column keys to tagged scalar [`Value`]s. Rows keep the key order
//! they were loaded with so that schema auto-derivation follows the source document.

use crate::data::number::{format_number, parse_number};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Largest integer a double can hold exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean flag
    Bool(bool),
    /// Numeric value (integers are stored as doubles)
    Number(f64),
    /// Text, including date-like strings
    String(String),
}

impl Value {
    /// Returns `true` for `Value::Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the text content of a `String` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric content of a `Number` value (no coercion)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Coerce to a number the way script `Number(x)` does
    ///
    /// Never fails: anything unparseable becomes `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
        }
    }

    /// Whether the value is "falsy" (null, false, 0, NaN or empty text)
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => *n == 0.0 || n.is_nan(),
            Value::String(s) => s.is_empty(),
        }
    }

    /// Convert a JSON document value into a cell value
    ///
    /// Nested arrays and objects are kept as their compact JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            nested => Value::String(nested.to_string()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A dataset record: ordered column key → value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set a field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Get a field by its exact key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a row from a JSON object; returns `None` for non-objects
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_script_strings() {
        assert_eq!(Value::Number(500.0).to_string(), "500");
        assert_eq!(Value::Number(12.5).to_string(), "12.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("USA").to_string(), "USA");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::from("  250 ").to_number(), 250.0);
        assert_eq!(Value::Bool(true).to_number(), 1.0);
        assert_eq!(Value::Null.to_number(), 0.0);
        assert!(Value::from("n/a").to_number().is_nan());
    }

    #[test]
    fn test_falsy() {
        assert!(Value::Null.is_falsy());
        assert!(Value::Number(0.0).is_falsy());
        assert!(Value::from("").is_falsy());
        assert!(!Value::from("0").is_falsy());
        assert!(!Value::Number(3.0).is_falsy());
    }

    #[test]
    fn test_row_keeps_insertion_order() {
        let row = Row::new()
            .with("id", 1)
            .with("customer", "Acme")
            .with("total", 99.5);

        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["id", "customer", "total"]);
        assert_eq!(row.get("customer"), Some(&Value::from("Acme")));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_row_from_json() {
        let json = serde_json::json!({"id": 7, "tags": ["a", "b"], "note": null});
        let row = Row::from_json(json).unwrap();

        assert_eq!(row.get("id"), Some(&Value::Number(7.0)));
        assert_eq!(row.get("tags"), Some(&Value::from(r#"["a","b"]"#)));
        assert_eq!(row.get("note"), Some(&Value::Null));

        assert!(Row::from_json(serde_json::json!([1, 2])).is_none());
    }

    #[test]
    fn test_serialize_integral_numbers_as_integers() {
        let row = Row::new().with("total", 500.0).with("rate", 0.25);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"total":500,"rate":0.25}"#);
    }

    #[test]
    fn test_deserialize_row() {
        let row: Row = serde_json::from_str(r#"{"a": 1, "b": "x", "c": true, "d": null}"#).unwrap();
        assert_eq!(row.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(row.get("b"), Some(&Value::from("x")));
        assert_eq!(row.get("c"), Some(&Value::Bool(true)));
        assert_eq!(row.get("d"), Some(&Value::Null));
    }
}
