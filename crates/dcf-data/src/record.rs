//! Raw statement records.
//!
//! A statement record is whatever the financial-data provider returned for one
//! period: a JSON object of field name to value. Records assembled by
//! concatenating several provider rows (balance sheet, share float, enterprise
//! value) arrive column-oriented, with each field nested one level deep:
//!
//! ```json
//! { "totalCurrentAssets": { "0": 500.0, "1": null, "2": null } }
//! ```
//!
//! Lookups flatten that shape by taking the first non-null leaf.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// The value found for a field in a [`RawStatementRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leaf<'a> {
    /// Field is absent, null, or a nested mapping whose leaves are all null.
    Missing,
    /// A numeric value (JSON number or numeric string).
    Number(f64),
    /// A non-null value that is not numeric.
    Other(&'a Value),
}

impl Leaf<'_> {
    /// Numeric value, if any.
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Missing | Self::Other(_) => None,
        }
    }

    /// Whether the field is absent.
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Untyped mapping of provider field name to value for one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawStatementRecord {
    fields: Map<String, Value>,
}

impl RawStatementRecord {
    /// Create a record from a JSON object.
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Create a record from an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DataError::Parse(format!(
                "statement record must be a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    /// Parse a record from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Read a record from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Whether `key` is present at all (even if null).
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve `key` to its first non-null leaf.
    pub fn lookup(&self, key: &str) -> Leaf<'_> {
        match self.first_leaf(key) {
            None => Leaf::Missing,
            Some(value) => match value {
                Value::Number(n) => n.as_f64().map_or(Leaf::Other(value), Leaf::Number),
                Value::String(s) => s.trim().parse::<f64>().map_or(Leaf::Other(value), Leaf::Number),
                _ => Leaf::Other(value),
            },
        }
    }

    /// First non-null numeric leaf for `key`.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.lookup(key).as_number()
    }

    /// First non-null string leaf for `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.first_leaf(key).and_then(Value::as_str)
    }

    fn first_leaf(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::Object(nested) => {
                // Row keys are stringified indices; order them numerically so
                // "10" does not sort before "2".
                let mut entries: Vec<(&String, &Value)> = nested.iter().collect();
                entries.sort_by_key(|(k, _)| (k.parse::<u64>().unwrap_or(u64::MAX), k.as_str()));
                entries
                    .into_iter()
                    .map(|(_, v)| v)
                    .find(|v| !v.is_null())
            }
            value => Some(value),
        }
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_number() {
        let record = RawStatementRecord::default().with("ebitda", 100.0);
        assert_eq!(record.number("ebitda"), Some(100.0));
        assert_eq!(record.lookup("revenue"), Leaf::Missing);
    }

    #[test]
    fn test_nested_first_non_null_leaf() {
        let record = RawStatementRecord::from_value(json!({
            "outstandingShares": { "0": null, "1": 50.0, "2": null },
            "marketCap": { "0": null, "1": null, "2": 1000.0 },
        }))
        .unwrap();

        assert_eq!(record.number("outstandingShares"), Some(50.0));
        assert_eq!(record.number("marketCap"), Some(1000.0));
    }

    #[test]
    fn test_nested_all_null_is_missing() {
        let record = RawStatementRecord::from_value(json!({
            "netDebt": { "0": null, "1": null },
            "beta": null,
        }))
        .unwrap();

        assert!(record.lookup("netDebt").is_missing());
        assert!(record.lookup("beta").is_missing());
        assert!(record.contains("beta"));
    }

    #[test]
    fn test_row_keys_ordered_numerically() {
        let record = RawStatementRecord::from_value(json!({
            "cash": { "10": 7.0, "2": 3.0 },
        }))
        .unwrap();

        assert_eq!(record.number("cash"), Some(3.0));
    }

    #[test]
    fn test_numeric_string_and_non_numeric() {
        let record = RawStatementRecord::default()
            .with("beta", "1.25")
            .with("symbol", "AAPL")
            .with("flag", true);

        assert_eq!(record.number("beta"), Some(1.25));
        assert!(matches!(record.lookup("symbol"), Leaf::Other(_)));
        assert!(matches!(record.lookup("flag"), Leaf::Other(_)));
        assert_eq!(record.text("symbol"), Some("AAPL"));
    }

    #[test]
    fn test_rejects_non_object() {
        let result = RawStatementRecord::from_value(json!([1, 2, 3]));
        assert!(matches!(result, Err(DataError::Parse(_))));
    }
}
