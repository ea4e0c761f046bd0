//! Record batches and columnar projection.

use chrono::NaiveDateTime;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{DataCardError, Result};
use super::value::Value;

/// A single record: field name to scalar value.
pub type Record = IndexMap<String, Value>;

/// Storage type of a field, derived from the values it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
    /// Every non-missing value is a number.
    Numeric,
    /// Every non-missing value is a timestamp.
    Timestamp,
    /// Text, mixed values, or nothing but missing values.
    Untyped,
}

/// An ordered batch of records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Build a dataset from JSON records.
    ///
    /// Every element must be a JSON object; anything else is rejected.
    pub fn from_json_records(values: Vec<serde_json::Value>) -> Result<Self> {
        let records = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                serde_json::Value::Object(map) => Ok(map
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect()),
                other => Err(DataCardError::InvalidRecord {
                    index,
                    message: format!("expected an object, found {}", json_kind(&other)),
                }),
            })
            .collect::<Result<Vec<Record>>>()?;
        Ok(Self { records })
    }

    /// All records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Union of field names in first-seen order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: IndexSet<&str> = IndexSet::new();
        for record in &self.records {
            for key in record.keys() {
                names.insert(key.as_str());
            }
        }
        names.into_iter().collect()
    }

    /// Returns true if any record carries the field.
    pub fn has_field(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.contains_key(name))
    }

    /// Project one field across all records. Absent keys read as missing.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (usize, &'a Value)> + 'a {
        static MISSING: Value = Value::Missing;
        self.records
            .iter()
            .enumerate()
            .map(move |(idx, record)| (idx, record.get(name).unwrap_or(&MISSING)))
    }

    /// Non-missing values of a field with their record index.
    pub fn present<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (usize, &'a Value)> + 'a {
        self.column(name).filter(|(_, v)| !v.is_missing())
    }

    /// Numeric projection: `(record_index, value)` for every value with a numeric view.
    pub fn numeric_column(&self, name: &str) -> Vec<(usize, f64)> {
        self.present(name)
            .filter_map(|(idx, v)| v.as_number().map(|n| (idx, n)))
            .collect()
    }

    /// Temporal projection: every value of the field that parses as a timestamp.
    pub fn temporal_column(&self, name: &str) -> Vec<NaiveDateTime> {
        self.present(name).filter_map(|(_, v)| v.as_timestamp()).collect()
    }

    /// Category labels of every non-missing value of the field.
    pub fn label_column(&self, name: &str) -> Vec<String> {
        self.present(name).filter_map(|(_, v)| v.label()).collect()
    }

    /// Storage type of a field.
    pub fn declared_type(&self, name: &str) -> DeclaredType {
        let mut numbers = 0usize;
        let mut timestamps = 0usize;
        let mut others = 0usize;

        for (_, value) in self.present(name) {
            match value {
                Value::Number(_) => numbers += 1,
                Value::Timestamp(_) => timestamps += 1,
                _ => others += 1,
            }
        }

        match (numbers, timestamps, others) {
            (n, 0, 0) if n > 0 => DeclaredType::Numeric,
            (0, t, 0) if t > 0 => DeclaredType::Timestamp,
            _ => DeclaredType::Untyped,
        }
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(values: serde_json::Value) -> Dataset {
        let serde_json::Value::Array(items) = values else {
            panic!("expected array");
        };
        Dataset::from_json_records(items).unwrap()
    }

    #[test]
    fn test_field_names_union_in_first_seen_order() {
        let ds = dataset(json!([{"a": 1, "b": 2}, {"c": 3, "a": 4}]));
        assert_eq!(ds.field_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_absent_keys_are_missing() {
        let ds = dataset(json!([{"a": 1}, {"b": 2}, {"a": null}]));
        let col: Vec<_> = ds.column("a").map(|(_, v)| v.clone()).collect();
        assert_eq!(col, vec![Value::Number(1.0), Value::Missing, Value::Missing]);
        assert_eq!(ds.present("a").count(), 1);
    }

    #[test]
    fn test_numeric_column_keeps_record_index() {
        let ds = dataset(json!([{"x": 1}, {"x": null}, {"x": 3}]));
        assert_eq!(ds.numeric_column("x"), vec![(0, 1.0), (2, 3.0)]);
    }

    #[test]
    fn test_temporal_and_label_projections() {
        let ds = dataset(json!([
            {"t": "2024-01-02", "c": "x"},
            {"t": "not a date", "c": 10},
            {"t": 20240102, "c": null}
        ]));
        assert_eq!(ds.temporal_column("t").len(), 1);
        assert_eq!(ds.label_column("c"), vec!["x", "10"]);
    }

    #[test]
    fn test_declared_type() {
        let ds = dataset(json!([
            {"n": 1, "s": "a", "m": 1, "e": null},
            {"n": 2.5, "s": "b", "m": "x", "e": null}
        ]));
        assert_eq!(ds.declared_type("n"), DeclaredType::Numeric);
        assert_eq!(ds.declared_type("s"), DeclaredType::Untyped);
        assert_eq!(ds.declared_type("m"), DeclaredType::Untyped);
        assert_eq!(ds.declared_type("e"), DeclaredType::Untyped);
    }

    #[test]
    fn test_rejects_non_object_records() {
        let err = Dataset::from_json_records(vec![json!({"a": 1}), json!(5)]).unwrap_err();
        assert!(matches!(err, DataCardError::InvalidRecord { index: 1, .. }));
    }
}
