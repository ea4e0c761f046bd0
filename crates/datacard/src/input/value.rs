//! Dynamically typed scalar values held by records.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::datetime::{format_timestamp, parse_timestamp};

/// A single scalar value of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric value.
    Number(f64),
    /// Free text (anything that is not a number, including booleans).
    Text(String),
    /// Already-typed date/time value.
    Timestamp(NaiveDateTime),
    /// Null or absent value.
    Missing,
}

impl Value {
    /// Returns true if the value is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the value.
    ///
    /// Text that parses as a finite float is coerced; timestamps are not.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Value::Timestamp(_) | Value::Missing => None,
        }
    }

    /// Temporal view of the value. Numbers are never interpreted as dates.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            Value::Text(s) => parse_timestamp(s),
            Value::Number(_) | Value::Missing => None,
        }
    }

    /// Label used when the value is counted as a category.
    pub fn label(&self) -> Option<String> {
        match self {
            Value::Missing => None,
            other => Some(other.to_string()),
        }
    }

    /// Convert a JSON value into a record scalar.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Missing),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            nested => Value::Text(nested.to_string()),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Missing
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Timestamp(ts) => f.write_str(&format_timestamp(ts)),
            Value::Missing => Ok(()),
        }
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

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Missing)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts)),
            Value::Missing => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from_json)
    }
}
