//! Application and storage value representations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::quoter::CollectionQuoter;

/// An application-level value held against a column.
///
/// `Null` marks an absent value; the column pipeline treats it as
/// "no value supplied" and runs default resolution against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Double(f64),
    /// UTF-8 text.
    Text(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Structured JSON value.
    Json(serde_json::Value),
    /// A UTC instant.
    DateTime(DateTime<Utc>),
    /// UUID (128-bit identifier).
    Uuid(Uuid),
    /// An unordered collection of unique values.
    Set(Vec<Value>),
    /// An ordered collection of values.
    List(Vec<Value>),
    /// Key/value pairs.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Check whether this is the absent-value marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness used by boolean coercion: null, zero, and empty
    /// collections are false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Double(f) => *f != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::Bytes(b) => !b.is_empty(),
            Value::Json(v) => !v.is_null(),
            Value::DateTime(_) | Value::Uuid(_) => true,
            Value::Set(items) | Value::List(items) => !items.is_empty(),
            Value::Map(pairs) => !pairs.is_empty(),
        }
    }
}

/// A value in its storage representation, ready to be rendered as
/// literal text inside a query statement.
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    /// No value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Double(f64),
    /// UTF-8 text.
    Text(String),
    /// Binary data, rendered as a hex blob literal.
    Bytes(Vec<u8>),
    /// UUID, rendered in hyphenated form.
    Uuid(Uuid),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    /// A converted collection wrapped in its literal renderer.
    Collection(CollectionQuoter),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_marker() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Double(0.0).is_truthy());
        assert!(!Value::Text(String::new()).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());

        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(-3).is_truthy());
        assert!(Value::Text("x".into()).is_truthy());
        assert!(Value::Uuid(Uuid::new_v4()).is_truthy());
    }
}
