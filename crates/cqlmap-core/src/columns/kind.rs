//! The closed set of column type variants.
//!
//! Each variant carries its type-specific configuration; the shared
//! validation pipeline (default resolution, required check) lives on
//! [`Column`](super::Column) and runs before any check defined here.

use std::sync::OnceLock;

use chrono::DateTime;
use regex::Regex;

use super::column::Column;
use super::container;
use super::value::{DbValue, Value};
use crate::error::Error;

/// Storage type variants a column can be declared with.
#[derive(Debug, Clone)]
pub enum ColumnKind {
    /// Binary data (`blob`).
    Bytes,
    /// ASCII text (`ascii`).
    Ascii,
    /// UTF-8 text (`text`) with optional length bounds.
    Text {
        /// Minimum length in characters. When unset and the column is
        /// required, an effective minimum of 1 applies.
        min_length: Option<usize>,
        /// Maximum length in characters.
        max_length: Option<usize>,
    },
    /// JSON document stored as compact text (`text`).
    Json,
    /// 64-bit signed integer (`int`).
    Integer,
    /// UTC instant stored as epoch milliseconds (`timestamp`).
    DateTime,
    /// Random identifier (`uuid`).
    Uuid,
    /// Time-ordered identifier (`timeuuid`).
    TimeUuid,
    /// Boolean (`boolean`).
    Boolean,
    /// Floating point; `double` or `float` by precision flag.
    Float {
        /// Store as 64-bit `double` rather than 32-bit `float`.
        double_precision: bool,
    },
    /// Fixed-precision decimal (`decimal`), passed through unconverted.
    Decimal,
    /// Unordered unique collection (`set<T>`).
    Set {
        /// Element descriptor used to validate and convert members.
        element: Box<Column>,
        /// Reject ordered input instead of coercing it.
        strict: bool,
    },
    /// Ordered collection (`list<T>`).
    List {
        /// Element descriptor used to validate and convert members.
        element: Box<Column>,
    },
    /// Key/value collection (`map<K, V>`).
    Map {
        /// Descriptor for keys.
        key: Box<Column>,
        /// Descriptor for values.
        value: Box<Column>,
    },
}

fn uuid_pattern() -> &'static Regex {
    static UUID_RE: OnceLock<Regex> = OnceLock::new();
    UUID_RE.get_or_init(|| {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .expect("uuid pattern is valid")
    })
}

impl ColumnKind {
    /// The storage type tag, with container templates expanded.
    pub fn db_type(&self) -> String {
        match self {
            ColumnKind::Bytes => "blob".to_string(),
            ColumnKind::Ascii => "ascii".to_string(),
            ColumnKind::Text { .. } | ColumnKind::Json => "text".to_string(),
            ColumnKind::Integer => "int".to_string(),
            ColumnKind::DateTime => "timestamp".to_string(),
            ColumnKind::Uuid => "uuid".to_string(),
            ColumnKind::TimeUuid => "timeuuid".to_string(),
            ColumnKind::Boolean => "boolean".to_string(),
            ColumnKind::Float { double_precision } => if *double_precision {
                "double"
            } else {
                "float"
            }
            .to_string(),
            ColumnKind::Decimal => "decimal".to_string(),
            ColumnKind::Set { element, .. } => format!("set<{}>", element.kind().db_type()),
            ColumnKind::List { element } => format!("list<{}>", element.kind().db_type()),
            ColumnKind::Map { key, value } => {
                format!("map<{}, {}>", key.kind().db_type(), value.kind().db_type())
            }
        }
    }

    /// Check if this variant is a container type.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ColumnKind::Set { .. } | ColumnKind::List { .. } | ColumnKind::Map { .. }
        )
    }

    /// Type-specific validation, run after the shared pipeline. The value
    /// is never `Null` here.
    pub(crate) fn check(&self, value: Value, label: &str, required: bool) -> Result<Value, Error> {
        match self {
            ColumnKind::Text {
                min_length,
                max_length,
            } => {
                let s = match &value {
                    Value::Text(s) => s,
                    other => {
                        return Err(Error::Validation(format!("{:?} is not a string", other)))
                    }
                };
                let len = s.chars().count();
                if let Some(max) = max_length {
                    if len > *max {
                        return Err(Error::Validation(format!(
                            "{} is longer than {} characters",
                            label, max
                        )));
                    }
                }
                let min = min_length.or(if required { Some(1) } else { None });
                if let Some(min) = min {
                    if len < min {
                        return Err(Error::Validation(format!(
                            "{} is shorter than {} characters",
                            label, min
                        )));
                    }
                }
                Ok(value)
            }
            ColumnKind::Json => {
                // Encodability check only; the value passes through unchanged.
                value_to_json(&value)?;
                Ok(value)
            }
            ColumnKind::Integer => coerce_int(&value).map(Value::Int),
            ColumnKind::Uuid | ColumnKind::TimeUuid => match value {
                Value::Uuid(u) => Ok(Value::Uuid(u)),
                Value::Text(s) => {
                    if !uuid_pattern().is_match(&s) {
                        return Err(Error::Validation(format!("{} is not a valid uuid", s)));
                    }
                    let parsed = uuid::Uuid::parse_str(&s)
                        .map_err(|_| Error::Validation(format!("{} is not a valid uuid", s)))?;
                    Ok(Value::Uuid(parsed))
                }
                other => Err(Error::Validation(format!("{:?} is not a valid uuid", other))),
            },
            ColumnKind::Float { .. } => coerce_float(&value).map(Value::Double),
            // Bytes, Ascii, DateTime, Boolean, and Decimal apply the base
            // pipeline only; their conversions live in encode/decode.
            ColumnKind::Bytes
            | ColumnKind::Ascii
            | ColumnKind::DateTime
            | ColumnKind::Boolean
            | ColumnKind::Decimal => Ok(value),
            ColumnKind::Set { element, strict } => {
                container::validate_set(element, *strict, value)
            }
            ColumnKind::List { element } => container::validate_list(element, value),
            ColumnKind::Map { key, value: val } => container::validate_map(key, val, value),
        }
    }

    /// Decode a stored value back into its application representation.
    pub(crate) fn decode(&self, value: Value) -> Result<Value, Error> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match self {
            ColumnKind::Json => match value {
                Value::Text(s) => {
                    let parsed: serde_json::Value = serde_json::from_str(&s)
                        .map_err(|e| Error::Validation(format!("malformed json text: {}", e)))?;
                    Ok(Value::Json(parsed))
                }
                other => Ok(other),
            },
            ColumnKind::DateTime => match value {
                Value::DateTime(dt) => Ok(Value::DateTime(dt)),
                Value::Int(secs) => DateTime::from_timestamp(secs, 0)
                    .map(Value::DateTime)
                    .ok_or_else(|| {
                        Error::Validation(format!("{} is out of range for a timestamp", secs))
                    }),
                Value::Double(secs) => {
                    // A saturating cast would map NaN to the epoch.
                    if !secs.is_finite() {
                        return Err(Error::Validation(format!(
                            "{} cannot be interpreted as a timestamp",
                            secs
                        )));
                    }
                    DateTime::from_timestamp_millis((secs * 1000.0) as i64)
                        .map(Value::DateTime)
                        .ok_or_else(|| {
                            Error::Validation(format!("{} is out of range for a timestamp", secs))
                        })
                }
                other => Err(Error::Validation(format!(
                    "{:?} cannot be interpreted as a timestamp",
                    other
                ))),
            },
            ColumnKind::Integer => coerce_int(&value).map(Value::Int),
            ColumnKind::Float { .. } => coerce_float(&value).map(Value::Double),
            ColumnKind::Boolean => Ok(Value::Bool(value.is_truthy())),
            ColumnKind::Map { key, value: val } => container::decode_map(key, val, value),
            _ => Ok(value),
        }
    }

    /// Encode a value into its storage representation. The shared pipeline
    /// has already substituted a configured default for `Null`.
    pub(crate) fn encode(&self, value: Value, label: &str) -> Result<DbValue, Error> {
        // JSON and Boolean encode Null too; everything else passes it through.
        if value.is_null()
            && !matches!(self, ColumnKind::Json | ColumnKind::Boolean)
        {
            return Ok(DbValue::Null);
        }
        match self {
            ColumnKind::Bytes => match value {
                Value::Bytes(b) => Ok(DbValue::Bytes(b)),
                other => Err(Error::Validation(format!("{:?} is not a blob", other))),
            },
            ColumnKind::Ascii | ColumnKind::Text { .. } => match value {
                Value::Text(s) => Ok(DbValue::Text(s)),
                other => Err(Error::Validation(format!("{:?} is not a string", other))),
            },
            ColumnKind::Json => {
                let json = value_to_json(&value)?;
                let text = serde_json::to_string(&json)
                    .map_err(|e| Error::Validation(format!("{} is not JSON-encodable", e)))?;
                Ok(DbValue::Text(text))
            }
            ColumnKind::Integer => coerce_int(&value).map(DbValue::Int),
            ColumnKind::DateTime => match value {
                Value::DateTime(dt) => Ok(DbValue::Timestamp(dt.timestamp_millis())),
                other => Err(Error::Validation(format!(
                    "'{:?}' is not a datetime value",
                    other
                ))),
            },
            ColumnKind::Uuid | ColumnKind::TimeUuid => {
                match self.check(value, label, false)? {
                    Value::Uuid(u) => Ok(DbValue::Uuid(u)),
                    _ => unreachable!("uuid check yields a uuid"),
                }
            }
            ColumnKind::Boolean => Ok(DbValue::Bool(value.is_truthy())),
            ColumnKind::Float { .. } => coerce_float(&value).map(DbValue::Double),
            ColumnKind::Decimal => match value {
                Value::Int(i) => Ok(DbValue::Int(i)),
                Value::Double(f) => Ok(DbValue::Double(f)),
                Value::Text(s) => Ok(DbValue::Text(s)),
                other => Err(Error::Validation(format!(
                    "{:?} is not a decimal value",
                    other
                ))),
            },
            ColumnKind::Set { element, .. } => container::encode_set(element, value),
            ColumnKind::List { element } => container::encode_list(element, value),
            ColumnKind::Map { key, value: val } => container::encode_map(key, val, value),
        }
    }
}

/// Coerce a value to a 64-bit integer, truncating floats toward zero.
fn coerce_int(value: &Value) -> Result<i64, Error> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Double(f) if f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 => {
            Ok(f.trunc() as i64)
        }
        Value::Text(s) => s.trim().parse::<i64>().map_err(|_| {
            Error::Validation(format!("{} can't be converted to an integral value", s))
        }),
        other => Err(Error::Validation(format!(
            "{:?} can't be converted to an integral value",
            other
        ))),
    }
}

/// Coerce a value to a 64-bit float.
fn coerce_float(value: &Value) -> Result<f64, Error> {
    match value {
        Value::Double(f) => Ok(*f),
        Value::Int(i) => Ok(*i as f64),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Validation(format!("{} is not a valid float", s))),
        other => Err(Error::Validation(format!("{:?} is not a valid float", other))),
    }
}

/// Convert an application value into a JSON value, failing on types with
/// no JSON representation.
fn value_to_json(value: &Value) -> Result<serde_json::Value, Error> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Int(i) => Ok(serde_json::Value::from(*i)),
        Value::Double(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| {
                Error::Validation(format!("{} is not JSON-encodable", f))
            }),
        Value::Text(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Json(v) => Ok(v.clone()),
        Value::Set(items) | Value::List(items) => {
            let arr: Result<Vec<_>, _> = items.iter().map(value_to_json).collect();
            Ok(serde_json::Value::Array(arr?))
        }
        Value::Map(pairs) => {
            let mut obj = serde_json::Map::with_capacity(pairs.len());
            for (k, v) in pairs {
                let key = match k {
                    Value::Text(s) => s.clone(),
                    other => {
                        return Err(Error::Validation(format!(
                            "{:?} is not a JSON-encodable map key",
                            other
                        )))
                    }
                };
                obj.insert(key, value_to_json(v)?);
            }
            Ok(serde_json::Value::Object(obj))
        }
        Value::Bytes(_) | Value::DateTime(_) | Value::Uuid(_) => Err(Error::Validation(format!(
            "{:?} is not JSON-encodable",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_db_type_tags() {
        assert_eq!(ColumnKind::Bytes.db_type(), "blob");
        assert_eq!(ColumnKind::Json.db_type(), "text");
        assert_eq!(
            ColumnKind::Float {
                double_precision: true
            }
            .db_type(),
            "double"
        );
        assert_eq!(
            ColumnKind::Float {
                double_precision: false
            }
            .db_type(),
            "float"
        );
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(coerce_int(&Value::Text("42".into())).unwrap(), 42);
        assert_eq!(coerce_int(&Value::Double(1.9)).unwrap(), 1);
        assert_eq!(coerce_int(&Value::Double(-1.9)).unwrap(), -1);
        assert!(coerce_int(&Value::Text("abc".into())).is_err());
        assert!(coerce_int(&Value::Bool(true)).is_err());
        assert!(coerce_int(&Value::Double(f64::NAN)).is_err());
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(coerce_float(&Value::Int(2)).unwrap(), 2.0);
        assert_eq!(coerce_float(&Value::Text("2.5".into())).unwrap(), 2.5);
        assert!(coerce_float(&Value::Text("two".into())).is_err());
    }

    #[test]
    fn test_uuid_text_forms() {
        let kind = ColumnKind::Uuid;
        let ok = kind
            .check(
                Value::Text("123e4567-e89b-12d3-a456-426614174000".into()),
                "id",
                true,
            )
            .unwrap();
        assert!(matches!(ok, Value::Uuid(_)));

        assert!(kind
            .check(Value::Text("not-a-uuid".into()), "id", true)
            .is_err());
        // Uppercase hex is not the canonical form.
        assert!(kind
            .check(
                Value::Text("123E4567-E89B-12D3-A456-426614174000".into()),
                "id",
                true
            )
            .is_err());
    }

    #[test]
    fn test_datetime_decode_from_epoch_seconds() {
        let kind = ColumnKind::DateTime;
        let decoded = kind.decode(Value::Int(1)).unwrap();
        assert_eq!(
            decoded,
            Value::DateTime(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap())
        );
    }

    #[test]
    fn test_datetime_decode_rejects_non_finite_seconds() {
        let kind = ColumnKind::DateTime;
        assert!(kind.decode(Value::Double(f64::NAN)).is_err());
        assert!(kind.decode(Value::Double(f64::INFINITY)).is_err());
        assert!(kind.decode(Value::Double(f64::NEG_INFINITY)).is_err());
        assert!(kind.decode(Value::Double(1.5)).is_ok());
    }

    #[test]
    fn test_datetime_encode_millis() {
        let kind = ColumnKind::DateTime;
        let instant = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(
            kind.encode(Value::DateTime(instant), "ts").unwrap(),
            DbValue::Timestamp(1000)
        );
        assert!(kind.encode(Value::Text("soon".into()), "ts").is_err());
    }

    #[test]
    fn test_json_compact_encoding() {
        let kind = ColumnKind::Json;
        let value = Value::Json(serde_json::json!({"a": 1, "b": [true, null]}));
        let encoded = kind.encode(value, "doc").unwrap();
        assert_eq!(encoded, DbValue::Text(r#"{"a":1,"b":[true,null]}"#.into()));
    }

    #[test]
    fn test_json_rejects_unencodable() {
        let kind = ColumnKind::Json;
        assert!(kind
            .check(Value::Bytes(vec![1, 2]), "doc", true)
            .is_err());
        assert!(kind
            .check(Value::Double(f64::INFINITY), "doc", true)
            .is_err());
    }

    #[test]
    fn test_json_decode_malformed_text() {
        let kind = ColumnKind::Json;
        assert!(kind.decode(Value::Text("{not json".into())).is_err());
        assert_eq!(
            kind.decode(Value::Text("[1,2]".into())).unwrap(),
            Value::Json(serde_json::json!([1, 2]))
        );
    }

    #[test]
    fn test_boolean_truthiness_coercion() {
        let kind = ColumnKind::Boolean;
        assert_eq!(kind.decode(Value::Int(2)).unwrap(), Value::Bool(true));
        assert_eq!(
            kind.encode(Value::Text(String::new()), "flag").unwrap(),
            DbValue::Bool(false)
        );
        assert_eq!(
            kind.encode(Value::Null, "flag").unwrap(),
            DbValue::Bool(false)
        );
    }
}
