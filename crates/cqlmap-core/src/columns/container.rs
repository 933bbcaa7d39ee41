//! Collection validation and conversion.
//!
//! Containers compose one (or two) element descriptors and delegate
//! per-element work to them; the collection itself is encoded into
//! literal text via a [`CollectionQuoter`](super::CollectionQuoter).

use super::column::Column;
use super::quoter::CollectionQuoter;
use super::value::{DbValue, Value};
use crate::error::Error;

/// Construction-time check for a container's element descriptor.
///
/// Nested containers are rejected here, as a checked error rather than a
/// runtime fault. Only `Column` values can be passed and every
/// constructible variant carries a concrete storage tag, so no other
/// element checks are needed.
pub(crate) fn check_element(element: &Column) -> Result<(), Error> {
    if element.kind().is_container() {
        return Err(Error::Validation(
            "container types cannot be nested".to_string(),
        ));
    }
    Ok(())
}

/// Validate set-shaped input, folding elements into a set.
///
/// Validation runs before deduplication, so two distinct raw inputs that
/// validate to an equal result collapse to one element.
pub(crate) fn validate_set(element: &Column, strict: bool, value: Value) -> Result<Value, Error> {
    let items = match value {
        Value::Set(items) => items,
        Value::List(items) if !strict => items,
        other if strict => {
            return Err(Error::Validation(format!("{:?} is not a set value", other)))
        }
        other => {
            return Err(Error::Validation(format!(
                "{:?} cannot be coerced to a set value",
                other
            )))
        }
    };
    let mut validated: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        let v = element.validate(item)?;
        if !validated.contains(&v) {
            validated.push(v);
        }
    }
    Ok(Value::Set(validated))
}

/// Validate list-shaped input, preserving order.
pub(crate) fn validate_list(element: &Column, value: Value) -> Result<Value, Error> {
    let items = match value {
        Value::List(items) | Value::Set(items) => items,
        other => return Err(Error::Validation(format!("{:?} is not a list value", other))),
    };
    let validated: Result<Vec<Value>, Error> =
        items.into_iter().map(|v| element.validate(v)).collect();
    Ok(Value::List(validated?))
}

/// Validate mapping-shaped input. Key collisions after validation resolve
/// last-write-wins.
pub(crate) fn validate_map(key: &Column, value: &Column, input: Value) -> Result<Value, Error> {
    let pairs = match input {
        Value::Map(pairs) => pairs,
        other => return Err(Error::Validation(format!("{:?} is not a map value", other))),
    };
    let mut validated: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
    for (k, v) in pairs {
        let vk = key.validate(k)?;
        let vv = value.validate(v)?;
        if let Some(slot) = validated.iter_mut().find(|(existing, _)| *existing == vk) {
            slot.1 = vv;
        } else {
            validated.push((vk, vv));
        }
    }
    Ok(Value::Map(validated))
}

/// Decode a stored map back to application types, both sides.
pub(crate) fn decode_map(key: &Column, value: &Column, input: Value) -> Result<Value, Error> {
    let pairs = match input {
        Value::Map(pairs) => pairs,
        other => return Ok(other),
    };
    let mut decoded = Vec::with_capacity(pairs.len());
    for (k, v) in pairs {
        decoded.push((key.to_python(k)?, value.to_python(v)?));
    }
    Ok(Value::Map(decoded))
}

pub(crate) fn encode_set(element: &Column, value: Value) -> Result<DbValue, Error> {
    let items = match value {
        Value::Set(items) | Value::List(items) => items,
        other => return Err(Error::Validation(format!("{:?} is not a set value", other))),
    };
    let converted: Result<Vec<DbValue>, Error> =
        items.into_iter().map(|v| element.to_database(v)).collect();
    Ok(DbValue::Collection(CollectionQuoter::Set(converted?)))
}

pub(crate) fn encode_list(element: &Column, value: Value) -> Result<DbValue, Error> {
    let items = match value {
        Value::List(items) | Value::Set(items) => items,
        other => return Err(Error::Validation(format!("{:?} is not a list value", other))),
    };
    let converted: Result<Vec<DbValue>, Error> =
        items.into_iter().map(|v| element.to_database(v)).collect();
    Ok(DbValue::Collection(CollectionQuoter::List(converted?)))
}

pub(crate) fn encode_map(key: &Column, value: &Column, input: Value) -> Result<DbValue, Error> {
    let pairs = match input {
        Value::Map(pairs) => pairs,
        other => return Err(Error::Validation(format!("{:?} is not a map value", other))),
    };
    let mut converted = Vec::with_capacity(pairs.len());
    for (k, v) in pairs {
        converted.push((key.to_database(k)?, value.to_database(v)?));
    }
    Ok(DbValue::Collection(CollectionQuoter::Map(converted)))
}
