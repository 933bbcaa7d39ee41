//! Literal quoting for statement assembly.
//!
//! Takes an already storage-converted value and returns its safely quoted
//! textual form. Performs no validation or conversion.

use crate::columns::DbValue;

/// Render a storage value as quoted literal text.
///
/// Text is single-quoted with embedded quotes doubled, blobs render as
/// `0x`-prefixed hex, booleans lowercase, numbers and uuids bare.
pub fn cql_quote(value: &DbValue) -> String {
    match value {
        DbValue::Null => "null".to_string(),
        DbValue::Bool(b) => b.to_string(),
        DbValue::Int(i) => i.to_string(),
        DbValue::Double(f) => f.to_string(),
        DbValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
        DbValue::Bytes(b) => format!("0x{}", hex::encode(b)),
        DbValue::Uuid(u) => u.to_string(),
        DbValue::Timestamp(ms) => ms.to_string(),
        DbValue::Collection(quoter) => quoter.to_string(),
    }
}
