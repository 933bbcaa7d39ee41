//! Literal renderers for converted collections.

use std::fmt;

use super::value::DbValue;
use crate::quote::cql_quote;

/// Wraps an already storage-converted collection and renders it as
/// literal statement text. Created only at the to-storage conversion
/// boundary; performs no validation or conversion of its own.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionQuoter {
    /// Renders `{v1, v2, ...}`.
    Set(Vec<DbValue>),
    /// Renders `[v1, v2, ...]` preserving order.
    List(Vec<DbValue>),
    /// Renders `{k1:v1, k2:v2, ...}` with both sides quoted.
    Map(Vec<(DbValue, DbValue)>),
}

impl fmt::Display for CollectionQuoter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionQuoter::Set(items) => {
                let body: Vec<String> = items.iter().map(cql_quote).collect();
                write!(f, "{{{}}}", body.join(", "))
            }
            CollectionQuoter::List(items) => {
                let body: Vec<String> = items.iter().map(cql_quote).collect();
                write!(f, "[{}]", body.join(", "))
            }
            CollectionQuoter::Map(pairs) => {
                let body: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}:{}", cql_quote(k), cql_quote(v)))
                    .collect();
                write!(f, "{{{}}}", body.join(", "))
            }
        }
    }
}
