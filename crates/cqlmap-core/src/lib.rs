//! CQLMAP core - typed column descriptors for a schema-mapped column store.
//!
//! This crate provides the field/value framework used by the mapping
//! layer: per-column validation, application/storage conversion, and
//! literal rendering for statement assembly.

pub mod columns;
pub mod error;
pub mod quote;

pub use columns::{
    Column, ColumnAccessor, ColumnDefault, ColumnKind, CollectionQuoter, DbValue, Value,
    ValueManager,
};
pub use error::Error;
pub use quote::cql_quote;
