//! Column descriptors and the value conversion pipeline.
//!
//! A [`Column`] declares one schema field's type variant and constraints,
//! validates application values, and converts them to and from their
//! storage representation. Container columns compose element descriptors;
//! converted collections render as literal text through a
//! [`CollectionQuoter`].

mod column;
mod container;
mod kind;
mod manager;
mod quoter;
mod value;

pub use column::{Column, ColumnDefault};
pub use kind::ColumnKind;
pub use manager::{ColumnAccessor, ValueManager};
pub use quoter::CollectionQuoter;
pub use value::{DbValue, Value};
