//! Core error types.

use thiserror::Error;

/// Errors raised by the column layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A value was rejected by a column's validation or conversion pipeline.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested column type is not implemented.
    #[error("not supported: {0}")]
    NotSupported(String),
}
