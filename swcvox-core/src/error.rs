//! Error types for swcvox-core.

use thiserror::Error;

/// Result type alias for swcvox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for swcvox operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No tracing points were supplied to the normalizer.
    #[error("invalid input: point sequence is empty")]
    EmptyInput,

    /// A transform parameter is out of range or not finite.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
