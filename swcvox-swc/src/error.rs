//! SWC-specific error types.

use thiserror::Error;

/// Result type for SWC operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SWC-specific error types.
#[derive(Error, Debug)]
pub enum Error {
    /// A sample line could not be parsed.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// Two samples share the same id.
    #[error("line {line}: duplicate sample id {id}")]
    DuplicateId { id: i64, line: usize },

    /// A sample references a parent that does not exist.
    #[error("sample {id} references missing parent {parent}")]
    MissingParent { id: i64, parent: i64 },

    /// Parent links form a loop that never reaches a root.
    #[error("sample {id} is part of a parent cycle")]
    Cycle { id: i64 },

    /// The input holds no samples.
    #[error("no paths found")]
    NoPaths,
}
