//! Importer seam.

use crate::{TracingPath, TransformParameters};

/// Source of tracing paths.
///
/// Implementations read a tracing (usually an SWC file) and apply the
/// supplied transform to every coordinate. Importing is repeatable so a
/// caller can re-import with corrected parameters.
pub trait Importer {
    /// Error produced when the tracing cannot be imported.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Imports all paths using `params`.
    ///
    /// # Errors
    /// Returns an error when the source is unreadable, malformed or empty.
    fn import(&self, params: &TransformParameters) -> Result<Vec<TracingPath>, Self::Error>;

    /// Human-readable name of the source, used in log messages.
    fn source_name(&self) -> String;
}
