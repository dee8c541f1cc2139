//! swcvox-swc: SWC neuron morphology parser.
//!
//! This crate turns SWC text into [`TracingPath`]s ready for normalization
//! and rendering.
//!
//! # Key Components
//!
//! - [`SwcRecord`] - One sample line (`id type x y z radius parent`)
//! - [`SampleTree`] - Parent/child links with duplicate and dangling-parent checks
//! - [`SwcDocument`] - A parsed file; implements [`Importer`]
//!
//! # Import Pipeline
//!
//! 1. Parse lines into records, keeping header comments
//! 2. Link records into a tree
//! 3. Split the tree into unbranched paths, transforming each coordinate

mod error;
pub mod record;
pub mod tree;

pub use error::{Error, Result};
pub use record::{SwcLine, SwcRecord};
pub use tree::{build_paths, SampleTree};

use std::collections::BTreeMap;
use swcvox_core::{Importer, SwcType, TracingPath, TransformParameters};

/// A parsed SWC file.
#[derive(Clone, Debug, Default)]
pub struct SwcDocument {
    /// Comment lines, without the leading `#`.
    pub header: Vec<String>,
    /// Samples in file order.
    pub records: Vec<SwcRecord>,
}

impl SwcDocument {
    /// Parses SWC text.
    ///
    /// # Errors
    /// Returns the first malformed line encountered.
    pub fn parse(text: &str) -> Result<Self> {
        let mut doc = Self::default();
        for (i, line) in text.lines().enumerate() {
            match SwcRecord::parse_line(line, i + 1)? {
                SwcLine::Blank => {}
                SwcLine::Comment(c) => doc.header.push(c.to_string()),
                SwcLine::Sample(r) => doc.records.push(r),
            }
        }
        log::debug!(
            "parsed {} samples, {} header lines",
            doc.records.len(),
            doc.header.len()
        );
        Ok(doc)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the document holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sample counts per structure type.
    #[must_use]
    pub fn type_counts(&self) -> BTreeMap<SwcType, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.records {
            *counts.entry(r.swc_type).or_insert(0) += 1;
        }
        counts
    }

    /// Splits the samples into paths using `params`.
    ///
    /// # Errors
    /// See [`build_paths`].
    pub fn to_paths(&self, params: &TransformParameters) -> Result<Vec<TracingPath>> {
        build_paths(&self.records, params)
    }
}

impl Importer for SwcDocument {
    type Error = Error;

    fn import(&self, params: &TransformParameters) -> Result<Vec<TracingPath>> {
        self.to_paths(params)
    }

    fn source_name(&self) -> String {
        "<swc text>".to_string()
    }
}
