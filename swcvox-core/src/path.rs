//! Unbranched tracing paths.

use crate::{SwcType, TracingPoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An unbranched run of tracing points.
///
/// A path that starts at a branch point repeats the fork node as its first
/// point so consecutive segments stay connected when drawn.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TracingPath {
    /// Sequential id of the path within its tracing.
    pub id: usize,
    /// Path this one branches off, if any.
    pub parent: Option<usize>,
    /// Structure type of the path.
    pub swc_type: SwcType,
    /// Ordered points along the path.
    pub points: Vec<TracingPoint>,
}

impl TracingPath {
    /// Creates an empty path.
    #[must_use]
    pub fn new(id: usize, parent: Option<usize>, swc_type: SwcType) -> Self {
        Self {
            id,
            parent,
            swc_type,
            points: Vec::new(),
        }
    }

    /// Adds a point to the end of the path.
    pub fn push(&mut self, point: TracingPoint) {
        self.points.push(point);
    }

    /// Returns the number of points on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the path has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns an iterator over consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&TracingPoint, &TracingPoint)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }
}

/// Flattens a set of paths into the point sequence scanned by the normalizer.
pub fn all_points(paths: &[TracingPath]) -> impl Iterator<Item = &TracingPoint> {
    paths.iter().flat_map(|p| p.points.iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments() {
        let mut path = TracingPath::new(0, None, SwcType::Axon);
        assert!(path.is_empty());
        path.push(TracingPoint::at(0.0, 0.0, 0.0));
        path.push(TracingPoint::at(1.0, 0.0, 0.0));
        path.push(TracingPoint::at(1.0, 1.0, 0.0));

        assert_eq!(path.len(), 3);
        assert_eq!(path.segments().count(), 2);
    }

    #[test]
    fn test_all_points() {
        let mut a = TracingPath::new(0, None, SwcType::Soma);
        a.push(TracingPoint::at(0.0, 0.0, 0.0));
        let mut b = TracingPath::new(1, Some(0), SwcType::Dendrite);
        b.push(TracingPoint::at(0.0, 0.0, 0.0));
        b.push(TracingPoint::at(2.0, 0.0, 0.0));

        assert_eq!(all_points(&[a, b]).count(), 3);
    }
}
