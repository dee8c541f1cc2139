//! Bounding volume inference and offset guessing.
//!
//! An SWC file carries no reliable information about the coordinate space or
//! units it was traced in. The [`CoordinateNormalizer`] scans the imported
//! points once and derives:
//!
//! - the smallest integer volume holding every point, padded so that points
//!   on the boundary survive rounding during rasterization;
//! - optionally, a corrective offset that shifts the most negative point of
//!   each axis just past zero, used for a single retry when rendering fails.

use crate::{Error, Result, TracingPoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Padding added to the maximum x and y coordinates.
pub const XY_PADDING: u64 = 10;
/// Padding added to the maximum z coordinate of non-planar tracings.
pub const Z_PADDING: u64 = 2;
/// Inflation applied to the inverted minimum when guessing offsets.
pub const OFFSET_MARGIN: f64 = 1.05;

/// Integer size of the image volume a tracing is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingVolume {
    pub width: u64,
    pub height: u64,
    pub depth: u64,
}

impl BoundingVolume {
    /// Creates a bounding volume of the given size.
    #[must_use]
    pub fn new(width: u64, height: u64, depth: u64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Derives the padded volume from per-axis maxima.
    ///
    /// Depth collapses to a single slice when the z maximum is exactly 1.
    #[must_use]
    pub fn from_maxima(max: [i64; 3]) -> Self {
        let extent = |m: i64| u64::try_from(m.max(1)).unwrap_or(1);
        let depth = if max[2] == 1 {
            1
        } else {
            extent(max[2]).saturating_add(Z_PADDING)
        };
        Self {
            width: extent(max[0]).saturating_add(XY_PADDING),
            height: extent(max[1]).saturating_add(XY_PADDING),
            depth,
        }
    }

    /// Returns the dimensions as an array.
    #[must_use]
    pub fn dims(&self) -> [u64; 3] {
        [self.width, self.height, self.depth]
    }

    /// Total number of voxels, `None` on overflow.
    #[must_use]
    pub fn voxel_count(&self) -> Option<u64> {
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(self.depth))
    }

    /// Maps a voxel coordinate to its grid position, `None` when outside.
    ///
    /// A planar volume collapsed from a z maximum of 1 accepts z = 0 and
    /// z = 1 and places both on its single slice.
    #[must_use]
    pub fn locate(&self, voxel: [i64; 3]) -> Option<[u64; 3]> {
        let [x, y, z] = voxel;
        let z = if self.is_planar() && z == 1 { 0 } else { z };
        let x = u64::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u64::try_from(y).ok().filter(|&y| y < self.height)?;
        let z = u64::try_from(z).ok().filter(|&z| z < self.depth)?;
        Some([x, y, z])
    }

    /// Returns true if the voxel has a place in the volume.
    #[must_use]
    pub fn contains(&self, voxel: [i64; 3]) -> bool {
        self.locate(voxel).is_some()
    }

    /// Returns true if the volume is a single slice.
    #[must_use]
    pub fn is_planar(&self) -> bool {
        self.depth == 1
    }
}

/// Per-axis corrective offset inferred from the most negative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuessedOffset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GuessedOffset {
    /// Creates an offset from explicit components.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Derives the offset from per-axis minima (never above zero).
    ///
    /// A zero minimum needs no correction; anything below zero is inverted
    /// and inflated by [`OFFSET_MARGIN`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_minima(min: [i64; 3]) -> Self {
        let guess = |m: i64| {
            if m == 0 {
                0.0
            } else {
                m as f64 * -OFFSET_MARGIN
            }
        };
        Self {
            x: guess(min[0]),
            y: guess(min[1]),
            z: guess(min[2]),
        }
    }

    /// Returns the components as an array.
    #[must_use]
    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns true if no axis needs correcting.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Outcome of a normalization pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Normalization {
    /// Padded volume holding every point.
    pub volume: BoundingVolume,
    /// Corrective offset, present only when inference was requested.
    pub guessed_offset: Option<GuessedOffset>,
    /// Running maxima, seeded at 1.
    pub max: [i64; 3],
    /// Running minima, seeded at 0. Only tracked when inferring offsets.
    pub min: [i64; 3],
    /// Number of points scanned.
    pub point_count: usize,
}

/// Fits a tracing point cloud into a displayable volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateNormalizer {
    infer_offsets: bool,
}

impl CoordinateNormalizer {
    /// Creates a normalizer that only computes the bounding volume.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables offset inference.
    #[must_use]
    pub fn with_offset_inference(mut self, enabled: bool) -> Self {
        self.infer_offsets = enabled;
        self
    }

    /// Returns true if offset inference is enabled.
    #[must_use]
    pub fn infers_offsets(&self) -> bool {
        self.infer_offsets
    }

    /// Scans the points in a single pass.
    ///
    /// # Errors
    /// Returns [`Error::EmptyInput`] when `points` yields nothing.
    pub fn normalize<'a, I>(&self, points: I) -> Result<Normalization>
    where
        I: IntoIterator<Item = &'a TracingPoint>,
    {
        let mut max = [1_i64; 3];
        let mut min = [0_i64; 3];
        let mut point_count = 0usize;

        for point in points {
            let voxel = point.voxel();
            for axis in 0..3 {
                max[axis] = max[axis].max(voxel[axis]);
                if self.infer_offsets {
                    min[axis] = min[axis].min(voxel[axis]);
                }
            }
            point_count += 1;
        }

        if point_count == 0 {
            return Err(Error::EmptyInput);
        }

        let volume = BoundingVolume::from_maxima(max);
        let guessed_offset = self
            .infer_offsets
            .then(|| GuessedOffset::from_minima(min));

        log::debug!(
            "normalized {} points: max {:?}, min {:?}, volume {}x{}x{}",
            point_count,
            max,
            min,
            volume.width,
            volume.height,
            volume.depth
        );

        Ok(Normalization {
            volume,
            guessed_offset,
            max,
            min,
            point_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pts(coords: &[(f64, f64, f64)]) -> Vec<TracingPoint> {
        coords
            .iter()
            .map(|&(x, y, z)| TracingPoint::at(x, y, z))
            .collect()
    }

    #[test]
    fn test_planar_tracing_collapses_depth() {
        let points = pts(&[(0.0, 0.0, 1.0), (5.0, 3.0, 1.0), (2.0, 8.0, 1.0)]);
        let n = CoordinateNormalizer::new().normalize(&points).unwrap();
        assert_eq!(n.volume, BoundingVolume::new(15, 18, 1));
    }

    #[test]
    fn test_volumetric_tracing_pads_depth() {
        let points = pts(&[(0.0, 0.0, 0.0), (5.0, 3.0, 4.0), (2.0, 8.0, 2.0)]);
        let n = CoordinateNormalizer::new().normalize(&points).unwrap();
        assert_eq!(n.volume, BoundingVolume::new(15, 18, 6));
    }

    #[test]
    fn test_single_origin_point() {
        // Maxima are seeded at 1, so a z maximum of 0 reads as 1 and collapses.
        let points = pts(&[(0.0, 0.0, 0.0)]);
        let n = CoordinateNormalizer::new().normalize(&points).unwrap();
        assert_eq!(n.volume, BoundingVolume::new(11, 11, 1));
        assert_eq!(n.max, [1, 1, 1]);
    }

    #[test]
    fn test_depth_boundary_at_two() {
        let points = pts(&[(0.0, 0.0, 2.0)]);
        let n = CoordinateNormalizer::new().normalize(&points).unwrap();
        assert_eq!(n.volume.depth, 4);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let points: Vec<TracingPoint> = Vec::new();
        let result = CoordinateNormalizer::new()
            .with_offset_inference(true)
            .normalize(&points);
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn test_guessed_offset_for_negative_x() {
        let points = pts(&[(-20.0, 3.0, 2.0), (4.0, 5.0, 6.0)]);
        let n = CoordinateNormalizer::new()
            .with_offset_inference(true)
            .normalize(&points)
            .unwrap();
        let guess = n.guessed_offset.unwrap();
        assert_relative_eq!(guess.x, 21.0, epsilon = 1e-9);
        assert_eq!(guess.y, 0.0);
        assert_eq!(guess.z, 0.0);
    }

    #[test]
    fn test_negative_half_rounds_into_volume() {
        let points = pts(&[(-0.5, 3.0, 2.0), (4.0, -1.5, 6.0)]);
        let n = CoordinateNormalizer::new()
            .with_offset_inference(true)
            .normalize(&points)
            .unwrap();
        assert_eq!(n.min, [0, -1, 0]);
        let guess = n.guessed_offset.unwrap();
        assert_eq!(guess.x, 0.0);
        assert_relative_eq!(guess.y, 1.05, epsilon = 1e-9);
    }

    #[test]
    fn test_no_guess_without_inference() {
        let points = pts(&[(-20.0, -3.0, 2.0)]);
        let n = CoordinateNormalizer::new().normalize(&points).unwrap();
        assert!(n.guessed_offset.is_none());
        assert_eq!(n.min, [0, 0, 0]);
    }

    #[test]
    fn test_degenerate_cloud() {
        let points = pts(&[(7.0, 7.0, 7.0); 5]);
        let n = CoordinateNormalizer::new()
            .with_offset_inference(true)
            .normalize(&points)
            .unwrap();
        assert_eq!(n.volume, BoundingVolume::new(17, 17, 9));
        assert!(n.guessed_offset.unwrap().is_zero());
        assert_eq!(n.point_count, 5);
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut points = pts(&[
            (-3.0, 12.0, 0.0),
            (40.0, -1.0, 9.0),
            (2.0, 8.0, -4.0),
            (0.0, 0.0, 1.0),
        ]);
        let normalizer = CoordinateNormalizer::new().with_offset_inference(true);
        let forward = normalizer.normalize(&points).unwrap();
        points.reverse();
        let backward = normalizer.normalize(&points).unwrap();
        points.rotate_left(1);
        let rotated = normalizer.normalize(&points).unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn test_volume_contains() {
        let volume = BoundingVolume::new(11, 11, 1);
        assert!(volume.contains([0, 0, 0]));
        assert!(volume.contains([10, 10, 0]));
        assert!(!volume.contains([11, 0, 0]));
        assert!(!volume.contains([-1, 0, 0]));
        assert!(!volume.contains([0, 0, 2]));
    }

    #[test]
    fn test_planar_volume_folds_unit_z() {
        let volume = BoundingVolume::new(11, 11, 1);
        assert_eq!(volume.locate([3, 4, 1]), Some([3, 4, 0]));
        assert_eq!(volume.locate([3, 4, 0]), Some([3, 4, 0]));

        let deep = BoundingVolume::new(11, 11, 6);
        assert_eq!(deep.locate([3, 4, 1]), Some([3, 4, 1]));
        assert_eq!(deep.locate([3, 4, 6]), None);
    }

    #[test]
    fn test_voxel_count_overflow() {
        assert_eq!(BoundingVolume::new(2, 3, 4).voxel_count(), Some(24));
        assert_eq!(BoundingVolume::new(u64::MAX, 2, 1).voxel_count(), None);
    }
}
