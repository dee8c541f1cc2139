//! Import transform parameters and voxel calibration.

use crate::{Error, GuessedOffset, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest scale factor accepted on any axis.
pub const MIN_SCALE: f64 = 0.01;

/// Physical size and unit of one voxel step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VoxelCalibration {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub unit: String,
}

impl Default for VoxelCalibration {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            unit: "\u{00B5}m".to_string(),
        }
    }
}

/// Offset, scale and calibration applied while importing a tracing.
///
/// Built once by the caller and passed by value; the retry path derives a
/// fresh value through [`TransformParameters::retry_with`] instead of
/// mutating shared state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransformParameters {
    pub offset: [f64; 3],
    pub scale: [f64; 3],
    pub apply_offset: bool,
    pub apply_scale: bool,
    pub ignore_calibration: bool,
    pub voxel_size: [f64; 3],
    pub voxel_unit: String,
}

impl Default for TransformParameters {
    fn default() -> Self {
        let cal = VoxelCalibration::default();
        Self {
            offset: [0.0; 3],
            scale: [1.0; 3],
            apply_offset: false,
            apply_scale: false,
            ignore_calibration: false,
            voxel_size: [cal.width, cal.height, cal.depth],
            voxel_unit: cal.unit,
        }
    }
}

impl TransformParameters {
    /// Creates parameters with default values (identity transform).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the offset and sets its value.
    #[must_use]
    pub fn with_offset(mut self, x: f64, y: f64, z: f64) -> Self {
        self.offset = [x, y, z];
        self.apply_offset = true;
        self
    }

    /// Enables scaling and sets the factors, clamped to [`MIN_SCALE`].
    #[must_use]
    pub fn with_scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.scale = [x, y, z].map(clamp_scale);
        self.apply_scale = true;
        self
    }

    /// Sets the voxel calibration.
    #[must_use]
    pub fn with_voxel_size(mut self, width: f64, height: f64, depth: f64, unit: &str) -> Self {
        self.voxel_size = [width, height, depth];
        self.voxel_unit = unit.replace(',', "");
        self
    }

    /// Disables spatial calibration of the rendered output.
    #[must_use]
    pub fn ignoring_calibration(mut self) -> Self {
        self.ignore_calibration = true;
        self
    }

    /// Clamps the stored scale factors and strips commas from the unit.
    ///
    /// Used on values deserialized from configuration files, which bypass
    /// the builder methods.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.scale = self.scale.map(clamp_scale);
        self.voxel_unit = self.voxel_unit.replace(',', "");
        self
    }

    /// Offset in effect: the configured offset, or zero when disabled.
    #[must_use]
    pub fn effective_offset(&self) -> [f64; 3] {
        if self.apply_offset {
            self.offset
        } else {
            [0.0; 3]
        }
    }

    /// Scale in effect: the configured factors, or one when disabled.
    #[must_use]
    pub fn effective_scale(&self) -> [f64; 3] {
        if self.apply_scale {
            self.scale.map(clamp_scale)
        } else {
            [1.0; 3]
        }
    }

    /// Calibration for rendered output, `None` when calibration is ignored.
    #[must_use]
    pub fn calibration(&self) -> Option<VoxelCalibration> {
        if self.ignore_calibration {
            return None;
        }
        Some(VoxelCalibration {
            width: self.voxel_size[0],
            height: self.voxel_size[1],
            depth: self.voxel_size[2],
            unit: self.voxel_unit.clone(),
        })
    }

    /// Maps a raw file coordinate into tracing space: `scale * c + offset`.
    #[inline]
    #[must_use]
    pub fn apply(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        let o = self.effective_offset();
        let s = self.effective_scale();
        [s[0] * x + o[0], s[1] * y + o[1], s[2] * z + o[2]]
    }

    /// Parameters for a second import attempt using an inferred offset.
    ///
    /// Scaling is switched off and the guessed offset replaces the user's.
    #[must_use]
    pub fn retry_with(&self, guessed: &GuessedOffset) -> Self {
        Self {
            offset: guessed.as_array(),
            apply_offset: true,
            apply_scale: false,
            ..self.clone()
        }
    }

    /// Checks that every numeric field is finite and voxel sizes are positive.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("offset.x", self.offset[0]),
            ("offset.y", self.offset[1]),
            ("offset.z", self.offset[2]),
            ("scale.x", self.scale[0]),
            ("scale.y", self.scale[1]),
            ("scale.z", self.scale[2]),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        let sizes = [
            ("voxel_size.width", self.voxel_size[0]),
            ("voxel_size.height", self.voxel_size[1]),
            ("voxel_size.depth", self.voxel_size[2]),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

#[inline]
fn clamp_scale(value: f64) -> f64 {
    value.max(MIN_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_are_identity() {
        let params = TransformParameters::new();
        assert_eq!(params.apply(3.0, -4.0, 5.5), [3.0, -4.0, 5.5]);
        assert_eq!(params.calibration().unwrap().unit, "\u{00B5}m");
    }

    #[test]
    fn test_scale_is_clamped() {
        let params = TransformParameters::new().with_scale(0.0, -3.0, 0.5);
        assert_eq!(params.scale, [MIN_SCALE, MIN_SCALE, 0.5]);
    }

    #[test]
    fn test_unclamped_field_still_clamped_when_used() {
        let mut params = TransformParameters::new();
        params.apply_scale = true;
        params.scale = [0.0, 1.0, 2.0];
        assert_eq!(params.effective_scale(), [MIN_SCALE, 1.0, 2.0]);
    }

    #[test]
    fn test_disabled_offset_and_scale() {
        let mut params = TransformParameters::new()
            .with_offset(10.0, 20.0, 30.0)
            .with_scale(2.0, 2.0, 2.0);
        params.apply_offset = false;
        params.apply_scale = false;
        assert_eq!(params.apply(1.0, 1.0, 1.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_apply_scale_then_offset() {
        let params = TransformParameters::new()
            .with_offset(10.0, 0.0, -1.0)
            .with_scale(2.0, 0.5, 1.0);
        let [x, y, z] = params.apply(3.0, 4.0, 5.0);
        assert_relative_eq!(x, 16.0);
        assert_relative_eq!(y, 2.0);
        assert_relative_eq!(z, 4.0);
    }

    #[test]
    fn test_retry_with_guessed_offset() {
        let params = TransformParameters::new()
            .with_scale(3.0, 3.0, 3.0)
            .with_voxel_size(0.5, 0.5, 2.0, "nm");
        let guessed = GuessedOffset::new(21.0, 0.0, 5.25);
        let retry = params.retry_with(&guessed);

        assert!(retry.apply_offset);
        assert!(!retry.apply_scale);
        assert_eq!(retry.offset, [21.0, 0.0, 5.25]);
        assert_eq!(retry.voxel_size, [0.5, 0.5, 2.0]);
        assert_eq!(retry.voxel_unit, "nm");
    }

    #[test]
    fn test_sanitized() {
        let mut params = TransformParameters::new();
        params.scale = [0.001, 2.0, -1.0];
        params.voxel_unit = "u,m".to_string();
        let params = params.sanitized();
        assert_eq!(params.scale, [MIN_SCALE, 2.0, MIN_SCALE]);
        assert_eq!(params.voxel_unit, "um");
    }

    #[test]
    fn test_ignore_calibration() {
        let params = TransformParameters::new().ignoring_calibration();
        assert!(params.calibration().is_none());
    }

    #[test]
    fn test_unit_commas_are_stripped() {
        let params = TransformParameters::new().with_voxel_size(1.0, 1.0, 1.0, "u,m");
        assert_eq!(params.voxel_unit, "um");
    }

    #[test]
    fn test_validate() {
        assert!(TransformParameters::new().validate().is_ok());

        let mut params = TransformParameters::new();
        params.offset[1] = f64::NAN;
        assert!(matches!(
            params.validate(),
            Err(Error::InvalidParameter { name: "offset.y", .. })
        ));

        let params = TransformParameters::new().with_voxel_size(1.0, 0.0, 1.0, "um");
        assert!(params.validate().is_err());
    }
}
