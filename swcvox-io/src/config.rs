//! JSON import configuration.
//!
//! All fields are optional; missing ones take their defaults:
//!
//! ```json
//! {
//!   "transform": {
//!     "offset": [0.0, 0.0, 0.0],
//!     "scale": [1.0, 1.0, 1.0],
//!     "apply_offset": false,
//!     "apply_scale": false,
//!     "ignore_calibration": false,
//!     "voxel_size": [1.0, 1.0, 1.0],
//!     "voxel_unit": "µm"
//!   },
//!   "mode": "color_scene",
//!   "guess_offsets": true
//! }
//! ```

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use swcvox_core::TransformParameters;
use swcvox_render::RenderMode;

/// Settings for one import/render run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Coordinate transform and calibration.
    pub transform: TransformParameters,
    /// Output flavor.
    pub mode: RenderMode,
    /// Infer a corrective offset when rendering fails.
    pub guess_offsets: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            transform: TransformParameters::default(),
            mode: RenderMode::default(),
            guess_offsets: true,
        }
    }
}

impl ImportConfig {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds non-finite or non-positive values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)?;
        config.checked()
    }

    /// Loads configuration from a JSON string.
    ///
    /// # Errors
    /// Same as [`ImportConfig::from_file`], minus file access.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.checked()
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn checked(mut self) -> Result<Self> {
        self.transform = self.transform.sanitized();
        self.transform.validate()?;
        Ok(self)
    }
}
