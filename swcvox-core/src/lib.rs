//! swcvox-core: Core types and coordinate normalization for neuron tracings.
//!
//! This crate provides the tracing data model shared by the SWC importer and
//! the renderers, together with the [`CoordinateNormalizer`] that fits an
//! arbitrary point cloud into a displayable image volume.
//!

pub mod error;
pub mod import;
pub mod normalize;
pub mod path;
pub mod point;
pub mod transform;

pub use error::{Error, Result};
pub use import::Importer;
pub use normalize::{BoundingVolume, CoordinateNormalizer, GuessedOffset, Normalization};
pub use path::TracingPath;
pub use point::{SwcType, TracingPoint};
pub use transform::{TransformParameters, VoxelCalibration, MIN_SCALE};
