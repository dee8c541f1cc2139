//! swcvox-render: Renderers for imported neuron tracings.
//!
//! This crate provides the output stages of the import pipeline:
//! - **Color scene** - polylines colored by structure type
//! - **Monochrome scene** - the same polylines in a single color
//! - **Skeleton** - a rasterized `u8` volume of every traced segment
//!
//! and [`render_with_retry`], which re-imports once with an inferred offset
//! when the first rendering attempt fails.
//!
#![warn(missing_docs)]

pub mod color;
mod error;
mod pipeline;
pub mod scene;
pub mod skeleton;

pub use color::{swc_color, Rgb};
pub use error::{Error, Result};
pub use pipeline::{render_with_retry, ModeRenderer, RenderMode, RenderRun, Rendered};
pub use scene::{Scene, ScenePolyline, SceneRenderer};
pub use skeleton::{SkeletonRenderer, SkeletonVolume, MAX_VOXELS};

use swcvox_core::{BoundingVolume, TracingPath, VoxelCalibration};

/// An output stage for tracing paths.
pub trait Renderer {
    /// Rendered result.
    type Output;

    /// Renders `paths` into a volume of size `volume`.
    ///
    /// # Errors
    /// Fails with [`Error::PointOutsideVolume`] when a point has no place in
    /// the volume, or with a renderer-specific error.
    fn render(
        &self,
        paths: &[TracingPath],
        volume: &BoundingVolume,
        calibration: Option<&VoxelCalibration>,
    ) -> Result<Self::Output>;

    /// Returns the name of the renderer.
    fn name(&self) -> &'static str;
}

/// Verifies that every point of every path has a place in `volume`.
///
/// # Errors
/// Returns [`Error::PointOutsideVolume`] for the first stray point.
pub fn check_inside(paths: &[TracingPath], volume: &BoundingVolume) -> Result<()> {
    for path in paths {
        for (index, point) in path.points.iter().enumerate() {
            let voxel = point.voxel();
            if !volume.contains(voxel) {
                return Err(Error::PointOutsideVolume {
                    path: path.id,
                    index,
                    voxel,
                    volume: volume.dims(),
                });
            }
        }
    }
    Ok(())
}
