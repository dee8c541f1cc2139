//! Rendering error types.

use thiserror::Error;

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Rendering error types.
#[derive(Error, Debug)]
pub enum Error {
    /// A point rounds to a voxel outside the target volume.
    #[error(
        "path {path} point {index} at voxel ({}, {}, {}) lies outside the {}x{}x{} volume",
        .voxel[0], .voxel[1], .voxel[2], .volume[0], .volume[1], .volume[2]
    )]
    PointOutsideVolume {
        path: usize,
        index: usize,
        voxel: [i64; 3],
        volume: [u64; 3],
    },

    /// The volume cannot be allocated.
    #[error("volume {}x{}x{} exceeds the {} voxel limit", .dims[0], .dims[1], .dims[2], .limit)]
    VolumeTooLarge { dims: [u64; 3], limit: u64 },

    /// The importer failed.
    #[error("import error: {0}")]
    Import(Box<dyn std::error::Error + Send + Sync>),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] swcvox_core::Error),
}
