//! Skeleton rasterization.
//!
//! Each path is drawn as a chain of voxel lines between consecutive points.
//! Lines are walked with a DDA over the dominant axis, so every step moves
//! at most one voxel along each axis and the skeleton stays 26-connected.

use crate::{check_inside, Error, Renderer, Result};
use rayon::prelude::*;
use swcvox_core::{BoundingVolume, TracingPath, VoxelCalibration};

/// Largest volume the skeleton renderer will allocate, in voxels.
pub const MAX_VOXELS: u64 = 1 << 31;

/// Value written to voxels on a traced segment.
pub const FOREGROUND: u8 = 255;

/// An 8-bit voxel volume in x-fastest (then y, then z) order.
#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonVolume {
    /// Size of the volume.
    pub volume: BoundingVolume,
    /// Physical voxel size, if calibrated.
    pub calibration: Option<VoxelCalibration>,
    /// Voxel values, `width * height * depth` long.
    pub data: Vec<u8>,
}

impl SkeletonVolume {
    fn linear_index(&self, [x, y, z]: [u64; 3]) -> usize {
        let idx = (z * self.volume.height + y) * self.volume.width + x;
        usize::try_from(idx).unwrap_or(usize::MAX)
    }

    /// Value at a voxel, `None` when outside the volume.
    #[must_use]
    pub fn get(&self, x: u64, y: u64, z: u64) -> Option<u8> {
        if x >= self.volume.width || y >= self.volume.height || z >= self.volume.depth {
            return None;
        }
        self.data.get(self.linear_index([x, y, z])).copied()
    }

    /// Number of foreground voxels.
    #[must_use]
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == FOREGROUND).count()
    }

    /// Borrows one z slice.
    #[must_use]
    pub fn slice(&self, z: u64) -> Option<&[u8]> {
        if z >= self.volume.depth {
            return None;
        }
        let plane = usize::try_from(self.volume.width * self.volume.height).ok()?;
        let start = usize::try_from(z).ok()? * plane;
        self.data.get(start..start + plane)
    }
}

/// Rasterizes paths into a [`SkeletonVolume`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SkeletonRenderer;

impl SkeletonRenderer {
    /// Creates a skeleton renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for SkeletonRenderer {
    type Output = SkeletonVolume;

    fn render(
        &self,
        paths: &[TracingPath],
        volume: &BoundingVolume,
        calibration: Option<&VoxelCalibration>,
    ) -> Result<SkeletonVolume> {
        check_inside(paths, volume)?;

        let too_large = || Error::VolumeTooLarge {
            dims: volume.dims(),
            limit: MAX_VOXELS,
        };
        let voxels = volume
            .voxel_count()
            .filter(|&n| n <= MAX_VOXELS)
            .ok_or_else(too_large)?;
        let len = usize::try_from(voxels).map_err(|_| too_large())?;

        let mut skeleton = SkeletonVolume {
            volume: *volume,
            calibration: calibration.cloned(),
            data: vec![0; len],
        };

        // Walk paths in parallel, then write sequentially.
        let traced: Vec<Vec<[u64; 3]>> = paths
            .par_iter()
            .map(|path| trace_path(path, volume))
            .collect();

        for voxel in traced.into_iter().flatten() {
            let idx = skeleton.linear_index(voxel);
            skeleton.data[idx] = FOREGROUND;
        }

        log::debug!(
            "rasterized {} paths into {}x{}x{} volume ({} voxels set)",
            paths.len(),
            volume.width,
            volume.height,
            volume.depth,
            skeleton.foreground_count()
        );

        Ok(skeleton)
    }

    fn name(&self) -> &'static str {
        "untagged skeleton"
    }
}

/// Voxels covered by one path. Points must already be inside `volume`.
fn trace_path(path: &TracingPath, volume: &BoundingVolume) -> Vec<[u64; 3]> {
    let voxels: Vec<[i64; 3]> = path.points.iter().map(|p| p.voxel()).collect();
    let mut out = Vec::with_capacity(voxels.len() * 2);
    match voxels.as_slice() {
        [] => {}
        [single] => out.extend(volume.locate(*single)),
        _ => {
            for pair in voxels.windows(2) {
                walk_line(pair[0], pair[1], |v| out.extend(volume.locate(v)));
            }
        }
    }
    out
}

/// Visits every voxel on the line from `a` to `b`, both ends included.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn walk_line(a: [i64; 3], b: [i64; 3], mut visit: impl FnMut([i64; 3])) {
    let delta = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let steps = delta.iter().map(|d| d.abs()).max().unwrap_or(0);
    if steps == 0 {
        visit(a);
        return;
    }
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        visit([
            a[0] + (delta[0] as f64 * t).round() as i64,
            a[1] + (delta[1] as f64 * t).round() as i64,
            a[2] + (delta[2] as f64 * t).round() as i64,
        ]);
    }
}
