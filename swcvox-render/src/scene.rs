//! Colored 3-D scene rendering.

use crate::color::{swc_color, Rgb};
use crate::{check_inside, Renderer, Result};
use serde::{Deserialize, Serialize};
use swcvox_core::{BoundingVolume, SwcType, TracingPath, VoxelCalibration};

/// One path drawn as a colored polyline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenePolyline {
    /// Id of the source path.
    pub path: usize,
    /// Id of the path this one branches off.
    pub parent: Option<usize>,
    /// Structure type of the source path.
    pub swc_type: SwcType,
    /// Display color.
    pub color: Rgb,
    /// Vertices in tracing coordinates.
    pub points: Vec<[f64; 3]>,
}

/// A renderable scene: polylines placed in a bounded, optionally calibrated volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Volume the scene is placed in.
    pub volume: BoundingVolume,
    /// Physical voxel size, if calibrated.
    pub calibration: Option<VoxelCalibration>,
    /// One polyline per path.
    pub polylines: Vec<ScenePolyline>,
}

impl Scene {
    /// Total number of vertices across all polylines.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.polylines.iter().map(|p| p.points.len()).sum()
    }
}

/// Builds [`Scene`]s, either colored by structure type or monochrome.
#[derive(Clone, Copy, Debug, Default)]
pub struct SceneRenderer {
    colorize: bool,
}

impl SceneRenderer {
    /// Renderer that colors each path by its structure type.
    #[must_use]
    pub fn colorized() -> Self {
        Self { colorize: true }
    }

    /// Renderer that paints every path white.
    #[must_use]
    pub fn monochrome() -> Self {
        Self { colorize: false }
    }
}

impl Renderer for SceneRenderer {
    type Output = Scene;

    fn render(
        &self,
        paths: &[TracingPath],
        volume: &BoundingVolume,
        calibration: Option<&VoxelCalibration>,
    ) -> Result<Scene> {
        check_inside(paths, volume)?;

        let polylines = paths
            .iter()
            .map(|p| ScenePolyline {
                path: p.id,
                parent: p.parent,
                swc_type: p.swc_type,
                color: if self.colorize {
                    swc_color(p.swc_type)
                } else {
                    Rgb::WHITE
                },
                points: p.points.iter().map(|pt| pt.coords()).collect(),
            })
            .collect();

        Ok(Scene {
            volume: *volume,
            calibration: calibration.cloned(),
            polylines,
        })
    }

    fn name(&self) -> &'static str {
        if self.colorize {
            "3D scene (color)"
        } else {
            "3D scene (monochrome)"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use swcvox_core::TracingPoint;

    fn path(id: usize, ty: SwcType, coords: &[(f64, f64, f64)]) -> TracingPath {
        let mut p = TracingPath::new(id, None, ty);
        for &(x, y, z) in coords {
            p.push(TracingPoint::new(x, y, z, ty));
        }
        p
    }

    #[test]
    fn test_colorized_scene() {
        let paths = vec![
            path(0, SwcType::Soma, &[(1.0, 1.0, 0.0)]),
            path(1, SwcType::Axon, &[(1.0, 1.0, 0.0), (4.0, 2.0, 0.0)]),
        ];
        let volume = BoundingVolume::new(14, 12, 1);
        let scene = SceneRenderer::colorized()
            .render(&paths, &volume, None)
            .unwrap();

        assert_eq!(scene.polylines.len(), 2);
        assert_eq!(scene.polylines[0].color, Rgb::MAGENTA);
        assert_eq!(scene.polylines[1].color, Rgb::BLUE);
        assert_eq!(scene.vertex_count(), 3);
        assert!(scene.calibration.is_none());
    }

    #[test]
    fn test_monochrome_scene() {
        let paths = vec![path(0, SwcType::Dendrite, &[(1.0, 1.0, 0.0)])];
        let volume = BoundingVolume::new(11, 11, 1);
        let cal = VoxelCalibration::default();
        let scene = SceneRenderer::monochrome()
            .render(&paths, &volume, Some(&cal))
            .unwrap();

        assert_eq!(scene.polylines[0].color, Rgb::WHITE);
        assert_eq!(scene.calibration, Some(cal));
    }

    #[test]
    fn test_negative_point_fails() {
        let paths = vec![path(0, SwcType::Axon, &[(-3.0, 1.0, 0.0)])];
        let volume = BoundingVolume::new(11, 11, 1);
        let err = SceneRenderer::colorized()
            .render(&paths, &volume, None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PointOutsideVolume {
                voxel: [-3, 1, 0],
                ..
            }
        ));
    }
}
