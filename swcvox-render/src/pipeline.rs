//! Import → normalize → render, with one optional corrective retry.

use crate::{Error, Renderer, Result, Scene, SceneRenderer, SkeletonRenderer, SkeletonVolume};
use serde::{Deserialize, Serialize};
use std::fmt;
use swcvox_core::path::all_points;
use swcvox_core::{
    BoundingVolume, CoordinateNormalizer, GuessedOffset, Importer, Normalization, TracingPath,
    TransformParameters, VoxelCalibration,
};

/// Output flavor requested by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Polylines colored by structure type.
    #[default]
    ColorScene,
    /// Polylines in a single color.
    MonochromeScene,
    /// Rasterized `u8` skeleton volume.
    Skeleton,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ModeRenderer::new(*self).name())
    }
}

/// Output of a [`ModeRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum Rendered {
    /// A color or monochrome scene.
    Scene(Scene),
    /// A skeleton volume.
    Skeleton(SkeletonVolume),
}

/// Dispatches to the renderer matching a [`RenderMode`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ModeRenderer {
    mode: RenderMode,
}

impl ModeRenderer {
    /// Creates a renderer for `mode`.
    #[must_use]
    pub fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    /// Returns the configured mode.
    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }
}

impl Renderer for ModeRenderer {
    type Output = Rendered;

    fn render(
        &self,
        paths: &[TracingPath],
        volume: &BoundingVolume,
        calibration: Option<&VoxelCalibration>,
    ) -> Result<Rendered> {
        match self.mode {
            RenderMode::ColorScene => SceneRenderer::colorized()
                .render(paths, volume, calibration)
                .map(Rendered::Scene),
            RenderMode::MonochromeScene => SceneRenderer::monochrome()
                .render(paths, volume, calibration)
                .map(Rendered::Scene),
            RenderMode::Skeleton => SkeletonRenderer::new()
                .render(paths, volume, calibration)
                .map(Rendered::Skeleton),
        }
    }

    fn name(&self) -> &'static str {
        match self.mode {
            RenderMode::ColorScene => SceneRenderer::colorized().name(),
            RenderMode::MonochromeScene => SceneRenderer::monochrome().name(),
            RenderMode::Skeleton => SkeletonRenderer::new().name(),
        }
    }
}

/// Result of [`render_with_retry`].
#[derive(Clone, Debug)]
pub struct RenderRun<O> {
    /// Rendered output.
    pub output: O,
    /// Parameters the output was produced with.
    pub params: TransformParameters,
    /// Normalization of the successful attempt.
    pub normalization: Normalization,
    /// Number of imported paths.
    pub path_count: usize,
    /// True if the output came from the retry.
    pub retried: bool,
}

struct Attempt<O> {
    normalization: Normalization,
    path_count: usize,
    rendered: Result<O>,
}

fn attempt<I, R>(
    importer: &I,
    renderer: &R,
    normalizer: CoordinateNormalizer,
    params: &TransformParameters,
) -> Result<Attempt<R::Output>>
where
    I: Importer,
    R: Renderer,
{
    params.validate()?;
    let paths = importer
        .import(params)
        .map_err(|e| Error::Import(Box::new(e)))?;
    let normalization = normalizer.normalize(all_points(&paths))?;
    let calibration = params.calibration();
    let rendered = renderer.render(&paths, &normalization.volume, calibration.as_ref());
    Ok(Attempt {
        normalization,
        path_count: paths.len(),
        rendered,
    })
}

/// Imports, normalizes and renders, retrying at most once.
///
/// When rendering fails and `infer_offsets` is set, `confirm` is asked
/// whether to re-import with the guessed offset (scaling off). A second
/// failure is returned as is. Import and normalization errors are never
/// retried.
///
/// # Errors
/// Returns the import, normalization or final rendering error.
pub fn render_with_retry<I, R, F>(
    importer: &I,
    renderer: &R,
    params: TransformParameters,
    infer_offsets: bool,
    mut confirm: F,
) -> Result<RenderRun<R::Output>>
where
    I: Importer,
    R: Renderer,
    F: FnMut(&Error, &GuessedOffset) -> bool,
{
    let normalizer = CoordinateNormalizer::new().with_offset_inference(infer_offsets);

    let first = attempt(importer, renderer, normalizer, &params)?;
    let error = match first.rendered {
        Ok(output) => {
            return Ok(RenderRun {
                output,
                params,
                normalization: first.normalization,
                path_count: first.path_count,
                retried: false,
            })
        }
        Err(error) => error,
    };

    let Some(guessed) = first.normalization.guessed_offset else {
        return Err(error);
    };
    if !confirm(&error, &guessed) {
        return Err(error);
    }

    log::warn!(
        "{} failed for {} ({}); retrying with offset ({:.2}, {:.2}, {:.2})",
        renderer.name(),
        importer.source_name(),
        error,
        guessed.x,
        guessed.y,
        guessed.z
    );

    let params = params.retry_with(&guessed);
    let second = attempt(importer, renderer, normalizer, &params)?;
    let output = second.rendered?;
    Ok(RenderRun {
        output,
        params,
        normalization: second.normalization,
        path_count: second.path_count,
        retried: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use swcvox_swc::SwcDocument;

    const NEGATIVE_X: &str = "\
1 1 -20 5 0 1 -1
2 3 10 5 0 1 1
";

    #[test]
    fn test_mode_names_follow_renderers() {
        assert_eq!(
            ModeRenderer::new(RenderMode::ColorScene).name(),
            SceneRenderer::colorized().name()
        );
        assert_eq!(
            ModeRenderer::new(RenderMode::MonochromeScene).name(),
            SceneRenderer::monochrome().name()
        );
        assert_eq!(
            ModeRenderer::new(RenderMode::Skeleton).name(),
            SkeletonRenderer::new().name()
        );
        assert_eq!(RenderMode::Skeleton.to_string(), "untagged skeleton");
    }

    #[test]
    fn test_success_without_retry() {
        let doc = SwcDocument::parse("1 1 2 3 0 1 -1\n2 2 8 3 0 1 1\n").unwrap();
        let run = render_with_retry(
            &doc,
            &ModeRenderer::new(RenderMode::ColorScene),
            TransformParameters::new(),
            true,
            |_, _| panic!("no retry expected"),
        )
        .unwrap();
        assert!(!run.retried);
        assert_eq!(run.path_count, 1);
        assert!(matches!(run.output, Rendered::Scene(_)));
    }

    #[test]
    fn test_retry_applies_guessed_offset() {
        let doc = SwcDocument::parse(NEGATIVE_X).unwrap();
        let asked = Cell::new(0);
        let run = render_with_retry(
            &doc,
            &ModeRenderer::new(RenderMode::Skeleton),
            TransformParameters::new().with_scale(1.0, 1.0, 1.0),
            true,
            |err, guessed| {
                asked.set(asked.get() + 1);
                assert!(matches!(err, Error::PointOutsideVolume { .. }));
                assert_relative_eq!(guessed.x, 21.0, epsilon = 1e-9);
                true
            },
        )
        .unwrap();

        assert_eq!(asked.get(), 1);
        assert!(run.retried);
        assert!(run.params.apply_offset);
        assert!(!run.params.apply_scale);
        assert_eq!(run.normalization.volume.width, 41);
    }

    #[test]
    fn test_declined_retry_returns_error() {
        let doc = SwcDocument::parse(NEGATIVE_X).unwrap();
        let err = render_with_retry(
            &doc,
            &ModeRenderer::new(RenderMode::ColorScene),
            TransformParameters::new(),
            true,
            |_, _| false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PointOutsideVolume { .. }));
    }

    #[test]
    fn test_no_retry_without_inference() {
        let doc = SwcDocument::parse(NEGATIVE_X).unwrap();
        let err = render_with_retry(
            &doc,
            &ModeRenderer::new(RenderMode::MonochromeScene),
            TransformParameters::new(),
            false,
            |_, _| panic!("confirmation must not be requested"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::PointOutsideVolume { .. }));
    }

    #[test]
    fn test_import_errors_are_not_retried() {
        let doc = SwcDocument::parse("# empty\n").unwrap();
        let err = render_with_retry(
            &doc,
            &ModeRenderer::new(RenderMode::ColorScene),
            TransformParameters::new(),
            true,
            |_, _| panic!("confirmation must not be requested"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Import(_)));
        assert!(err.to_string().contains("no paths found"));
    }
}
