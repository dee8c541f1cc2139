use approx::assert_relative_eq;
use std::cell::Cell;
use swcvox_core::{BoundingVolume, TracingPath, TransformParameters, VoxelCalibration};
use swcvox_render::{
    render_with_retry, Error, ModeRenderer, RenderMode, Rendered, Renderer, Result,
};
use swcvox_swc::SwcDocument;

/// Renderer that always fails and counts its invocations.
struct FailingRenderer {
    calls: Cell<usize>,
}

impl Renderer for FailingRenderer {
    type Output = ();

    fn render(
        &self,
        _paths: &[TracingPath],
        volume: &BoundingVolume,
        _calibration: Option<&VoxelCalibration>,
    ) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        Err(Error::VolumeTooLarge {
            dims: volume.dims(),
            limit: 0,
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

const BELOW_ORIGIN: &str = "\
1 1 0 0 0 2 -1
2 2 -20 -10 -4 1 1
3 2 -30 15 6 1 2
";

#[test]
fn test_retry_is_bounded_to_one() {
    let doc = SwcDocument::parse(BELOW_ORIGIN).unwrap();
    let renderer = FailingRenderer {
        calls: Cell::new(0),
    };
    let confirmations = Cell::new(0);

    let err = render_with_retry(
        &doc,
        &renderer,
        TransformParameters::new(),
        true,
        |_, _| {
            confirmations.set(confirmations.get() + 1);
            true
        },
    )
    .unwrap_err();

    assert!(matches!(err, Error::VolumeTooLarge { .. }));
    assert_eq!(renderer.calls.get(), 2);
    assert_eq!(confirmations.get(), 1);
}

#[test]
fn test_skeleton_retry_end_to_end() {
    let doc = SwcDocument::parse(BELOW_ORIGIN).unwrap();
    let run = render_with_retry(
        &doc,
        &ModeRenderer::new(RenderMode::Skeleton),
        TransformParameters::new().with_voxel_size(0.5, 0.5, 1.0, "um"),
        true,
        |_, _| true,
    )
    .unwrap();

    assert!(run.retried);
    // min x = -30 -> 31.5, min y = -10 -> 10.5, min z = -4 -> 4.2
    let [x, y, z] = run.params.offset;
    assert_relative_eq!(x, 31.5, epsilon = 1e-9);
    assert_relative_eq!(y, 10.5, epsilon = 1e-9);
    assert_relative_eq!(z, 4.2, epsilon = 1e-9);

    let Rendered::Skeleton(skeleton) = run.output else {
        panic!("expected a skeleton");
    };
    assert!(skeleton.foreground_count() > 0);
    assert_eq!(skeleton.calibration.unwrap().unit, "um");
    assert!(run.normalization.volume.width >= 11);
}

#[test]
fn test_scene_modes_differ_only_in_color() {
    let doc = SwcDocument::parse("1 1 2 2 0 1 -1\n2 3 6 2 0 1 1\n").unwrap();
    let params = TransformParameters::new();

    let color = render_with_retry(
        &doc,
        &ModeRenderer::new(RenderMode::ColorScene),
        params.clone(),
        false,
        |_, _| false,
    )
    .unwrap();
    let mono = render_with_retry(
        &doc,
        &ModeRenderer::new(RenderMode::MonochromeScene),
        params,
        false,
        |_, _| false,
    )
    .unwrap();

    let (Rendered::Scene(color), Rendered::Scene(mono)) = (color.output, mono.output) else {
        panic!("expected scenes");
    };
    assert_eq!(color.volume, mono.volume);
    assert_eq!(color.vertex_count(), mono.vertex_count());
    assert_ne!(color.polylines[0].color, mono.polylines[0].color);
}
