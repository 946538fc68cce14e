use crate::camera::pose::CameraToWorld;
use crate::foundation::core::{Resolution, Split};
use crate::foundation::error::OrbitsetResult;
use crate::render::format::ImageFormat;
use std::path::{Path, PathBuf};

/// Per-run settings handed to a [`RenderCollaborator`] before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSetup {
    /// Output image size.
    pub resolution: Resolution,
    /// Output image container.
    pub format: ImageFormat,
    /// Samples per pixel.
    pub samples: u32,
    /// Horizontal field of view in radians the virtual camera must use.
    pub camera_angle_x: f64,
}

/// One frame to render.
#[derive(Clone, Copy, Debug)]
pub struct RenderRequest<'a> {
    /// Global trajectory index.
    pub index: usize,
    /// Split the frame belongs to.
    pub split: Split,
    /// Camera-to-world transform (camera looks down local −Z, +Y up).
    pub transform: CameraToWorld,
    /// Horizontal field of view in radians.
    pub camera_angle_x: f64,
    /// Image path to write, extension included.
    pub output_path: &'a Path,
}

/// Produces one image per pose.
///
/// Ordering contract: `render` is called once per frame in strictly increasing trajectory index,
/// between a single `begin` and a single `end`. Calls block until the image is written.
pub trait RenderCollaborator {
    /// Called once before any frame is rendered.
    fn begin(&mut self, _setup: &RenderSetup) -> OrbitsetResult<()> {
        Ok(())
    }
    /// Render and write one frame.
    fn render(&mut self, request: &RenderRequest<'_>) -> OrbitsetResult<()>;
    /// Called once after the last frame, including after skipped failures.
    fn end(&mut self) -> OrbitsetResult<()> {
        Ok(())
    }
}

/// A captured [`RenderRequest`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRender {
    /// Global trajectory index.
    pub index: usize,
    /// Split.
    pub split: Split,
    /// Camera-to-world transform.
    pub transform: CameraToWorld,
    /// Horizontal field of view in radians.
    pub camera_angle_x: f64,
    /// Requested image path.
    pub output_path: PathBuf,
}

/// Collaborator that records requests without producing images. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    setup: Option<RenderSetup>,
    requests: Vec<RecordedRender>,
    ended: bool,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Setup captured in `begin`, if any.
    pub fn setup(&self) -> Option<&RenderSetup> {
        self.setup.as_ref()
    }

    /// Requests in call order.
    pub fn requests(&self) -> &[RecordedRender] {
        &self.requests
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl RenderCollaborator for RecordingRenderer {
    fn begin(&mut self, setup: &RenderSetup) -> OrbitsetResult<()> {
        self.setup = Some(setup.clone());
        self.requests.clear();
        self.ended = false;
        Ok(())
    }

    fn render(&mut self, request: &RenderRequest<'_>) -> OrbitsetResult<()> {
        self.requests.push(RecordedRender {
            index: request.index,
            split: request.split,
            transform: request.transform,
            camera_angle_x: request.camera_angle_x,
            output_path: request.output_path.to_path_buf(),
        });
        Ok(())
    }

    fn end(&mut self) -> OrbitsetResult<()> {
        self.ended = true;
        Ok(())
    }
}
