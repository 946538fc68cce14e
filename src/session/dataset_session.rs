use crate::camera::pose::{CameraToWorld, Pose};
use crate::config::model::DatasetConfig;
use crate::dataset::layout::OutputLayout;
use crate::dataset::partition::{PartitionPolicy, SplitPlan, plan_splits};
use crate::foundation::core::Split;
use crate::foundation::error::{OrbitsetError, OrbitsetResult};
use crate::manifest::builder::{FrameRecord, ManifestBuilder};
use crate::render::collaborator::{RenderCollaborator, RenderRequest, RenderSetup};
use crate::trajectory::sampler::{self, TrajectoryStrategy};
use serde::Serialize;
use std::path::PathBuf;

/// What to do when the render collaborator fails for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFailurePolicy {
    /// Stop the run and return the failure. No manifests are written.
    #[default]
    Abort,
    /// Leave the frame out of its manifest, keep going, and report it.
    Skip,
}

/// Run-time overrides applied on top of the config's `dataset` section.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DatasetSessionOpts {
    /// Override `dataset.train_fraction`.
    pub train_fraction: Option<f64>,
    /// Override `dataset.partition`.
    pub partition: Option<PartitionPolicy>,
    /// Override `dataset.on_render_failure`.
    pub on_render_failure: Option<RenderFailurePolicy>,
}

/// One planned frame: pose, split slot and output locations.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlannedFrame {
    /// Global trajectory index.
    pub index: usize,
    /// Split the frame is assigned to.
    pub split: Split,
    /// Index within the split.
    pub local_index: usize,
    /// Split-relative, extension-less path recorded in the manifest.
    pub file_path: String,
    /// Image path the renderer writes.
    pub image_path: PathBuf,
    /// Camera-to-world matrix, row-major.
    pub transform_matrix: [[f64; 4]; 4],
}

/// Summary of a finished run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatasetReport {
    /// Frames planned.
    pub frames_total: usize,
    /// Frames the renderer completed.
    pub frames_rendered: usize,
    /// Frames left out after a skipped render failure.
    pub frames_skipped: usize,
    /// `(split, global index)` of every skipped frame.
    pub skipped: Vec<(Split, usize)>,
    /// Manifests written.
    pub manifests: Vec<(Split, PathBuf)>,
    /// Splits without frames, hence without a manifest.
    pub empty_splits: Vec<Split>,
    /// Stride used by the interleave policy.
    pub stride: Option<usize>,
}

/// Dataset generation for one validated config.
///
/// Construction front-loads every fallible geometric step: trajectory sampling, look-at solving
/// and split assignment. A degenerate setup therefore fails before any image is rendered.
#[derive(Debug)]
pub struct DatasetSession {
    strategy: TrajectoryStrategy,
    poses: Vec<Pose>,
    plan: SplitPlan,
    layout: OutputLayout,
    setup: RenderSetup,
    rotation: f64,
    failure_policy: RenderFailurePolicy,
}

impl DatasetSession {
    /// Validate `cfg` and plan every pose.
    #[tracing::instrument(skip_all, fields(object = %cfg.object.name))]
    pub fn new(cfg: &DatasetConfig, opts: DatasetSessionOpts) -> OrbitsetResult<Self> {
        let mut cfg = cfg.clone();
        if let Some(f) = opts.train_fraction {
            cfg.dataset.train_fraction = f;
        }
        if let Some(p) = opts.partition {
            cfg.dataset.partition = p;
        }
        if let Some(p) = opts.on_render_failure {
            cfg.dataset.on_render_failure = p;
        }
        cfg.validate()?;

        let n = cfg.num_images()?;
        let strategy = cfg.strategy()?;
        let target = cfg.target();
        let world_up = cfg.world_up(&strategy);

        let samples = sampler::generate(n, cfg.camera.distance, &strategy)?;
        let poses = samples
            .iter()
            .map(|s| Pose::looking_at(s.index, target + s.position, target, world_up))
            .collect::<OrbitsetResult<Vec<_>>>()?;

        let plan = plan_splits(n, cfg.dataset.train_fraction, cfg.dataset.partition)?;
        tracing::info!(
            strategy = strategy.name(),
            frames = n,
            train = plan.count(Split::Train),
            test = plan.count(Split::Test),
            partition = cfg.dataset.partition.name(),
            stride = ?plan.stride,
            "planned dataset"
        );
        let requested = plan.requested_train;
        let actual = plan.count(Split::Train);
        if actual != requested {
            tracing::debug!(requested, actual, "stride rounding changed the train count");
        }

        Ok(Self {
            rotation: cfg.rotation_step(&strategy),
            strategy,
            poses,
            plan,
            layout: cfg.layout(),
            setup: RenderSetup {
                resolution: cfg.output.resolution,
                format: cfg.output.format,
                samples: cfg.output.samples,
                camera_angle_x: cfg.camera_angle_x(),
            },
            failure_policy: cfg.dataset.on_render_failure,
        })
    }

    /// Trajectory strategy in use.
    pub fn strategy(&self) -> TrajectoryStrategy {
        self.strategy
    }

    /// Planned poses, by global index.
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Split assignment.
    pub fn split_plan(&self) -> &SplitPlan {
        &self.plan
    }

    /// Output layout.
    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Settings handed to the renderer in `begin`.
    pub fn render_setup(&self) -> &RenderSetup {
        &self.setup
    }

    /// Every frame in traversal order, without rendering anything.
    pub fn plan(&self) -> Vec<PlannedFrame> {
        self.poses
            .iter()
            .zip(&self.plan.slots)
            .map(|(pose, slot)| {
                let file_path = slot.file_path();
                PlannedFrame {
                    index: pose.index,
                    split: slot.split,
                    local_index: slot.local_index,
                    image_path: self.layout.image_path(&file_path),
                    file_path,
                    transform_matrix: pose.transform().to_rows(),
                }
            })
            .collect()
    }

    /// Render every frame in traversal order and write the split manifests.
    ///
    /// Frames are rendered sequentially in increasing global index. Manifests are written only
    /// after the last frame; an aborted run leaves none behind.
    #[tracing::instrument(skip_all, fields(root = %self.layout.root().display()))]
    pub fn run(&self, renderer: &mut dyn RenderCollaborator) -> OrbitsetResult<DatasetReport> {
        self.layout.prepare()?;
        renderer.begin(&self.setup)?;

        let mut report = DatasetReport {
            frames_total: self.poses.len(),
            stride: self.plan.stride,
            ..DatasetReport::default()
        };
        let mut manifests = ManifestBuilder::new();

        for (pose, slot) in self.poses.iter().zip(&self.plan.slots) {
            let file_path = slot.file_path();
            let image_path = self.layout.image_path(&file_path);
            let transform: CameraToWorld = pose.transform();
            let request = RenderRequest {
                index: pose.index,
                split: slot.split,
                transform,
                camera_angle_x: self.setup.camera_angle_x,
                output_path: &image_path,
            };

            match renderer.render(&request) {
                Ok(()) => {
                    tracing::debug!(index = pose.index, %file_path, "rendered frame");
                    manifests.record(
                        slot.split,
                        FrameRecord::new(
                            file_path,
                            self.rotation,
                            &transform,
                            self.setup.camera_angle_x,
                        ),
                    );
                    report.frames_rendered += 1;
                }
                Err(e) => {
                    let err = into_render_error(e, slot.split, pose.index);
                    match self.failure_policy {
                        RenderFailurePolicy::Abort => {
                            tracing::warn!(error = %err, "render failed; aborting run");
                            // Best effort; the render failure is what gets reported.
                            if let Err(end_err) = renderer.end() {
                                tracing::debug!(error = %end_err, "renderer end() failed after abort");
                            }
                            return Err(err);
                        }
                        RenderFailurePolicy::Skip => {
                            tracing::warn!(error = %err, "render failed; frame skipped");
                            report.skipped.push((slot.split, pose.index));
                            report.frames_skipped += 1;
                        }
                    }
                }
            }
        }
        renderer.end()?;

        let outcome = manifests.write_all(self.layout.root())?;
        report.manifests = outcome.written;
        report.empty_splits = outcome.empty_splits;
        tracing::info!(
            rendered = report.frames_rendered,
            skipped = report.frames_skipped,
            manifests = report.manifests.len(),
            "dataset complete"
        );
        Ok(report)
    }
}

fn into_render_error(e: OrbitsetError, split: Split, index: usize) -> OrbitsetError {
    match e {
        OrbitsetError::Render { .. } => e,
        other => OrbitsetError::render(split, index, other.to_string()),
    }
}

/// Plan and render a dataset in one call.
pub fn generate_dataset(
    cfg: &DatasetConfig,
    renderer: &mut dyn RenderCollaborator,
    opts: DatasetSessionOpts,
) -> OrbitsetResult<DatasetReport> {
    DatasetSession::new(cfg, opts)?.run(renderer)
}

#[cfg(test)]
#[path = "../../tests/unit/session/dataset_session.rs"]
mod tests;
