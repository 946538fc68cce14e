//! orbitset generates multi-view object datasets in the NeRF "blender" layout.
//!
//! A run is session-oriented:
//!
//! - Load and validate a [`DatasetConfig`]
//! - Create a [`DatasetSession`], which samples the camera trajectory, solves every look-at
//!   orientation and assigns frames to train/test splits up front
//! - Run it against a [`RenderCollaborator`], which writes one image per pose, after which the
//!   session writes `transforms_train.json` and `transforms_test.json`
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Look-at orientation and camera-to-world transforms.
pub mod camera;
/// JSON dataset configuration.
pub mod config;
/// Train/test partitioning and output layout.
pub mod dataset;
/// Split manifests.
pub mod manifest;
/// Render collaborator seam and the built-in raycaster.
pub mod render;
/// Session-oriented dataset generation.
pub mod session;
/// Camera trajectory sampling.
pub mod trajectory;

pub use crate::foundation::core::{DMat3, DMat4, DVec3, Resolution, Split};
pub use crate::foundation::error::{OrbitsetError, OrbitsetResult};
pub use crate::foundation::math::{
    DEFAULT_ANGLE_X_DEG, GOLDEN_ANGLE, ORBIT_ROTATION_STEP, angular_distance, wrap_tau,
};

pub use crate::camera::pose::{CameraToWorld, Pose, look_at, look_at_y_up};
pub use crate::config::model::DatasetConfig;
pub use crate::dataset::layout::OutputLayout;
pub use crate::dataset::partition::{PartitionPolicy, SplitPlan, partition, plan_splits};
pub use crate::manifest::builder::{FrameRecord, Manifest, ManifestBuilder};
pub use crate::render::collaborator::{
    RecordedRender, RecordingRenderer, RenderCollaborator, RenderRequest, RenderSetup,
};
pub use crate::render::format::ImageFormat;
pub use crate::render::raycast::BoxRaycaster;
pub use crate::session::dataset_session::{
    DatasetReport, DatasetSession, DatasetSessionOpts, PlannedFrame, RenderFailurePolicy,
    generate_dataset,
};
pub use crate::trajectory::sampler::{SampledPosition, TrajectoryStrategy, generate};
