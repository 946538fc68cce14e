use crate::dataset::layout::OutputLayout;
use crate::dataset::partition::PartitionPolicy;
use crate::foundation::core::{DVec3, Resolution};
use crate::foundation::error::{OrbitsetError, OrbitsetResult};
use crate::foundation::math::DEFAULT_ANGLE_X_DEG;
use crate::render::format::ImageFormat;
use crate::session::dataset_session::RenderFailurePolicy;
use crate::trajectory::sampler::TrajectoryStrategy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Dataset generation config: the JSON-facing, human-edited description of one run.
///
/// Keys the core does not consume (materials, environment maps, ...) are ignored so a single
/// file can also drive scene setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Image output settings.
    pub output: OutputDef,
    /// The object the cameras look at (`cube` in older configs).
    #[serde(alias = "cube")]
    pub object: ObjectDef,
    /// Trajectory and intrinsics.
    pub camera: CameraDef,
    /// Train/test split and failure handling.
    #[serde(default)]
    pub dataset: DatasetDef,
}

/// `output` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDef {
    /// `[width, height]` in pixels.
    pub resolution: Resolution,
    /// Image container.
    #[serde(default)]
    pub format: ImageFormat,
    /// Render samples per pixel.
    #[serde(default = "default_samples")]
    pub samples: u32,
    /// Output root directory.
    pub directory: PathBuf,
}

/// `object` / `cube` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDef {
    /// Per-object subdirectory name.
    #[serde(default = "default_object_name")]
    pub name: String,
    /// World-space look-at target and orbit centre.
    pub location: [f64; 3],
    /// Edge length of the object's bounding cube.
    #[serde(default = "default_object_size")]
    pub size: f64,
    /// Linear RGB albedo in `[0, 1]`.
    #[serde(default = "default_object_color")]
    pub color: [f64; 3],
}

/// `camera` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDef {
    /// Number of frames `n`.
    pub num_images: i64,
    /// Orbit radius.
    pub distance: f64,
    /// Wobble amplitude; selects the circular orbit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_movement: Option<f64>,
    /// Cap half-angle in degrees; selects the golden-angle spherical cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta_max_deg: Option<f64>,
    /// Horizontal field of view in degrees.
    #[serde(default = "default_angle_x_deg")]
    pub angle_x_deg: f64,
    /// Look-at world up; defaults per strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_up: Option<[f64; 3]>,
    /// Manifest `rotation` override; defaults per strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_step: Option<f64>,
}

/// `dataset` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDef {
    /// Fraction of frames assigned to the train split.
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
    /// Split policy.
    #[serde(default)]
    pub partition: PartitionPolicy,
    /// What to do when the renderer fails for a frame.
    #[serde(default)]
    pub on_render_failure: RenderFailurePolicy,
}

impl Default for DatasetDef {
    fn default() -> Self {
        Self {
            train_fraction: default_train_fraction(),
            partition: PartitionPolicy::default(),
            on_render_failure: RenderFailurePolicy::default(),
        }
    }
}

fn default_samples() -> u32 {
    1
}

fn default_object_name() -> String {
    "cube".to_string()
}

fn default_object_size() -> f64 {
    2.0
}

fn default_object_color() -> [f64; 3] {
    [0.8, 0.8, 0.85]
}

fn default_angle_x_deg() -> f64 {
    DEFAULT_ANGLE_X_DEG
}

fn default_train_fraction() -> f64 {
    1.0
}

impl DatasetConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> OrbitsetResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| OrbitsetError::config(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> OrbitsetResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            OrbitsetError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every value the core consumes.
    pub fn validate(&self) -> OrbitsetResult<()> {
        Resolution::new(self.output.resolution.width, self.output.resolution.height)?;
        if self.output.samples == 0 {
            return Err(OrbitsetError::config("output.samples must be > 0"));
        }
        if self.object.name.is_empty()
            || self.object.name.contains(['/', '\\'])
            || self.object.name == "."
            || self.object.name == ".."
        {
            return Err(OrbitsetError::config(format!(
                "object.name '{}' must be a single path component",
                self.object.name
            )));
        }
        if !self.object.location.iter().all(|v| v.is_finite()) {
            return Err(OrbitsetError::config("object.location must be finite"));
        }
        if !(self.object.size.is_finite() && self.object.size > 0.0) {
            return Err(OrbitsetError::config("object.size must be finite and > 0"));
        }

        self.num_images()?;
        let cam = &self.camera;
        if !(cam.distance.is_finite() && cam.distance > 0.0) {
            return Err(OrbitsetError::config(format!(
                "camera.distance must be finite and > 0, got {}",
                cam.distance
            )));
        }
        self.strategy()?.validate()?;
        if !(cam.angle_x_deg > 0.0 && cam.angle_x_deg < 180.0) {
            return Err(OrbitsetError::config(format!(
                "camera.angle_x_deg must be in (0, 180), got {}",
                cam.angle_x_deg
            )));
        }
        if let Some(up) = cam.world_up {
            let up = DVec3::from_array(up);
            if !up.is_finite() || up.length() < 1e-12 {
                return Err(OrbitsetError::config(
                    "camera.world_up must be a finite non-zero vector",
                ));
            }
        }
        if cam.rotation_step.is_some_and(|r| !r.is_finite()) {
            return Err(OrbitsetError::config("camera.rotation_step must be finite"));
        }

        let f = self.dataset.train_fraction;
        if !(f.is_finite() && (0.0..=1.0).contains(&f)) {
            return Err(OrbitsetError::config(format!(
                "dataset.train_fraction must be within [0, 1], got {f}"
            )));
        }
        Ok(())
    }

    /// Frame count `n` as an index bound.
    pub fn num_images(&self) -> OrbitsetResult<usize> {
        let n = self.camera.num_images;
        if n <= 0 {
            return Err(OrbitsetError::config(format!(
                "camera.num_images must be > 0, got {n}"
            )));
        }
        usize::try_from(n)
            .map_err(|_| OrbitsetError::config(format!("camera.num_images {n} is too large")))
    }

    /// Trajectory strategy selected by the camera keys.
    pub fn strategy(&self) -> OrbitsetResult<TrajectoryStrategy> {
        match (self.camera.vertical_movement, self.camera.theta_max_deg) {
            (Some(vertical_amplitude), None) => {
                Ok(TrajectoryStrategy::CircularOrbit { vertical_amplitude })
            }
            (None, Some(deg)) => Ok(TrajectoryStrategy::SphericalCap {
                theta_max: deg.to_radians(),
            }),
            (Some(_), Some(_)) => Err(OrbitsetError::config(
                "camera.vertical_movement and camera.theta_max_deg are mutually exclusive",
            )),
            (None, None) => Err(OrbitsetError::config(
                "camera needs either vertical_movement (circular orbit) or theta_max_deg \
                 (spherical cap)",
            )),
        }
    }

    /// Look-at target.
    pub fn target(&self) -> DVec3 {
        DVec3::from_array(self.object.location)
    }

    /// Horizontal field of view in radians.
    pub fn camera_angle_x(&self) -> f64 {
        self.camera.angle_x_deg.to_radians()
    }

    /// World up used for look-at.
    pub fn world_up(&self, strategy: &TrajectoryStrategy) -> DVec3 {
        self.camera
            .world_up
            .map(DVec3::from_array)
            .unwrap_or_else(|| strategy.default_world_up())
    }

    /// Manifest `rotation` scalar.
    pub fn rotation_step(&self, strategy: &TrajectoryStrategy) -> f64 {
        self.camera
            .rotation_step
            .unwrap_or_else(|| strategy.rotation_step())
    }

    /// Output layout for this config.
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(
            &self.output.directory,
            &self.object.name,
            self.output.format.extension(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
