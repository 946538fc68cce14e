use crate::camera::pose::CameraToWorld;
use crate::foundation::core::Split;
use crate::foundation::error::{OrbitsetError, OrbitsetResult};
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::{Path, PathBuf};

/// One rendered frame as listed in a split manifest.
///
/// `camera_angle_x` is kept per record in memory but is written once per manifest, so it is not
/// part of the serialized frame object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Split-relative, extension-less image path (`train/r_0`).
    pub file_path: String,
    /// Opaque auxiliary per-step angle supplied by the trajectory strategy.
    pub rotation: f64,
    /// Camera-to-world matrix, row-major, last row `[0, 0, 0, 1]`.
    pub transform_matrix: [[f64; 4]; 4],
    /// Horizontal field of view in radians used for this frame.
    #[serde(skip_serializing, default)]
    pub camera_angle_x: f64,
}

impl FrameRecord {
    /// Build a record from a split-relative path and a camera-to-world transform.
    pub fn new(
        file_path: impl Into<String>,
        rotation: f64,
        transform: &CameraToWorld,
        camera_angle_x: f64,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            rotation,
            transform_matrix: transform.to_rows(),
            camera_angle_x,
        }
    }

    /// The stored matrix as a camera-to-world transform.
    pub fn transform(&self) -> CameraToWorld {
        CameraToWorld::from_rows(&self.transform_matrix)
    }
}

/// Per-split manifest: one intrinsic and the ordered frame list.
///
/// Serialized key order (`camera_angle_x`, then `frames` with `file_path`, `rotation`,
/// `transform_matrix`) is what training pipelines read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Horizontal field of view in radians, shared by every frame of the split.
    pub camera_angle_x: f64,
    /// Frames in sampling order.
    pub frames: Vec<FrameRecord>,
}

impl Manifest {
    /// Parse a manifest from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> OrbitsetResult<Self> {
        let mut manifest: Manifest = serde_json::from_reader(r)
            .map_err(|e| OrbitsetError::serde(format!("parse manifest JSON: {e}")))?;
        let angle = manifest.camera_angle_x;
        for frame in &mut manifest.frames {
            frame.camera_angle_x = angle;
        }
        Ok(manifest)
    }

    /// Parse a manifest from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> OrbitsetResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open manifest '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Structured JSON document for this manifest.
    pub fn to_value(&self) -> OrbitsetResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| OrbitsetError::serde(e.to_string()))
    }

    /// Write this manifest as pretty-printed JSON.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> OrbitsetResult<()> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        let f = File::create(path)
            .with_context(|| format!("create manifest '{}'", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, self)
            .map_err(|e| OrbitsetError::serde(format!("write manifest: {e}")))?;
        w.write_all(b"\n")
            .and_then(|()| w.flush())
            .with_context(|| format!("flush manifest '{}'", path.display()))?;
        Ok(())
    }
}

/// Accumulates frame records per split in traversal order.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    train: Vec<FrameRecord>,
    test: Vec<FrameRecord>,
}

/// Outcome of writing all split manifests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManifestOutcome {
    /// Manifest files written, in split order.
    pub written: Vec<(Split, PathBuf)>,
    /// Splits that received no frames and therefore have no manifest.
    pub empty_splits: Vec<Split>,
}

impl ManifestBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame to `split`.
    pub fn record(&mut self, split: Split, frame: FrameRecord) {
        self.frames_mut(split).push(frame);
    }

    /// Frames recorded so far for `split`.
    pub fn frames(&self, split: Split) -> &[FrameRecord] {
        match split {
            Split::Train => &self.train,
            Split::Test => &self.test,
        }
    }

    fn frames_mut(&mut self, split: Split) -> &mut Vec<FrameRecord> {
        match split {
            Split::Train => &mut self.train,
            Split::Test => &mut self.test,
        }
    }

    /// Build the manifest for `split`.
    ///
    /// Returns `None` (and logs a warning) when the split has no frames: without a first frame
    /// there is no `camera_angle_x` to publish.
    pub fn finalize(&self, split: Split) -> Option<Manifest> {
        let frames = self.frames(split);
        let Some(first) = frames.first() else {
            tracing::warn!(%split, "split received no frames; manifest not written");
            return None;
        };
        let camera_angle_x = first.camera_angle_x;
        if let Some(other) = frames
            .iter()
            .find(|f| (f.camera_angle_x - camera_angle_x).abs() > 1e-12)
        {
            tracing::warn!(
                %split,
                first = camera_angle_x,
                file_path = %other.file_path,
                other = other.camera_angle_x,
                "camera_angle_x varies within split; manifest keeps the first value"
            );
        }
        Some(Manifest {
            camera_angle_x,
            frames: frames.to_vec(),
        })
    }

    /// Write `transforms_{split}.json` into `dir` for every non-empty split.
    #[tracing::instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub fn write_all(&self, dir: &Path) -> OrbitsetResult<ManifestOutcome> {
        let mut outcome = ManifestOutcome::default();
        for split in Split::ALL {
            match self.finalize(split) {
                Some(manifest) => {
                    let path = dir.join(split.manifest_file_name());
                    manifest.write_to_path(&path)?;
                    tracing::info!(
                        %split,
                        frames = manifest.frames.len(),
                        path = %path.display(),
                        "wrote manifest"
                    );
                    outcome.written.push((split, path));
                }
                None => outcome.empty_splits.push(split),
            }
        }
        Ok(outcome)
    }
}

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> OrbitsetResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/builder.rs"]
mod tests;
