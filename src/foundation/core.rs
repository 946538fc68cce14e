use crate::foundation::error::{OrbitsetError, OrbitsetResult};

pub use glam::{DMat3, DMat4, DVec3, DVec4};

/// Dataset partition a frame belongs to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// Training views.
    Train,
    /// Held-out evaluation views.
    Test,
}

impl Split {
    /// Both splits, in manifest-writing order.
    pub const ALL: [Split; 2] = [Split::Train, Split::Test];

    /// Lowercase name, also used as the image subdirectory.
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }

    /// Manifest file name for this split (`transforms_train.json` / `transforms_test.json`).
    pub fn manifest_file_name(self) -> String {
        format!("transforms_{}.json", self.as_str())
    }

    /// Split-relative, extension-less image path for a per-split index (`train/r_3`).
    pub fn frame_path(self, local_index: usize) -> String {
        format!("{}/r_{local_index}", self.as_str())
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output image dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a validated resolution with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> OrbitsetResult<Self> {
        if width == 0 || height == 0 {
            return Err(OrbitsetError::config(
                "output.resolution width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    /// Width over height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl From<[u32; 2]> for Resolution {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

impl From<Resolution> for [u32; 2] {
    fn from(r: Resolution) -> Self {
        [r.width, r.height]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
