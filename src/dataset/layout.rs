use crate::foundation::core::Split;
use crate::foundation::error::OrbitsetResult;
use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// On-disk layout of one object's dataset:
///
/// ```text
/// {directory}/{object}/transforms_train.json
/// {directory}/{object}/transforms_test.json
/// {directory}/{object}/train/r_{i}.{ext}
/// {directory}/{object}/test/r_{i}.{ext}
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    extension: String,
}

impl OutputLayout {
    /// Layout rooted at `directory/object_name`, writing images with `extension`.
    pub fn new(
        directory: impl AsRef<Path>,
        object_name: &str,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            root: directory.as_ref().join(object_name),
            extension: extension.into(),
        }
    }

    /// Per-object root directory (manifests live here).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Image file extension, without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Create the root and both split directories. Safe to call on an existing layout.
    pub fn prepare(&self) -> OrbitsetResult<()> {
        for split in Split::ALL {
            let dir = self.split_dir(split);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create split directory '{}'", dir.display()))?;
        }
        Ok(())
    }

    /// Image directory of `split`.
    pub fn split_dir(&self, split: Split) -> PathBuf {
        self.root.join(split.as_str())
    }

    /// Absolute image path for a split-relative, extension-less frame path.
    pub fn image_path(&self, file_path: &str) -> PathBuf {
        self.root.join(format!("{file_path}.{}", self.extension))
    }

    /// Manifest path of `split`.
    pub fn manifest_path(&self, split: Split) -> PathBuf {
        self.root.join(split.manifest_file_name())
    }
}
