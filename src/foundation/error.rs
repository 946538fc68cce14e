use crate::foundation::core::Split;

/// Convenience result type used across orbitset.
pub type OrbitsetResult<T> = Result<T, OrbitsetError>;

/// Top-level error taxonomy used by dataset generation APIs.
#[derive(thiserror::Error, Debug)]
pub enum OrbitsetError {
    /// Missing or invalid configuration, or a degenerate geometric setup detected before rendering.
    #[error("configuration error: {0}")]
    Config(String),

    /// The render collaborator failed for one frame.
    #[error("render failure for {split} frame {index}: {message}")]
    Render {
        /// Split the frame belongs to.
        split: Split,
        /// Global (trajectory) index of the frame.
        index: usize,
        /// Collaborator-provided failure description.
        message: String,
    },

    /// Errors when serializing or deserializing manifests and configs.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OrbitsetError {
    /// Build an [`OrbitsetError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`OrbitsetError::Render`] value.
    pub fn render(split: Split, index: usize, msg: impl Into<String>) -> Self {
        Self::Render {
            split,
            index,
            message: msg.into(),
        }
    }

    /// Build an [`OrbitsetError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors that abort a run before any rendering starts.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
