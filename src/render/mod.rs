//! Rendering seam: the collaborator contract, image formats and a built-in box raycaster.

/// Render collaborator trait and request types.
pub mod collaborator;
/// Output image containers.
pub mod format;
/// CPU raycaster for an axis-aligned box.
pub mod raycast;
