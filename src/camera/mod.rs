//! Look-at orientation solving and camera-to-world transforms.

/// Poses, look-at and the camera-to-world matrix.
pub mod pose;
