//! Session-oriented dataset generation.

/// Pose planning, rendering and manifest emission for one config.
pub mod dataset_session;
