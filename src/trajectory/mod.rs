//! Camera trajectories around a point target.

/// Position sampling strategies.
pub mod sampler;
