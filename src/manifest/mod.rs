//! Per-split NeRF-style `transforms_*.json` manifests.

/// Frame records, manifests and the per-split accumulator.
pub mod builder;
