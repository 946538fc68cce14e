//! Train/test partitioning and the on-disk dataset layout.

/// Output directory layout.
pub mod layout;
/// Train/test split policies.
pub mod partition;
