//! JSON dataset configuration.

/// Config boundary objects and validation.
pub mod model;
