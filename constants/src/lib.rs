//! Shared constants for the GPR viewer and its pre-processing tool.
//!
//! Kept free of engine dependencies so the CLI can link it cheaply.

/// Intensity colour ramp and its interpolation.
pub mod palette;

/// Data preparation defaults: voxel sizes, log offset, chunking.
pub mod processing;

/// Viewer tolerances, camera framing and interaction tuning.
pub mod render_settings;
