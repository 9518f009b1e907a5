//! Rendering of filtered point clouds.
//!
//! Custom material whose shader reads per-vertex intensity, applies the intensity
//! window and discards clipped fragments.

/// Point material, its uniform block and the state sync system.
pub mod point_material;
