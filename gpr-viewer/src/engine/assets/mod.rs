//! Asset types for point cloud datasets.
//!
//! Handles the dataset catalogue, decoded point data and spatial bounds.

/// Spatial bounds of a loaded cloud.
pub mod bounds;

/// Dataset catalogue and viewer options loaded from JSON.
pub mod dataset_manifest;

/// Decoded positions and stored colours as a Bevy asset.
pub mod point_cloud_data;
