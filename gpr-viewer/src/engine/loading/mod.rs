//! Asset loading and initialisation systems for point cloud data.
//!
//! Manages the pipeline from manifest parsing through guarded dataset loads
//! to spawning the renderable cloud and framing the camera.

/// Guarded, single-flight dataset loading and completion handling.
///
/// Rejects overlapping requests, despawns the previous cloud and resets
/// viewer state when the new cloud arrives.
pub mod dataset_loader;

/// Dataset manifest loading and viewer option application.
pub mod manifest_loader;

/// Point cloud entity creation with the filtering material attached.
pub mod point_cloud_creator;

/// `.ply` asset loader for ASCII and binary point clouds.
pub mod ply_loader;
