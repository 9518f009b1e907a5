//! Viewport camera system for point cloud scene navigation.
//!
//! Provides deterministic auto-framing of a cloud's bounds and an orbit
//! camera with smooth interpolation and mouse input handling.

/// Camera position and target that fit a bounding box in view.
pub mod auto_frame;

/// Viewport camera resource and controller system for scene navigation.
pub mod viewport_camera;
