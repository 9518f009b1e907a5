//! Scene decorations drawn alongside the point cloud.
//!
//! Clip plane outlines in world space and screen-space overlays for
//! loading progress and render statistics.

/// Gizmo outlines of clip planes across the cloud bounds.
pub mod clip_plane_helpers;

/// Loading overlay and native statistics text.
pub mod overlays;
