//! Runtime systems for diagnostics and native input.
//!
//! FPS and visible-point reporting for both the native overlay and the web
//! frontend, plus keyboard shortcuts for native builds.

/// Keyboard clip plane control and dataset cycling for native builds.
pub mod clip_plane_controls;

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to frontend via RPC.
pub mod fps_tracking;

/// CPU-side count of points passing the current filter.
pub mod visibility_stats;
