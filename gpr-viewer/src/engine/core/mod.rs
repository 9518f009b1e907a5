//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, the shared viewer
//! state and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the point material, asset loaders, slider UI
/// and platform-specific configurations.
pub mod app_setup;

/// Application state machine from manifest loading to runtime execution.
pub mod app_state;

/// Interactive filter, slider and clip plane state for the active dataset.
pub mod viewer_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
