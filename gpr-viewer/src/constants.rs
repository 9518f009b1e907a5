/// Asset paths resolved against the Bevy asset root.
pub mod path;

/// Viewer-local UI and overlay settings.
pub mod render_settings;
