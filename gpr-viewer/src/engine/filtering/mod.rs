//! Per-point visibility and colour rules.
//!
//! Pure functions used by mesh building and the CPU statistics. The window
//! and plane tests are mirrored in the point shader.

/// Axis-aligned clip planes with mirror controls.
pub mod clip_planes;

/// Stored colour to intensity and display colour.
pub mod intensity;

/// Inclusive intensity window with tolerance.
pub mod range_filter;
