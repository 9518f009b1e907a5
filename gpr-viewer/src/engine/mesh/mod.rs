//! Mesh generation for point cloud rendering primitives.
//!
//! Point clouds are uploaded once per dataset as a point-list mesh; all
//! per-frame filtering happens in the point material.

/// Point-list mesh carrying positions, display colours and intensities.
pub mod point_mesh;
