use bevy::prelude::*;

use crate::engine::filtering::clip_planes::ClipAxis;

/// Axis-aligned bounds of the loaded cloud in world coordinates.
/// Derived once per dataset, drives clip plane ranges and camera framing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointCloudBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl PointCloudBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of every finite position. `None` when nothing finite remains.
    pub fn from_positions(positions: &[[f32; 3]]) -> Option<Self> {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut any = false;

        for position in positions {
            let point = Vec3::from_array(*position);
            if !point.is_finite() {
                continue;
            }
            min = min.min(point);
            max = max.max(point);
            any = true;
        }

        any.then_some(Self { min, max })
    }

    /// Calculate center point for camera positioning and orbit pivot.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    pub fn axis_min(&self, axis: ClipAxis) -> f32 {
        self.min[axis.index()]
    }

    pub fn axis_max(&self, axis: ClipAxis) -> f32 {
        self.max[axis.index()]
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "min": self.min.to_array(),
            "max": self.max.to_array(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_enclose_all_positions() {
        let bounds = PointCloudBounds::from_positions(&[
            [1.0, -2.0, 0.5],
            [-3.0, 4.0, 0.0],
            [0.0, 0.0, 6.0],
        ])
        .unwrap();

        assert_eq!(bounds.min, Vec3::new(-3.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 4.0, 6.0));
        assert_eq!(bounds.center(), Vec3::new(-1.0, 1.0, 3.0));
        assert_eq!(bounds.max_dimension(), 6.0);
    }

    #[test]
    fn non_finite_positions_are_ignored() {
        let bounds =
            PointCloudBounds::from_positions(&[[f32::NAN, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap();
        assert_eq!(bounds.min, Vec3::ONE);
        assert_eq!(bounds.max, Vec3::ONE);
    }

    #[test]
    fn empty_cloud_has_no_bounds() {
        assert!(PointCloudBounds::from_positions(&[]).is_none());
        assert!(PointCloudBounds::from_positions(&[[f32::INFINITY, 0.0, 0.0]]).is_none());
    }

    #[test]
    fn axis_accessors_follow_clip_axes() {
        let bounds = PointCloudBounds::new(Vec3::new(0.0, 1.0, 2.0), Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(bounds.axis_min(ClipAxis::Y), 1.0);
        assert_eq!(bounds.axis_max(ClipAxis::Z), 5.0);
    }
}
