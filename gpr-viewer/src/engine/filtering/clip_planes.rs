use bevy::prelude::*;
use constants::render_settings::CLIP_PLANE_EPSILON;
use serde::{Deserialize, Serialize};

use crate::engine::assets::bounds::PointCloudBounds;

/// World axis a clip plane is perpendicular to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipAxis {
    X,
    Y,
    Z,
}

impl ClipAxis {
    pub const ALL: [ClipAxis; 3] = [ClipAxis::X, ClipAxis::Y, ClipAxis::Z];

    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    /// Convert string identifier to an axis for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// Inclusive offset range a plane may move within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    fn from_bounds(bounds: &PointCloudBounds, axis: ClipAxis) -> Self {
        Self {
            min: bounds.axis_min(axis) - CLIP_PLANE_EPSILON,
            max: bounds.axis_max(axis) + CLIP_PLANE_EPSILON,
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Flat dataset on this axis; the control has no travel to offer.
    pub fn is_degenerate(&self) -> bool {
        self.max - self.min <= 2.0 * CLIP_PLANE_EPSILON + f32::EPSILON
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

/// Half-space test along one axis.
///
/// Unmirrored planes keep `p.axis <= offset`, mirrored ones keep `p.axis >= offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    pub axis: ClipAxis,
    pub offset: f32,
    pub mirrored: bool,
    pub show_helper: bool,
}

impl ClipPlane {
    pub fn sign(&self) -> f32 {
        if self.mirrored { -1.0 } else { 1.0 }
    }

    pub fn keeps(&self, position: Vec3) -> bool {
        let coordinate = position.dot(self.axis.unit());
        if self.mirrored {
            coordinate >= self.offset
        } else {
            coordinate <= self.offset
        }
    }
}

/// The three axis planes of the current dataset. A point survives only if
/// every plane keeps it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlaneSet {
    planes: [ClipPlane; 3],
    ranges: [AxisRange; 3],
}

impl Default for ClipPlaneSet {
    fn default() -> Self {
        Self::from_bounds(&PointCloudBounds::default())
    }
}

impl ClipPlaneSet {
    /// Unclipped planes: every offset at the bounds maximum, none mirrored.
    pub fn from_bounds(bounds: &PointCloudBounds) -> Self {
        let planes = ClipAxis::ALL.map(|axis| ClipPlane {
            axis,
            offset: bounds.axis_max(axis),
            mirrored: false,
            show_helper: false,
        });
        let ranges = ClipAxis::ALL.map(|axis| AxisRange::from_bounds(bounds, axis));

        Self { planes, ranges }
    }

    pub fn planes(&self) -> &[ClipPlane; 3] {
        &self.planes
    }

    pub fn plane(&self, axis: ClipAxis) -> &ClipPlane {
        &self.planes[axis.index()]
    }

    pub fn range(&self, axis: ClipAxis) -> AxisRange {
        self.ranges[axis.index()]
    }

    /// Move a plane, clamped into its axis range. Returns the applied offset.
    /// Non-finite requests leave the plane where it is.
    pub fn set_offset(&mut self, axis: ClipAxis, offset: f32) -> f32 {
        let range = self.range(axis);
        let plane = &mut self.planes[axis.index()];
        if offset.is_finite() {
            plane.offset = range.clamp(offset);
        }
        plane.offset
    }

    pub fn set_mirrored(&mut self, axis: ClipAxis, mirrored: bool) {
        self.planes[axis.index()].mirrored = mirrored;
    }

    pub fn toggle_mirror(&mut self, axis: ClipAxis) -> bool {
        let plane = &mut self.planes[axis.index()];
        plane.mirrored = !plane.mirrored;
        plane.mirrored
    }

    pub fn set_helper_visible(&mut self, axis: ClipAxis, visible: bool) {
        self.planes[axis.index()].show_helper = visible;
    }

    pub fn keeps(&self, position: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.keeps(position))
    }

    pub fn offsets(&self) -> Vec3 {
        Vec3::from_array(self.planes.map(|plane| plane.offset))
    }

    pub fn signs(&self) -> Vec3 {
        Vec3::from_array(self.planes.map(|plane| plane.sign()))
    }

    pub fn to_json(&self) -> serde_json::Value {
        let planes: Vec<serde_json::Value> = self
            .planes
            .iter()
            .map(|plane| {
                let range = self.range(plane.axis);
                serde_json::json!({
                    "axis": plane.axis.as_str(),
                    "offset": plane.offset,
                    "mirrored": plane.mirrored,
                    "show_helper": plane.show_helper,
                    "min": range.min,
                    "max": range.max,
                })
            })
            .collect();
        serde_json::Value::Array(planes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> PointCloudBounds {
        PointCloudBounds::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn defaults_keep_the_center() {
        let bounds = unit_box();
        let planes = ClipPlaneSet::from_bounds(&bounds);
        assert!(planes.keeps(bounds.center()));
        assert!(planes.keeps(bounds.max));
        assert!(planes.keeps(bounds.min));
    }

    #[test]
    fn lowering_an_offset_clips_and_mirroring_restores() {
        let bounds = unit_box();
        let center = bounds.center();

        for axis in ClipAxis::ALL {
            let mut planes = ClipPlaneSet::from_bounds(&bounds);
            planes.set_offset(axis, -0.5);
            assert!(!planes.keeps(center), "{axis:?} should clip the center");

            planes.toggle_mirror(axis);
            assert!(planes.keeps(center), "{axis:?} mirror should restore");
        }
    }

    #[test]
    fn planes_intersect() {
        let mut planes = ClipPlaneSet::from_bounds(&unit_box());
        planes.set_offset(ClipAxis::X, 0.0);
        planes.set_offset(ClipAxis::Z, 0.0);
        planes.set_mirrored(ClipAxis::Z, true);

        assert!(planes.keeps(Vec3::new(-0.5, 0.9, 0.5)));
        assert!(!planes.keeps(Vec3::new(0.5, 0.9, 0.5)));
        assert!(!planes.keeps(Vec3::new(-0.5, 0.9, -0.5)));
    }

    #[test]
    fn offsets_are_clamped_to_bounds() {
        let mut planes = ClipPlaneSet::from_bounds(&unit_box());
        let applied = planes.set_offset(ClipAxis::Y, 50.0);
        assert!((applied - (1.0 + CLIP_PLANE_EPSILON)).abs() < 1e-6);

        let applied = planes.set_offset(ClipAxis::Y, -50.0);
        assert!((applied + (1.0 + CLIP_PLANE_EPSILON)).abs() < 1e-6);

        let applied = planes.set_offset(ClipAxis::Y, f32::NAN);
        assert_eq!(applied, planes.plane(ClipAxis::Y).offset);
    }

    #[test]
    fn flat_axis_collapses_range_without_failing() {
        let bounds = PointCloudBounds::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        let mut planes = ClipPlaneSet::from_bounds(&bounds);

        assert!(planes.range(ClipAxis::Y).is_degenerate());
        assert!(!planes.range(ClipAxis::X).is_degenerate());

        let applied = planes.set_offset(ClipAxis::Y, 10.0);
        assert!((applied - 2.0).abs() < 1e-5);
        assert!(planes.keeps(Vec3::new(0.5, 2.0, 0.5)));
    }

    #[test]
    fn mirroring_keeps_offset() {
        let mut planes = ClipPlaneSet::from_bounds(&unit_box());
        planes.set_offset(ClipAxis::X, 0.25);
        planes.toggle_mirror(ClipAxis::X);

        assert_eq!(planes.plane(ClipAxis::X).offset, 0.25);
        assert_eq!(planes.signs(), Vec3::new(-1.0, 1.0, 1.0));
    }

    #[test]
    fn axis_names_round_trip() {
        for axis in ClipAxis::ALL {
            assert_eq!(ClipAxis::from_string(axis.as_str()), Some(axis));
        }
        assert_eq!(ClipAxis::from_string("Z"), Some(ClipAxis::Z));
        assert_eq!(ClipAxis::from_string("w"), None);
    }
}
