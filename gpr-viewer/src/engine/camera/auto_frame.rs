use bevy::prelude::*;
use constants::render_settings::FRAMING_MARGIN;

use crate::engine::assets::bounds::PointCloudBounds;

/// Camera pose that fits a whole cloud in view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFraming {
    pub position: Vec3,
    pub target: Vec3,
    pub distance: f32,
}

/// Frame `bounds` for a camera with the given vertical field of view (radians).
///
/// The camera sits on the depth axis in front of the cloud center, far enough
/// back that the largest extent fits the vertical FOV, plus a fixed margin.
pub fn frame(bounds: &PointCloudBounds, vertical_fov: f32) -> CameraFraming {
    let target = bounds.center();
    let max_dim = bounds.max_dimension();
    let distance = (max_dim / 2.0 / (vertical_fov / 2.0).tan()).abs() * FRAMING_MARGIN;

    CameraFraming {
        position: target + Vec3::Z * distance,
        target,
        distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_at_origin_is_framed_on_depth_axis() {
        let bounds = PointCloudBounds::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let framing = frame(&bounds, 75_f32.to_radians());

        let expected = (1.0 / 37.5_f32.to_radians().tan()).abs() * 1.5;
        assert!((framing.distance - expected).abs() < 1e-5);
        assert_eq!(framing.target, Vec3::ZERO);
        assert!((framing.position - Vec3::new(0.0, 0.0, expected)).length() < 1e-5);
    }

    #[test]
    fn largest_extent_drives_distance() {
        let flat = PointCloudBounds::new(Vec3::ZERO, Vec3::new(10.0, 1.0, 0.5));
        let tall = PointCloudBounds::new(Vec3::ZERO, Vec3::new(1.0, 10.0, 0.5));
        let fov = 60_f32.to_radians();

        assert!((frame(&flat, fov).distance - frame(&tall, fov).distance).abs() < 1e-5);
        assert_eq!(frame(&flat, fov).target, Vec3::new(5.0, 0.5, 0.25));
    }

    #[test]
    fn single_point_frames_at_zero_distance() {
        let point = PointCloudBounds::new(Vec3::splat(3.0), Vec3::splat(3.0));
        let framing = frame(&point, 1.0);
        assert_eq!(framing.distance, 0.0);
        assert_eq!(framing.position, framing.target);
    }
}
