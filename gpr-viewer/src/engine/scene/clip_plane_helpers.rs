use bevy::prelude::*;

use crate::constants::render_settings::CLIP_HELPER_COLOURS;
use crate::engine::assets::bounds::PointCloudBounds;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::filtering::clip_planes::ClipAxis;

/// Corners of the plane `axis = offset` spanning the bounds on the other two
/// axes, in winding order.
pub fn plane_corners(axis: ClipAxis, offset: f32, bounds: &PointCloudBounds) -> [Vec3; 4] {
    let (min, max) = (bounds.min, bounds.max);
    match axis {
        ClipAxis::X => [
            Vec3::new(offset, min.y, min.z),
            Vec3::new(offset, max.y, min.z),
            Vec3::new(offset, max.y, max.z),
            Vec3::new(offset, min.y, max.z),
        ],
        ClipAxis::Y => [
            Vec3::new(min.x, offset, min.z),
            Vec3::new(max.x, offset, min.z),
            Vec3::new(max.x, offset, max.z),
            Vec3::new(min.x, offset, max.z),
        ],
        ClipAxis::Z => [
            Vec3::new(min.x, min.y, offset),
            Vec3::new(max.x, min.y, offset),
            Vec3::new(max.x, max.y, offset),
            Vec3::new(min.x, max.y, offset),
        ],
    }
}

/// Outline every plane whose helper is switched on.
pub fn draw_clip_plane_helpers(mut gizmos: Gizmos, viewer_state: Res<ViewerState>) {
    let Some(bounds) = viewer_state.bounds else {
        return;
    };

    for plane in viewer_state.clip_planes.planes() {
        if !plane.show_helper {
            continue;
        }
        let [a, b, c, d] = plane_corners(plane.axis, plane.offset, &bounds);
        gizmos.linestrip([a, b, c, d, a], CLIP_HELPER_COLOURS[plane.axis.index()]);
    }
}
