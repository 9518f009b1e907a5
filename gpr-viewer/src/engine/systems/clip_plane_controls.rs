use bevy::prelude::*;
use constants::render_settings::CLIP_PLANE_NUDGE_FRACTION;

use crate::engine::assets::dataset_manifest::DatasetManifest;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::filtering::clip_planes::{AxisRange, ClipAxis};
use crate::engine::loading::dataset_loader::DatasetLoader;
use crate::rpc::web_rpc::WebRpcInterface;

/// Plane targeted by the native keyboard shortcuts.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ClipControlSelection {
    pub axis: ClipAxis,
}

impl Default for ClipControlSelection {
    fn default() -> Self {
        Self { axis: ClipAxis::Z }
    }
}

/// Offset one nudge step away along the axis. Degenerate axes use a unit step
/// so the value still clamps into place.
pub fn nudged_offset(offset: f32, range: AxisRange, steps: f32) -> f32 {
    let step = if range.is_degenerate() {
        1.0
    } else {
        range.span() * CLIP_PLANE_NUDGE_FRACTION
    };
    offset + step * steps
}

pub fn clip_plane_keyboard_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut selection: ResMut<ClipControlSelection>,
    mut viewer_state: ResMut<ViewerState>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for (key, axis) in [
        (KeyCode::Digit1, ClipAxis::X),
        (KeyCode::Digit2, ClipAxis::Y),
        (KeyCode::Digit3, ClipAxis::Z),
    ] {
        if keyboard.just_pressed(key) {
            selection.axis = axis;
            info!("Clip plane {} selected", axis.as_str());
        }
    }

    let axis = selection.axis;
    let steps = match (
        keyboard.pressed(KeyCode::ArrowUp),
        keyboard.pressed(KeyCode::ArrowDown),
    ) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    };

    if steps != 0.0 {
        let plane = *viewer_state.clip_planes.plane(axis);
        let target = nudged_offset(plane.offset, viewer_state.clip_planes.range(axis), steps);
        if viewer_state.set_clip_offset(axis, target).is_none() {
            warn!("Clip plane {} is locked in single-plane mode", axis.as_str());
        }
    }

    if keyboard.just_pressed(KeyCode::KeyM) {
        let mirrored = !viewer_state.clip_planes.plane(axis).mirrored;
        if !viewer_state.set_clip_mirrored(axis, mirrored) {
            warn!("Clip plane {} is locked in single-plane mode", axis.as_str());
        }
    }

    if keyboard.just_pressed(KeyCode::KeyH) {
        let visible = !viewer_state.clip_planes.plane(axis).show_helper;
        viewer_state.set_clip_helper(axis, visible);
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        viewer_state.reset_filters();
        info!("Intensity window and clip planes reset");
        rpc_interface.send_notification(
            "intensity_range_changed",
            serde_json::json!({
                "low": viewer_state.range.low(),
                "high": viewer_state.range.high(),
            }),
        );
    }
}

/// `Tab` loads the next dataset in catalogue order.
pub fn dataset_cycle_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    manifest: Option<Res<DatasetManifest>>,
    viewer_state: Res<ViewerState>,
    mut loader: ResMut<DatasetLoader>,
) {
    if !keyboard.just_pressed(KeyCode::Tab) {
        return;
    }
    let Some(manifest) = manifest else {
        return;
    };
    if !manifest.viewer.dataset_picker {
        return;
    }

    let Some(next) = manifest.next_after(viewer_state.dataset.as_deref()) else {
        return;
    };
    let name = next.name.clone();
    if let Err(error) = loader.begin(&manifest, &name) {
        warn!("{}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_moves_by_fraction_of_span() {
        let range = AxisRange {
            min: 0.0,
            max: 10.0,
        };
        assert!((nudged_offset(5.0, range, 1.0) - 5.1).abs() < 1e-5);
        assert!((nudged_offset(5.0, range, -1.0) - 4.9).abs() < 1e-5);
    }

    #[test]
    fn degenerate_axis_uses_unit_step() {
        let range = AxisRange { min: 2.0, max: 2.0 };
        assert_eq!(nudged_offset(2.0, range, 1.0), 3.0);
    }
}
