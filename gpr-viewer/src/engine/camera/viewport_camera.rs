use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};
use constants::render_settings::{CAMERA_DAMPING, MAX_ORBIT_DISTANCE, MIN_ORBIT_DISTANCE};

use super::auto_frame::CameraFraming;
use crate::engine::core::viewer_state::ViewerState;

const ORBIT_SENSITIVITY: f32 = 0.005;
const PAN_SENSITIVITY: f32 = 0.001;
const PITCH_LIMIT: f32 = 1.5;

/// Orbit camera around a focus point. Seeded by auto-framing on every
/// dataset load, then driven by mouse orbit, pan and zoom.
#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    snap_next_frame: bool,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: 10.0,
            yaw: 0.0,
            pitch: 0.0,
            snap_next_frame: true,
        }
    }
}

impl ViewportCamera {
    /// Re-seed the orbit from a framing. Zero yaw and pitch put the camera on
    /// the depth axis, matching the framed position exactly.
    pub fn apply_framing(&mut self, framing: &CameraFraming) {
        self.focus_point = framing.target;
        self.distance = framing.distance.clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.snap_next_frame = true;
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    pub fn target_transform(&self) -> Transform {
        let offset = self.rotation() * Vec3::new(0.0, 0.0, self.distance);
        Transform::from_translation(self.focus_point + offset).looking_at(self.focus_point, Vec3::Y)
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch - delta.y * ORBIT_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn pan(&mut self, delta: Vec2) {
        let rotation = self.rotation();
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        let scale = self.distance * PAN_SENSITIVITY;
        self.focus_point += right * -delta.x * scale + up * delta.y * scale;
    }

    pub fn zoom(&mut self, scroll: f32) {
        let zoom_factor = if scroll > 0.0 { 0.9 } else { 1.1 };
        self.distance = (self.distance * zoom_factor).clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    viewer_state: Res<ViewerState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    interactions: Query<&Interaction>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Pointer is on the slider or another widget; the UI owns this input.
    let pointer_on_ui = viewer_state.slider.is_dragging()
        || interactions
            .iter()
            .any(|interaction| *interaction != Interaction::None);

    let total_motion: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();

    if !pointer_on_ui {
        for scroll in scroll_events.read() {
            if scroll.y != 0.0 {
                viewport_camera.zoom(scroll.y);
            }
        }

        if total_motion != Vec2::ZERO {
            if mouse_button.pressed(MouseButton::Left) {
                viewport_camera.orbit(total_motion);
            } else if mouse_button.pressed(MouseButton::Right)
                || mouse_button.pressed(MouseButton::Middle)
            {
                viewport_camera.pan(total_motion);
            }
        }
    } else {
        scroll_events.clear();
    }

    let target_transform = viewport_camera.target_transform();

    if viewport_camera.snap_next_frame {
        *camera_transform = target_transform;
        viewport_camera.snap_next_frame = false;
        return;
    }

    // Frame-rate independent damping, tuned per 60 Hz frame.
    let lerp_speed = 1.0 - (1.0 - CAMERA_DAMPING).powf(time.delta_secs() * 60.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(target_transform.translation, lerp_speed);
    camera_transform.rotation = camera_transform
        .rotation
        .slerp(target_transform.rotation, lerp_speed);
}
