use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::render_settings::{
    SLIDER_BOTTOM_MARGIN, SLIDER_HANDLE_ACTIVE_COLOUR, SLIDER_HANDLE_COLOUR, SLIDER_HANDLE_SIZE,
    SLIDER_OVERLAY_COLOUR, SLIDER_TRACK_COLOUR, SLIDER_TRACK_HEIGHT, SLIDER_TRACK_WIDTH,
};
use crate::engine::assets::dataset_manifest::DatasetManifest;
use crate::engine::core::viewer_state::ViewerState;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::range_slider::{SliderEvent, SliderHandle, SliderPhase, TrackBounds};

#[derive(Component)]
pub struct SliderTrack;

#[derive(Component)]
pub struct SliderHandleNode(pub SliderHandle);

/// Shaded region outside the selected window; `true` for the upper side.
#[derive(Component)]
pub struct SliderOverlay {
    upper: bool,
}

/// Bevy UI front end for the dual-handle intensity slider.
pub struct IntensitySliderPlugin;

impl Plugin for IntensitySliderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_intensity_slider).add_systems(
            Update,
            (slider_pointer_input, update_slider_layout).chain(),
        );
    }
}

pub fn spawn_intensity_slider(mut commands: Commands) {
    commands
        .spawn((
            Name::new("IntensitySlider"),
            Node {
                width: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                bottom: Val::Px(SLIDER_BOTTOM_MARGIN),
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|root| {
            root.spawn((
                SliderTrack,
                Name::new("SliderTrack"),
                Interaction::default(),
                BackgroundColor(SLIDER_TRACK_COLOUR),
                Node {
                    width: Val::Px(SLIDER_TRACK_WIDTH),
                    height: Val::Px(SLIDER_TRACK_HEIGHT),
                    ..default()
                },
            ))
            .with_children(|track| {
                for upper in [false, true] {
                    track.spawn((
                        SliderOverlay { upper },
                        BackgroundColor(SLIDER_OVERLAY_COLOUR),
                        Node {
                            position_type: PositionType::Absolute,
                            height: Val::Percent(100.0),
                            left: Val::Percent(if upper { 100.0 } else { 0.0 }),
                            width: Val::Percent(0.0),
                            ..default()
                        },
                    ));
                }

                for handle in [SliderHandle::Lower, SliderHandle::Upper] {
                    let left = match handle {
                        SliderHandle::Lower => 0.0,
                        SliderHandle::Upper => 100.0,
                    };
                    track.spawn((
                        SliderHandleNode(handle),
                        Button,
                        BackgroundColor(SLIDER_HANDLE_COLOUR),
                        BorderRadius::MAX,
                        Node {
                            position_type: PositionType::Absolute,
                            width: Val::Px(SLIDER_HANDLE_SIZE),
                            height: Val::Px(SLIDER_HANDLE_SIZE),
                            left: Val::Percent(left),
                            top: Val::Px((SLIDER_TRACK_HEIGHT - SLIDER_HANDLE_SIZE) / 2.0),
                            margin: UiRect::left(Val::Px(-SLIDER_HANDLE_SIZE / 2.0)),
                            ..default()
                        },
                    ));
                }
            });
        });
}

/// Translate mouse and first-touch input into slider events.
pub fn slider_pointer_input(
    mut viewer_state: ResMut<ViewerState>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    manifest: Option<Res<DatasetManifest>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    handles: Query<(&SliderHandleNode, &Interaction)>,
    track: Query<(&ComputedNode, &GlobalTransform), With<SliderTrack>>,
) {
    let touch_enabled = manifest.is_none_or(|manifest| manifest.viewer.touch_input);

    let pressed = mouse_button.just_pressed(MouseButton::Left)
        || (touch_enabled && touches.any_just_pressed());
    if pressed {
        let target = handles
            .iter()
            .find(|(_, interaction)| **interaction == Interaction::Pressed)
            .map(|(handle, _)| handle.0);
        viewer_state.apply_slider_event(SliderEvent::PointerDown(target));
    }

    if viewer_state.slider.is_dragging() {
        let pointer_x = touch_enabled
            .then(|| touches.first_pressed_position())
            .flatten()
            .or_else(|| windows.single().ok().and_then(Window::cursor_position))
            .map(|position| position.x);

        if let (Some(x), Ok((node, transform))) = (pointer_x, track.single()) {
            let event = SliderEvent::PointerMove {
                x,
                track: logical_track_bounds(node, transform),
            };
            if viewer_state.apply_slider_event(event) {
                rpc_interface.send_notification(
                    "intensity_range_changed",
                    serde_json::json!({
                        "low": viewer_state.range.low(),
                        "high": viewer_state.range.high(),
                    }),
                );
            }
        }
    }

    let released = mouse_button.just_released(MouseButton::Left)
        || (touch_enabled && touches.any_just_released());
    if released && viewer_state.slider.is_dragging() {
        viewer_state.apply_slider_event(SliderEvent::PointerUp);
    }
}

/// UI layout runs in physical pixels; cursors report logical ones.
fn logical_track_bounds(node: &ComputedNode, transform: &GlobalTransform) -> TrackBounds {
    let scale = node.inverse_scale_factor();
    let width = node.size().x * scale;
    let center = transform.translation().x * scale;
    TrackBounds {
        left: center - width / 2.0,
        width,
    }
}

/// Move handles and overlays to match the slider state.
pub fn update_slider_layout(
    viewer_state: Res<ViewerState>,
    mut handles: Query<(&SliderHandleNode, &mut Node, &mut BackgroundColor), Without<SliderOverlay>>,
    mut overlays: Query<(&SliderOverlay, &mut Node), Without<SliderHandleNode>>,
) {
    if !viewer_state.is_changed() {
        return;
    }

    let slider = &viewer_state.slider;
    for (handle, mut node, mut colour) in &mut handles {
        let (position, active_phase) = match handle.0 {
            SliderHandle::Lower => (slider.lower(), SliderPhase::DraggingLower),
            SliderHandle::Upper => (slider.upper(), SliderPhase::DraggingUpper),
        };
        node.left = Val::Percent(position);
        colour.0 = if slider.phase() == active_phase {
            SLIDER_HANDLE_ACTIVE_COLOUR
        } else {
            SLIDER_HANDLE_COLOUR
        };
    }

    let (lower_region, upper_region) = slider.overlays();
    for (overlay, mut node) in &mut overlays {
        let region = if overlay.upper { upper_region } else { lower_region };
        node.left = Val::Percent(region.left);
        node.width = Val::Percent(region.width);
    }
}
