use bevy::prelude::Color;

pub const SLIDER_TRACK_WIDTH: f32 = 320.0;
pub const SLIDER_TRACK_HEIGHT: f32 = 6.0;
pub const SLIDER_HANDLE_SIZE: f32 = 18.0;
pub const SLIDER_BOTTOM_MARGIN: f32 = 32.0;

pub const SLIDER_TRACK_COLOUR: Color = Color::srgb(0.55, 0.55, 0.6);
pub const SLIDER_OVERLAY_COLOUR: Color = Color::srgba(0.08, 0.08, 0.1, 0.85);
pub const SLIDER_HANDLE_COLOUR: Color = Color::srgb(0.95, 0.95, 0.95);
pub const SLIDER_HANDLE_ACTIVE_COLOUR: Color = Color::srgb(1.0, 0.75, 0.2);

pub const CLIP_HELPER_COLOURS: [Color; 3] = [
    Color::srgb(1.0, 0.3, 0.3),
    Color::srgb(0.3, 1.0, 0.3),
    Color::srgb(0.3, 0.5, 1.0),
];

pub const OVERLAY_FONT_SIZE: f32 = 16.0;
pub const LOADING_FONT_SIZE: f32 = 28.0;
pub const BACKGROUND_COLOUR: Color = Color::srgb(0.05, 0.05, 0.07);
