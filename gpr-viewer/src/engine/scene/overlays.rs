use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::constants::render_settings::{LOADING_FONT_SIZE, OVERLAY_FONT_SIZE};
use crate::engine::loading::dataset_loader::{DatasetLoader, LoadGuard};
use crate::engine::systems::visibility_stats::VisibilityStats;

#[derive(Component)]
pub struct LoadingOverlay;

#[derive(Component)]
pub struct LoadingText;

#[derive(Component)]
pub struct StatsText;

pub fn spawn_loading_overlay(commands: &mut Commands) {
    commands
        .spawn((
            LoadingOverlay,
            Name::new("LoadingOverlay"),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            Visibility::Hidden,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                LoadingText,
                Text::new("Loading"),
                TextFont {
                    font_size: LOADING_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

pub fn spawn_stats_overlay(commands: &mut Commands) {
    commands.spawn((
        StatsText,
        Text::new("FPS: "),
        TextFont {
            font_size: OVERLAY_FONT_SIZE,
            ..default()
        },
        TextColor(Color::srgb(1., 0., 0.)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        },
    ));
}

/// Show the overlay for exactly as long as the load guard is held.
pub fn update_loading_overlay(
    loader: Res<DatasetLoader>,
    mut overlays: Query<&mut Visibility, With<LoadingOverlay>>,
    mut texts: Query<&mut Text, With<LoadingText>>,
) {
    if !loader.is_changed() {
        return;
    }

    let visibility = match loader.guard() {
        LoadGuard::Loading { dataset } => {
            for mut text in &mut texts {
                text.0 = format!("Loading {dataset}…");
            }
            Visibility::Visible
        }
        LoadGuard::Idle => Visibility::Hidden,
    };

    for mut overlay in &mut overlays {
        overlay.set_if_neq(visibility);
    }
}

pub fn stats_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    stats: Res<VisibilityStats>,
    mut query: Query<&mut Text, With<StatsText>>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);

    for mut text in &mut query {
        text.0 = format!("FPS: {fps:.1}  Visible: {} / {}", stats.visible, stats.total);
    }
}
