use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::{CAMERA_FAR, CAMERA_NEAR, DEFAULT_VERTICAL_FOV_DEGREES};
// Crate engine modules
use crate::constants::render_settings::BACKGROUND_COLOUR;
use crate::engine::assets::dataset_manifest::DatasetManifest;
use crate::engine::assets::point_cloud_data::PointCloudData;
use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::app_state::AppState;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::dataset_loader::{
    DatasetLoader, poll_dataset_load, start_dataset_loads,
};
use crate::engine::loading::manifest_loader::{ManifestLoader, load_manifest_system, start_loading};
use crate::engine::loading::ply_loader::PlyPointCloudLoader;
use crate::engine::render::point_material::{GprPointMaterial, sync_point_material};
use crate::engine::scene::clip_plane_helpers::draw_clip_plane_helpers;
use crate::engine::scene::overlays::{spawn_loading_overlay, update_loading_overlay};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::visibility_stats::{VisibilityStats, visibility_stats_system};
// Crate tools and RPC modules
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::slider_widget::IntensitySliderPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::scene::overlays::{spawn_stats_overlay, stats_text_update_system};
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::clip_plane_controls::{
    ClipControlSelection, clip_plane_keyboard_controls, dataset_cycle_shortcut,
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(MaterialPlugin::<GprPointMaterial>::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers DatasetManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<DatasetManifest>::new(&["json"]))
        .init_asset::<PointCloudData>()
        .register_asset_loader(PlyPointCloudLoader)
        .add_plugins(WebRpcPlugin)
        .add_plugins(IntensitySliderPlugin);

    // Initialise resources early
    app.insert_resource(ClearColor(BACKGROUND_COLOUR))
        .init_resource::<ViewerState>()
        .init_resource::<ManifestLoader>()
        .init_resource::<DatasetLoader>()
        .init_resource::<ViewportCamera>()
        .init_resource::<VisibilityStats>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            load_manifest_system.run_if(in_state(AppState::Loading)),
        );

    let runtime_systems = (
        (start_dataset_loads, poll_dataset_load).chain(),
        camera_controller,
        draw_clip_plane_helpers,
        update_loading_overlay,
        fps_notification_system,
        visibility_stats_system,
    );

    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)))
        // Every writer of ViewerState runs in Update; upload once after them.
        .add_systems(PostUpdate, sync_point_material);

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.init_resource::<ClipControlSelection>().add_systems(
            Update,
            (
                clip_plane_keyboard_controls,
                dataset_cycle_shortcut,
                stats_text_update_system,
            )
                .run_if(in_state(AppState::Running)),
        );
    }

    app
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: DEFAULT_VERTICAL_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    println!("=== GPR POINT CLOUD VIEWER ===");
    spawn_camera(&mut commands);
    spawn_loading_overlay(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        spawn_stats_overlay(&mut commands);
    }
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
