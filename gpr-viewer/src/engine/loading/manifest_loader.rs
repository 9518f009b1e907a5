use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::constants::path::DATASET_MANIFEST_PATH;
use crate::engine::assets::dataset_manifest::DatasetManifest;
use crate::engine::core::app_state::AppState;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::loading::dataset_loader::DatasetLoader;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<DatasetManifest>>,
}

// Start the loading process
pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    manifest_loader.handle = Some(asset_server.load(DATASET_MANIFEST_PATH));
}

/// Install the manifest, apply viewer options and request the initial dataset.
/// A missing or malformed manifest leaves the viewer running with no datasets.
pub fn load_manifest_system(
    mut commands: Commands,
    manifest_loader: Res<ManifestLoader>,
    manifests: Res<Assets<DatasetManifest>>,
    asset_server: Res<AssetServer>,
    mut viewer_state: ResMut<ViewerState>,
    mut dataset_loader: ResMut<DatasetLoader>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(ref handle) = manifest_loader.handle else {
        return;
    };

    let manifest = match asset_server.load_state(handle) {
        LoadState::Loaded => match manifests.get(handle) {
            Some(manifest) => manifest.clone(),
            None => return,
        },
        LoadState::Failed(error) => {
            error!("Failed to load {}: {}", DATASET_MANIFEST_PATH, error);
            DatasetManifest::default()
        }
        _ => return,
    };

    println!(
        "✓ Dataset manifest loaded: {} datasets, clip mode {:?}",
        manifest.datasets.len(),
        manifest.viewer.clip_mode
    );
    viewer_state.clip_mode = manifest.viewer.clip_mode;

    if let Some(initial) = manifest.initial_dataset() {
        let name = initial.name.clone();
        if let Err(error) = dataset_loader.begin(&manifest, &name) {
            warn!("Initial dataset not started: {}", error);
        }
    } else {
        warn!("Dataset manifest lists no datasets");
    }

    rpc_interface.send_notification(
        "datasets_available",
        serde_json::json!({
            "datasets": manifest.names(),
            "default": manifest.initial_dataset().map(|entry| entry.name.as_str()),
            "viewer": manifest.viewer,
        }),
    );

    commands.insert_resource(manifest);
    println!("→ Transitioning to Running state");
    next_state.set(AppState::Running);
}
