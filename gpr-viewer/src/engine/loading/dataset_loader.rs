use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::render_settings::DEFAULT_VERTICAL_FOV_DEGREES;
use thiserror::Error;

use crate::engine::assets::dataset_manifest::{DatasetEntry, DatasetManifest};
use crate::engine::assets::point_cloud_data::{PointCloud, PointCloudData};
use crate::engine::camera::auto_frame::frame;
use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::filtering::clip_planes::ClipAxis;
use crate::engine::loading::point_cloud_creator::spawn_point_cloud;
use crate::engine::render::point_material::GprPointMaterial;
use crate::rpc::web_rpc::WebRpcInterface;

/// Whether a dataset is currently in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadGuard {
    #[default]
    Idle,
    Loading {
        dataset: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadRequestError {
    #[error("dataset '{requested}' rejected: '{in_flight}' is still loading")]
    Busy { requested: String, in_flight: String },
    #[error("unknown dataset '{0}'")]
    UnknownDataset(String),
}

/// Tracks the single in-flight dataset load and the cloud currently shown.
///
/// Requests claim the guard immediately; `start_dataset_loads` hands the
/// queued entry to the asset server on the next update.
#[derive(Resource, Default)]
pub struct DatasetLoader {
    guard: LoadGuard,
    queued: Option<DatasetEntry>,
    pending: Option<(DatasetEntry, Handle<PointCloudData>)>,
    active: Option<Handle<PointCloudData>>,
}

impl DatasetLoader {
    pub fn guard(&self) -> &LoadGuard {
        &self.guard
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.guard, LoadGuard::Loading { .. })
    }

    /// Handle of the cloud on screen, if any.
    pub fn active(&self) -> Option<&Handle<PointCloudData>> {
        self.active.as_ref()
    }

    /// Claim the guard for `name`. Rejected while another load is in flight.
    pub fn begin(
        &mut self,
        manifest: &DatasetManifest,
        name: &str,
    ) -> Result<DatasetEntry, LoadRequestError> {
        if let LoadGuard::Loading { dataset } = &self.guard {
            return Err(LoadRequestError::Busy {
                requested: name.to_string(),
                in_flight: dataset.clone(),
            });
        }

        let entry = manifest
            .find(name)
            .cloned()
            .ok_or_else(|| LoadRequestError::UnknownDataset(name.to_string()))?;

        self.guard = LoadGuard::Loading {
            dataset: entry.name.clone(),
        };
        self.queued = Some(entry.clone());
        Ok(entry)
    }

    /// Release the guard, returning the dataset that was loading.
    pub fn finish(&mut self) -> Option<String> {
        self.queued = None;
        self.pending = None;
        match std::mem::take(&mut self.guard) {
            LoadGuard::Loading { dataset } => Some(dataset),
            LoadGuard::Idle => None,
        }
    }
}

/// Kick off queued loads: drop the previous cloud and hand the path to the
/// asset server.
pub fn start_dataset_loads(
    mut commands: Commands,
    mut loader: ResMut<DatasetLoader>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    asset_server: Res<AssetServer>,
    point_clouds: Query<Entity, With<PointCloud>>,
) {
    if loader.queued.is_none() {
        return;
    }
    let Some(entry) = loader.queued.take() else {
        return;
    };

    for entity in &point_clouds {
        commands.entity(entity).despawn();
    }
    loader.active = None;

    info!("Loading dataset '{}' from {}", entry.name, entry.path);
    let handle = asset_server.load::<PointCloudData>(&entry.path);

    rpc_interface.send_notification(
        "dataset_loading",
        serde_json::json!({ "name": entry.name }),
    );
    loader.pending = Some((entry, handle));
}

/// Finish the pending load once the asset server settles.
pub fn poll_dataset_load(
    mut commands: Commands,
    mut loader: ResMut<DatasetLoader>,
    mut viewer_state: ResMut<ViewerState>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GprPointMaterial>>,
    asset_server: Res<AssetServer>,
    clouds: Res<Assets<PointCloudData>>,
) {
    let Some((entry, handle)) = loader.pending.as_ref() else {
        return;
    };

    let failure = match asset_server.load_state(handle) {
        LoadState::Loaded => match clouds.get(handle) {
            Some(data) => match data.bounds() {
                Some(bounds) => {
                    viewer_state.reset_for_dataset(&entry.name, bounds, entry.scheme);
                    spawn_point_cloud(
                        &mut commands,
                        &mut meshes,
                        &mut materials,
                        data,
                        &viewer_state,
                    );

                    let framing = frame(&bounds, DEFAULT_VERTICAL_FOV_DEGREES.to_radians());
                    viewport_camera.apply_framing(&framing);

                    println!(
                        "✓ Dataset '{}' ready: {} points, framed at distance {:.3}",
                        entry.name,
                        data.len(),
                        framing.distance
                    );
                    rpc_interface.send_notification(
                        "dataset_loaded",
                        dataset_loaded_payload(&entry.name, data.len(), &viewer_state),
                    );
                    None
                }
                None => Some("point cloud has no finite positions".to_string()),
            },
            None => return,
        },
        LoadState::Failed(error) => Some(error.to_string()),
        _ => return,
    };

    match failure {
        None => {
            let active = handle.clone();
            loader.finish();
            loader.active = Some(active);
        }
        Some(reason) => {
            let name = entry.name.clone();
            error!("Failed to load dataset '{}': {}", name, reason);
            viewer_state.clear_dataset();
            loader.finish();
            rpc_interface.send_notification(
                "dataset_load_failed",
                serde_json::json!({ "name": name, "reason": reason }),
            );
        }
    }
}

fn dataset_loaded_payload(name: &str, point_count: usize, state: &ViewerState) -> serde_json::Value {
    let plane_ranges: Vec<serde_json::Value> = ClipAxis::ALL
        .iter()
        .map(|axis| {
            let range = state.clip_planes.range(*axis);
            serde_json::json!({
                "axis": axis.as_str(),
                "min": range.min,
                "max": range.max,
            })
        })
        .collect();

    serde_json::json!({
        "name": name,
        "point_count": point_count,
        "scheme": state.scheme.as_str(),
        "bounds": state.bounds.map(|bounds| bounds.to_json()),
        "plane_ranges": plane_ranges,
    })
}
