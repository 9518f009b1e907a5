use bevy::prelude::*;

use crate::engine::assets::point_cloud_data::{PointCloud, PointCloudData};
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::mesh::point_mesh::create_point_mesh;
use crate::engine::render::point_material::{GprPointMaterial, PointSettingsUniform};

/// Spawn the renderable entity for a freshly loaded cloud. The material starts
/// in sync with `state` so the first frame is already filtered.
pub fn spawn_point_cloud(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<GprPointMaterial>,
    data: &PointCloudData,
    state: &ViewerState,
) -> Entity {
    let mesh = create_point_mesh(data, state.scheme);
    let material = GprPointMaterial {
        settings: PointSettingsUniform::from_state(state),
    };

    commands
        .spawn((
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(materials.add(material)),
            Transform::from_translation(Vec3::ZERO),
            Visibility::Visible,
            PointCloud,
            bevy::render::view::NoFrustumCulling,
        ))
        .id()
}
