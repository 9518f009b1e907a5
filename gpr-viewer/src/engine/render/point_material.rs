use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderRef, ShaderType, SpecializedMeshPipelineError,
};
use constants::render_settings::INTENSITY_EPSILON;

use crate::constants::path::POINT_SHADER_PATH;
use crate::engine::assets::point_cloud_data::PointCloud;
use crate::engine::core::viewer_state::ViewerState;

/// Per-frame filter parameters read by `gpr_points.wgsl`.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
#[repr(C)]
pub struct PointSettingsUniform {
    /// low, high, epsilon; w is padding.
    pub range: Vec4,
    /// Plane offsets along X, Y, Z.
    pub clip_offsets: Vec4,
    /// +1 keeps points below the offset, -1 keeps points above it.
    pub clip_signs: Vec4,
}

impl Default for PointSettingsUniform {
    fn default() -> Self {
        Self::from_state(&ViewerState::default())
    }
}

impl PointSettingsUniform {
    pub fn from_state(state: &ViewerState) -> Self {
        Self {
            range: Vec4::new(
                state.range.low(),
                state.range.high(),
                INTENSITY_EPSILON,
                0.0,
            ),
            clip_offsets: state.clip_planes.offsets().extend(0.0),
            clip_signs: state.clip_planes.signs().extend(0.0),
        }
    }
}

/// Point cloud material. Range filtering and clip planes happen in the shader
/// so the vertex buffer is never rebuilt after load.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone, Default)]
pub struct GprPointMaterial {
    #[uniform(0)]
    pub settings: PointSettingsUniform,
}

impl Material for GprPointMaterial {
    fn vertex_shader() -> ShaderRef {
        POINT_SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        POINT_SHADER_PATH.into()
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // rgb is the display colour, alpha the decoded intensity.
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_COLOR.at_shader_location(1),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}

/// Push `ViewerState` into the point material whenever it changes.
pub fn sync_point_material(
    viewer_state: Res<ViewerState>,
    point_clouds: Query<&MeshMaterial3d<GprPointMaterial>, With<PointCloud>>,
    mut materials: ResMut<Assets<GprPointMaterial>>,
) {
    if !viewer_state.is_changed() {
        return;
    }

    let settings = PointSettingsUniform::from_state(&viewer_state);
    for material_handle in &point_clouds {
        if let Some(material) = materials.get_mut(&material_handle.0) {
            if material.settings != settings {
                material.settings = settings;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::bounds::PointCloudBounds;
    use crate::engine::filtering::clip_planes::ClipAxis;
    use crate::engine::filtering::intensity::IntensityScheme;

    #[test]
    fn uniform_mirrors_viewer_state() {
        let mut state = ViewerState::default();
        state.reset_for_dataset(
            "slab",
            PointCloudBounds::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0)),
            IntensityScheme::Packed,
        );
        state.set_intensity_range(0.25, 0.75).unwrap();
        state.set_clip_offset(ClipAxis::Y, 1.0);
        state.set_clip_mirrored(ClipAxis::Z, true);

        let uniform = PointSettingsUniform::from_state(&state);

        assert_eq!(uniform.range, Vec4::new(0.25, 0.75, INTENSITY_EPSILON, 0.0));
        assert_eq!(uniform.clip_offsets.truncate(), Vec3::new(2.0, 1.0, 6.0));
        assert_eq!(uniform.clip_signs.truncate(), Vec3::new(1.0, 1.0, -1.0));
    }

    #[test]
    fn default_uniform_shows_everything() {
        let uniform = PointSettingsUniform::default();
        assert_eq!(uniform.range.x, 0.0);
        assert_eq!(uniform.range.y, 1.0);
        assert_eq!(uniform.clip_signs.truncate(), Vec3::ONE);
    }
}
