use bevy::prelude::*;
use bevy::{render::mesh::PrimitiveTopology, render::render_asset::RenderAssetUsages};

use crate::engine::assets::point_cloud_data::PointCloudData;
use crate::engine::filtering::intensity::{IntensityScheme, colour_for, intensity_of};

/// Build a point-list mesh for a loaded cloud. Each vertex colour carries the
/// display colour in rgb and the decoded intensity in alpha, so the point
/// material can filter without knowing the dataset's scheme.
pub fn create_point_mesh(data: &PointCloudData, scheme: IntensityScheme) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::PointList,
        RenderAssetUsages::RENDER_WORLD,
    );

    let colours: Vec<[f32; 4]> = data
        .colours
        .iter()
        .map(|&stored| {
            let [r, g, b] = colour_for(stored, scheme);
            [r, g, b, intensity_of(stored, scheme)]
        })
        .collect();

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colours);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn vertex_colours(mesh: &Mesh) -> &[[f32; 4]] {
        let Some(VertexAttributeValues::Float32x4(colours)) = mesh.attribute(Mesh::ATTRIBUTE_COLOR)
        else {
            panic!("colour attribute missing");
        };
        colours
    }

    #[test]
    fn mesh_keeps_point_order_and_count() {
        let data = PointCloudData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]],
            colours: vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
        };

        let mesh = create_point_mesh(&data, IntensityScheme::Direct);

        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::PointList);
        assert_eq!(mesh.count_vertices(), 2);
        let colours = vertex_colours(&mesh);
        assert_eq!(colours[0], [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(colours[1], [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn packed_points_keep_stored_colour() {
        let data = PointCloudData {
            positions: vec![[0.0; 3]],
            colours: vec![[0.0, 1.0, 0.0]],
        };

        let mesh = create_point_mesh(&data, IntensityScheme::Packed);

        let [r, g, b, intensity] = vertex_colours(&mesh)[0];
        assert_eq!([r, g, b], [0.0, 1.0, 0.0]);
        assert!((intensity - 0.333).abs() < 1e-5);
    }
}
