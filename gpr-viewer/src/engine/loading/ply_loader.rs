use bevy::asset::{AssetLoader, LoadContext, io::Reader};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};
use std::io::Cursor;
use thiserror::Error;

use crate::engine::assets::point_cloud_data::PointCloudData;

const POSITION_KEYS: [&str; 3] = ["x", "y", "z"];
const COLOUR_KEYS: [[&str; 2]; 3] = [["red", "r"], ["green", "g"], ["blue", "b"]];

#[derive(Debug, Error)]
pub enum PlyLoadError {
    #[error("failed to read point cloud: {0}")]
    Io(#[from] std::io::Error),
    #[error("PLY file has no 'vertex' element")]
    MissingVertexElement,
    #[error("vertex {index} is missing property '{property}'")]
    MissingProperty { index: usize, property: &'static str },
    #[error("vertex property '{property}' has an unsupported type")]
    UnsupportedProperty { property: &'static str },
    #[error("PLY file contains no vertices")]
    Empty,
}

/// Loads `.ply` point clouds (ASCII or binary) into `PointCloudData`.
#[derive(Default)]
pub struct PlyPointCloudLoader;

impl AssetLoader for PlyPointCloudLoader {
    type Asset = PointCloudData;
    type Settings = ();
    type Error = PlyLoadError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        parse_point_cloud(&bytes)
    }

    fn extensions(&self) -> &[&str] {
        &["ply"]
    }
}

/// Decode vertex positions and colours from raw PLY bytes.
pub fn parse_point_cloud(bytes: &[u8]) -> Result<PointCloudData, PlyLoadError> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(&mut Cursor::new(bytes))?;

    let vertices = ply
        .payload
        .get("vertex")
        .ok_or(PlyLoadError::MissingVertexElement)?;
    if vertices.is_empty() {
        return Err(PlyLoadError::Empty);
    }

    let mut data = PointCloudData {
        positions: Vec::with_capacity(vertices.len()),
        colours: Vec::with_capacity(vertices.len()),
    };

    for (index, vertex) in vertices.iter().enumerate() {
        let mut position = [0.0; 3];
        for (slot, key) in position.iter_mut().zip(POSITION_KEYS) {
            let property = vertex
                .get(key)
                .ok_or(PlyLoadError::MissingProperty { index, property: key })?;
            *slot = scalar(property).ok_or(PlyLoadError::UnsupportedProperty { property: key })?;
        }

        let mut colour = [0.0; 3];
        for (slot, [key, short_key]) in colour.iter_mut().zip(COLOUR_KEYS) {
            let property = vertex
                .get(key)
                .or_else(|| vertex.get(short_key))
                .ok_or(PlyLoadError::MissingProperty { index, property: key })?;
            *slot = channel(property).ok_or(PlyLoadError::UnsupportedProperty { property: key })?;
        }

        data.positions.push(position);
        data.colours.push(colour);
    }

    Ok(data)
}

fn scalar(property: &Property) -> Option<f32> {
    match property {
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        Property::Char(v) => Some(*v as f32),
        Property::UChar(v) => Some(*v as f32),
        Property::Short(v) => Some(*v as f32),
        Property::UShort(v) => Some(*v as f32),
        Property::Int(v) => Some(*v as f32),
        Property::UInt(v) => Some(*v as f32),
        _ => None,
    }
}

/// Colour channel normalised to [0, 1]; integer channels scale by their range.
fn channel(property: &Property) -> Option<f32> {
    match property {
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        Property::UChar(v) => Some(*v as f32 / u8::MAX as f32),
        Property::UShort(v) => Some(*v as f32 / u16::MAX as f32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_UCHAR: &str = "ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
end_header
0 0 0 255 0 0
1.5 -2 3 0 51 255
";

    #[test]
    fn ascii_uchar_colours_are_normalised() {
        let data = parse_point_cloud(ASCII_UCHAR.as_bytes()).unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.positions[1], [1.5, -2.0, 3.0]);
        assert_eq!(data.colours[0], [1.0, 0.0, 0.0]);
        assert!((data.colours[1][1] - 0.2).abs() < 1e-6);
        assert_eq!(data.colours[1][2], 1.0);
    }

    #[test]
    fn binary_float_colours_pass_through() {
        let mut bytes = b"ply
format binary_little_endian 1.0
element vertex 1
property float x
property float y
property float z
property float red
property float green
property float blue
end_header
"
        .to_vec();
        for value in [1.0_f32, 2.0, 3.0, 0.25, 0.5, 0.75] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        let data = parse_point_cloud(&bytes).unwrap();
        assert_eq!(data.positions, vec![[1.0, 2.0, 3.0]]);
        assert_eq!(data.colours, vec![[0.25, 0.5, 0.75]]);
    }

    #[test]
    fn missing_vertex_element_is_rejected() {
        let source = "ply
format ascii 1.0
element face 0
property list uchar int vertex_indices
end_header
";
        assert!(matches!(
            parse_point_cloud(source.as_bytes()),
            Err(PlyLoadError::MissingVertexElement)
        ));
    }

    #[test]
    fn missing_colour_is_reported() {
        let source = "ply
format ascii 1.0
element vertex 1
property float x
property float y
property float z
end_header
0 0 0
";
        assert!(matches!(
            parse_point_cloud(source.as_bytes()),
            Err(PlyLoadError::MissingProperty { property: "red", .. })
        ));
    }

    #[test]
    fn garbage_fails_to_parse() {
        assert!(parse_point_cloud(b"not a ply file").is_err());
    }
}
