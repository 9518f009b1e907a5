/// PLY reading and binary writing for prepared GPR clouds.
use crate::error::PreprocessError;
use clap::ValueEnum;
use constants::palette::palette_colour_u8;
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const VERTEX: &str = "vertex";
const POSITION_KEYS: [&str; 3] = ["x", "y", "z"];
const COLOUR_KEYS: [&str; 3] = ["red", "green", "blue"];

/// How normalised intensity is stored in the vertex colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColourMode {
    /// Same value in every channel, read back by the viewer's direct scheme.
    Grey,
    /// Blue-green-yellow-red ramp, decoded by the viewer's packed scheme.
    Palette,
}

impl ColourMode {
    pub fn encode(self, intensity: f32) -> [u8; 3] {
        match self {
            ColourMode::Grey => {
                let level = (intensity.clamp(0.0, 1.0) * 255.0).round() as u8;
                [level; 3]
            }
            ColourMode::Palette => palette_colour_u8(intensity),
        }
    }
}

/// Build an in-memory binary little-endian cloud with float xyz and uchar rgb.
pub fn build_point_cloud(
    positions: &[[f64; 3]],
    intensities: &[f32],
    mode: ColourMode,
) -> Ply<DefaultElement> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::BinaryLittleEndian;

    let mut vertex = ElementDef::new(VERTEX.to_string());
    for key in POSITION_KEYS {
        vertex.properties.add(PropertyDef::new(
            key.to_string(),
            PropertyType::Scalar(ScalarType::Float),
        ));
    }
    for key in COLOUR_KEYS {
        vertex.properties.add(PropertyDef::new(
            key.to_string(),
            PropertyType::Scalar(ScalarType::UChar),
        ));
    }
    ply.header.elements.add(vertex);

    let vertices = positions
        .iter()
        .zip(intensities)
        .map(|(position, &intensity)| {
            let mut element = DefaultElement::new();
            for (key, value) in POSITION_KEYS.iter().zip(position) {
                element.insert(key.to_string(), Property::Float(*value as f32));
            }
            for (key, channel) in COLOUR_KEYS.iter().zip(mode.encode(intensity)) {
                element.insert(key.to_string(), Property::UChar(channel));
            }
            element
        })
        .collect();
    ply.payload.insert(VERTEX.to_string(), vertices);

    ply
}

pub fn read_ply(path: &Path) -> Result<Ply<DefaultElement>, PreprocessError> {
    let mut reader = BufReader::new(File::open(path)?);
    let parser = Parser::<DefaultElement>::new();
    Ok(parser.read_ply(&mut reader)?)
}

/// Write `ply` as binary little-endian, whatever encoding it was read with.
pub fn write_ply(path: &Path, ply: &mut Ply<DefaultElement>) -> Result<(), PreprocessError> {
    ply.header.encoding = Encoding::BinaryLittleEndian;
    let mut out = BufWriter::new(File::create(path)?);
    Writer::<DefaultElement>::new().write_ply(&mut out, ply)?;
    out.flush()?;
    Ok(())
}

/// Vertex positions as f64, in file order.
pub fn vertex_positions(ply: &Ply<DefaultElement>) -> Result<Vec<[f64; 3]>, PreprocessError> {
    let vertices = ply
        .payload
        .get(VERTEX)
        .ok_or_else(|| PreprocessError::MissingData("a 'vertex' element".to_string()))?;

    vertices
        .iter()
        .enumerate()
        .map(|(index, vertex)| {
            let mut position = [0.0; 3];
            for (slot, key) in position.iter_mut().zip(POSITION_KEYS) {
                *slot = vertex.get(key).and_then(scalar).ok_or_else(|| {
                    PreprocessError::MissingData(format!("numeric '{key}' on vertex {index}"))
                })?;
            }
            Ok(position)
        })
        .collect()
}

/// Drop every vertex not listed in `kept`, preserving their other properties.
pub fn retain_vertices(ply: &mut Ply<DefaultElement>, kept: &[usize]) {
    if let Some(vertices) = ply.payload.get_mut(VERTEX) {
        let mut source: Vec<Option<DefaultElement>> = vertices.drain(..).map(Some).collect();
        vertices.extend(kept.iter().filter_map(|&index| source.get_mut(index)?.take()));
    }
}

fn scalar(property: &Property) -> Option<f64> {
    match property {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn round_trip(ply: &mut Ply<DefaultElement>) -> Ply<DefaultElement> {
        let mut bytes = Vec::new();
        Writer::<DefaultElement>::new()
            .write_ply(&mut bytes, ply)
            .unwrap();
        Parser::<DefaultElement>::new()
            .read_ply(&mut Cursor::new(bytes))
            .unwrap()
    }

    #[test]
    fn grey_mode_repeats_the_rounded_level() {
        assert_eq!(ColourMode::Grey.encode(0.0), [0, 0, 0]);
        assert_eq!(ColourMode::Grey.encode(0.5), [128, 128, 128]);
        assert_eq!(ColourMode::Grey.encode(1.0), [255, 255, 255]);
    }

    #[test]
    fn palette_mode_uses_the_ramp() {
        assert_eq!(ColourMode::Palette.encode(0.0), [0, 0, 255]);
        assert_eq!(ColourMode::Palette.encode(1.0), [255, 0, 0]);
    }

    #[test]
    fn written_cloud_is_binary_with_uchar_colour() {
        let positions = [[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]];
        let mut ply = build_point_cloud(&positions, &[0.0, 1.0], ColourMode::Grey);
        let parsed = round_trip(&mut ply);

        assert!(matches!(parsed.header.encoding, Encoding::BinaryLittleEndian));
        let vertices = &parsed.payload[VERTEX];
        assert_eq!(vertices.len(), 2);
        assert!(matches!(vertices[1].get("red"), Some(Property::UChar(255))));
        assert_eq!(vertex_positions(&parsed).unwrap(), positions.to_vec());
    }

    #[test]
    fn retained_vertices_follow_kept_order() {
        let positions = [[0.0; 3], [1.0; 3], [2.0; 3], [3.0; 3]];
        let mut ply = build_point_cloud(&positions, &[0.0; 4], ColourMode::Grey);

        retain_vertices(&mut ply, &[0, 2, 3]);

        assert_eq!(
            vertex_positions(&ply).unwrap(),
            vec![[0.0; 3], [2.0; 3], [3.0; 3]]
        );
    }

    #[test]
    fn missing_vertex_element_is_reported() {
        let ply = Ply::<DefaultElement>::new();
        assert!(matches!(
            vertex_positions(&ply),
            Err(PreprocessError::MissingData(_))
        ));
    }
}
