use bevy::prelude::*;

use super::bounds::PointCloudBounds;

/// Marker for the spawned point cloud entity.
#[derive(Component)]
pub struct PointCloud;

/// Decoded point cloud: parallel position and stored colour arrays.
/// Colour channels are normalised to [0, 1] regardless of the file encoding.
#[derive(Asset, TypePath, Debug, Clone, Default)]
pub struct PointCloudData {
    pub positions: Vec<[f32; 3]>,
    pub colours: Vec<[f32; 3]>,
}

impl PointCloudData {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn bounds(&self) -> Option<PointCloudBounds> {
        PointCloudBounds::from_positions(&self.positions)
    }

    pub fn points(&self) -> impl Iterator<Item = (Vec3, [f32; 3])> + '_ {
        self.positions
            .iter()
            .zip(self.colours.iter())
            .map(|(position, colour)| (Vec3::from_array(*position), *colour))
    }
}
