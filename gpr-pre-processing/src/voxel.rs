/// Voxel grid downsampling: first-occurrence for existing clouds, centroid for conversion.
use crate::error::PreprocessError;
use std::collections::{HashMap, HashSet};

/// Integer voxel coordinate `floor(p / size)`.
pub fn voxel_key(point: [f64; 3], voxel_size: f64) -> [i64; 3] {
    point.map(|axis| (axis / voxel_size).floor() as i64)
}

/// Indices of the first point landing in each occupied voxel, in input order.
/// Runs sequentially since which point wins depends on order.
pub fn voxel_downsample(
    points: &[[f64; 3]],
    voxel_size: f64,
) -> Result<Vec<usize>, PreprocessError> {
    check_voxel_size(voxel_size)?;

    let mut occupied = HashSet::with_capacity(points.len() / 4);
    let kept = points
        .iter()
        .enumerate()
        .filter(|(_, point)| occupied.insert(voxel_key(**point, voxel_size)))
        .map(|(index, _)| index)
        .collect();

    Ok(kept)
}

/// One averaged point per occupied voxel.
#[derive(Debug, Default, PartialEq)]
pub struct VoxelCentroids {
    pub positions: Vec<[f64; 3]>,
    pub intensities: Vec<f32>,
}

/// Replace the members of each voxel by their centroid and mean intensity.
/// Voxels are emitted in the order they were first hit.
pub fn voxel_centroids(
    points: &[[f64; 3]],
    intensities: &[f32],
    voxel_size: f64,
) -> Result<VoxelCentroids, PreprocessError> {
    check_voxel_size(voxel_size)?;

    // (sum x, sum y, sum z, sum intensity, count)
    let mut slots: HashMap<[i64; 3], usize> = HashMap::with_capacity(points.len() / 4);
    let mut sums: Vec<([f64; 3], f64, u32)> = Vec::new();
    for (point, &intensity) in points.iter().zip(intensities) {
        let slot = *slots
            .entry(voxel_key(*point, voxel_size))
            .or_insert_with(|| {
                sums.push(([0.0; 3], 0.0, 0));
                sums.len() - 1
            });
        let (position, total, count) = &mut sums[slot];
        for (acc, axis) in position.iter_mut().zip(point) {
            *acc += axis;
        }
        *total += intensity as f64;
        *count += 1;
    }

    let mut out = VoxelCentroids::default();
    for (position, total, count) in sums {
        let inv = 1.0 / count as f64;
        out.positions.push(position.map(|axis| axis * inv));
        out.intensities.push((total * inv) as f32);
    }
    Ok(out)
}

fn check_voxel_size(voxel_size: f64) -> Result<(), PreprocessError> {
    if voxel_size > 0.0 && voxel_size.is_finite() {
        Ok(())
    } else {
        Err(PreprocessError::InvalidVoxelSize(voxel_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_point_per_voxel_in_order() {
        let points = [
            [0.10, 0.10, 0.10],
            [0.90, 0.20, 0.30],
            [1.50, 0.00, 0.00],
            [0.40, 0.40, 0.40],
            [1.10, 0.90, 0.50],
            [-0.10, 0.00, 0.00],
        ];

        let kept = voxel_downsample(&points, 1.0).unwrap();
        assert_eq!(kept, vec![0, 2, 5]);
    }

    #[test]
    fn negative_coordinates_floor_downwards() {
        assert_eq!(voxel_key([-0.001, 0.0, 0.0049], 0.005), [-1, 0, 0]);
        assert_eq!(voxel_key([0.013, -0.013, 0.0], 0.006), [2, -3, 0]);
    }

    #[test]
    fn distinct_voxels_are_all_kept() {
        let points: Vec<[f64; 3]> = (0..10).map(|i| [i as f64 * 0.01, 0.0, 0.0]).collect();
        assert_eq!(voxel_downsample(&points, 0.006).unwrap().len(), 10);
    }

    #[test]
    fn centroid_averages_points_sharing_a_voxel() {
        let points = [[0.0, 0.0, 0.0], [0.004, 0.004, 0.004], [0.02, 0.0, 0.0]];

        let out = voxel_centroids(&points, &[0.2, 0.6, 1.0], 0.006).unwrap();

        assert_eq!(out.positions.len(), 2);
        for (axis, expected) in out.positions[0].iter().zip([0.002; 3]) {
            assert!((axis - expected).abs() < 1e-12);
        }
        assert!((out.intensities[0] - 0.4).abs() < 1e-6);
        assert_eq!(out.positions[1], [0.02, 0.0, 0.0]);
        assert_eq!(out.intensities[1], 1.0);
    }

    #[test]
    fn centroid_voxels_follow_first_hit_order() {
        let points = [[1.5, 0.0, 0.0], [0.1, 0.0, 0.0], [1.7, 0.0, 0.0]];

        let out = voxel_centroids(&points, &[0.0, 0.5, 1.0], 1.0).unwrap();

        assert_eq!(out.positions.len(), 2);
        assert!((out.positions[0][0] - 1.6).abs() < 1e-12);
        assert_eq!(out.positions[1], [0.1, 0.0, 0.0]);
        assert_eq!(out.intensities, vec![0.5, 0.5]);
    }

    #[test]
    fn rejects_non_positive_size() {
        for size in [0.0, -0.5, f64::NAN] {
            assert!(matches!(
                voxel_downsample(&[[0.0; 3]], size),
                Err(PreprocessError::InvalidVoxelSize(_))
            ));
            assert!(matches!(
                voxel_centroids(&[[0.0; 3]], &[0.0], size),
                Err(PreprocessError::InvalidVoxelSize(_))
            ));
        }
    }
}
