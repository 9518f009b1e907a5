/// Voxel edge length used when converting raw CSV scans.
pub const DEFAULT_CONVERT_VOXEL_SIZE: f64 = 0.006;

/// Voxel edge length used when thinning an existing PLY.
pub const DEFAULT_DOWNSAMPLE_VOXEL_SIZE: f64 = 0.005;

/// Offset added before the log transform so zero readings stay finite.
pub const LOG_OFFSET: f64 = 1e-10;

/// Points per parallel chunk when reducing bounds and ranges.
pub const PARALLEL_CHUNK_SIZE: usize = 25_000;

/// Suffix appended to the input stem for downsampled outputs.
pub const DOWNSAMPLE_SUFFIX: &str = "_downsample";
