/// Dataset catalogue and viewer options.
pub const DATASET_MANIFEST_PATH: &str = "datasets.json";

/// Point material vertex and fragment stages.
pub const POINT_SHADER_PATH: &str = "shaders/gpr_points.wgsl";
