/// Failures raised while preparing GPR scans for the viewer.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("no rows in {0} parsed as x,y,z,intensity")]
    NoValidRows(PathBuf),
    #[error("voxel size must be positive and finite, got {0}")]
    InvalidVoxelSize(f64),
    #[error("point cloud is missing {0}")]
    MissingData(String),
    #[error("intensity sidecar line {line} is not a number: {value:?}")]
    InvalidSidecarValue { line: usize, value: String },
    #[error("intensity sidecar has {found} rows but the cloud has {expected} points")]
    SidecarLengthMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
