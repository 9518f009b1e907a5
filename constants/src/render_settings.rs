/// Tolerance applied to both ends of the intensity range test.
pub const INTENSITY_EPSILON: f32 = 1e-6;

/// Slack added around the bounding box when clamping clip plane offsets.
pub const CLIP_PLANE_EPSILON: f32 = 1e-6;

/// Extra distance applied on top of the exact fit when framing a cloud.
pub const FRAMING_MARGIN: f32 = 1.5;

/// Vertical field of view of the viewer camera, in degrees.
pub const DEFAULT_VERTICAL_FOV_DEGREES: f32 = 75.0;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Fraction of the remaining distance the orbit camera closes per 60 Hz frame.
pub const CAMERA_DAMPING: f32 = 0.05;

/// Fraction of an axis extent a single keyboard nudge moves a clip plane.
pub const CLIP_PLANE_NUDGE_FRACTION: f32 = 0.01;

/// Interval between visible point count notifications, in seconds.
pub const STATS_NOTIFICATION_INTERVAL: f32 = 0.5;

/// Orbit distance limits; also keeps single-point clouds viewable.
pub const MIN_ORBIT_DISTANCE: f32 = 0.01;
pub const MAX_ORBIT_DISTANCE: f32 = 5000.0;
