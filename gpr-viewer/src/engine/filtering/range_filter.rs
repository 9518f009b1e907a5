use constants::render_settings::INTENSITY_EPSILON;
use thiserror::Error;

/// Per-point visibility test against an inclusive intensity window.
pub fn is_visible(intensity: f32, low: f32, high: f32) -> bool {
    low - INTENSITY_EPSILON <= intensity && intensity <= high + INTENSITY_EPSILON
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RangeError {
    #[error("range bounds must be finite numbers")]
    NotFinite,
    #[error("lower bound {low} exceeds upper bound {high}")]
    Inverted { low: f32, high: f32 },
}

/// Normalised intensity window. Always satisfies `0 <= low <= high <= 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    low: f32,
    high: f32,
}

impl Default for RangeFilter {
    fn default() -> Self {
        Self::FULL
    }
}

impl RangeFilter {
    /// Window that lets every point through.
    pub const FULL: Self = Self {
        low: 0.0,
        high: 1.0,
    };

    /// Build a window, clamping each bound into [0, 1].
    pub fn new(low: f32, high: f32) -> Result<Self, RangeError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(RangeError::NotFinite);
        }

        let low = low.clamp(0.0, 1.0);
        let high = high.clamp(0.0, 1.0);
        if low > high {
            return Err(RangeError::Inverted { low, high });
        }

        Ok(Self { low, high })
    }

    /// Window from slider handle percentages in [0, 100].
    pub fn from_percentages(lower: f32, upper: f32) -> Result<Self, RangeError> {
        Self::new(lower / 100.0, upper / 100.0)
    }

    pub fn low(&self) -> f32 {
        self.low
    }

    pub fn high(&self) -> f32 {
        self.high
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    pub fn contains(&self, intensity: f32) -> bool {
        is_visible(intensity, self.low, self.high)
    }
}
