/// Log transform and min-max normalisation of raw GPR amplitudes.
use constants::processing::{LOG_OFFSET, PARALLEL_CHUNK_SIZE};
use rayon::prelude::*;
use serde::Serialize;

/// Range of the log-transformed readings before normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogRange {
    pub min: f64,
    pub max: f64,
}

impl LogRange {
    fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Map raw intensities to [0, 1] via `ln(i + LOG_OFFSET)` and min-max scaling.
/// A flat input maps every value to 0.
pub fn log_normalise(raw: &[f64]) -> (Vec<f32>, LogRange) {
    let logged: Vec<f64> = raw.par_iter().map(|i| (i + LOG_OFFSET).ln()).collect();

    let range = logged
        .par_chunks(PARALLEL_CHUNK_SIZE)
        .map(|chunk| {
            chunk.iter().fold(LogRange::empty(), |range, &value| {
                range.merge(LogRange {
                    min: value,
                    max: value,
                })
            })
        })
        .reduce_with(LogRange::merge)
        .unwrap_or_else(LogRange::empty);

    let span = range.span();
    let normalised = if span > 0.0 && span.is_finite() {
        logged
            .par_iter()
            .map(|value| ((value - range.min) / span) as f32)
            .collect()
    } else {
        vec![0.0; logged.len()]
    };

    (normalised, range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_map_to_unit_interval() {
        let (normalised, range) = log_normalise(&[5.0, 1.0, 100.0, 20.0]);

        assert_eq!(normalised[1], 0.0);
        assert!((normalised[2] - 1.0).abs() < 1e-6);
        assert!(normalised.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!((range.min - 1.0_f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn log_scale_compresses_large_values() {
        let (normalised, _) = log_normalise(&[1.0, 10.0, 100.0]);
        assert!((normalised[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_reading_stays_finite() {
        let (normalised, range) = log_normalise(&[0.0, 1.0]);
        assert!(range.min.is_finite());
        assert_eq!(normalised, vec![0.0, 1.0]);
    }

    #[test]
    fn flat_input_maps_to_zero() {
        let (normalised, _) = log_normalise(&[3.0, 3.0, 3.0]);
        assert_eq!(normalised, vec![0.0; 3]);
    }
}
