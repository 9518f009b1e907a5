use constants::palette::palette_colour;
use serde::{Deserialize, Serialize};

/// How a dataset stores its per-point intensity in the colour channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityScheme {
    /// Scalar packed into an RGB ramp; decoded by dominant channel and
    /// displayed with the stored colour.
    Packed,
    /// Scalar stored in the first channel; displayed through the palette.
    #[default]
    Direct,
}

impl IntensityScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Packed => "packed",
            Self::Direct => "direct",
        }
    }
}

/// Recover a scalar from an RGB ramp colour with channels in [0, 1].
///
/// Blue dominant points land in [0, 0.333), green over red in
/// [0.333, 0.666), everything else in [0.666, 1.0]. Lossy by nature.
pub fn decode_packed(colour: [f32; 3]) -> f32 {
    // Channel ratios are taken on the 0..255 scale the ramp was encoded with.
    let [r, g, b] = colour.map(|c| c * 255.0);

    let intensity = if b > g && b > r {
        mix(0.0, 0.333, (g - b) / 255.0 + 1.0)
    } else if g > r {
        mix(0.333, 0.666, r / 255.0)
    } else {
        mix(0.666, 1.0, 1.0 - g / 255.0)
    };

    clamp_unit(intensity)
}

/// Intensity of a point under the given scheme, always in [0, 1].
pub fn intensity_of(colour: [f32; 3], scheme: IntensityScheme) -> f32 {
    match scheme {
        IntensityScheme::Packed => decode_packed(colour),
        IntensityScheme::Direct => clamp_unit(colour[0]),
    }
}

/// Display colour for a stored point colour.
pub fn colour_for(colour: [f32; 3], scheme: IntensityScheme) -> [f32; 3] {
    match scheme {
        IntensityScheme::Packed => colour,
        IntensityScheme::Direct => palette_colour(intensity_of(colour, scheme)),
    }
}

fn mix(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn packed_primaries_land_on_band_edges() {
        assert!(approx(decode_packed([0.0, 0.0, 1.0]), 0.0));
        assert!(approx(decode_packed([0.0, 1.0, 0.0]), 0.333));
        assert!(approx(decode_packed([1.0, 0.0, 0.0]), 1.0));
    }

    #[test]
    fn packed_bands_are_ordered() {
        let blue_band = decode_packed([0.1, 0.5, 0.9]);
        let green_band = decode_packed([0.5, 0.9, 0.1]);
        let red_band = decode_packed([0.9, 0.5, 0.1]);

        assert!(blue_band < 0.333);
        assert!((0.333..0.666).contains(&green_band));
        assert!(red_band >= 0.666);
    }

    #[test]
    fn packed_decode_stays_in_unit_range() {
        let steps = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];
        for r in steps {
            for g in steps {
                for b in steps {
                    let i = decode_packed([r, g, b]);
                    assert!((0.0..=1.0).contains(&i), "{r} {g} {b} -> {i}");
                }
            }
        }
    }

    #[test]
    fn grey_is_decoded_into_red_band() {
        // No dominant channel falls through to the last branch.
        assert!(approx(decode_packed([0.5, 0.5, 0.5]), 0.666 + 0.334 * 0.5));
    }

    #[test]
    fn direct_scheme_reads_first_channel() {
        assert!(approx(intensity_of([0.42, 0.9, 0.1], IntensityScheme::Direct), 0.42));
        assert!(approx(intensity_of([1.7, 0.0, 0.0], IntensityScheme::Direct), 1.0));
        assert!(approx(intensity_of([f32::NAN, 0.0, 0.0], IntensityScheme::Direct), 0.0));
    }

    #[test]
    fn direct_scheme_colours_through_palette() {
        assert_eq!(colour_for([0.0; 3], IntensityScheme::Direct), [0.0, 0.0, 1.0]);
        assert_eq!(colour_for([1.0; 3], IntensityScheme::Direct), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn packed_scheme_passes_stored_colour_through() {
        let stored = [0.2, 0.7, 0.3];
        assert_eq!(colour_for(stored, IntensityScheme::Packed), stored);
    }

    #[test]
    fn scheme_names_deserialize_lowercase() {
        let scheme: IntensityScheme = serde_json::from_str("\"packed\"").unwrap();
        assert_eq!(scheme, IntensityScheme::Packed);
        assert_eq!(IntensityScheme::default(), IntensityScheme::Direct);
    }
}
