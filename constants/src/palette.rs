/// Intensity colour ramp shared by the viewer and the pre-processor.
///
/// Four stops, three linear segments: blue -> green -> yellow -> red.
pub const PALETTE_STOPS: [(f32, [f32; 3]); 4] = [
    (0.0, [0.0, 0.0, 1.0]),
    (0.333, [0.0, 1.0, 0.0]),
    (0.666, [1.0, 1.0, 0.0]),
    (1.0, [1.0, 0.0, 0.0]),
];

/// Number of interpolation segments between the palette stops.
pub const PALETTE_SEGMENTS: usize = PALETTE_STOPS.len() - 1;

/// Evaluate a single palette segment at `intensity`.
/// Values outside the segment extrapolate linearly; callers pick the segment.
pub fn segment_colour(segment: usize, intensity: f32) -> [f32; 3] {
    let segment = segment.min(PALETTE_SEGMENTS - 1);
    let (low, start) = PALETTE_STOPS[segment];
    let (high, end) = PALETTE_STOPS[segment + 1];
    let t = (intensity - low) / (high - low);

    [
        start[0] + (end[0] - start[0]) * t,
        start[1] + (end[1] - start[1]) * t,
        start[2] + (end[2] - start[2]) * t,
    ]
}

/// Map a normalised intensity onto the ramp. Input is clamped to [0, 1];
/// NaN maps to the first stop.
pub fn palette_colour(intensity: f32) -> [f32; 3] {
    let intensity = if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    };

    let segment = PALETTE_STOPS[1..]
        .iter()
        .position(|(stop, _)| intensity <= *stop)
        .unwrap_or(PALETTE_SEGMENTS - 1);

    segment_colour(segment, intensity)
}

/// Palette colour quantised to 8-bit channels for PLY output.
pub fn palette_colour_u8(intensity: f32) -> [u8; 3] {
    let [r, g, b] = palette_colour(intensity);
    [to_u8(r), to_u8(g), to_u8(b)]
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_colour_eq(a: [f32; 3], b: [f32; 3]) {
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn stops_map_to_their_colours() {
        for (stop, colour) in PALETTE_STOPS {
            assert_colour_eq(palette_colour(stop), colour);
        }
    }

    #[test]
    fn segments_meet_at_interior_stops() {
        assert_colour_eq(segment_colour(0, 0.333), segment_colour(1, 0.333));
        assert_colour_eq(segment_colour(1, 0.666), segment_colour(2, 0.666));
    }

    #[test]
    fn ramp_is_continuous_across_boundaries() {
        for boundary in [0.333_f32, 0.666] {
            let below = palette_colour(boundary - 1e-4);
            let above = palette_colour(boundary + 1e-4);
            for (x, y) in below.iter().zip(above.iter()) {
                assert!((x - y).abs() < 1e-2);
            }
        }
    }

    #[test]
    fn midpoint_of_first_segment_is_half_blue_half_green() {
        assert_colour_eq(palette_colour(0.1665), [0.0, 0.5, 0.5]);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_colour_eq(palette_colour(-3.0), [0.0, 0.0, 1.0]);
        assert_colour_eq(palette_colour(7.5), [1.0, 0.0, 0.0]);
        assert_colour_eq(palette_colour(f32::NAN), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn quantised_palette_hits_pure_channels() {
        assert_eq!(palette_colour_u8(0.0), [0, 0, 255]);
        assert_eq!(palette_colour_u8(0.666), [255, 255, 0]);
        assert_eq!(palette_colour_u8(1.0), [255, 0, 0]);
    }
}
