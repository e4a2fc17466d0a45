use crate::pipeline::BAND_COUNT;
use ratatui::style::Color;

/// Fill for countries with no value for the selection
pub const NO_DATA: Color = Color::Rgb(48, 48, 48);
/// Country outlines
pub const OUTLINE: Color = Color::Rgb(90, 90, 90);

/// ColorBrewer RdYlGn, reversed: low emissions green, high emissions red
const STOPS: [(u8, u8, u8); 11] = [
    (0x00, 0x68, 0x37),
    (0x1a, 0x98, 0x50),
    (0x66, 0xbd, 0x63),
    (0xa6, 0xd9, 0x6a),
    (0xd9, 0xef, 0x8b),
    (0xff, 0xff, 0xbf),
    (0xfe, 0xe0, 0x8b),
    (0xfd, 0xae, 0x61),
    (0xf4, 0x6d, 0x43),
    (0xd7, 0x30, 0x27),
    (0xa5, 0x00, 0x26),
];

/// Colour of a band, sampled at the band's midpoint along the ramp
pub fn band_color(band: usize) -> Color {
    let t = (band.min(BAND_COUNT - 1) as f64 + 0.5) / BAND_COUNT as f64;
    let pos = t * (STOPS.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(STOPS.len() - 1);
    let frac = pos - lo as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (STOPS[lo], STOPS[hi]);
    Color::Rgb(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_runs_green_to_red() {
        let Color::Rgb(r0, g0, _) = band_color(0) else {
            panic!("expected rgb");
        };
        let Color::Rgb(r1, g1, _) = band_color(BAND_COUNT - 1) else {
            panic!("expected rgb");
        };
        assert!(g0 > r0);
        assert!(r1 > g1);
    }

    #[test]
    fn test_bands_are_distinct_from_no_data() {
        for band in 0..BAND_COUNT {
            assert_ne!(band_color(band), NO_DATA);
        }
    }
}
