// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Palette decoding and hue arithmetic.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A linear RGB color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
}

impl Rgb {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a color from its components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb`, `#rrggbb`, `rgb` or `rrggbb` into a normalized color.
    ///
    /// Returns `None` for anything else.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| f32::from(v) / 255.0);
        match digits.len() {
            3 => {
                let short = |i: usize| {
                    u8::from_str_radix(&digits[i..=i], 16)
                        .ok()
                        .map(|v| f32::from(v * 17) / 255.0)
                };
                Some(Self::new(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Returns the components as an array.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// `fract` as GLSL defines it: `x - floor(x)`, always in `[0, 1)`.
#[inline]
#[must_use]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Rotates a hue (fraction of a turn) by `shift_degrees`, wrapping into `[0, 1)`.
#[must_use]
pub fn shift_hue(hue: f32, shift_degrees: f32) -> f32 {
    fract(hue + shift_degrees / 360.0)
}

/// Converts hue/saturation/value (all `0..=1`) to RGB.
///
/// Same formulation as the fragment program's `hsv2rgb`.
#[must_use]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let k = [1.0_f32, 2.0 / 3.0, 1.0 / 3.0];
    let channel = |offset: f32| {
        let p = (fract(h + offset) * 6.0 - 3.0).abs();
        let mixed = (p - 1.0).clamp(0.0, 1.0);
        v * (1.0 + (mixed - 1.0) * s)
    };
    Rgb::new(channel(k[0]), channel(k[1]), channel(k[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgb::from_hex("#ffffff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb::WHITE));
        let c = Rgb::from_hex("ff8000").unwrap();
        assert!((c.g - 128.0 / 255.0).abs() < EPS, "green is 0x80: {c:?}");
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#gggggg"), None);
        assert_eq!(Rgb::from_hex(""), None);
        assert_eq!(Rgb::from_hex("#ééé"), None);
    }

    #[test]
    fn hue_shift_wraps_past_full_turn() {
        let shifted = shift_hue(350.0 / 360.0, 20.0) * 360.0;
        assert!(
            (shifted - 10.0).abs() < 1e-3,
            "350° + 20° is 10°, got {shifted}"
        );
    }

    #[test]
    fn hue_shift_accepts_negative_and_large_angles() {
        let cases = [
            (0.0, 370.0, 10.0),
            (0.0, -350.0, 10.0),
            (0.25, 140.0, 230.0),
        ];
        for (hue, shift, expected) in cases {
            let shifted = shift_hue(hue, shift) * 360.0;
            assert!(
                (shifted - expected).abs() < 1e-3,
                "{hue} shifted by {shift}° gave {shifted}"
            );
        }
    }

    #[test]
    fn hsv_primaries() {
        let red = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((red.r - 1.0).abs() < EPS && red.g.abs() < EPS && red.b.abs() < EPS);
        let green = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!(
            (green.g - 1.0).abs() < EPS && green.r.abs() < EPS,
            "{green:?}"
        );
        let grey = hsv_to_rgb(0.7, 0.0, 0.5);
        assert!(
            (grey.r - 0.5).abs() < EPS && (grey.b - 0.5).abs() < EPS,
            "{grey:?}"
        );
    }
}
