//! Color space conversion utilities
//!
//! Pure, stateless conversions between color spaces:
//! - RGB to HSV and back
//! - RGB to CIE Lab (sRGB gamma linearization, D65 white point)
//! - Delta-E (CIE76) perceptual distance
//! - Hex color representation
//!
//! Algorithm tag: `algo-srgb-d65-conversion`

use palette::{FromColor, Hsv as PaletteHsv, IntoColor, Lab, Srgb};
use serde::{Deserialize, Serialize};

use crate::pixels::Pixel;

/// HSV color with hue in [0, 360) and saturation/value in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// CIE L*a*b* color under the D65 illuminant.
///
/// Lightness in [0, 100]; a* and b* roughly in [-128, 127].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

/// Convert RGB (0-255) to HSV.
///
/// Hue is reported in degrees [0, 360); saturation and value as
/// percentages [0, 100].
pub fn rgb_to_hsv(pixel: Pixel) -> Hsv {
    let srgb = Srgb::new(
        pixel.r as f32 / 255.0,
        pixel.g as f32 / 255.0,
        pixel.b as f32 / 255.0,
    );
    let hsv = PaletteHsv::from_color(srgb);
    let mut h = hsv.hue.into_positive_degrees();
    if h >= 360.0 {
        h -= 360.0;
    }
    Hsv {
        h,
        s: hsv.saturation * 100.0,
        v: hsv.value * 100.0,
    }
}

/// Convert HSV back to RGB (0-255).
///
/// Inverse of [`rgb_to_hsv`]: a round trip reproduces the original pixel
/// within one count per channel.
pub fn hsv_to_rgb(hsv: Hsv) -> Pixel {
    let phsv = PaletteHsv::new(hsv.h, hsv.s / 100.0, hsv.v / 100.0);
    let srgb: Srgb = phsv.into_color();
    Pixel::new(
        (srgb.red * 255.0).round().clamp(0.0, 255.0) as u8,
        (srgb.green * 255.0).round().clamp(0.0, 255.0) as u8,
        (srgb.blue * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

/// Convert RGB (0-255) to CIE Lab under D65.
///
/// Uses the standard sRGB linearization and XYZ matrix, so L lands in
/// [0, 100] with neutral grays at a ≈ b ≈ 0.
pub fn rgb_to_lab(pixel: Pixel) -> LabColor {
    let srgb = Srgb::new(
        pixel.r as f32 / 255.0,
        pixel.g as f32 / 255.0,
        pixel.b as f32 / 255.0,
    );
    let lab = Lab::from_color(srgb);
    LabColor {
        l: lab.l,
        a: lab.a,
        b: lab.b,
    }
}

/// Compute Delta-E (CIE76) between two Lab colors.
///
/// Euclidean distance in Lab space. Symmetric, zero for identical colors.
pub fn delta_e(a: LabColor, b: LabColor) -> f32 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// Format a pixel as an uppercase hex color string, e.g. "#FF0000".
pub fn rgb_to_hex(pixel: Pixel) -> String {
    format!("#{:02X}{:02X}{:02X}", pixel.r, pixel.g, pixel.b)
}

/// Relative luminance (Rec. 601 weights), normalized to [0, 1].
pub fn relative_luminance(pixel: Pixel) -> f32 {
    (0.299 * pixel.r as f32 + 0.587 * pixel.g as f32 + 0.114 * pixel.b as f32) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hsv_primaries() {
        let red = rgb_to_hsv(Pixel::new(255, 0, 0));
        assert!(red.h.abs() < 0.5);
        assert!((red.s - 100.0).abs() < 0.5);
        assert!((red.v - 100.0).abs() < 0.5);

        let green = rgb_to_hsv(Pixel::new(0, 255, 0));
        assert!((green.h - 120.0).abs() < 0.5);

        let blue = rgb_to_hsv(Pixel::new(0, 0, 255));
        assert!((blue.h - 240.0).abs() < 0.5);
    }

    #[test]
    fn test_rgb_to_hsv_grayscale() {
        let gray = rgb_to_hsv(Pixel::new(128, 128, 128));
        assert!(gray.s.abs() < 0.5);
        assert!((gray.v - 50.2).abs() < 1.0);
    }

    #[test]
    fn test_hue_range() {
        // A spread of inputs always lands in [0, 360)
        for r in (0..=255).step_by(51) {
            for g in (0..=255).step_by(51) {
                for b in (0..=255).step_by(51) {
                    let hsv = rgb_to_hsv(Pixel::new(r as u8, g as u8, b as u8));
                    assert!((0.0..360.0).contains(&hsv.h), "hue {} out of range", hsv.h);
                    assert!((0.0..=100.0).contains(&hsv.s));
                    assert!((0.0..=100.0).contains(&hsv.v));
                }
            }
        }
    }

    #[test]
    fn test_hsv_roundtrip_within_one_count() {
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(17) {
                for b in (0..=255).step_by(17) {
                    let original = Pixel::new(r as u8, g as u8, b as u8);
                    let back = hsv_to_rgb(rgb_to_hsv(original));
                    assert!(
                        (back.r as i16 - original.r as i16).abs() <= 1
                            && (back.g as i16 - original.g as i16).abs() <= 1
                            && (back.b as i16 - original.b as i16).abs() <= 1,
                        "roundtrip {:?} -> {:?}",
                        original,
                        back
                    );
                }
            }
        }
    }

    #[test]
    fn test_rgb_to_lab_black_and_white() {
        let black = rgb_to_lab(Pixel::new(0, 0, 0));
        assert!(black.l < 1.0);

        let white = rgb_to_lab(Pixel::new(255, 255, 255));
        assert!(white.l > 99.0);
        assert!(white.a.abs() < 1.0);
        assert!(white.b.abs() < 1.0);
    }

    #[test]
    fn test_lab_lightness_range() {
        for v in (0..=255).step_by(15) {
            let lab = rgb_to_lab(Pixel::new(v as u8, v as u8, v as u8));
            assert!((0.0..=100.5).contains(&lab.l));
        }
    }

    #[test]
    fn test_delta_e_identity_and_symmetry() {
        let a = rgb_to_lab(Pixel::new(200, 30, 90));
        let b = rgb_to_lab(Pixel::new(40, 180, 220));
        assert!(delta_e(a, a) < 1e-6);
        assert!((delta_e(a, b) - delta_e(b, a)).abs() < 1e-6);
        assert!(delta_e(a, b) > 10.0);
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex(Pixel::new(255, 0, 0)), "#FF0000");
        assert_eq!(rgb_to_hex(Pixel::new(0, 255, 0)), "#00FF00");
        assert_eq!(rgb_to_hex(Pixel::new(18, 52, 86)), "#123456");
    }

    #[test]
    fn test_relative_luminance() {
        assert!(relative_luminance(Pixel::new(0, 0, 0)).abs() < 1e-6);
        assert!((relative_luminance(Pixel::new(255, 255, 255)) - 1.0).abs() < 1e-6);
        // Green dominates the weighting
        let g = relative_luminance(Pixel::new(0, 255, 0));
        let b = relative_luminance(Pixel::new(0, 0, 255));
        assert!(g > b);
    }
}
