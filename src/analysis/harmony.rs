//! Color harmony and perceptual distance analysis
//!
//! Classifies how the dominant colors relate on the hue wheel and computes
//! the full pairwise Delta-E (CIE76) matrix in Lab space. Grayscale
//! entries are excluded from hue analysis so a photo's neutral background
//! cannot fake an "analogous" palette, but they stay in the distance
//! matrix.
//!
//! Algorithm tag: `algo-hue-wheel-harmony`

use serde::{Deserialize, Serialize};

use crate::color::classify::Color;
use crate::color::conversion::delta_e;
use crate::constants::{harmony, perception};

/// Hue-wheel relationship of a color set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyType {
    Monochromatic,
    Analogous,
    Complementary,
    Triadic,
    Polychromatic,
    Complex,
}

/// Harmony classification with the perceptual distance matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonyAssessment {
    /// Detected harmony class
    #[serde(rename = "type")]
    pub harmony_type: HarmonyType,
    /// Fit of the detected class, 0 to 1
    pub score: f32,
    /// Pairwise Delta-E over all dominant colors, row i / column j
    pub delta_e_matrix: Vec<Vec<f32>>,
    /// Mean of the off-diagonal Delta-E values
    pub average_delta_e: f32,
    /// Smallest off-diagonal Delta-E
    pub min_delta_e: f32,
    /// Largest off-diagonal Delta-E
    pub max_delta_e: f32,
}

/// Classify harmony and compute perceptual distances for a dominant-color
/// set.
///
/// With fewer than two chromatic colors the palette is monochromatic;
/// otherwise the rules run in order: analogous, complementary, triadic,
/// polychromatic, complex.
pub fn assess_harmony(colors: &[Color]) -> HarmonyAssessment {
    let hues: Vec<f32> = colors
        .iter()
        .filter(|c| c.hsv.s >= perception::NEUTRAL_SATURATION)
        .map(|c| c.hsv.h)
        .collect();

    let (harmony_type, score) = classify_hues(&hues);
    let (delta_e_matrix, average_delta_e, min_delta_e, max_delta_e) = distance_matrix(colors);

    HarmonyAssessment {
        harmony_type,
        score,
        delta_e_matrix,
        average_delta_e,
        min_delta_e,
        max_delta_e,
    }
}

/// Human-readable interpretation of a Delta-E value (CIE76 bands).
pub fn delta_e_interpretation(delta_e: f32) -> &'static str {
    if delta_e < 1.0 {
        "imperceptible"
    } else if delta_e < 2.0 {
        "perceptible on close inspection"
    } else if delta_e <= 10.0 {
        "perceptible at a glance"
    } else if delta_e < 50.0 {
        "more similar than opposite"
    } else {
        "near opposite"
    }
}

/// Circular distance between two hues in degrees, in [0, 180].
fn hue_difference(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs();
    diff.min(360.0 - diff)
}

fn classify_hues(hues: &[f32]) -> (HarmonyType, f32) {
    if hues.len() < 2 {
        return (HarmonyType::Monochromatic, 1.0);
    }

    let mut diffs = Vec::new();
    for i in 0..hues.len() {
        for j in (i + 1)..hues.len() {
            diffs.push(hue_difference(hues[i], hues[j]));
        }
    }
    let avg = diffs.iter().sum::<f32>() / diffs.len() as f32;

    if avg < harmony::ANALOGOUS_MAX_AVG {
        let score = 1.0 - avg / harmony::ANALOGOUS_MAX_AVG;
        return (HarmonyType::Analogous, score.clamp(0.0, 1.0));
    }

    let closest_to_180 = diffs
        .iter()
        .map(|d| (d - 180.0).abs())
        .fold(f32::MAX, f32::min);
    if closest_to_180 <= harmony::COMPLEMENTARY_TOLERANCE {
        let score = 1.0 - closest_to_180 / harmony::COMPLEMENTARY_TOLERANCE;
        return (HarmonyType::Complementary, score.clamp(0.0, 1.0));
    }

    let closest_to_120 = diffs
        .iter()
        .map(|d| (d - 120.0).abs())
        .fold(f32::MAX, f32::min);
    if closest_to_120 <= harmony::TRIADIC_TOLERANCE {
        let score = 1.0 - closest_to_120 / harmony::TRIADIC_TOLERANCE;
        return (HarmonyType::Triadic, score.clamp(0.0, 1.0));
    }

    if avg > harmony::POLYCHROMATIC_MIN_AVG {
        let score = (avg - harmony::POLYCHROMATIC_MIN_AVG) / (180.0 - harmony::POLYCHROMATIC_MIN_AVG);
        return (HarmonyType::Polychromatic, score.clamp(0.0, 1.0));
    }

    (HarmonyType::Complex, 0.5)
}

fn distance_matrix(colors: &[Color]) -> (Vec<Vec<f32>>, f32, f32, f32) {
    let n = colors.len();
    let mut matrix = vec![vec![0.0f32; n]; n];
    let mut sum = 0.0f32;
    let mut min = f32::MAX;
    let mut max = 0.0f32;
    let mut pairs = 0usize;

    for i in 0..n {
        for j in (i + 1)..n {
            let d = delta_e(colors[i].lab, colors[j].lab);
            matrix[i][j] = d;
            matrix[j][i] = d;
            sum += d;
            min = min.min(d);
            max = max.max(d);
            pairs += 1;
        }
    }

    if pairs == 0 {
        (matrix, 0.0, 0.0, 0.0)
    } else {
        (matrix, sum / pairs as f32, min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Pixel;

    fn color(r: u8, g: u8, b: u8) -> Color {
        Color::from_rgb(Pixel::new(r, g, b))
    }

    #[test]
    fn test_hue_difference_wraps() {
        assert!((hue_difference(350.0, 10.0) - 20.0).abs() < 1e-6);
        assert!((hue_difference(0.0, 180.0) - 180.0).abs() < 1e-6);
        assert!(hue_difference(90.0, 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_color_is_monochromatic() {
        let assessment = assess_harmony(&[color(255, 0, 0)]);
        assert_eq!(assessment.harmony_type, HarmonyType::Monochromatic);
        assert!((assessment.score - 1.0).abs() < 1e-6);
        assert_eq!(assessment.delta_e_matrix.len(), 1);
        assert!(assessment.average_delta_e.abs() < 1e-6);
    }

    #[test]
    fn test_grayscale_palette_is_monochromatic() {
        // Black and white carry no chromatic information
        let assessment = assess_harmony(&[color(0, 0, 0), color(255, 255, 255)]);
        assert_eq!(assessment.harmony_type, HarmonyType::Monochromatic);
        // Distance matrix still covers both entries
        assert!(assessment.max_delta_e > 90.0);
    }

    #[test]
    fn test_analogous_neighboring_hues() {
        // Red, orange-red, orange: hues within 30 degrees
        let assessment = assess_harmony(&[
            color(255, 0, 0),
            color(255, 80, 0),
            color(255, 140, 0),
        ]);
        assert_eq!(assessment.harmony_type, HarmonyType::Analogous);
        assert!(assessment.score > 0.0);
    }

    #[test]
    fn test_complementary_opposite_hues() {
        // Red (0) and cyan (180)
        let assessment = assess_harmony(&[color(255, 0, 0), color(0, 255, 255)]);
        assert_eq!(assessment.harmony_type, HarmonyType::Complementary);
        assert!(assessment.score > 0.9);
    }

    #[test]
    fn test_triadic_primaries() {
        let assessment = assess_harmony(&[
            color(255, 0, 0),
            color(0, 255, 0),
            color(0, 0, 255),
        ]);
        assert_eq!(assessment.harmony_type, HarmonyType::Triadic);
        assert!(assessment.score > 0.9);
    }

    #[test]
    fn test_matrix_symmetry_and_zero_diagonal() {
        let colors = vec![color(255, 0, 0), color(0, 255, 0), color(40, 40, 200)];
        let assessment = assess_harmony(&colors);
        let m = &assessment.delta_e_matrix;
        for i in 0..3 {
            assert!(m[i][i].abs() < 1e-6);
            for j in 0..3 {
                assert!((m[i][j] - m[j][i]).abs() < 1e-6);
            }
        }
        assert!(assessment.min_delta_e <= assessment.average_delta_e);
        assert!(assessment.average_delta_e <= assessment.max_delta_e);
    }

    #[test]
    fn test_interpretation_bands() {
        assert_eq!(delta_e_interpretation(0.5), "imperceptible");
        assert_eq!(delta_e_interpretation(1.5), "perceptible on close inspection");
        assert_eq!(delta_e_interpretation(5.0), "perceptible at a glance");
        assert_eq!(delta_e_interpretation(30.0), "more similar than opposite");
        assert_eq!(delta_e_interpretation(80.0), "near opposite");
    }

    #[test]
    fn test_serialized_type_field() {
        let assessment = assess_harmony(&[color(255, 0, 0)]);
        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["type"], "monochromatic");
    }
}
