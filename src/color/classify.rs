//! Perceptual color classification
//!
//! Derives semantic attributes from raw RGB values:
//! - Human-readable name via nearest neighbor over a canonical color table
//! - Warm/cool/neutral temperature from the hue wheel
//! - Light/medium/dark brightness from relative luminance
//! - Low to very-high saturation banding
//!
//! Every attribute is a pure function of the RGB triple, so recomputation
//! is deterministic.
//!
//! Algorithm tag: `algo-perceptual-classification`

use serde::{Deserialize, Serialize};

use crate::color::conversion::{
    relative_luminance, rgb_to_hex, rgb_to_hsv, rgb_to_lab, Hsv, LabColor,
};
use crate::constants::perception;
use crate::pixels::Pixel;

/// Canonical named-color table for nearest-neighbor lookup.
///
/// Deliberately chromatic only: near-neutral colors are caught by the
/// grayscale special case before this table is consulted. Order matters;
/// lookup keeps the first of equidistant entries.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("Red", [255, 0, 0]),
    ("Crimson", [220, 20, 60]),
    ("Maroon", [128, 0, 0]),
    ("Orange", [255, 165, 0]),
    ("Coral", [255, 127, 80]),
    ("Brown", [139, 69, 19]),
    ("Tan", [210, 180, 140]),
    ("Gold", [255, 215, 0]),
    ("Yellow", [255, 255, 0]),
    ("Khaki", [240, 230, 140]),
    ("Olive", [128, 128, 0]),
    ("Lime", [0, 255, 0]),
    ("Green", [0, 128, 0]),
    ("Forest Green", [34, 139, 34]),
    ("Teal", [0, 128, 128]),
    ("Cyan", [0, 255, 255]),
    ("Sky Blue", [135, 206, 235]),
    ("Blue", [0, 0, 255]),
    ("Navy", [0, 0, 128]),
    ("Indigo", [75, 0, 130]),
    ("Purple", [128, 0, 128]),
    ("Violet", [238, 130, 238]),
    ("Magenta", [255, 0, 255]),
    ("Pink", [255, 192, 203]),
    ("Salmon", [250, 128, 114]),
];

/// Warm/cool/neutral classification of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Warm,
    Cool,
    Neutral,
}

/// Light/medium/dark banding of relative luminance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brightness {
    Light,
    Medium,
    Dark,
}

/// HSV saturation banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// A color with every derived representation and attribute attached.
///
/// All fields are pure functions of `rgb`; construct via [`Color::from_rgb`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub rgb: [u8; 3],
    pub hex: String,
    pub hsv: Hsv,
    pub lab: LabColor,
    pub name: String,
    pub temperature: Temperature,
    pub brightness: Brightness,
    pub saturation: SaturationLevel,
}

impl Color {
    /// Derive the full value object from an RGB triple.
    pub fn from_rgb(pixel: Pixel) -> Self {
        let hsv = rgb_to_hsv(pixel);
        Self {
            rgb: pixel.channels(),
            hex: rgb_to_hex(pixel),
            hsv,
            lab: rgb_to_lab(pixel),
            name: name_color(pixel).to_string(),
            temperature: classify_temperature(hsv),
            brightness: classify_brightness(pixel),
            saturation: classify_saturation(hsv),
        }
    }

    /// The underlying pixel value.
    pub fn pixel(&self) -> Pixel {
        Pixel::new(self.rgb[0], self.rgb[1], self.rgb[2])
    }
}

/// Name a color by nearest neighbor against the canonical table.
///
/// Colors with a channel spread below the grayscale threshold are named by
/// luminance band instead of hue, so dark desaturated pixels do not map to
/// arbitrary chromatic names.
pub fn name_color(pixel: Pixel) -> &'static str {
    let spread = pixel.channels().iter().max().unwrap() - pixel.channels().iter().min().unwrap();
    if spread < perception::GRAYSCALE_SPREAD {
        return grayscale_name(relative_luminance(pixel));
    }

    let mut best = NAMED_COLORS[0].0;
    let mut best_distance = f32::MAX;
    for (name, rgb) in NAMED_COLORS {
        let candidate = Pixel::new(rgb[0], rgb[1], rgb[2]);
        let distance = pixel.distance_squared(&candidate);
        // Strict comparison keeps the first of equidistant entries
        if distance < best_distance {
            best = name;
            best_distance = distance;
        }
    }
    best
}

fn grayscale_name(luminance: f32) -> &'static str {
    if luminance >= 0.9 {
        "White"
    } else if luminance >= 0.65 {
        "Light Gray"
    } else if luminance >= 0.35 {
        "Gray"
    } else if luminance >= 0.12 {
        "Dark Gray"
    } else {
        "Black"
    }
}

/// Classify warm/cool/neutral from HSV.
///
/// Desaturated colors are neutral regardless of hue. The yellow-green band
/// (60, 120) reads neutral unless strongly saturated, in which case it
/// leans warm.
pub fn classify_temperature(hsv: Hsv) -> Temperature {
    if hsv.s < perception::NEUTRAL_SATURATION {
        return Temperature::Neutral;
    }
    let h = hsv.h;
    if h <= perception::WARM_HUE_MAX || h >= perception::COOL_HUE_MAX {
        Temperature::Warm
    } else if h >= perception::COOL_HUE_MIN {
        Temperature::Cool
    } else if hsv.s >= perception::HIGH_SATURATION {
        Temperature::Warm
    } else {
        Temperature::Neutral
    }
}

/// Classify light/medium/dark from relative luminance.
pub fn classify_brightness(pixel: Pixel) -> Brightness {
    let luminance = relative_luminance(pixel);
    if luminance > perception::LIGHT_LUMINANCE {
        Brightness::Light
    } else if luminance > perception::MEDIUM_LUMINANCE {
        Brightness::Medium
    } else {
        Brightness::Dark
    }
}

/// Band HSV saturation into low/medium/high/very-high.
pub fn classify_saturation(hsv: Hsv) -> SaturationLevel {
    if hsv.s < 25.0 {
        SaturationLevel::Low
    } else if hsv.s < 50.0 {
        SaturationLevel::Medium
    } else if hsv.s < 75.0 {
        SaturationLevel::High
    } else {
        SaturationLevel::VeryHigh
    }
}
