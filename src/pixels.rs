//! Pixel ingestion and pre-filtering
//!
//! The engine receives already-decoded pixels; container parsing is the
//! caller's job. This module validates the buffer shape and optionally
//! strips near-black and near-white pixels to reduce background bias
//! before clustering.

use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::constants::filtering;
use crate::error::{ProfileError, Result};

/// One immutable RGB pixel, channels in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel triple as an array, for distance math.
    pub const fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// True when every channel is below the dark threshold.
    fn is_near_black(&self, threshold: u8) -> bool {
        self.r < threshold && self.g < threshold && self.b < threshold
    }

    /// True when every channel is above the light threshold.
    fn is_near_white(&self, threshold: u8) -> bool {
        self.r > threshold && self.g > threshold && self.b > threshold
    }

    /// Coarse quantization key keeping the top `bits` of each channel,
    /// packed red-high. Pixels in the same bucket share a key.
    pub(crate) fn quantized_key(&self, bits: u8) -> u16 {
        let shift = 8 - bits;
        ((self.r >> shift) as u16) << (2 * bits)
            | ((self.g >> shift) as u16) << bits
            | (self.b >> shift) as u16
    }

    /// Squared Euclidean RGB distance to another pixel.
    pub fn distance_squared(&self, other: &Pixel) -> f32 {
        let dr = self.r as f32 - other.r as f32;
        let dg = self.g as f32 - other.g as f32;
        let db = self.b as f32 - other.b as f32;
        dr * dr + dg * dg + db * db
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

/// An owned pixel sequence with its spatial dimensions.
///
/// Regional analysis needs to know where each pixel sits; every other stage
/// treats the buffer as a flat sequence.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixels: Vec<Pixel>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a buffer from pixels and their image dimensions.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if `pixels` is empty
    /// - `DimensionMismatch` if `width * height != pixels.len()`
    pub fn new(pixels: Vec<Pixel>, width: u32, height: u32) -> Result<Self> {
        if pixels.is_empty() {
            return Err(ProfileError::empty_input("pixel buffer"));
        }
        if width as usize * height as usize != pixels.len() {
            return Err(ProfileError::DimensionMismatch {
                width,
                height,
                pixel_count: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Create a buffer from a flat sequence with no known spatial layout.
    ///
    /// The sequence is treated as a single pixel row, which makes regional
    /// analysis degenerate to column slices of the sequence.
    pub fn from_flat(pixels: Vec<Pixel>) -> Result<Self> {
        let len = pixels.len();
        Self::new(pixels, len as u32, 1)
    }

    /// Create a buffer from raw interleaved RGB bytes.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if `bytes` is empty
    /// - `DimensionMismatch` if the byte count is not `width * height * 3`
    pub fn from_rgb_bytes(bytes: &[u8], width: u32, height: u32) -> Result<Self> {
        if bytes.is_empty() {
            return Err(ProfileError::empty_input("rgb byte buffer"));
        }
        if bytes.len() % 3 != 0 || bytes.len() / 3 != width as usize * height as usize {
            return Err(ProfileError::DimensionMismatch {
                width,
                height,
                pixel_count: bytes.len() / 3,
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Pixel::new(c[0], c[1], c[2]))
            .collect();
        Self::new(pixels, width, height)
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at (x, y). Row-major layout.
    pub fn get(&self, x: u32, y: u32) -> Pixel {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Outcome of the extreme-pixel filter.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Pixels surviving the filter (the full input when skipped)
    pub pixels: Vec<Pixel>,
    /// True when the filter removed anything
    pub applied: bool,
}

/// Remove near-black and near-white pixels from a sequence.
///
/// The filter is skipped (returning the whole input) when disabled or when
/// fewer than 1% of the pixels would survive, so monochrome and
/// black-and-white images are analyzed as-is rather than emptied.
pub fn filter_extremes(pixels: &[Pixel], config: &FilterConfig) -> Result<FilterOutcome> {
    if pixels.is_empty() {
        return Err(ProfileError::empty_input("filter input"));
    }
    if !config.enabled {
        return Ok(FilterOutcome {
            pixels: pixels.to_vec(),
            applied: false,
        });
    }

    let filtered: Vec<Pixel> = pixels
        .iter()
        .copied()
        .filter(|p| {
            !p.is_near_black(config.dark_threshold) && !p.is_near_white(config.light_threshold)
        })
        .collect();

    let min_retained = (pixels.len() as f32 * filtering::MIN_RETAINED_FRACTION).ceil() as usize;
    if filtered.len() < min_retained.max(1) {
        return Ok(FilterOutcome {
            pixels: pixels.to_vec(),
            applied: false,
        });
    }

    let applied = filtered.len() < pixels.len();
    Ok(FilterOutcome {
        pixels: filtered,
        applied,
    })
}
