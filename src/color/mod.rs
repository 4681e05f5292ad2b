//! Color space conversion and perceptual classification
//!
//! This module handles RGB/HSV/Lab conversions, Delta-E perceptual
//! distance, and the derivation of semantic attributes (name, temperature,
//! brightness, saturation level) from raw RGB values.

pub mod classify;
pub mod conversion;

pub use classify::{Brightness, Color, SaturationLevel, Temperature};
pub use conversion::{Hsv, LabColor};
