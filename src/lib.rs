//! # Chroma Profile
//!
//! A Rust crate for reducing decoded image pixels to a perceptually
//! meaningful color profile.
//!
//! This library provides deterministic dominant-color analysis by:
//! - Filtering near-black/near-white background pixels
//! - Clustering with seeded K-Means++ and Lloyd iteration
//! - Classifying colors (name, temperature, brightness, saturation)
//! - Computing regional grid statistics, channel histograms, and hue-wheel
//!   harmony with a Delta-E distance matrix
//!
//! The engine performs no I/O: image decoding, storage, and transport are
//! the caller's collaborators. Identical input, configuration, and seed
//! always produce an identical profile.
//!
//! ## Example
//!
//! ```rust
//! use chroma_profile::{analyze_buffer, AnalysisConfig, Pixel, PixelBuffer};
//!
//! let pixels = vec![Pixel::new(200, 30, 40); 64];
//! let buffer = PixelBuffer::new(pixels, 8, 8)?;
//! let profile = analyze_buffer(&buffer, &AnalysisConfig::default())?;
//!
//! assert_eq!(profile.dominant_colors[0].color.rgb, [200, 30, 40]);
//! # Ok::<(), chroma_profile::ProfileError>(())
//! ```

pub mod analysis;
pub mod cluster;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod pixels;
pub mod profile;

pub use analysis::{
    HarmonyAssessment, HarmonyType, Histogram, HistogramPeak, Histograms, Region, RegionBounds,
};
pub use color::{Brightness, Color, Hsv, LabColor, SaturationLevel, Temperature};
pub use config::{AnalysisConfig, KSelection};
pub use error::{ProfileError, Result};
pub use pixels::{Pixel, PixelBuffer};
pub use profile::{
    ColorProfile, ColorProfiler, DominantColorEntry, ProfileMetadata, TemperatureDistribution,
};

/// Profile a pixel buffer with the given configuration.
///
/// This is the main entry point. It validates the configuration, runs the
/// full pipeline, and returns a fresh [`ColorProfile`].
///
/// # Errors
///
/// Returns `ProfileError` if:
/// - The configuration fails validation
/// - The buffer is empty or its dimensions are inconsistent
///
/// Reduced cluster counts and unconverged iteration are reported through
/// [`ProfileMetadata`], not as errors.
pub fn analyze_buffer(buffer: &PixelBuffer, config: &AnalysisConfig) -> Result<ColorProfile> {
    ColorProfiler::new(config.clone())?.profile(buffer)
}
