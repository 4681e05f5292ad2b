//! Spatial, distribution, and harmony analysis
//!
//! This module computes the descriptive layers of a color profile:
//! per-region grid statistics, per-channel histograms with peak
//! detection, and hue-wheel harmony with a perceptual distance matrix.

pub mod harmony;
pub mod histogram;
pub mod regions;

pub use harmony::{delta_e_interpretation, HarmonyAssessment, HarmonyType};
pub use histogram::{Histogram, HistogramPeak, Histograms};
pub use regions::{Region, RegionBounds};
