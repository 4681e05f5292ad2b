//! Canonical thresholds and reference values for color profiling
//!
//! The source handlers this engine consolidates disagreed on several
//! thresholds (warm/cool hue cutoffs, neutrality cutoffs between 10 and
//! 20%). The values here are the single canonical set; variants found
//! elsewhere are treated as drift.

/// Clustering parameters and geometric limits
pub mod clustering {
    /// Maximum possible Euclidean distance in RGB space: sqrt(3 * 255^2)
    pub const MAX_RGB_DISTANCE: f32 = 441.67;

    /// Default number of clusters when k is fixed
    pub const DEFAULT_K: usize = 6;

    /// Upper bound on k for any configuration
    pub const MAX_K: usize = 12;

    /// Default Lloyd iteration cap
    pub const DEFAULT_MAX_ITERATIONS: usize = 20;

    /// Default per-channel centroid movement below which iteration stops
    pub const DEFAULT_CONVERGENCE_THRESHOLD: f32 = 2.0;

    /// Elbow selection: a drop below this fraction of the previous drop ends the search
    pub const ELBOW_DROP_RATIO: f64 = 0.6;
}

/// Pixel pre-filtering thresholds
pub mod filtering {
    /// Channels all below this value classify a pixel as near-black
    pub const DARK_THRESHOLD: u8 = 20;

    /// Channels all above this value classify a pixel as near-white
    pub const LIGHT_THRESHOLD: u8 = 235;

    /// Filtering is skipped when it would retain less than this fraction
    pub const MIN_RETAINED_FRACTION: f32 = 0.01;
}

/// Perceptual classification thresholds
pub mod perception {
    /// HSV saturation (percent) below which a color reads as neutral
    pub const NEUTRAL_SATURATION: f32 = 15.0;

    /// Saturation (percent) at which a yellow-green hue tips from neutral to warm
    pub const HIGH_SATURATION: f32 = 70.0;

    /// Max-minus-min channel spread below which a color is treated as grayscale
    pub const GRAYSCALE_SPREAD: u8 = 25;

    /// Normalized luminance above this is "light"
    pub const LIGHT_LUMINANCE: f32 = 0.7;

    /// Normalized luminance above this is "medium"; at or below it, "dark"
    pub const MEDIUM_LUMINANCE: f32 = 0.3;

    /// Warm hue band upper edge (degrees); warm also covers [300, 360)
    pub const WARM_HUE_MAX: f32 = 60.0;

    /// Cool hue band: [COOL_HUE_MIN, COOL_HUE_MAX]
    pub const COOL_HUE_MIN: f32 = 120.0;
    pub const COOL_HUE_MAX: f32 = 300.0;
}

/// Histogram shape parameters
pub mod histogram {
    /// Default bucket count per channel
    pub const DEFAULT_BUCKETS: usize = 16;

    /// Local maxima below this fraction of the channel's tallest bucket are not peaks
    pub const PEAK_MIN_FRACTION: f32 = 0.10;

    /// Maximum number of peaks reported per channel
    pub const MAX_PEAKS: usize = 5;
}

/// Harmony classification bands (degrees on the hue wheel)
pub mod harmony {
    /// Average pairwise hue difference below this is analogous
    pub const ANALOGOUS_MAX_AVG: f32 = 30.0;

    /// Tolerance around 180 degrees for complementary pairs
    pub const COMPLEMENTARY_TOLERANCE: f32 = 20.0;

    /// Tolerance around 120 degrees for triadic pairs
    pub const TRIADIC_TOLERANCE: f32 = 25.0;

    /// Average pairwise hue difference above this is polychromatic
    pub const POLYCHROMATIC_MIN_AVG: f32 = 80.0;
}

/// Palette assembly parameters
pub mod palette_assembly {
    /// Default cap on the returned dominant-color list
    pub const DEFAULT_MAX_COLORS: usize = 8;

    /// Default minimum percentage below which an entry is dropped
    pub const DEFAULT_MIN_SIGNIFICANCE: f32 = 1.0;

    /// Default RGB distance below which two palette entries merge
    pub const DEFAULT_MERGE_DISTANCE: f32 = 26.0;

    /// Bits of precision kept per channel by the coarse quantization pass
    pub const QUANTIZE_BITS: u8 = 4;
}

/// Regional analysis parameters
pub mod regions {
    /// Default grid dimension (grid_size x grid_size cells)
    pub const DEFAULT_GRID_SIZE: u32 = 3;

    /// Upper bound on the grid dimension for any configuration
    pub const MAX_GRID_SIZE: u32 = 64;
}
