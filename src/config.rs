//! Configuration structures for the color profiling pipeline.
//!
//! All tunable parameters live here, grouped by pipeline stage. The engine
//! keeps no process-wide state: every call receives its configuration
//! explicitly, and two calls with the same input, configuration, and seed
//! produce identical profiles.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed
//! programmatically:
//!
//! ```no_run
//! use chroma_profile::AnalysisConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = AnalysisConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = AnalysisConfig::default();
//! # Ok::<(), chroma_profile::ProfileError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`FilterConfig`]: near-black/near-white pre-filtering
//! - [`ClusteringConfig`]: k selection, iteration, convergence, seed
//! - [`PaletteConfig`]: merging, capping, significance floor
//! - [`RegionConfig`]: spatial grid dimensions
//! - [`HistogramConfig`]: bucket count

use serde::{Deserialize, Serialize};

use crate::constants::{clustering, filtering, histogram, palette_assembly, regions};
use crate::error::{ProfileError, Result};

/// Complete configuration for one profiling call.
///
/// Can be serialized to/from JSON for reproducible runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Pixel pre-filtering configuration
    pub filter: FilterConfig,

    /// Clustering engine configuration
    pub clustering: ClusteringConfig,

    /// Dominant-color palette shaping configuration
    pub palette: PaletteConfig,

    /// Regional distribution configuration
    pub regions: RegionConfig,

    /// Histogram configuration
    pub histogram: HistogramConfig,
}

/// Near-black/near-white pre-filtering parameters.
///
/// Filtering reduces background bias but is skipped whenever it would
/// retain less than 1% of the input, so monochrome images keep their pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Enable extreme-pixel filtering
    pub enabled: bool,

    /// Pixels with every channel below this are treated as near-black
    pub dark_threshold: u8,

    /// Pixels with every channel above this are treated as near-white
    pub light_threshold: u8,
}

/// Cluster count selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum KSelection {
    /// Use exactly this many clusters (clamped to the distinct-color count)
    Fixed { k: usize },

    /// Search [min, max] with the elbow heuristic over within-cluster variance
    Auto { min: usize, max: usize },
}

/// Clustering engine parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// How many clusters to produce
    pub k: KSelection,

    /// Lloyd iteration cap; reaching it yields an unconverged (still usable) result
    pub max_iterations: usize,

    /// Per-channel centroid movement below which iteration stops
    pub convergence_threshold: f32,

    /// Seed for K-Means++ initialization. Pin it in tests; hosts may derive
    /// one from a request identifier for reproducible production runs.
    pub seed: u64,
}

/// Dominant-color palette shaping parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Maximum entries in the returned dominant-color list
    pub max_colors: usize,

    /// Entries below this percentage are dropped (no renormalization)
    pub min_significance: f32,

    /// RGB distance below which two entries merge
    pub merge_distance: f32,

    /// Run the coarse quantization pass alongside clustering and merge both
    pub quantizer_pass: bool,
}

/// Spatial grid parameters for regional analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Grid dimension; the image is split into grid_size x grid_size regions
    pub grid_size: u32,
}

/// Histogram shape parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    /// Bucket count per channel
    pub bucket_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig {
                enabled: true,
                dark_threshold: filtering::DARK_THRESHOLD,
                light_threshold: filtering::LIGHT_THRESHOLD,
            },
            clustering: ClusteringConfig {
                k: KSelection::Fixed {
                    k: clustering::DEFAULT_K,
                },
                max_iterations: clustering::DEFAULT_MAX_ITERATIONS,
                convergence_threshold: clustering::DEFAULT_CONVERGENCE_THRESHOLD,
                seed: 0,
            },
            palette: PaletteConfig {
                max_colors: palette_assembly::DEFAULT_MAX_COLORS,
                min_significance: palette_assembly::DEFAULT_MIN_SIGNIFICANCE,
                merge_distance: palette_assembly::DEFAULT_MERGE_DISTANCE,
                quantizer_pass: true,
            },
            regions: RegionConfig {
                grid_size: regions::DEFAULT_GRID_SIZE,
            },
            histogram: HistogramConfig {
                bucket_count: histogram::DEFAULT_BUCKETS,
            },
        }
    }
}

impl AnalysisConfig {
    /// Validate parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for the first out-of-range value found.
    pub fn validate(&self) -> Result<()> {
        match self.clustering.k {
            KSelection::Fixed { k } => {
                if k == 0 || k > clustering::MAX_K {
                    return Err(ProfileError::invalid_parameter(
                        "clustering.k",
                        k,
                        format!("must be in 1..={}", clustering::MAX_K),
                    ));
                }
            }
            KSelection::Auto { min, max } => {
                if min < 1 || max > clustering::MAX_K || min > max {
                    return Err(ProfileError::invalid_parameter(
                        "clustering.k",
                        format!("auto [{min}, {max}]"),
                        format!("range must satisfy 1 <= min <= max <= {}", clustering::MAX_K),
                    ));
                }
            }
        }
        if self.clustering.max_iterations == 0 {
            return Err(ProfileError::invalid_parameter(
                "clustering.max_iterations",
                self.clustering.max_iterations,
                "must be at least 1",
            ));
        }
        if self.clustering.convergence_threshold < 0.0 {
            return Err(ProfileError::invalid_parameter(
                "clustering.convergence_threshold",
                self.clustering.convergence_threshold,
                "must be non-negative",
            ));
        }
        if self.filter.dark_threshold >= self.filter.light_threshold {
            return Err(ProfileError::invalid_parameter(
                "filter.dark_threshold",
                self.filter.dark_threshold,
                "must be below filter.light_threshold",
            ));
        }
        if self.palette.max_colors == 0 {
            return Err(ProfileError::invalid_parameter(
                "palette.max_colors",
                self.palette.max_colors,
                "must be at least 1",
            ));
        }
        if !(0.0..=100.0).contains(&self.palette.min_significance) {
            return Err(ProfileError::invalid_parameter(
                "palette.min_significance",
                self.palette.min_significance,
                "must be a percentage in 0..=100",
            ));
        }
        if self.palette.merge_distance < 0.0 {
            return Err(ProfileError::invalid_parameter(
                "palette.merge_distance",
                self.palette.merge_distance,
                "must be non-negative",
            ));
        }
        if self.regions.grid_size == 0 || self.regions.grid_size > regions::MAX_GRID_SIZE {
            return Err(ProfileError::invalid_parameter(
                "regions.grid_size",
                self.regions.grid_size,
                format!("must be in 1..={}", regions::MAX_GRID_SIZE),
            ));
        }
        if self.histogram.bucket_count == 0 || self.histogram.bucket_count > 256 {
            return Err(ProfileError::invalid_parameter(
                "histogram.bucket_count",
                self.histogram.bucket_count,
                "must be in 1..=256",
            ));
        }
        Ok(())
    }

    /// Set the clustering seed, returning the modified config.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.clustering.seed = seed;
        self
    }

    /// Set a fixed cluster count, returning the modified config.
    pub fn with_fixed_k(mut self, k: usize) -> Self {
        self.clustering.k = KSelection::Fixed { k };
        self
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProfileError::config_load(format!("read {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| ProfileError::config_load(format!("parse {}", path.display()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &std::path::Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ProfileError::config_load("serialize configuration", e))?;
        std::fs::write(path, json)
            .map_err(|e| ProfileError::config_load(format!("write {}", path.display()), e))?;
        Ok(())
    }
}
