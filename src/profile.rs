//! Color profile assembly
//!
//! Orchestrates the full pipeline: filtering, clustering, the optional
//! coarse quantization pass, palette merging and shaping, regional
//! analysis, histograms, harmony, and the temperature distribution. The
//! returned [`ColorProfile`] is immutable and self-contained; degraded
//! outcomes (reduced k, unconverged iteration) are flagged in its
//! metadata rather than silently papered over.
//!
//! Algorithm tag: `algo-profile-assembly`

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::harmony::{assess_harmony, HarmonyAssessment};
use crate::analysis::histogram::{build_histograms, Histograms};
use crate::analysis::regions::{analyze_regions, Region};
use crate::cluster::selection::select_clusters;
use crate::color::classify::{Color, Temperature};
use crate::config::AnalysisConfig;
use crate::constants::{clustering, palette_assembly};
use crate::error::Result;
use crate::pixels::{filter_extremes, Pixel, PixelBuffer};

/// One ranked entry in the dominant-color list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DominantColorEntry {
    /// 1-based rank, ordered by descending percentage
    pub rank: usize,
    #[serde(flatten)]
    pub color: Color,
    /// Share of the analyzed pixels, 0 to 100
    pub percentage: f32,
    /// Mean distance to the other entries over the maximum RGB distance
    pub quality_score: f32,
}

/// Percentage-weighted temperature split of the dominant colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureDistribution {
    pub warm_pct: f32,
    pub cool_pct: f32,
    pub neutral_pct: f32,
    /// Temperature class holding the largest share
    pub dominant: Temperature,
}

/// Provenance and quality flags for one profiling call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Pixels supplied by the caller
    pub pixel_count: usize,
    /// Pixels surviving the extreme filter (equal to `pixel_count` when
    /// filtering was skipped)
    pub analyzed_pixel_count: usize,
    /// True when the extreme filter removed anything
    pub filter_applied: bool,
    /// Cluster count requested by the configuration
    pub k_requested: usize,
    /// Cluster count actually used
    pub k_used: usize,
    /// True when fewer distinct colors than `k_requested` forced a reduction
    pub k_reduced: bool,
    /// Lloyd iterations performed
    pub iterations: usize,
    /// False when the iteration cap was reached before stability
    pub converged: bool,
    /// Seed the clustering ran with
    pub seed: u64,
}

/// Complete color profile of one pixel buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorProfile {
    pub dominant_colors: Vec<DominantColorEntry>,
    pub histograms: Histograms,
    pub regions: Vec<Region>,
    /// 1 minus the normalized stddev of per-region brightness
    pub spatial_balance: f32,
    pub harmony: HarmonyAssessment,
    pub temperature_distribution: TemperatureDistribution,
    pub metadata: ProfileMetadata,
}

/// The profiling pipeline, configured once and reusable across calls.
///
/// Holds no mutable state; concurrent calls on one profiler are
/// independent.
pub struct ColorProfiler {
    config: AnalysisConfig,
}

impl ColorProfiler {
    /// Create a profiler after validating the configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Profile one pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` for an empty buffer. Reduced k and
    /// non-convergence are reported via [`ProfileMetadata`], not errors.
    pub fn profile(&self, buffer: &PixelBuffer) -> Result<ColorProfile> {
        let outcome = filter_extremes(buffer.pixels(), &self.config.filter)?;
        let analyzed = &outcome.pixels;

        let clusters = select_clusters(analyzed, &self.config.clustering)?;
        let total = analyzed.len() as f32;

        let mut candidates: Vec<Candidate> = clusters
            .clusters
            .iter()
            .filter(|c| c.member_count > 0)
            .map(|c| Candidate {
                rgb: c.centroid,
                percentage: c.member_count as f32 / total * 100.0,
            })
            .collect();

        if self.config.palette.quantizer_pass {
            // Two independent extractions of the same distribution: each
            // contributes half weight, and near-duplicates recombine below.
            let quantized = quantization_pass(analyzed, self.config.palette.max_colors);
            for candidate in &mut candidates {
                candidate.percentage *= 0.5;
            }
            candidates.extend(quantized.into_iter().map(|mut c| {
                c.percentage *= 0.5;
                c
            }));
        }

        let entries = shape_palette(candidates, &self.config.palette);
        let dominant_colors: Vec<Color> = entries.iter().map(|e| e.color.clone()).collect();

        let harmony = assess_harmony(&dominant_colors);
        let temperature_distribution = temperature_distribution(&entries);
        let histograms = build_histograms(analyzed, self.config.histogram.bucket_count);
        let (regions, spatial_balance) = analyze_regions(buffer, self.config.regions.grid_size);

        Ok(ColorProfile {
            dominant_colors: entries,
            histograms,
            regions,
            spatial_balance,
            harmony,
            temperature_distribution,
            metadata: ProfileMetadata {
                pixel_count: buffer.len(),
                analyzed_pixel_count: analyzed.len(),
                filter_applied: outcome.applied,
                k_requested: clusters.k_requested,
                k_used: clusters.k_used,
                k_reduced: clusters.k_reduced(),
                iterations: clusters.iterations,
                converged: clusters.converged,
                seed: self.config.clustering.seed,
            },
        })
    }
}

/// An unshaped palette candidate from either extraction pass.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    rgb: [f32; 3],
    percentage: f32,
}

/// Coarse quantization pass: bucket pixels by their top channel bits and
/// report the most frequent buckets as the mean of their actual members.
fn quantization_pass(pixels: &[Pixel], max_colors: usize) -> Vec<Candidate> {
    let mut buckets: HashMap<u16, (usize, [u64; 3])> = HashMap::new();

    for pixel in pixels {
        let key = pixel.quantized_key(palette_assembly::QUANTIZE_BITS);
        let entry = buckets.entry(key).or_insert((0, [0u64; 3]));
        entry.0 += 1;
        entry.1[0] += pixel.r as u64;
        entry.1[1] += pixel.g as u64;
        entry.1[2] += pixel.b as u64;
    }

    let mut ranked: Vec<(u16, (usize, [u64; 3]))> = buckets.into_iter().collect();
    // Count descending; key ascending keeps ties deterministic
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.0.cmp(&b.0)));
    ranked.truncate(max_colors);

    let total = pixels.len() as f32;
    ranked
        .into_iter()
        .map(|(_, (count, sum))| Candidate {
            rgb: [
                sum[0] as f32 / count as f32,
                sum[1] as f32 / count as f32,
                sum[2] as f32 / count as f32,
            ],
            percentage: count as f32 / total * 100.0,
        })
        .collect()
}

/// Merge near-duplicates, enforce the significance floor and size cap, and
/// rank the result.
fn shape_palette(
    mut candidates: Vec<Candidate>,
    config: &crate::config::PaletteConfig,
) -> Vec<DominantColorEntry> {
    candidates.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap()
            .then_with(|| rgb_sum(a.rgb).partial_cmp(&rgb_sum(b.rgb)).unwrap())
    });

    // Greedy merge into the strongest entries first, frequency-weighted
    let mut merged: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        match merged
            .iter_mut()
            .find(|m| rgb_distance(m.rgb, candidate.rgb) < config.merge_distance)
        {
            Some(existing) => {
                let combined = existing.percentage + candidate.percentage;
                if combined > 0.0 {
                    for i in 0..3 {
                        existing.rgb[i] = (existing.rgb[i] * existing.percentage
                            + candidate.rgb[i] * candidate.percentage)
                            / combined;
                    }
                }
                existing.percentage = combined;
            }
            None => merged.push(candidate),
        }
    }

    merged.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap()
            .then_with(|| rgb_sum(a.rgb).partial_cmp(&rgb_sum(b.rgb)).unwrap())
    });
    merged.retain(|c| c.percentage >= config.min_significance);
    merged.truncate(config.max_colors);

    let quality = entry_quality_scores(&merged);
    merged
        .into_iter()
        .zip(quality)
        .enumerate()
        .map(|(i, (candidate, quality_score))| DominantColorEntry {
            rank: i + 1,
            color: Color::from_rgb(round_rgb(candidate.rgb)),
            percentage: candidate.percentage,
            quality_score,
        })
        .collect()
}

/// Mean pairwise distance to the other entries, normalized by the maximum
/// RGB distance; 1.0 for a single-entry palette.
fn entry_quality_scores(candidates: &[Candidate]) -> Vec<f32> {
    let n = candidates.len();
    if n < 2 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| {
            let total: f32 = (0..n)
                .filter(|&j| j != i)
                .map(|j| rgb_distance(candidates[i].rgb, candidates[j].rgb))
                .sum();
            (total / (n - 1) as f32) / clustering::MAX_RGB_DISTANCE
        })
        .collect()
}

fn temperature_distribution(entries: &[DominantColorEntry]) -> TemperatureDistribution {
    let mut warm = 0.0f32;
    let mut cool = 0.0f32;
    let mut neutral = 0.0f32;
    for entry in entries {
        match entry.color.temperature {
            Temperature::Warm => warm += entry.percentage,
            Temperature::Cool => cool += entry.percentage,
            Temperature::Neutral => neutral += entry.percentage,
        }
    }
    let total = warm + cool + neutral;
    if total > 0.0 {
        warm = warm / total * 100.0;
        cool = cool / total * 100.0;
        neutral = neutral / total * 100.0;
    }

    let dominant = if warm >= cool && warm >= neutral {
        Temperature::Warm
    } else if cool >= neutral {
        Temperature::Cool
    } else {
        Temperature::Neutral
    };

    TemperatureDistribution {
        warm_pct: warm,
        cool_pct: cool,
        neutral_pct: neutral,
        dominant,
    }
}

fn rgb_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

fn rgb_sum(rgb: [f32; 3]) -> f32 {
    rgb[0] + rgb[1] + rgb[2]
}

fn round_rgb(rgb: [f32; 3]) -> Pixel {
    Pixel::new(
        rgb[0].round().clamp(0.0, 255.0) as u8,
        rgb[1].round().clamp(0.0, 255.0) as u8,
        rgb[2].round().clamp(0.0, 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaletteConfig;

    fn palette_config() -> PaletteConfig {
        PaletteConfig {
            max_colors: 8,
            min_significance: 1.0,
            merge_distance: 26.0,
            quantizer_pass: true,
        }
    }

    fn candidate(rgb: [f32; 3], percentage: f32) -> Candidate {
        Candidate { rgb, percentage }
    }

    #[test]
    fn test_shape_palette_merges_near_duplicates() {
        let candidates = vec![
            candidate([250.0, 10.0, 10.0], 40.0),
            candidate([245.0, 5.0, 12.0], 30.0),
            candidate([10.0, 10.0, 250.0], 30.0),
        ];
        let entries = shape_palette(candidates, &palette_config());

        assert_eq!(entries.len(), 2);
        assert!((entries[0].percentage - 70.0).abs() < 0.01);
        assert!((entries[1].percentage - 30.0).abs() < 0.01);
        // Frequency-weighted average leans toward the stronger candidate
        assert_eq!(entries[0].color.rgb[0], 248);
    }

    #[test]
    fn test_shape_palette_drops_insignificant() {
        let candidates = vec![
            candidate([200.0, 0.0, 0.0], 99.5),
            candidate([0.0, 200.0, 0.0], 0.5),
        ];
        let entries = shape_palette(candidates, &palette_config());
        assert_eq!(entries.len(), 1);
        // Dropped share is not renormalized into the survivor
        assert!((entries[0].percentage - 99.5).abs() < 0.01);
    }

    #[test]
    fn test_shape_palette_caps_list() {
        let mut candidates = Vec::new();
        for i in 0..12 {
            candidates.push(candidate([i as f32 * 40.0 % 256.0, 255.0 - i as f32 * 20.0, (i * 90 % 250) as f32], 8.0));
        }
        let mut config = palette_config();
        config.merge_distance = 1.0;
        config.max_colors = 4;
        let entries = shape_palette(candidates, &config);
        assert!(entries.len() <= 4);
    }

    #[test]
    fn test_ranks_and_ordering() {
        let candidates = vec![
            candidate([10.0, 10.0, 10.0], 20.0),
            candidate([250.0, 0.0, 0.0], 50.0),
            candidate([0.0, 250.0, 0.0], 30.0),
        ];
        let entries = shape_palette(candidates, &palette_config());
        let ranks: Vec<usize> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        for window in entries.windows(2) {
            assert!(window[0].percentage >= window[1].percentage);
        }
    }

    #[test]
    fn test_quantization_pass_single_color() {
        let pixels = vec![Pixel::new(255, 0, 0); 100];
        let candidates = quantization_pass(&pixels, 8);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].rgb, [255.0, 0.0, 0.0]);
        assert!((candidates[0].percentage - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_quantization_pass_reports_member_mean() {
        // Two colors in the same coarse bucket: reported as their mean,
        // not the bucket center
        let mut pixels = vec![Pixel::new(200, 100, 50); 50];
        pixels.extend(vec![Pixel::new(204, 104, 54); 50]);
        let candidates = quantization_pass(&pixels, 8);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].rgb, [202.0, 102.0, 52.0]);
    }

    #[test]
    fn test_temperature_distribution_weights_by_percentage() {
        let entries = shape_palette(
            vec![
                candidate([255.0, 0.0, 0.0], 75.0),
                candidate([0.0, 0.0, 255.0], 25.0),
            ],
            &palette_config(),
        );
        let dist = temperature_distribution(&entries);
        assert!((dist.warm_pct - 75.0).abs() < 0.1);
        assert!((dist.cool_pct - 25.0).abs() < 0.1);
        assert!(dist.neutral_pct.abs() < 0.1);
        assert_eq!(dist.dominant, Temperature::Warm);
    }

    #[test]
    fn test_entry_quality_scores_unit_range() {
        let candidates = vec![
            candidate([255.0, 0.0, 0.0], 40.0),
            candidate([0.0, 255.0, 0.0], 30.0),
            candidate([0.0, 0.0, 255.0], 30.0),
        ];
        let scores = entry_quality_scores(&candidates);
        for score in scores {
            assert!(score > 0.0 && score <= 1.0);
        }
    }
}
