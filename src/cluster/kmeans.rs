//! K-Means++ clustering over RGB pixels
//!
//! Implements the clustering core:
//! - Seeded K-Means++ initialization (squared-distance-weighted sampling)
//! - Lloyd iteration with a parallel assignment step
//! - Deterministic tie-breaking (equidistant pixels go to the lower index)
//! - Zero-member centroids retain their previous position
//! - Descending member-count ordering with a stable tie-break
//!
//! All randomness flows from the single seed in [`ClusteringConfig`], so
//! identical input, configuration, and seed reproduce the exact centroid
//! set and order.
//!
//! Algorithm tag: `algo-kmeans-pp-lloyd`
//!
//! [`ClusteringConfig`]: crate::config::ClusteringConfig

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::ClusteringConfig;
use crate::constants::clustering;
use crate::error::{ProfileError, Result};
use crate::pixels::Pixel;

/// Below this pixel count the parallel assignment step is not worth its
/// scheduling overhead.
const PARALLEL_THRESHOLD: usize = 4096;

/// One converged cluster.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Centroid in RGB space (fractional channels)
    pub centroid: [f32; 3],
    /// Number of pixels assigned to this centroid
    pub member_count: usize,
    /// Mean squared RGB distance of members to the centroid
    pub variance: f32,
    /// Mean distance to the other centroids, normalized by the maximum
    /// possible RGB distance. Higher means less redundant; 1.0 for a
    /// single-cluster result.
    pub quality_score: f32,
}

impl Cluster {
    /// Centroid rounded to an RGB pixel.
    pub fn centroid_pixel(&self) -> Pixel {
        Pixel::new(
            self.centroid[0].round().clamp(0.0, 255.0) as u8,
            self.centroid[1].round().clamp(0.0, 255.0) as u8,
            self.centroid[2].round().clamp(0.0, 255.0) as u8,
        )
    }

    fn centroid_sum(&self) -> f32 {
        self.centroid[0] + self.centroid[1] + self.centroid[2]
    }
}

/// Result of one clustering run.
#[derive(Debug, Clone)]
pub struct ClusterOutcome {
    /// Clusters sorted by descending member count (ties by ascending
    /// centroid RGB sum)
    pub clusters: Vec<Cluster>,
    /// Lloyd iterations performed
    pub iterations: usize,
    /// False when the iteration cap was reached before stability
    pub converged: bool,
    /// Cluster count originally requested
    pub k_requested: usize,
    /// Cluster count actually used (reduced when fewer distinct colors exist)
    pub k_used: usize,
    /// Total within-cluster sum of squared distances
    pub sse: f64,
}

impl ClusterOutcome {
    /// True when k had to be reduced below the request.
    pub fn k_reduced(&self) -> bool {
        self.k_used < self.k_requested
    }
}

/// K-Means++ clustering engine.
pub struct KMeans {
    max_iterations: usize,
    convergence_threshold: f32,
    seed: u64,
}

impl KMeans {
    /// Create an engine from the clustering configuration.
    pub fn new(config: &ClusteringConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            convergence_threshold: config.convergence_threshold,
            seed: config.seed,
        }
    }

    /// Create an engine with explicit parameters.
    pub fn with_params(max_iterations: usize, convergence_threshold: f32, seed: u64) -> Self {
        Self {
            max_iterations,
            convergence_threshold,
            seed,
        }
    }

    /// Cluster pixels into at most `k` representative colors.
    ///
    /// `k` is clamped to the number of distinct input colors; the reduction
    /// is reported via [`ClusterOutcome::k_reduced`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` for an empty pixel sequence.
    pub fn run(&self, pixels: &[Pixel], k: usize) -> Result<ClusterOutcome> {
        if pixels.is_empty() {
            return Err(ProfileError::empty_input("clustering input"));
        }
        if k == 0 {
            return Err(ProfileError::invalid_parameter("k", k, "must be at least 1"));
        }

        let distinct = count_distinct(pixels);
        let k_used = k.min(distinct);

        let mut centroids = self.initialize_centroids(pixels, k_used);

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iterations {
            let assignments = assign_pixels(pixels, &centroids);
            let updated = recompute_centroids(pixels, &assignments, &centroids);

            let movement = max_channel_movement(&centroids, &updated);
            centroids = updated;
            iterations += 1;

            if movement < self.convergence_threshold {
                converged = true;
                break;
            }
        }

        // Final assignment against the settled centroids, so member counts
        // and variance describe exactly the centroids being reported.
        let assignments = assign_pixels(pixels, &centroids);
        let mut clusters = build_clusters(pixels, &assignments, &centroids);
        score_clusters(&mut clusters);
        let sse = clusters
            .iter()
            .map(|c| c.variance as f64 * c.member_count as f64)
            .sum();

        clusters.sort_by(|a, b| {
            b.member_count
                .cmp(&a.member_count)
                .then_with(|| a.centroid_sum().partial_cmp(&b.centroid_sum()).unwrap())
        });

        Ok(ClusterOutcome {
            clusters,
            iterations,
            converged,
            k_requested: k,
            k_used,
            sse,
        })
    }

    /// K-Means++ initialization: first centroid uniform, subsequent ones
    /// sampled with probability proportional to squared distance from the
    /// nearest existing centroid.
    fn initialize_centroids(&self, pixels: &[Pixel], k: usize) -> Vec<[f32; 3]> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids: Vec<[f32; 3]> = Vec::with_capacity(k);

        let first = pixels[rng.gen_range(0..pixels.len())];
        centroids.push(pixel_to_f32(first));

        // Nearest-centroid squared distances, updated incrementally as
        // centroids are added.
        let mut dist2: Vec<f32> = pixels
            .iter()
            .map(|p| squared_distance(pixel_to_f32(*p), centroids[0]))
            .collect();

        while centroids.len() < k {
            let total: f64 = dist2.iter().map(|&d| d as f64).sum();
            let index = if total > 0.0 {
                let mut target = rng.gen::<f64>() * total;
                let mut chosen = dist2.len() - 1;
                for (i, &d) in dist2.iter().enumerate() {
                    target -= d as f64;
                    if target <= 0.0 {
                        chosen = i;
                        break;
                    }
                }
                chosen
            } else {
                // All remaining pixels coincide with a centroid; k is
                // already clamped to the distinct count, so this only
                // happens on the last duplicate-heavy inputs.
                dist2.iter().position(|&d| d > 0.0).unwrap_or(0)
            };

            let new_centroid = pixel_to_f32(pixels[index]);
            centroids.push(new_centroid);
            for (d, p) in dist2.iter_mut().zip(pixels.iter()) {
                let candidate = squared_distance(pixel_to_f32(*p), new_centroid);
                if candidate < *d {
                    *d = candidate;
                }
            }
        }

        centroids
    }
}

fn pixel_to_f32(p: Pixel) -> [f32; 3] {
    [p.r as f32, p.g as f32, p.b as f32]
}

fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

fn count_distinct(pixels: &[Pixel]) -> usize {
    let mut seen = HashSet::new();
    for p in pixels {
        seen.insert(p.channels());
    }
    seen.len()
}

/// Nearest-centroid index for one pixel. Strict comparison resolves
/// equidistant assignments to the lower-indexed centroid.
fn nearest_centroid(pixel: Pixel, centroids: &[[f32; 3]]) -> usize {
    let point = pixel_to_f32(pixel);
    let mut best = 0;
    let mut best_distance = f32::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, *centroid);
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

/// Assign every pixel to its nearest centroid.
///
/// The parallel path produces the same assignment vector as the sequential
/// one; collecting it is the synchronization barrier before centroids are
/// recomputed.
fn assign_pixels(pixels: &[Pixel], centroids: &[[f32; 3]]) -> Vec<usize> {
    if pixels.len() >= PARALLEL_THRESHOLD {
        pixels
            .par_iter()
            .map(|p| nearest_centroid(*p, centroids))
            .collect()
    } else {
        pixels
            .iter()
            .map(|p| nearest_centroid(*p, centroids))
            .collect()
    }
}

/// Mean of assigned pixels per centroid; zero-member centroids keep their
/// previous position so k stays stable.
fn recompute_centroids(
    pixels: &[Pixel],
    assignments: &[usize],
    previous: &[[f32; 3]],
) -> Vec<[f32; 3]> {
    let k = previous.len();
    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0usize; k];

    for (pixel, &cluster) in pixels.iter().zip(assignments.iter()) {
        sums[cluster][0] += pixel.r as f64;
        sums[cluster][1] += pixel.g as f64;
        sums[cluster][2] += pixel.b as f64;
        counts[cluster] += 1;
    }

    (0..k)
        .map(|i| {
            if counts[i] == 0 {
                previous[i]
            } else {
                let n = counts[i] as f64;
                [
                    (sums[i][0] / n) as f32,
                    (sums[i][1] / n) as f32,
                    (sums[i][2] / n) as f32,
                ]
            }
        })
        .collect()
}

fn max_channel_movement(before: &[[f32; 3]], after: &[[f32; 3]]) -> f32 {
    before
        .iter()
        .zip(after.iter())
        .flat_map(|(b, a)| (0..3).map(move |i| (b[i] - a[i]).abs()))
        .fold(0.0, f32::max)
}

fn build_clusters(pixels: &[Pixel], assignments: &[usize], centroids: &[[f32; 3]]) -> Vec<Cluster> {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    let mut squared_error = vec![0.0f64; k];

    for (pixel, &cluster) in pixels.iter().zip(assignments.iter()) {
        counts[cluster] += 1;
        squared_error[cluster] += squared_distance(pixel_to_f32(*pixel), centroids[cluster]) as f64;
    }

    (0..k)
        .map(|i| Cluster {
            centroid: centroids[i],
            member_count: counts[i],
            variance: if counts[i] == 0 {
                0.0
            } else {
                (squared_error[i] / counts[i] as f64) as f32
            },
            quality_score: 0.0,
        })
        .collect()
}

/// Quality: mean pairwise distance to the other centroids over the maximum
/// possible RGB distance.
fn score_clusters(clusters: &mut [Cluster]) {
    let k = clusters.len();
    if k < 2 {
        for c in clusters.iter_mut() {
            c.quality_score = 1.0;
        }
        return;
    }
    let centroids: Vec<[f32; 3]> = clusters.iter().map(|c| c.centroid).collect();
    for (i, cluster) in clusters.iter_mut().enumerate() {
        let total: f32 = centroids
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, other)| squared_distance(cluster.centroid, *other).sqrt())
            .sum();
        cluster.quality_score = (total / (k - 1) as f32) / clustering::MAX_RGB_DISTANCE;
    }
}
