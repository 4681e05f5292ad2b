//! Cluster count selection
//!
//! Fixed k is clamped and passed straight through; auto mode runs the
//! engine over a bounded range and applies the elbow heuristic to the
//! within-cluster variance curve.
//!
//! Algorithm tag: `algo-elbow-selection`

use crate::config::{ClusteringConfig, KSelection};
use crate::constants::clustering;
use crate::cluster::kmeans::{ClusterOutcome, KMeans};
use crate::error::Result;
use crate::pixels::Pixel;

/// Cluster pixels according to the configured k strategy.
///
/// In auto mode, k walks `[min, max]` and the search stops at the k whose
/// incremental variance-reduction drop falls below 60% of the previous
/// drop; if no drop weakens that much, the largest k wins. Every candidate
/// run uses the same seed, so auto selection is as reproducible as a fixed
/// k.
pub fn select_clusters(pixels: &[Pixel], config: &ClusteringConfig) -> Result<ClusterOutcome> {
    let engine = KMeans::new(config);
    match config.k {
        KSelection::Fixed { k } => engine.run(pixels, k),
        KSelection::Auto { min, max } => elbow_search(pixels, &engine, min, max),
    }
}

fn elbow_search(
    pixels: &[Pixel],
    engine: &KMeans,
    min: usize,
    max: usize,
) -> Result<ClusterOutcome> {
    let min = min.max(1);
    let max = max.max(min);

    let mut previous: Option<ClusterOutcome> = None;
    let mut previous_drop: Option<f64> = None;

    for k in min..=max {
        let outcome = engine.run(pixels, k)?;

        // Clamping hit the distinct-color ceiling; larger k cannot help.
        let exhausted = outcome.k_used < k;

        if let Some(prev) = &previous {
            let drop = prev.sse - outcome.sse;
            if let Some(prev_drop) = previous_drop {
                if drop < clustering::ELBOW_DROP_RATIO * prev_drop {
                    return Ok(outcome);
                }
            }
            previous_drop = Some(drop);
        }

        if exhausted {
            return Ok(outcome);
        }
        previous = Some(outcome);
    }

    // previous is always set: the loop body runs at least once
    Ok(previous.expect("elbow search over non-empty range"))
}
