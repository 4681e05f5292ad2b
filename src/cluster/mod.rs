//! K-Means clustering engine
//!
//! This module reduces a pixel sequence to a small set of frequency-weighted
//! representative colors: seeded K-Means++ initialization, Lloyd iteration
//! with deterministic tie-breaking, and an optional elbow heuristic for
//! choosing the cluster count.

pub mod kmeans;
pub mod selection;

pub use kmeans::{Cluster, ClusterOutcome, KMeans};
pub use selection::select_clusters;
