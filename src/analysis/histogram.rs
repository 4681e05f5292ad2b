//! Per-channel histogram generation with peak detection
//!
//! Fixed-width bucketing over the RGB channels and the HSV components,
//! plus a list of significant local maxima per channel. Bucket sums always
//! equal the analyzed pixel count, one count per pixel per channel.
//!
//! Algorithm tag: `algo-bucketed-histograms`

use serde::{Deserialize, Serialize};

use crate::color::conversion::rgb_to_hsv;
use crate::constants::histogram as hist;
use crate::pixels::Pixel;

/// A significant local maximum in one histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramPeak {
    /// Bucket index
    pub bucket: usize,
    /// Pixel count in that bucket
    pub count: u32,
}

/// Bucketed distribution of one channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    /// Channel name ("red", "hue", ...)
    pub channel: String,
    /// Ordered bucket counts
    pub buckets: Vec<u32>,
    /// Local maxima above 10% of the tallest bucket, sorted by descending
    /// count and capped
    pub peaks: Vec<HistogramPeak>,
}

/// The six per-channel histograms of a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histograms {
    pub red: Histogram,
    pub green: Histogram,
    pub blue: Histogram,
    pub hue: Histogram,
    pub saturation: Histogram,
    pub value: Histogram,
}

/// Build all six channel histograms over the analyzed pixel set.
pub fn build_histograms(pixels: &[Pixel], bucket_count: usize) -> Histograms {
    let mut red = vec![0u32; bucket_count];
    let mut green = vec![0u32; bucket_count];
    let mut blue = vec![0u32; bucket_count];
    let mut hue = vec![0u32; bucket_count];
    let mut saturation = vec![0u32; bucket_count];
    let mut value = vec![0u32; bucket_count];

    for pixel in pixels {
        red[byte_bucket(pixel.r, bucket_count)] += 1;
        green[byte_bucket(pixel.g, bucket_count)] += 1;
        blue[byte_bucket(pixel.b, bucket_count)] += 1;

        let hsv = rgb_to_hsv(*pixel);
        hue[scaled_bucket(hsv.h, 360.0, bucket_count)] += 1;
        saturation[scaled_bucket(hsv.s, 100.0, bucket_count)] += 1;
        value[scaled_bucket(hsv.v, 100.0, bucket_count)] += 1;
    }

    Histograms {
        red: finish("red", red),
        green: finish("green", green),
        blue: finish("blue", blue),
        hue: finish("hue", hue),
        saturation: finish("saturation", saturation),
        value: finish("value", value),
    }
}

fn finish(channel: &str, buckets: Vec<u32>) -> Histogram {
    let peaks = find_peaks(&buckets);
    Histogram {
        channel: channel.to_string(),
        buckets,
        peaks,
    }
}

/// Bucket index for a byte channel over [0, 256).
fn byte_bucket(v: u8, bucket_count: usize) -> usize {
    v as usize * bucket_count / 256
}

/// Bucket index for a bounded float channel over [0, max].
fn scaled_bucket(v: f32, max: f32, bucket_count: usize) -> usize {
    ((v / max * bucket_count as f32) as usize).min(bucket_count - 1)
}

/// Local maxima exceeding 10% of the tallest bucket, tallest first, capped.
///
/// Plateau edges count as maxima (comparison is non-strict), so a uniform
/// channel still reports its strongest buckets. Equal counts order by
/// ascending bucket index.
fn find_peaks(buckets: &[u32]) -> Vec<HistogramPeak> {
    let max_count = buckets.iter().copied().max().unwrap_or(0);
    if max_count == 0 {
        return Vec::new();
    }
    let threshold = (max_count as f32 * hist::PEAK_MIN_FRACTION).ceil() as u32;

    let mut peaks: Vec<HistogramPeak> = buckets
        .iter()
        .enumerate()
        .filter(|&(i, &count)| {
            count >= threshold
                && count > 0
                && (i == 0 || buckets[i - 1] <= count)
                && (i == buckets.len() - 1 || buckets[i + 1] <= count)
        })
        .map(|(bucket, &count)| HistogramPeak { bucket, count })
        .collect();

    peaks.sort_by(|a, b| b.count.cmp(&a.count).then(a.bucket.cmp(&b.bucket)));
    peaks.truncate(hist::MAX_PEAKS);
    peaks
}
