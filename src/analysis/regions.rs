//! Regional color distribution analysis
//!
//! Partitions the image into a fixed grid and computes per-region color
//! statistics: average color, an independently-derived dominant color
//! (most frequent coarse-quantized color), brightness, and temperature.
//! The grid covers every pixel exactly once; integer boundary splits leave
//! no gaps or overlaps.
//!
//! Algorithm tag: `algo-grid-distribution`

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::classify::{classify_temperature, Color, Temperature};
use crate::color::conversion::{relative_luminance, rgb_to_hsv};
use crate::constants::palette_assembly;
use crate::pixels::{Pixel, PixelBuffer};

/// Pixel-space bounds of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Color statistics for one grid cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Row-major cell index within the grid
    pub id: u32,
    pub bounds: RegionBounds,
    /// Pixels inside this cell
    pub pixel_count: usize,
    /// Mean RGB of the cell
    pub average_color: Color,
    /// Most frequent coarse-quantized color, reported as the mean of its
    /// actual member pixels
    pub dominant_color: Color,
    /// Normalized luminance of the average color, in [0, 1]
    pub brightness: f32,
    /// Temperature of the average color
    pub temperature: Temperature,
}

/// Partition the buffer into a `grid_size` x `grid_size` grid and analyze
/// each non-empty cell.
///
/// Returns the regions plus a balance score: 1 minus the normalized
/// standard deviation of per-region brightness, so spatially uniform images
/// score close to 1.
pub fn analyze_regions(buffer: &PixelBuffer, grid_size: u32) -> (Vec<Region>, f32) {
    let width = buffer.width();
    let height = buffer.height();
    let mut regions = Vec::new();

    for gy in 0..grid_size {
        // Boundary products in u64: grid_size * dimension can exceed u32
        let y0 = cell_boundary(gy, height, grid_size);
        let y1 = cell_boundary(gy + 1, height, grid_size);
        for gx in 0..grid_size {
            let x0 = cell_boundary(gx, width, grid_size);
            let x1 = cell_boundary(gx + 1, width, grid_size);
            if x0 == x1 || y0 == y1 {
                // Degenerate cell on images smaller than the grid
                continue;
            }

            let region = analyze_cell(buffer, gy * grid_size + gx, x0, y0, x1, y1);
            regions.push(region);
        }
    }

    let balance = balance_score(&regions);
    (regions, balance)
}

fn analyze_cell(buffer: &PixelBuffer, id: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> Region {
    let mut sum = [0u64; 3];
    let mut count = 0usize;
    let mut quantized: HashMap<u16, (usize, [u64; 3])> = HashMap::new();

    for y in y0..y1 {
        for x in x0..x1 {
            let pixel = buffer.get(x, y);
            sum[0] += pixel.r as u64;
            sum[1] += pixel.g as u64;
            sum[2] += pixel.b as u64;
            count += 1;

            let entry = quantized
                .entry(pixel.quantized_key(palette_assembly::QUANTIZE_BITS))
                .or_insert((0, [0u64; 3]));
            entry.0 += 1;
            entry.1[0] += pixel.r as u64;
            entry.1[1] += pixel.g as u64;
            entry.1[2] += pixel.b as u64;
        }
    }

    let average = Pixel::new(
        (sum[0] / count as u64) as u8,
        (sum[1] / count as u64) as u8,
        (sum[2] / count as u64) as u8,
    );

    // Highest count wins; count ties resolve to the smaller quantized key
    let (_, (dom_count, dom_sum)) = quantized
        .iter()
        .map(|(k, v)| (*k, *v))
        .min_by_key(|(key, (cnt, _))| (usize::MAX - cnt, *key))
        .unwrap_or((0, (count, sum)));
    let dominant = Pixel::new(
        (dom_sum[0] / dom_count as u64) as u8,
        (dom_sum[1] / dom_count as u64) as u8,
        (dom_sum[2] / dom_count as u64) as u8,
    );

    Region {
        id,
        bounds: RegionBounds {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        },
        pixel_count: count,
        average_color: Color::from_rgb(average),
        dominant_color: Color::from_rgb(dominant),
        brightness: relative_luminance(average),
        temperature: classify_temperature(rgb_to_hsv(average)),
    }
}

/// Pixel offset where grid line `index` falls along a dimension of
/// `extent` pixels split into `divisions` parts.
fn cell_boundary(index: u32, extent: u32, divisions: u32) -> u32 {
    (index as u64 * extent as u64 / divisions as u64) as u32
}

/// Balance: 1 minus the standard deviation of region brightness, scaled by
/// the maximum attainable deviation (0.5 for values in [0, 1]).
fn balance_score(regions: &[Region]) -> f32 {
    if regions.len() < 2 {
        return 1.0;
    }
    let n = regions.len() as f32;
    let mean = regions.iter().map(|r| r.brightness).sum::<f32>() / n;
    let variance = regions
        .iter()
        .map(|r| (r.brightness - mean) * (r.brightness - mean))
        .sum::<f32>()
        / n;
    (1.0 - variance.sqrt() / 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_buffer(pixel: Pixel, width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::new(vec![pixel; (width * height) as usize], width, height).unwrap()
    }

    #[test]
    fn test_grid_covers_all_pixels_exactly_once() {
        // Dimensions not divisible by the grid
        let buffer = uniform_buffer(Pixel::new(100, 100, 100), 10, 7);
        let (regions, _) = analyze_regions(&buffer, 3);

        let total: usize = regions.iter().map(|r| r.pixel_count).sum();
        assert_eq!(total, 70);

        // No overlapping bounds
        let mut covered = vec![false; 70];
        for region in &regions {
            for y in region.bounds.y..region.bounds.y + region.bounds.height {
                for x in region.bounds.x..region.bounds.x + region.bounds.width {
                    let idx = (y * 10 + x) as usize;
                    assert!(!covered[idx], "pixel ({x},{y}) covered twice");
                    covered[idx] = true;
                }
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn test_uniform_image_is_balanced() {
        let buffer = uniform_buffer(Pixel::new(80, 120, 200), 9, 9);
        let (regions, balance) = analyze_regions(&buffer, 3);

        assert_eq!(regions.len(), 9);
        assert!((balance - 1.0).abs() < 1e-6);
        for region in &regions {
            assert_eq!(region.average_color.rgb, [80, 120, 200]);
            assert_eq!(region.dominant_color.rgb, [80, 120, 200]);
        }
    }

    #[test]
    fn test_split_image_brightness_imbalance() {
        // Left half black, right half white
        let mut pixels = Vec::new();
        for _y in 0..6 {
            pixels.extend(vec![Pixel::new(0, 0, 0); 3]);
            pixels.extend(vec![Pixel::new(255, 255, 255); 3]);
        }
        let buffer = PixelBuffer::new(pixels, 6, 6).unwrap();
        let (regions, balance) = analyze_regions(&buffer, 3);

        assert_eq!(regions.len(), 9);
        assert!(balance < 0.3, "split image should score unbalanced: {balance}");

        let dark = regions.iter().find(|r| r.bounds.x == 0).unwrap();
        assert!(dark.brightness < 0.01);
        let light = regions.iter().find(|r| r.bounds.x == 4).unwrap();
        assert!(light.brightness > 0.99);
    }

    #[test]
    fn test_region_dominant_differs_from_average() {
        // 2/3 red and 1/3 blue in one cell: average is purple-ish but the
        // dominant quantized color stays red
        let mut pixels = vec![Pixel::new(255, 0, 0); 6];
        pixels.extend(vec![Pixel::new(0, 0, 255); 3]);
        let buffer = PixelBuffer::new(pixels, 3, 3).unwrap();
        let (regions, _) = analyze_regions(&buffer, 1);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].dominant_color.rgb, [255, 0, 0]);
        assert_ne!(regions[0].average_color.rgb, [255, 0, 0]);
        assert_eq!(regions[0].pixel_count, 9);
    }

    #[test]
    fn test_flat_buffer_degenerates_gracefully() {
        let buffer = PixelBuffer::from_flat(vec![Pixel::new(10, 200, 30); 12]).unwrap();
        let (regions, _) = analyze_regions(&buffer, 3);

        // Height 1: only the grid row containing the single pixel row survives
        let total: usize = regions.iter().map(|r| r.pixel_count).sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn test_cell_boundary_survives_extreme_grids() {
        // 500_000 * 50_000 overflows u32; the split must not wrap
        assert_eq!(cell_boundary(500_000, 50_000, 500_000), 50_000);
        assert_eq!(cell_boundary(499_999, 50_000, 500_000), 49_999);
        assert_eq!(cell_boundary(0, 50_000, 500_000), 0);
        // Grid coarser than the image still yields monotone boundaries
        assert_eq!(cell_boundary(3, 2, 5), 1);
        assert_eq!(cell_boundary(5, 2, 5), 2);
    }

    #[test]
    fn test_region_ids_are_stable_row_major() {
        let buffer = uniform_buffer(Pixel::new(50, 50, 50), 6, 6);
        let (regions, _) = analyze_regions(&buffer, 3);
        let ids: Vec<u32> = regions.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
