//! Adaptive edge cropping.
//!
//! Cropping starts from a central box given by per-side margins and walks
//! each boundary outwards along per-column (or per-row) mean brightness.
//! A boundary is placed where the mean jumps by more than the side's
//! threshold relative to the zone behind the walk, and the zone ahead is
//! internally stable. A side that never finds such a jump keeps its
//! starting position.

use image::{DynamicImage, GrayImage};
use tracing::debug;

use crate::core::config::{CropConfig, SideMargins, SideThresholds};
use crate::core::errors::{NormalizeError, NormalizeResult};
use crate::domain::region::Region;

/// Detects and applies content-aware crops.
#[derive(Debug, Clone)]
pub struct EdgeCropper {
    margins: SideMargins,
    thresholds: SideThresholds,
    stability_range: u32,
    padding: u32,
}

impl EdgeCropper {
    pub fn new(config: &CropConfig) -> Self {
        Self {
            margins: config.margins,
            thresholds: config.brightness_diff_threshold.resolve(),
            stability_range: config.stability_range,
            padding: config.padding,
        }
    }

    /// Finds the crop region on a grayscale view of the page.
    pub fn detect_region(&self, gray: &GrayImage) -> NormalizeResult<Region> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(NormalizeError::invalid_input("cannot crop an empty image"));
        }

        let col_means = column_means(gray);
        let row_means = row_means(gray);

        let seed_left = (self.margins.left * width as f32) as i64;
        let seed_top = (self.margins.top * height as f32) as i64;
        let seed_right = i64::from(width) - (self.margins.right * width as f32) as i64;
        let seed_bottom = i64::from(height) - (self.margins.bottom * height as f32) as i64;

        let range = i64::from(self.stability_range);
        let left = expand_line(&col_means, seed_left, -1, range, self.thresholds.left);
        let right = expand_line(&col_means, seed_right, 1, range, self.thresholds.right);
        let top = expand_line(&row_means, seed_top, -1, range, self.thresholds.top);
        let bottom = expand_line(&row_means, seed_bottom, 1, range, self.thresholds.bottom);

        // The walks only move outward, so inverted bounds can come only
        // from a degenerate seed box; keep the seed in that case.
        let region = match Region::new(left as u32, top as u32, right as u32, bottom as u32) {
            Ok(region) => region,
            Err(_) => Region::new(
                seed_left as u32,
                seed_top as u32,
                seed_right as u32,
                seed_bottom as u32,
            )?,
        };
        Ok(region.pad(self.padding, width, height))
    }

    /// Crops an image to its detected content region.
    pub fn crop(&self, image: &DynamicImage) -> NormalizeResult<DynamicImage> {
        let gray = image.to_luma8();
        let region = self.detect_region(&gray)?;
        debug!(
            "crop region: {}..{} x {}..{} of {}x{}",
            region.left,
            region.right,
            region.top,
            region.bottom,
            image.width(),
            image.height()
        );
        Ok(image.crop_imm(region.left, region.top, region.width(), region.height()))
    }
}

/// Walks from `start` one index at a time in `direction` (+1 or -1),
/// looking for a brightness jump followed by a stable zone.
///
/// The jump is measured against the mean `stability_range` indices behind
/// the walk; the zone is the next `stability_range` indices ahead, which
/// must all sit within `threshold` of their own mean. Positions whose
/// behind or ahead zone leaves the array are skipped, not terminal. The
/// walk never examines index 0 when moving down; if no jump is found the
/// starting position is returned.
fn expand_line(
    means: &[f32],
    start: i64,
    direction: i64,
    stability_range: i64,
    threshold: f32,
) -> i64 {
    let len = means.len() as i64;

    let mut i = start;
    loop {
        if direction < 0 {
            if i <= 0 {
                break;
            }
        } else if i >= len {
            break;
        }

        let prev = i - direction * stability_range;
        let zone_first = i + direction;
        let zone_last = i + direction * stability_range;
        let in_bounds = |idx: i64| idx >= 0 && idx < len;

        if in_bounds(prev) && in_bounds(zone_first) && in_bounds(zone_last) {
            let base = means[prev as usize];
            let current = means[i as usize];
            if (current - base).abs() > threshold {
                let mut zone_sum = 0.0f32;
                for j in 1..=stability_range {
                    zone_sum += means[(i + direction * j) as usize];
                }
                let zone_mean = zone_sum / stability_range as f32;

                let stable = (1..=stability_range)
                    .all(|j| (means[(i + direction * j) as usize] - zone_mean).abs() < threshold);
                if stable {
                    return i;
                }
            }
        }

        i += direction;
    }

    start
}

fn column_means(gray: &GrayImage) -> Vec<f32> {
    let (width, height) = gray.dimensions();
    let mut sums = vec![0u64; width as usize];
    for row in gray.rows() {
        for (sum, pixel) in sums.iter_mut().zip(row) {
            *sum += u64::from(pixel[0]);
        }
    }
    sums.into_iter()
        .map(|s| (s as f64 / f64::from(height)) as f32)
        .collect()
}

fn row_means(gray: &GrayImage) -> Vec<f32> {
    let (width, _) = gray.dimensions();
    gray.rows()
        .map(|row| (row.map(|p| u64::from(p[0])).sum::<u64>() as f64 / f64::from(width)) as f32)
        .collect()
}
