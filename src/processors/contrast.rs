//! Percentile contrast stretching.
//!
//! Maps the value at the lower percentile to black and the upper
//! percentile to white, ignoring outliers beyond them. Grayscale images
//! are stretched as one channel; color images are stretched per channel.
//! Channels whose percentile span is below one level are left untouched,
//! so near-uniform pages pass through unchanged.

use image::{DynamicImage, GrayImage, RgbImage};
use tracing::debug;

use crate::core::config::ContrastConfig;

/// Percentile-based histogram stretch.
#[derive(Debug, Clone, Copy)]
pub struct ContrastStretch {
    lower: f32,
    upper: f32,
}

impl ContrastStretch {
    pub fn new(config: &ContrastConfig) -> Self {
        Self {
            lower: config.clip_limit.0,
            upper: config.clip_limit.1,
        }
    }

    /// Stretches the image in place of its dynamic range.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match image {
            DynamicImage::ImageLuma8(buffer) => {
                DynamicImage::ImageLuma8(self.stretch_gray(buffer))
            }
            other => DynamicImage::ImageRgb8(self.stretch_rgb(&other.to_rgb8())),
        }
    }

    fn stretch_gray(&self, buffer: &GrayImage) -> GrayImage {
        let mut histogram = [0u64; 256];
        for pixel in buffer.pixels() {
            histogram[pixel[0] as usize] += 1;
        }
        match self.channel_lut(&histogram) {
            Some(lut) => GrayImage::from_fn(buffer.width(), buffer.height(), |x, y| {
                image::Luma([lut[buffer.get_pixel(x, y)[0] as usize]])
            }),
            None => buffer.clone(),
        }
    }

    fn stretch_rgb(&self, buffer: &RgbImage) -> RgbImage {
        let mut histograms = [[0u64; 256]; 3];
        for pixel in buffer.pixels() {
            for (histogram, &value) in histograms.iter_mut().zip(pixel.0.iter()) {
                histogram[value as usize] += 1;
            }
        }

        // Per channel: None keeps the channel unchanged.
        let luts: Vec<Option<[u8; 256]>> =
            histograms.iter().map(|h| self.channel_lut(h)).collect();

        RgbImage::from_fn(buffer.width(), buffer.height(), |x, y| {
            let p = buffer.get_pixel(x, y);
            let mut out = [0u8; 3];
            for c in 0..3 {
                out[c] = match &luts[c] {
                    Some(lut) => lut[p[c] as usize],
                    None => p[c],
                };
            }
            image::Rgb(out)
        })
    }

    /// Builds the stretch table for one channel, or `None` when the
    /// percentile span is too narrow to stretch.
    fn channel_lut(&self, histogram: &[u64; 256]) -> Option<[u8; 256]> {
        let total: u64 = histogram.iter().sum();
        if total == 0 {
            return None;
        }

        let min_val = percentile(histogram, total, self.lower);
        let max_val = percentile(histogram, total, self.upper);
        let span = max_val - min_val;
        if span < 1.0 {
            debug!("contrast stretch skipped: percentile span {span:.3} below one level");
            return None;
        }

        let scale = 255.0 / span;
        let mut lut = [0u8; 256];
        for (value, entry) in lut.iter_mut().enumerate() {
            *entry = ((value as f64 - min_val) * scale).clamp(0.0, 255.0) as u8;
        }
        Some(lut)
    }
}

/// Percentile with linear interpolation between the two nearest ranks.
fn percentile(histogram: &[u64; 256], total: u64, p: f32) -> f64 {
    let rank = f64::from(p) / 100.0 * (total - 1) as f64;
    let lower_rank = rank.floor();
    let fraction = rank - lower_rank;

    let low = value_at_rank(histogram, lower_rank as u64);
    if fraction == 0.0 {
        return low;
    }
    let high = value_at_rank(histogram, lower_rank as u64 + 1);
    low + fraction * (high - low)
}

/// Value of the k-th smallest pixel (0-based) via the cumulative histogram.
fn value_at_rank(histogram: &[u64; 256], rank: u64) -> f64 {
    let mut cumulative = 0u64;
    for (value, &count) in histogram.iter().enumerate() {
        cumulative += count;
        if cumulative > rank {
            return value as f64;
        }
    }
    255.0
}
