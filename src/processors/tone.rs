//! Brightness, contrast and gamma adjustment through a shared lookup table.
//!
//! The three corrections compose into a single 256-entry table built once
//! per configuration, so applying them costs one indexed load per channel
//! sample. Neutral parameters produce the identity table.

use image::{DynamicImage, GrayImage, RgbImage};

use crate::core::config::ToneConfig;

/// Tone curve combining brightness offset, contrast slope and gamma.
#[derive(Clone)]
pub struct ToneAdjust {
    lut: [u8; 256],
}

impl std::fmt::Debug for ToneAdjust {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneAdjust").finish_non_exhaustive()
    }
}

impl ToneAdjust {
    pub fn new(config: &ToneConfig) -> Self {
        let mut lut = [0u8; 256];
        for (index, entry) in lut.iter_mut().enumerate() {
            let mut value = index as f32;
            if config.brightness != 0.0 {
                value += config.brightness;
            }
            if config.contrast != 0.0 {
                let factor =
                    131.0 * (config.contrast + 127.0) / (127.0 * (131.0 - config.contrast));
                value = factor * (value - 127.0) + 127.0;
            }
            if config.gamma != 1.0 {
                value = (value.clamp(0.0, 255.0) / 255.0).powf(1.0 / config.gamma) * 255.0;
            }
            *entry = value.clamp(0.0, 255.0) as u8;
        }
        Self { lut }
    }

    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match image {
            DynamicImage::ImageLuma8(buffer) => {
                DynamicImage::ImageLuma8(self.map_gray(buffer))
            }
            other => DynamicImage::ImageRgb8(self.map_rgb(&other.to_rgb8())),
        }
    }

    fn map_gray(&self, buffer: &GrayImage) -> GrayImage {
        GrayImage::from_fn(buffer.width(), buffer.height(), |x, y| {
            image::Luma([self.lut[buffer.get_pixel(x, y)[0] as usize]])
        })
    }

    fn map_rgb(&self, buffer: &RgbImage) -> RgbImage {
        RgbImage::from_fn(buffer.width(), buffer.height(), |x, y| {
            let p = buffer.get_pixel(x, y);
            image::Rgb([
                self.lut[p[0] as usize],
                self.lut[p[1] as usize],
                self.lut[p[2] as usize],
            ])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(brightness: f32, contrast: f32, gamma: f32) -> ToneAdjust {
        ToneAdjust::new(&ToneConfig {
            enabled: true,
            brightness,
            contrast,
            gamma,
        })
    }

    #[test]
    fn test_neutral_parameters_are_identity() {
        let adjust = tone(0.0, 0.0, 1.0);
        for value in 0..=255u8 {
            assert_eq!(adjust.lut[value as usize], value);
        }
    }

    #[test]
    fn test_brightness_shifts_and_saturates() {
        let adjust = tone(100.0, 0.0, 1.0);
        assert_eq!(adjust.lut[0], 100);
        assert_eq!(adjust.lut[100], 200);
        assert_eq!(adjust.lut[200], 255);

        let darker = tone(-100.0, 0.0, 1.0);
        assert_eq!(darker.lut[50], 0);
        assert_eq!(darker.lut[200], 100);
    }

    #[test]
    fn test_contrast_pivots_around_midpoint() {
        let adjust = tone(0.0, 64.0, 1.0);
        assert_eq!(adjust.lut[127], 127);
        assert!(adjust.lut[255] == 255);
        assert_eq!(adjust.lut[0], 0);

        // Full negative contrast collapses everything onto the midpoint.
        let flat = tone(0.0, -127.0, 1.0);
        assert!(flat.lut.iter().all(|&v| v == 127));
    }

    #[test]
    fn test_gamma_brightens_midtones() {
        let adjust = tone(0.0, 0.0, 2.0);
        // (64/255)^0.5 * 255 = 127.75, truncated.
        assert_eq!(adjust.lut[64], 127);
        assert_eq!(adjust.lut[0], 0);
        assert_eq!(adjust.lut[255], 255);
    }

    #[test]
    fn test_apply_maps_gray_and_rgb() {
        let adjust = tone(30.0, 0.0, 1.0);

        let gray = GrayImage::from_pixel(3, 2, image::Luma([100]));
        let out = adjust.apply(&DynamicImage::ImageLuma8(gray)).to_luma8();
        assert!(out.pixels().all(|p| p[0] == 130));

        let rgb = RgbImage::from_pixel(3, 2, image::Rgb([10, 100, 250]));
        let out = adjust.apply(&DynamicImage::ImageRgb8(rgb)).to_rgb8();
        assert!(out.pixels().all(|p| p.0 == [40, 130, 255]));
    }
}
