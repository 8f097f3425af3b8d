//! Brightness gradient correction.
//!
//! Builds a per-pixel multiplier mask for one of four shapes and applies
//! it in normalized space: `v/255 * mask`, clipped to `[0, 1]` and scaled
//! back. Masks counteract uneven scanner or camera illumination, e.g. a
//! radial mask darkens a hot center, a vertical ramp compensates a lamp
//! at one edge.

use image::{DynamicImage, GrayImage, RgbImage};
use tracing::debug;

use crate::core::config::{GradientConfig, GradientDirection, GradientKind};
use crate::core::errors::{NormalizeError, NormalizeResult};

/// A multiplier mask matching one image size.
#[derive(Debug, Clone)]
pub struct GradientMask {
    width: u32,
    height: u32,
    data: Vec<f32>,
    identity: bool,
}

impl GradientMask {
    /// Builds the mask for an image of the given size.
    pub fn build(width: u32, height: u32, config: &GradientConfig) -> NormalizeResult<Self> {
        if width == 0 || height == 0 {
            return Err(NormalizeError::invalid_input(
                "cannot build a gradient mask for an empty image",
            ));
        }

        if config.strength == 0.0 || config.kind == GradientKind::None {
            return Ok(Self {
                width,
                height,
                data: Vec::new(),
                identity: true,
            });
        }

        let strength = config.strength;
        let direction = config.direction;
        let data = match config.kind {
            GradientKind::Radial => radial_mask(width, height, strength),
            GradientKind::Horizontal => linear_mask(width, height, strength, direction, true),
            GradientKind::Vertical => linear_mask(width, height, strength, direction, false),
            GradientKind::Edges => edges_mask(width, height, strength),
            // Handled by the early return above.
            GradientKind::None => Vec::new(),
        };

        Ok(Self {
            width,
            height,
            identity: data.is_empty(),
            data,
        })
    }

    /// Multiplies the image by the mask. The image dimensions must match
    /// the mask.
    pub fn apply(&self, image: &DynamicImage) -> NormalizeResult<DynamicImage> {
        if (image.width(), image.height()) != (self.width, self.height) {
            return Err(NormalizeError::invalid_input(format!(
                "gradient mask is {}x{} but the image is {}x{}",
                self.width,
                self.height,
                image.width(),
                image.height()
            )));
        }
        if self.identity {
            return Ok(image.clone());
        }

        debug!("applying gradient mask to {}x{} image", self.width, self.height);
        let result = match image {
            DynamicImage::ImageLuma8(buffer) => {
                let out = GrayImage::from_fn(self.width, self.height, |x, y| {
                    let v = buffer.get_pixel(x, y)[0];
                    image::Luma([self.scale(v, x, y)])
                });
                DynamicImage::ImageLuma8(out)
            }
            other => {
                let rgb = other.to_rgb8();
                let out = RgbImage::from_fn(self.width, self.height, |x, y| {
                    let p = rgb.get_pixel(x, y);
                    image::Rgb([
                        self.scale(p[0], x, y),
                        self.scale(p[1], x, y),
                        self.scale(p[2], x, y),
                    ])
                });
                DynamicImage::ImageRgb8(out)
            }
        };
        Ok(result)
    }

    fn value_at(&self, x: u32, y: u32) -> f32 {
        if self.identity {
            1.0
        } else {
            self.data[(y * self.width + x) as usize]
        }
    }

    fn scale(&self, value: u8, x: u32, y: u32) -> u8 {
        let normalized = f32::from(value) / 255.0 * self.value_at(x, y);
        (normalized.clamp(0.0, 1.0) * 255.0) as u8
    }
}

/// Radial mask: `1 + s * (d / d_max - 1)`, where `d` is the distance from
/// the center with x compressed by the aspect ratio, and `d_max` is the
/// corner distance. The center gets `1 - s`, the corners `1`.
fn radial_mask(width: u32, height: u32, strength: f32) -> Vec<f32> {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let aspect = width as f32 / height as f32;
    let max_distance = ((cx / aspect).powi(2) + cy.powi(2)).sqrt();

    let mut data = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let nx = (x as f32 - cx) / aspect;
            let ny = y as f32 - cy;
            let distance = (nx * nx + ny * ny).sqrt();
            data.push(1.0 + strength * (distance / max_distance - 1.0));
        }
    }
    data
}

/// Linear ramp from `1 - s` at the named start side to `1` at the far
/// side, constant along the other axis.
fn linear_mask(
    width: u32,
    height: u32,
    strength: f32,
    direction: GradientDirection,
    horizontal: bool,
) -> Vec<f32> {
    let steps = if horizontal { width } else { height };
    let reversed = matches!(
        direction,
        GradientDirection::RightToLeft | GradientDirection::BottomToTop
    );

    let ramp: Vec<f32> = (0..steps)
        .map(|i| {
            let t = if steps == 1 {
                0.0
            } else {
                i as f32 / (steps - 1) as f32
            };
            if reversed {
                1.0 - t * strength
            } else {
                (1.0 - strength) + t * strength
            }
        })
        .collect();

    let mut data = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push(if horizontal {
                ramp[x as usize]
            } else {
                ramp[y as usize]
            });
        }
    }
    data
}

/// Edge mask: `1 + s * (1 - d / d_max)`, where `d` is the pixel's
/// distance to the nearest border. Borders get `1 + s` and the innermost
/// pixels `1`, so edges brighten while the center is untouched.
fn edges_mask(width: u32, height: u32, strength: f32) -> Vec<f32> {
    let max_distance = ((width - 1) / 2).min((height - 1) / 2).max(1) as f32;

    let mut data = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let distance = x.min(width - 1 - x).min(y.min(height - 1 - y)) as f32;
            data.push(1.0 + strength * (1.0 - distance / max_distance));
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn config(kind: GradientKind, direction: GradientDirection, strength: f32) -> GradientConfig {
        GradientConfig {
            enabled: true,
            kind,
            direction,
            strength,
        }
    }

    #[test]
    fn test_zero_strength_is_exact_identity() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_fn(40, 30, |x, y| {
            Luma([(x * 7 + y * 3) as u8])
        }));
        let mask = GradientMask::build(
            40,
            30,
            &config(GradientKind::Radial, GradientDirection::TopToBottom, 0.0),
        )
        .unwrap();
        assert_eq!(mask.apply(&image).unwrap().to_luma8(), image.to_luma8());
    }

    #[test]
    fn test_kind_none_is_exact_identity() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([77])));
        let mask = GradientMask::build(
            8,
            8,
            &config(GradientKind::None, GradientDirection::TopToBottom, 0.9),
        )
        .unwrap();
        assert_eq!(mask.apply(&image).unwrap().to_luma8(), image.to_luma8());
    }

    #[test]
    fn test_radial_mask_darkens_center_not_corners() {
        let mask = GradientMask::build(
            100,
            50,
            &config(GradientKind::Radial, GradientDirection::TopToBottom, 0.5),
        )
        .unwrap();
        assert!((mask.value_at(50, 25) - 0.5).abs() < 1e-6);
        assert!((mask.value_at(0, 0) - 1.0).abs() < 1e-6);
        assert!((mask.value_at(99, 49) - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_radial_apply_on_white_page() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(100, 50, Luma([255])));
        let mask = GradientMask::build(
            100,
            50,
            &config(GradientKind::Radial, GradientDirection::TopToBottom, 0.5),
        )
        .unwrap();
        let out = mask.apply(&image).unwrap().to_luma8();
        assert_eq!(out.get_pixel(50, 25)[0], 127);
        assert_eq!(out.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_vertical_ramp_rows() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 3, Luma([255])));
        let mask = GradientMask::build(
            4,
            3,
            &config(GradientKind::Vertical, GradientDirection::TopToBottom, 0.5),
        )
        .unwrap();
        let out = mask.apply(&image).unwrap().to_luma8();
        for x in 0..4 {
            assert_eq!(out.get_pixel(x, 0)[0], 127);
            assert_eq!(out.get_pixel(x, 1)[0], 191);
            assert_eq!(out.get_pixel(x, 2)[0], 255);
        }

        let mask = GradientMask::build(
            4,
            3,
            &config(GradientKind::Vertical, GradientDirection::BottomToTop, 0.5),
        )
        .unwrap();
        let out = mask.apply(&image).unwrap().to_luma8();
        assert_eq!(out.get_pixel(0, 0)[0], 255);
        assert_eq!(out.get_pixel(0, 2)[0], 127);
    }

    #[test]
    fn test_horizontal_ramp_columns() {
        let mask = GradientMask::build(
            3,
            2,
            &config(GradientKind::Horizontal, GradientDirection::LeftToRight, 0.5),
        )
        .unwrap();
        assert_eq!(mask.value_at(0, 0), 0.5);
        assert_eq!(mask.value_at(1, 0), 0.75);
        assert_eq!(mask.value_at(2, 0), 1.0);

        let mask = GradientMask::build(
            3,
            2,
            &config(GradientKind::Horizontal, GradientDirection::RightToLeft, 0.5),
        )
        .unwrap();
        assert_eq!(mask.value_at(0, 1), 1.0);
        assert_eq!(mask.value_at(2, 1), 0.5);
    }

    #[test]
    fn test_edges_mask_brightens_border_and_clips() {
        let mask = GradientMask::build(
            5,
            5,
            &config(GradientKind::Edges, GradientDirection::TopToBottom, 0.5),
        )
        .unwrap();
        assert_eq!(mask.value_at(0, 2), 1.5);
        assert_eq!(mask.value_at(1, 2), 1.25);
        assert_eq!(mask.value_at(2, 2), 1.0);

        // Multipliers above one clip at white instead of wrapping.
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 5, Luma([255])));
        let out = mask.apply(&image).unwrap().to_luma8();
        assert!(out.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let image = DynamicImage::new_luma8(10, 10);
        let mask = GradientMask::build(
            12,
            10,
            &config(GradientKind::Radial, GradientDirection::TopToBottom, 0.3),
        )
        .unwrap();
        assert!(mask.apply(&image).is_err());
    }

    #[test]
    fn test_empty_dimensions_are_rejected() {
        let result = GradientMask::build(
            0,
            10,
            &config(GradientKind::Radial, GradientDirection::TopToBottom, 0.3),
        );
        assert!(result.is_err());
    }
}
