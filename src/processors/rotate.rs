//! Arbitrary-angle image rotation.
//!
//! Rotation is done by inverse mapping with bicubic (Catmull-Rom)
//! sampling and replicated edges, so no black wedges appear in the
//! corners. Positive angles rotate counter-clockwise on screen. Exact
//! quarter turns are dispatched to lossless pixel permutations.

use image::{DynamicImage, GrayImage, ImageBuffer, Pixel};

/// Rotates an image, growing the canvas so no content is clipped.
///
/// The output dimensions are the bounding box of the rotated image.
/// Pixels sampled from outside the source replicate the nearest edge.
pub fn rotate_expanded(image: &DynamicImage, degrees: f32) -> DynamicImage {
    match degrees.rem_euclid(360.0) {
        d if d == 0.0 => image.clone(),
        d if d == 90.0 => image.rotate270(),
        d if d == 180.0 => image.rotate180(),
        d if d == 270.0 => image.rotate90(),
        _ => rotate_resampled(image, degrees, true),
    }
}

/// Rotates an image about its center, keeping the original dimensions.
///
/// Content leaving the frame is lost and uncovered areas replicate the
/// nearest edge. Intended for small skew corrections.
pub fn rotate_same_size(image: &DynamicImage, degrees: f32) -> DynamicImage {
    if degrees.rem_euclid(360.0) == 0.0 {
        return image.clone();
    }
    rotate_resampled(image, degrees, false)
}

/// Same-size rotation of a grayscale buffer, used by the skew search.
pub(crate) fn rotate_luma_same_size(image: &GrayImage, degrees: f32) -> GrayImage {
    rotate_buffer(image, degrees, false)
}

fn rotate_resampled(image: &DynamicImage, degrees: f32, expand: bool) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(buffer) => {
            DynamicImage::ImageLuma8(rotate_buffer(buffer, degrees, expand))
        }
        other => DynamicImage::ImageRgb8(rotate_buffer(&other.to_rgb8(), degrees, expand)),
    }
}

fn rotate_buffer<P>(
    src: &ImageBuffer<P, Vec<u8>>,
    degrees: f32,
    expand: bool,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = src.dimensions();
    if width == 0 || height == 0 {
        return src.clone();
    }

    let (sin, cos) = degrees.to_radians().sin_cos();
    let (new_width, new_height) = if expand {
        let fw = width as f32;
        let fh = height as f32;
        (
            (fw * cos.abs() + fh * sin.abs()).ceil().max(1.0) as u32,
            (fw * sin.abs() + fh * cos.abs()).ceil().max(1.0) as u32,
        )
    } else {
        (width, height)
    };

    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let ncx = new_width as f32 / 2.0;
    let ncy = new_height as f32 / 2.0;

    let channels = P::CHANNEL_COUNT as usize;
    let mut dst: ImageBuffer<P, Vec<u8>> = ImageBuffer::new(new_width, new_height);

    for ny in 0..new_height {
        for nx in 0..new_width {
            let dx = nx as f32 - ncx;
            let dy = ny as f32 - ncy;
            // Inverse map: where in the source does this output pixel land.
            let sx = cos * dx - sin * dy + cx;
            let sy = sin * dx + cos * dy + cy;

            let x0 = sx.floor();
            let y0 = sy.floor();
            let tx = sx - x0;
            let ty = sy - y0;

            let mut wx = [0.0f32; 4];
            let mut wy = [0.0f32; 4];
            for (i, (weight_x, weight_y)) in wx.iter_mut().zip(wy.iter_mut()).enumerate() {
                let offset = i as f32 - 1.0;
                *weight_x = cubic_weight(tx - offset);
                *weight_y = cubic_weight(ty - offset);
            }

            let out = dst.get_pixel_mut(nx, ny);
            for c in 0..channels {
                let mut acc = 0.0f32;
                for (j, &weight_y) in wy.iter().enumerate() {
                    let py = clamp_index(y0 as i64 + j as i64 - 1, height);
                    let mut row = 0.0f32;
                    for (i, &weight_x) in wx.iter().enumerate() {
                        let px = clamp_index(x0 as i64 + i as i64 - 1, width);
                        row += weight_x * f32::from(src.get_pixel(px, py).channels()[c]);
                    }
                    acc += weight_y * row;
                }
                out.channels_mut()[c] = acc.clamp(0.0, 255.0).round() as u8;
            }
        }
    }

    dst
}

/// Catmull-Rom kernel (bicubic with a = -0.5). The four weights for any
/// sample position sum to one.
fn cubic_weight(t: f32) -> f32 {
    let t = t.abs();
    if t <= 1.0 {
        (1.5 * t - 2.5) * t * t + 1.0
    } else if t < 2.0 {
        ((-0.5 * t + 2.5) * t - 4.0) * t + 2.0
    } else {
        0.0
    }
}

fn clamp_index(i: i64, len: u32) -> u32 {
    i.clamp(0, i64::from(len) - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn ramp_image(width: u32, height: u32) -> DynamicImage {
        let buffer = GrayImage::from_fn(width, height, |x, y| Luma([(2 * x + 3 * y) as u8]));
        DynamicImage::ImageLuma8(buffer)
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let image = ramp_image(20, 15);
        assert_eq!(rotate_expanded(&image, 0.0).to_luma8(), image.to_luma8());
        assert_eq!(rotate_expanded(&image, 360.0).to_luma8(), image.to_luma8());
        assert_eq!(rotate_same_size(&image, 0.0).to_luma8(), image.to_luma8());
    }

    #[test]
    fn test_quarter_turns_are_exact() {
        let image = ramp_image(20, 15);
        assert_eq!(rotate_expanded(&image, 90.0).to_luma8(), image.rotate270().to_luma8());
        assert_eq!(rotate_expanded(&image, 180.0).to_luma8(), image.rotate180().to_luma8());
        assert_eq!(rotate_expanded(&image, 270.0).to_luma8(), image.rotate90().to_luma8());
        assert_eq!(rotate_expanded(&image, -90.0).to_luma8(), image.rotate90().to_luma8());
    }

    #[test]
    fn test_expanded_dimensions_cover_rotated_bounds() {
        let image = DynamicImage::new_luma8(100, 50);
        let rotated = rotate_expanded(&image, 30.0);
        // ceil(100 cos30 + 50 sin30) x ceil(100 sin30 + 50 cos30)
        assert_eq!((rotated.width(), rotated.height()), (112, 94));
    }

    #[test]
    fn test_uniform_image_stays_uniform() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(31, 17, Luma([128])));
        let rotated = rotate_expanded(&image, 3.7);
        assert!(rotated.to_luma8().pixels().all(|p| p[0] == 128));
    }

    #[test]
    fn test_same_size_keeps_dimensions() {
        let image = ramp_image(40, 30);
        let rotated = rotate_same_size(&image, 1.3);
        assert_eq!((rotated.width(), rotated.height()), (40, 30));
    }

    #[test]
    fn test_small_rotation_round_trips_in_the_interior() {
        let image = ramp_image(60, 40);
        let there = rotate_expanded(&image, 4.0);
        let back = rotate_expanded(&there, -4.0);

        // Two center-preserving rotations compose to a pure translation by
        // half the total growth, which is integral for even dimensions.
        let shift_x = (back.width() - image.width()) / 2;
        let shift_y = (back.height() - image.height()) / 2;

        let original = image.to_luma8();
        let restored = back.to_luma8();
        for y in 8..32 {
            for x in 8..52 {
                let a = i16::from(original.get_pixel(x, y)[0]);
                let b = i16::from(restored.get_pixel(x + shift_x, y + shift_y)[0]);
                assert!(
                    (a - b).abs() <= 2,
                    "pixel ({x}, {y}) drifted: {a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn test_rgb_images_rotate_per_channel() {
        let mut buffer = image::RgbImage::from_pixel(24, 24, image::Rgb([200, 40, 90]));
        for y in 0..24 {
            for x in 0..12 {
                buffer.put_pixel(x, y, image::Rgb([10, 220, 60]));
            }
        }
        let rotated = rotate_expanded(&DynamicImage::ImageRgb8(buffer), 2.0);
        // Colors survive away from the seam between the two halves.
        let left = rotated.to_rgb8().get_pixel(2, 12).0;
        let right = rotated.to_rgb8().get_pixel(22, 12).0;
        assert_eq!(left, [10, 220, 60]);
        assert_eq!(right, [200, 40, 90]);
    }
}
