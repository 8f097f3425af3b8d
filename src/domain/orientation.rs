//! Page orientation types and the orientation oracle trait.
//!
//! Coarse orientation is always a multiple of 90 degrees, so it can be
//! applied losslessly with quarter-turn rotations. Detection is delegated
//! to an [`OrientationOracle`], which external engines (or tests) implement.

use image::{DynamicImage, GrayImage};

/// A quarter-turn rotation that brings a page upright.
///
/// The angle is the clockwise rotation to apply to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoarseRotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl CoarseRotation {
    /// Maps an angle in degrees to a quarter-turn rotation.
    ///
    /// The angle is normalized into `[0, 360)` first, so `-90` means the
    /// same as `270`. Angles that are not multiples of 90 yield `None`.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(CoarseRotation::Deg0),
            90 => Some(CoarseRotation::Deg90),
            180 => Some(CoarseRotation::Deg180),
            270 => Some(CoarseRotation::Deg270),
            _ => None,
        }
    }

    /// The clockwise rotation angle in degrees.
    pub fn degrees(&self) -> i32 {
        match self {
            CoarseRotation::Deg0 => 0,
            CoarseRotation::Deg90 => 90,
            CoarseRotation::Deg180 => 180,
            CoarseRotation::Deg270 => 270,
        }
    }

    /// Applies the rotation. Quarter turns are exact pixel permutations,
    /// no resampling is involved.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match self {
            CoarseRotation::Deg0 => image.clone(),
            CoarseRotation::Deg90 => image.rotate90(),
            CoarseRotation::Deg180 => image.rotate180(),
            CoarseRotation::Deg270 => image.rotate270(),
        }
    }
}

/// Outcome of an orientation detection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationEstimate {
    /// The oracle produced a usable quarter-turn rotation.
    Detected(CoarseRotation),
    /// The oracle could not produce an estimate. Callers fall back to
    /// leaving the page as-is.
    Unavailable,
}

/// Detects the coarse orientation of a page.
///
/// Implementations must not panic on unusual inputs; when detection fails
/// for any reason they return [`OrientationEstimate::Unavailable`].
pub trait OrientationOracle: Send + Sync {
    /// Estimates the clockwise rotation that would bring the page upright.
    fn detect(&self, image: &GrayImage) -> OrientationEstimate;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_degrees_normalizes() {
        assert_eq!(CoarseRotation::from_degrees(0), Some(CoarseRotation::Deg0));
        assert_eq!(CoarseRotation::from_degrees(90), Some(CoarseRotation::Deg90));
        assert_eq!(CoarseRotation::from_degrees(-90), Some(CoarseRotation::Deg270));
        assert_eq!(CoarseRotation::from_degrees(450), Some(CoarseRotation::Deg90));
        assert_eq!(CoarseRotation::from_degrees(360), Some(CoarseRotation::Deg0));
        assert_eq!(CoarseRotation::from_degrees(45), None);
    }

    #[test]
    fn test_apply_swaps_dimensions_for_quarter_turns() {
        let image = DynamicImage::new_luma8(30, 20);
        for (rotation, expected) in [
            (CoarseRotation::Deg0, (30, 20)),
            (CoarseRotation::Deg90, (20, 30)),
            (CoarseRotation::Deg180, (30, 20)),
            (CoarseRotation::Deg270, (20, 30)),
        ] {
            let rotated = rotation.apply(&image);
            assert_eq!((rotated.width(), rotated.height()), expected);
        }
    }

    #[test]
    fn test_apply_rotates_clockwise() {
        let mut buffer = GrayImage::new(2, 1);
        buffer.put_pixel(0, 0, image::Luma([10]));
        buffer.put_pixel(1, 0, image::Luma([200]));
        let image = DynamicImage::ImageLuma8(buffer);

        // Clockwise 90: the left pixel ends up on top.
        let rotated = CoarseRotation::Deg90.apply(&image).to_luma8();
        assert_eq!(rotated.get_pixel(0, 0)[0], 10);
        assert_eq!(rotated.get_pixel(0, 1)[0], 200);
    }
}
