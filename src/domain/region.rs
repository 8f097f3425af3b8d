//! Rectangular pixel regions.

use serde::{Deserialize, Serialize};

use crate::core::errors::{NormalizeError, NormalizeResult};

/// A rectangular region in pixel coordinates.
///
/// The region is half-open: it covers columns `left..right` and rows
/// `top..bottom`, so `right` and `bottom` sit one past the last pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Region {
    /// Creates a region, rejecting empty or inverted bounds.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> NormalizeResult<Self> {
        if left >= right || top >= bottom {
            return Err(NormalizeError::invalid_input(format!(
                "invalid region: left={left} right={right} top={top} bottom={bottom}"
            )));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Width of the region in pixels.
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height of the region in pixels.
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Grows the region by `padding` pixels on every side, clamped to the
    /// image bounds.
    pub fn pad(&self, padding: u32, image_width: u32, image_height: u32) -> Self {
        Self {
            left: self.left.saturating_sub(padding),
            top: self.top.saturating_sub(padding),
            right: self.right.saturating_add(padding).min(image_width),
            bottom: self.bottom.saturating_add(padding).min(image_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted_bounds() {
        assert!(Region::new(10, 0, 5, 20).is_err());
        assert!(Region::new(0, 10, 20, 10).is_err());
        assert!(Region::new(5, 5, 5, 10).is_err());
    }

    #[test]
    fn test_dimensions() {
        let region = Region::new(10, 20, 110, 220).unwrap();
        assert_eq!(region.width(), 100);
        assert_eq!(region.height(), 200);
    }

    #[test]
    fn test_pad_clamps_to_image() {
        let region = Region::new(5, 5, 95, 95).unwrap();
        let padded = region.pad(10, 100, 100);
        assert_eq!(padded, Region { left: 0, top: 0, right: 100, bottom: 100 });

        let padded = region.pad(2, 100, 100);
        assert_eq!(padded, Region { left: 3, top: 3, right: 97, bottom: 97 });
    }
}
