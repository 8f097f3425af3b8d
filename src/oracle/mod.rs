//! Orientation oracle implementations.
//!
//! The pipeline only knows the [`OrientationOracle`] trait; this module
//! provides the concrete detectors. [`TesseractOsd`] shells out to the
//! Tesseract binary's orientation-and-script detection, and
//! [`FixedOracle`] reports a constant answer for tests and for batches
//! whose orientation is known up front.

pub mod tesseract;

pub use tesseract::TesseractOsd;

use image::GrayImage;

use crate::domain::orientation::{CoarseRotation, OrientationEstimate, OrientationOracle};

/// An oracle that always reports the same rotation.
#[derive(Debug, Clone, Copy)]
pub struct FixedOracle(pub CoarseRotation);

impl OrientationOracle for FixedOracle {
    fn detect(&self, _image: &GrayImage) -> OrientationEstimate {
        OrientationEstimate::Detected(self.0)
    }
}
