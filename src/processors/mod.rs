//! Image processing stages for document normalization.
//!
//! This module collects the individual transformations the pipeline
//! composes: rotation and skew estimation, content-edge cropping, and
//! the photometric corrections (illumination gradient, contrast
//! stretch, tone curve).
//!
//! # Modules
//!
//! * `contrast` - Percentile contrast stretching
//! * `crop` - Content-edge detection and cropping
//! * `deskew` - Fine skew estimation (Hough lines and projection profiles)
//! * `gradient` - Illumination gradient masks
//! * `rotate` - Arbitrary-angle resampling rotation
//! * `tone` - Brightness, contrast and gamma lookup table

pub mod contrast;
pub mod crop;
pub mod deskew;
pub mod gradient;
pub mod rotate;
pub mod tone;

pub use contrast::ContrastStretch;
pub use crop::EdgeCropper;
pub use deskew::{HoughDeskew, ProjectionDeskew};
pub use gradient::GradientMask;
pub use rotate::{rotate_expanded, rotate_same_size};
pub use tone::ToneAdjust;
