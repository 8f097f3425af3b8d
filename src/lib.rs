//! # docnorm
//!
//! A Rust library that normalizes photographed or scanned document pages
//! into clean, upright, uniformly lit images ready for text recognition.
//! Source images from archival digitization arrive with arbitrary rotation,
//! vignetting, and uneven margins; this crate corrects all three.
//!
//! ## Features
//!
//! - Coarse rotation (multiples of 90°) via a pluggable orientation oracle,
//!   with a Tesseract OSD subprocess adapter included
//! - Fine deskew for typewritten pages (Hough line analysis) and handwritten
//!   pages (projection-variance search)
//! - Content-preserving rotation with canvas expansion, bicubic sampling,
//!   and edge replication
//! - Adaptive edge cropping that expands a seed rectangle to stable
//!   brightness discontinuities
//! - Photometric correction: gradient vignette masks, percentile contrast
//!   stretch, and parametric brightness/contrast/gamma
//! - Batch directory processing with per-file error isolation
//!
//! ## Modules
//!
//! * [`core`] - Error handling and validated configuration
//! * [`domain`] - Shared domain types: orientation, crop regions
//! * [`oracle`] - Orientation oracle implementations
//! * [`pipeline`] - The normalization pipeline and batch runner
//! * [`processors`] - The individual image processors
//! * [`utils`] - Image I/O helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docnorm::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = NormalizePipeline::new(PipelineConfig::default())?;
//!
//! let image = load_image(Path::new("scans/page_001.jpg"))?;
//! let normalized = pipeline.process(&image)?;
//! save_image(&normalized, Path::new("processed/page_001.jpg"))?;
//! # Ok(())
//! # }
//! ```
//!
//! Configuration can also be loaded from TOML or JSON files:
//!
//! ```rust,no_run
//! use docnorm::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load_from_file(Path::new("normalize.toml"))?;
//! let pipeline = NormalizePipeline::new(config)?;
//! let outcome = pipeline.process_directory(Path::new("scans"), Path::new("processed"))?;
//! println!("processed {} pages, {} failed", outcome.succeeded.len(), outcome.failed.len());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod oracle;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use docnorm::prelude::*;
/// ```
///
/// Included items cover the most common tasks: running the pipeline
/// ([`NormalizePipeline`], [`PipelineConfig`], [`ConfigLoader`]), error
/// handling ([`NormalizeError`], [`NormalizeResult`]), and image I/O
/// ([`load_image`], [`save_image`]).
///
/// For individual processors or custom oracle implementations, import
/// directly from the respective modules (e.g. `docnorm::processors`,
/// `docnorm::oracle`).
pub mod prelude {
    pub use crate::core::config::{ConfigLoader, PipelineConfig};
    pub use crate::core::{NormalizeError, NormalizeResult};
    pub use crate::domain::orientation::{OrientationEstimate, OrientationOracle};
    pub use crate::pipeline::{BatchOutcome, NormalizePipeline, RotationOutcome};
    pub use crate::utils::{load_image, save_image};
}
