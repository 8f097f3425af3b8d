//! The document normalization pipeline.
//!
//! This module provides the main pipeline implementation that combines
//! the individual processing stages into one pass over an image: coarse
//! orientation correction, fine skew correction, content-edge cropping,
//! and photometric adjustment. Single images, files and whole
//! directories can be processed through the same configured pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::core::config::{
    CoarseAngle, ConfigValidatorExt, DocumentType, PipelineConfig,
};
use crate::core::{NormalizeError, NormalizeResult, ProcessingStage};
use crate::domain::orientation::{CoarseRotation, OrientationEstimate, OrientationOracle};
use crate::oracle::TesseractOsd;
use crate::processors::{
    ContrastStretch, EdgeCropper, GradientMask, HoughDeskew, ProjectionDeskew, ToneAdjust,
    rotate_expanded, rotate_same_size,
};
use crate::utils::{list_image_files, load_image, save_image};

/// Fine corrections at or below this magnitude (in degrees) are treated
/// as estimator noise on typewritten pages and skipped.
const FINE_APPLY_THRESHOLD: f32 = 0.5;

/// Batch sizes above this fan out across the rayon thread pool.
const PARALLEL_THRESHOLD: usize = 4;

/// What the rotation stage did to an image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationOutcome {
    /// Clockwise degrees applied by the coarse stage, normalized to 0..360.
    pub coarse_degrees: i32,
    /// Fine skew estimate in degrees, when fine correction ran.
    pub fine_degrees: Option<f32>,
    /// Whether the fine estimate was actually applied to the image.
    pub fine_applied: bool,
}

/// Result of processing a directory of images.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Output paths of the files that were written.
    pub succeeded: Vec<PathBuf>,
    /// Input paths that failed, with the error for each.
    pub failed: Vec<(PathBuf, NormalizeError)>,
}

/// The configured normalization pipeline.
///
/// A pipeline is built once from a [`PipelineConfig`] and can then be
/// applied to any number of images. Stage processors are constructed up
/// front so repeated calls only pay for the image work itself.
///
/// # Examples
///
/// ```rust,no_run
/// use docnorm::prelude::*;
///
/// # fn main() -> NormalizeResult<()> {
/// let pipeline = NormalizePipeline::new(PipelineConfig::default())?;
/// let image = load_image("scan.png")?;
/// let normalized = pipeline.process(&image)?;
/// save_image(&normalized, "scan_normalized.png")?;
/// # Ok(())
/// # }
/// ```
pub struct NormalizePipeline {
    config: PipelineConfig,
    oracle: Box<dyn OrientationOracle>,
    cropper: EdgeCropper,
    stretch: ContrastStretch,
    tone: ToneAdjust,
    hough: HoughDeskew,
    projection: ProjectionDeskew,
}

impl std::fmt::Debug for NormalizePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizePipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NormalizePipeline {
    /// Creates a pipeline from a validated configuration.
    ///
    /// Orientation detection defaults to the external Tesseract OSD
    /// oracle; see [`NormalizePipeline::with_oracle`] to substitute
    /// another detector.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation.
    pub fn new(config: PipelineConfig) -> NormalizeResult<Self> {
        let config = config.validate_and_wrap()?;
        Ok(Self {
            cropper: EdgeCropper::new(&config.crop),
            stretch: ContrastStretch::new(&config.photometric.contrast),
            tone: ToneAdjust::new(&config.photometric.tone),
            hough: HoughDeskew::new(config.rotation.method),
            projection: ProjectionDeskew::default(),
            oracle: Box::new(TesseractOsd::new()),
            config,
        })
    }

    /// Replaces the orientation oracle used for automatic coarse rotation.
    pub fn with_oracle(mut self, oracle: impl OrientationOracle + 'static) -> Self {
        self.oracle = Box::new(oracle);
        self
    }

    /// Returns the configuration the pipeline was built from.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalizes a single image.
    ///
    /// # Errors
    ///
    /// Returns an error when the image is empty or a stage fails.
    pub fn process(&self, image: &DynamicImage) -> NormalizeResult<DynamicImage> {
        let (output, _) = self.process_with_report(image)?;
        Ok(output)
    }

    /// Normalizes a single image and reports what the rotation stage did.
    ///
    /// # Errors
    ///
    /// Returns an error when the image is empty or a stage fails.
    pub fn process_with_report(
        &self,
        image: &DynamicImage,
    ) -> NormalizeResult<(DynamicImage, RotationOutcome)> {
        if image.width() == 0 || image.height() == 0 {
            return Err(NormalizeError::invalid_input(
                "cannot process an empty image",
            ));
        }

        let mut current = image.clone();
        let mut outcome = RotationOutcome::default();

        if self.config.rotation.enabled {
            let (rotated, report) = self.rotate_stage(current);
            current = rotated;
            outcome = report;
        }

        if self.config.crop.enabled {
            current = self.cropper.crop(&current).map_err(|e| {
                NormalizeError::processing_error(ProcessingStage::Cropping, "edge crop failed", e)
            })?;
        }

        current = self.photometric_stage(current)?;

        Ok((current, outcome))
    }

    /// Applies coarse orientation correction and then fine deskewing.
    fn rotate_stage(&self, image: DynamicImage) -> (DynamicImage, RotationOutcome) {
        let (mut rotated, coarse_degrees) = self.coarse_rotate(image);
        let mut fine_degrees = None;
        let mut fine_applied = false;

        if self.config.rotation.fine {
            let gray = rotated.to_luma8();
            match self.config.rotation.document_type {
                DocumentType::Typewritten => {
                    let estimate = self.hough.estimate(&gray);
                    fine_degrees = Some(estimate);
                    if estimate.abs() > FINE_APPLY_THRESHOLD {
                        rotated = rotate_expanded(&rotated, estimate);
                        fine_applied = true;
                    } else {
                        debug!("fine rotation {:.2} deg below threshold, skipped", estimate);
                    }
                }
                DocumentType::Handwritten => {
                    let estimate = self.projection.estimate(&gray);
                    fine_degrees = Some(estimate);
                    rotated = rotate_same_size(&rotated, estimate);
                    fine_applied = estimate != 0.0;
                }
            }
        }

        (
            rotated,
            RotationOutcome {
                coarse_degrees,
                fine_degrees,
                fine_applied,
            },
        )
    }

    /// Applies the configured quarter-turn or fixed-angle rotation.
    ///
    /// Returns the rotated image together with the clockwise degrees
    /// that were applied.
    fn coarse_rotate(&self, image: DynamicImage) -> (DynamicImage, i32) {
        match self.config.rotation.angle {
            CoarseAngle::Fixed(degrees) => {
                let normalized = degrees.rem_euclid(360);
                let rotated = match CoarseRotation::from_degrees(normalized) {
                    Some(rotation) => rotation.apply(&image),
                    // Clockwise request, counter-clockwise primitive.
                    None => rotate_expanded(&image, -(normalized as f32)),
                };
                (rotated, normalized)
            }
            CoarseAngle::Auto => match self.oracle.detect(&image.to_luma8()) {
                OrientationEstimate::Detected(rotation) => {
                    debug!("detected page orientation: {} deg", rotation.degrees());
                    (rotation.apply(&image), rotation.degrees())
                }
                OrientationEstimate::Unavailable => {
                    warn!("orientation detection unavailable, keeping original orientation");
                    (image, 0)
                }
            },
        }
    }

    /// Applies gradient, grayscale conversion, contrast stretch and tone.
    fn photometric_stage(&self, mut image: DynamicImage) -> NormalizeResult<DynamicImage> {
        let photometric = &self.config.photometric;

        if photometric.gradient.enabled {
            let mask = GradientMask::build(image.width(), image.height(), &photometric.gradient)?;
            image = mask.apply(&image).map_err(|e| {
                NormalizeError::processing_error(
                    ProcessingStage::Photometric,
                    "gradient mask failed",
                    e,
                )
            })?;
        }

        if photometric.force_grayscale && !matches!(image, DynamicImage::ImageLuma8(_)) {
            image = DynamicImage::ImageLuma8(image.to_luma8());
        }

        if photometric.contrast.enabled {
            image = self.stretch.apply(&image);
        }

        if photometric.tone.enabled {
            image = self.tone.apply(&image);
        }

        Ok(image)
    }

    /// Normalizes one file from `input` and writes the result to `output`.
    ///
    /// The output format follows the output path's extension.
    ///
    /// # Errors
    ///
    /// Returns an error when the input cannot be read, a stage fails,
    /// or the output cannot be written.
    pub fn process_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> NormalizeResult<()> {
        let input = input.as_ref();
        let output = output.as_ref();
        debug!("normalizing {} -> {}", input.display(), output.display());
        let image = load_image(input)?;
        let processed = self.process(&image)?;
        save_image(&processed, output)
    }

    /// Normalizes every supported image in `input_dir` into `output_dir`.
    ///
    /// Output files keep their input file names. Individual failures do
    /// not abort the batch; they are collected in the returned
    /// [`BatchOutcome`]. Larger batches are processed in parallel.
    ///
    /// # Errors
    ///
    /// Returns an error when the input directory cannot be listed or
    /// the output directory cannot be created.
    pub fn process_directory(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> NormalizeResult<BatchOutcome> {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();

        let files = list_image_files(input_dir)?;
        if files.is_empty() {
            warn!("no supported image files in {}", input_dir.display());
            return Ok(BatchOutcome::default());
        }
        fs::create_dir_all(output_dir).map_err(|e| {
            NormalizeError::processing_error(
                ProcessingStage::BatchProcessing,
                &format!("failed to create output directory {}", output_dir.display()),
                e,
            )
        })?;

        let results: Vec<Result<PathBuf, (PathBuf, NormalizeError)>> =
            if files.len() > PARALLEL_THRESHOLD {
                use rayon::prelude::*;
                files
                    .par_iter()
                    .map(|path| self.process_entry(path, output_dir))
                    .collect()
            } else {
                files
                    .iter()
                    .map(|path| self.process_entry(path, output_dir))
                    .collect()
            };

        let mut outcome = BatchOutcome::default();
        for result in results {
            match result {
                Ok(path) => outcome.succeeded.push(path),
                Err((path, error)) => {
                    warn!("failed to normalize {}: {}", path.display(), error);
                    outcome.failed.push((path, error));
                }
            }
        }

        info!(
            "batch finished: {} succeeded, {} failed of {} files",
            outcome.succeeded.len(),
            outcome.failed.len(),
            files.len()
        );
        Ok(outcome)
    }

    fn process_entry(
        &self,
        path: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf, (PathBuf, NormalizeError)> {
        let Some(file_name) = path.file_name() else {
            return Err((
                path.to_path_buf(),
                NormalizeError::invalid_input("input path has no file name"),
            ));
        };
        let output = output_dir.join(file_name);
        match self.process_file(path, &output) {
            Ok(()) => Ok(output),
            Err(error) => Err((path.to_path_buf(), error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::FixedOracle;
    use image::{GrayImage, Luma};

    /// Configuration with every optional stage switched off, so only
    /// the explicitly enabled parts run.
    fn minimal_config() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.rotation.enabled = false;
        config.rotation.fine = false;
        config.crop.enabled = false;
        config.photometric.gradient.enabled = false;
        config.photometric.contrast.enabled = false;
        config.photometric.tone.enabled = false;
        config
    }

    fn uniform_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
    }

    #[test]
    fn test_neutral_stages_leave_image_unchanged() {
        let mut config = minimal_config();
        config.rotation.enabled = true;
        config.rotation.fine = true;
        config.photometric.contrast.enabled = true;
        config.photometric.tone.enabled = true;

        let pipeline = NormalizePipeline::new(config)
            .unwrap()
            .with_oracle(FixedOracle(CoarseRotation::Deg0));
        let image = uniform_gray(100, 80, 128);
        let (output, report) = pipeline.process_with_report(&image).unwrap();

        // Uniform page: no edges for the skew estimator, no percentile
        // span for the stretch, identity tone curve.
        assert_eq!(output.to_luma8(), image.to_luma8());
        assert_eq!(report.coarse_degrees, 0);
        assert_eq!(report.fine_degrees, Some(0.0));
        assert!(!report.fine_applied);
    }

    #[test]
    fn test_fixed_zero_angle_is_identity() {
        let mut config = minimal_config();
        config.rotation.enabled = true;
        config.rotation.angle = CoarseAngle::Fixed(0);

        let pipeline = NormalizePipeline::new(config).unwrap();
        let image = uniform_gray(100, 100, 128);
        let (output, report) = pipeline.process_with_report(&image).unwrap();

        assert_eq!(output.to_luma8(), image.to_luma8());
        assert_eq!(report.coarse_degrees, 0);
        assert_eq!(report.fine_degrees, None);
    }

    #[test]
    fn test_detected_quarter_turn_swaps_dimensions() {
        let mut config = minimal_config();
        config.rotation.enabled = true;

        let pipeline = NormalizePipeline::new(config)
            .unwrap()
            .with_oracle(FixedOracle(CoarseRotation::Deg90));
        let (output, report) = pipeline
            .process_with_report(&uniform_gray(60, 40, 200))
            .unwrap();

        assert_eq!(output.width(), 40);
        assert_eq!(output.height(), 60);
        assert_eq!(report.coarse_degrees, 90);
        assert_eq!(report.fine_degrees, None);
    }

    #[test]
    fn test_fixed_half_turn_flips_content() {
        let mut config = minimal_config();
        config.rotation.enabled = true;
        config.rotation.angle = CoarseAngle::Fixed(180);

        let mut buffer = GrayImage::from_pixel(2, 1, Luma([10]));
        buffer.put_pixel(1, 0, Luma([200]));

        let pipeline = NormalizePipeline::new(config).unwrap();
        let (output, report) = pipeline
            .process_with_report(&DynamicImage::ImageLuma8(buffer))
            .unwrap();

        let output = output.to_luma8();
        assert_eq!(output.get_pixel(0, 0)[0], 200);
        assert_eq!(output.get_pixel(1, 0)[0], 10);
        assert_eq!(report.coarse_degrees, 180);
    }

    #[test]
    fn test_negative_fixed_angle_normalizes() {
        let mut config = minimal_config();
        config.rotation.enabled = true;
        config.rotation.angle = CoarseAngle::Fixed(-90);

        let pipeline = NormalizePipeline::new(config).unwrap();
        let (output, report) = pipeline
            .process_with_report(&uniform_gray(30, 20, 90))
            .unwrap();

        assert_eq!(report.coarse_degrees, 270);
        assert_eq!((output.width(), output.height()), (20, 30));
    }

    #[test]
    fn test_handwritten_fine_rotation_keeps_dimensions() {
        let mut config = minimal_config();
        config.rotation.enabled = true;
        config.rotation.fine = true;
        config.rotation.document_type = DocumentType::Handwritten;

        let pipeline = NormalizePipeline::new(config)
            .unwrap()
            .with_oracle(FixedOracle(CoarseRotation::Deg0));
        let image = uniform_gray(50, 40, 128);
        let (output, report) = pipeline.process_with_report(&image).unwrap();

        // A featureless page gives every candidate angle the same score,
        // so the search returns its lower bound, applied at fixed size.
        assert_eq!((output.width(), output.height()), (50, 40));
        assert_eq!(report.fine_degrees, Some(-2.0));
        assert!(report.fine_applied);
        assert!(output.to_luma8().pixels().all(|p| p[0] == 128));
    }

    #[test]
    fn test_force_grayscale_converts_color_input() {
        let pipeline = NormalizePipeline::new(minimal_config()).unwrap();
        let image = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            8,
            8,
            image::Rgb([120, 130, 140]),
        ));
        let output = pipeline.process(&image).unwrap();
        assert!(matches!(output, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_empty_image_rejected() {
        let pipeline = NormalizePipeline::new(minimal_config()).unwrap();
        let empty = DynamicImage::new_luma8(0, 0);
        assert!(pipeline.process(&empty).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PipelineConfig::default();
        config.photometric.tone.gamma = 0.0;
        assert!(NormalizePipeline::new(config).is_err());
    }

    #[test]
    fn test_directory_batch_collects_failures() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();

        for name in ["a.png", "b.png"] {
            let image = GrayImage::from_pixel(8, 8, Luma([128]));
            image.save(input_dir.path().join(name)).unwrap();
        }
        std::fs::write(input_dir.path().join("broken.png"), b"not an image").unwrap();

        let pipeline = NormalizePipeline::new(minimal_config()).unwrap();
        let outcome = pipeline
            .process_directory(input_dir.path(), output_dir.path())
            .unwrap();

        assert_eq!(outcome.succeeded.len(), 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(
            outcome.failed[0].0.file_name().unwrap().to_str().unwrap(),
            "broken.png"
        );
        assert!(output_dir.path().join("a.png").exists());
        assert!(output_dir.path().join("b.png").exists());
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let pipeline = NormalizePipeline::new(minimal_config()).unwrap();
        let outcome = pipeline
            .process_directory(input_dir.path(), output_dir.path())
            .unwrap();
        assert!(outcome.succeeded.is_empty());
        assert!(outcome.failed.is_empty());
    }
}
