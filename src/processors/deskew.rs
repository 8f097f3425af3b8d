//! Fine skew estimation.
//!
//! Two estimators cover the two document kinds. [`HoughDeskew`] finds
//! straight text structure (baselines or stroke edges) with a Hough
//! transform and averages the detected line angles; it suits typewritten
//! pages. [`ProjectionDeskew`] searches a small angle range for the
//! rotation that maximizes the variance of row sums, which tolerates the
//! wobblier structure of handwriting.
//!
//! Both return the correction angle to apply: positive means rotate the
//! page counter-clockwise.

use image::GrayImage;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use tracing::debug;

use crate::core::config::RotationMethod;
use crate::core::errors::{NormalizeError, NormalizeResult};
use crate::processors::rotate::rotate_luma_same_size;

const GAUSSIAN_SIGMA: f32 = 1.1;
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;
const HOUGH_VOTE_THRESHOLD: u32 = 150;
const HOUGH_SUPPRESSION_RADIUS: u32 = 8;

/// Estimates below this magnitude are treated as noise by the automatic
/// method selection.
const MIN_TEXT_ANGLE: f32 = 0.1;

/// Mean angle of one line family, with the supporting line count as a
/// confidence measure.
#[derive(Debug, Clone, Copy)]
struct AngleCandidate {
    angle: f32,
    line_count: usize,
}

/// Skew estimator based on straight line detection.
#[derive(Debug, Clone, Copy)]
pub struct HoughDeskew {
    method: RotationMethod,
}

impl HoughDeskew {
    pub fn new(method: RotationMethod) -> Self {
        Self { method }
    }

    /// Estimates the text tilt of a page in degrees.
    ///
    /// Returns 0.0 when no usable lines are found.
    pub fn estimate(&self, image: &GrayImage) -> f32 {
        let blurred = gaussian_blur_f32(image, GAUSSIAN_SIGMA);
        let edges = canny(&blurred, CANNY_LOW, CANNY_HIGH);
        let lines = detect_lines(
            &edges,
            LineDetectionOptions {
                vote_threshold: HOUGH_VOTE_THRESHOLD,
                suppression_radius: HOUGH_SUPPRESSION_RADIUS,
            },
        );

        let horizontal = horizontal_candidate(&lines);
        let vertical = vertical_candidate(&lines);
        debug!(
            "hough skew: horizontal {:.2} deg from {} lines, vertical {:.2} deg from {} lines",
            horizontal.angle, horizontal.line_count, vertical.angle, vertical.line_count
        );

        select_angle(self.method, horizontal, vertical)
    }
}

/// Near-horizontal lines follow text baselines and line spacing.
/// `angle_in_degrees` is the clockwise angle between the x axis and the
/// line, so the band sits around 0 and wraps at 180.
fn horizontal_candidate(lines: &[PolarLine]) -> AngleCandidate {
    let angles: Vec<f32> = lines
        .iter()
        .filter_map(|line| {
            let theta = line.angle_in_degrees;
            if theta < 10 || theta > 170 {
                let theta = theta as f32;
                Some(if theta < 90.0 { theta } else { theta - 180.0 })
            } else {
                None
            }
        })
        .collect();
    candidate_from(&angles)
}

/// Near-vertical lines follow character stroke boundaries.
fn vertical_candidate(lines: &[PolarLine]) -> AngleCandidate {
    let angles: Vec<f32> = lines
        .iter()
        .filter_map(|line| {
            let theta = line.angle_in_degrees;
            if theta > 80 && theta < 100 {
                Some(theta as f32 - 90.0)
            } else {
                None
            }
        })
        .collect();
    candidate_from(&angles)
}

fn candidate_from(angles: &[f32]) -> AngleCandidate {
    let angle = if angles.is_empty() {
        0.0
    } else {
        angles.iter().sum::<f32>() / angles.len() as f32
    };
    AngleCandidate {
        angle,
        line_count: angles.len(),
    }
}

fn select_angle(
    method: RotationMethod,
    horizontal: AngleCandidate,
    vertical: AngleCandidate,
) -> f32 {
    match method {
        RotationMethod::Horizontal => horizontal.angle,
        RotationMethod::Vertical => vertical.angle,
        RotationMethod::Auto => {
            if horizontal.line_count >= vertical.line_count
                && horizontal.angle.abs() > MIN_TEXT_ANGLE
            {
                horizontal.angle
            } else if vertical.line_count > 0 && vertical.angle.abs() > MIN_TEXT_ANGLE {
                vertical.angle
            } else {
                0.0
            }
        }
    }
}

/// Skew estimator based on horizontal projection sharpness.
///
/// Each candidate angle in `[min_angle, max_angle]` is tried in `step`
/// increments. Straight text rows concentrate ink into few image rows, so
/// the variance of per-row pixel sums peaks when the page is level. Ties
/// keep the first candidate.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionDeskew {
    min_angle: f32,
    max_angle: f32,
    step: f32,
}

impl Default for ProjectionDeskew {
    fn default() -> Self {
        Self {
            min_angle: -2.0,
            max_angle: 2.0,
            step: 0.1,
        }
    }
}

impl ProjectionDeskew {
    /// Creates an estimator over a custom angle range.
    pub fn new(min_angle: f32, max_angle: f32, step: f32) -> NormalizeResult<Self> {
        if !min_angle.is_finite() || !max_angle.is_finite() || !step.is_finite() {
            return Err(NormalizeError::invalid_input(
                "projection search bounds must be finite",
            ));
        }
        if step <= 0.0 {
            return Err(NormalizeError::invalid_input(format!(
                "projection search step must be positive, got {step}"
            )));
        }
        if min_angle >= max_angle {
            return Err(NormalizeError::invalid_input(format!(
                "projection search range is empty: [{min_angle}, {max_angle}]"
            )));
        }
        Ok(Self {
            min_angle,
            max_angle,
            step,
        })
    }

    /// Finds the candidate angle with the sharpest row projection.
    pub fn estimate(&self, image: &GrayImage) -> f32 {
        if image.width() == 0 || image.height() == 0 {
            return 0.0;
        }

        let steps = ((self.max_angle - self.min_angle) / self.step).round() as usize;
        let mut best_angle = self.min_angle;
        let mut best_score = f64::NEG_INFINITY;
        for k in 0..=steps {
            let angle = self.min_angle + k as f32 * self.step;
            let rotated = rotate_luma_same_size(image, angle);
            let score = row_projection_variance(&rotated);
            if score > best_score {
                best_score = score;
                best_angle = angle;
            }
        }

        debug!("projection skew estimate: {:.2} deg", best_angle);
        best_angle
    }
}

fn row_projection_variance(image: &GrayImage) -> f64 {
    let sums: Vec<u64> = image
        .rows()
        .map(|row| row.map(|p| u64::from(p[0])).sum())
        .collect();
    let n = sums.len() as f64;
    let mean = sums.iter().sum::<u64>() as f64 / n;
    sums.iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}
