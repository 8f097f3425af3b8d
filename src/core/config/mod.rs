//! Configuration types for the normalization pipeline.
//!
//! This module provides the [`PipelineConfig`] tree consumed by
//! [`NormalizePipeline`](crate::pipeline::NormalizePipeline), the
//! [`ConfigValidator`] trait used to check values before a pipeline is
//! built, and a [`ConfigLoader`] for reading configurations from TOML
//! or JSON files.

pub mod errors;
pub mod loader;

// Re-export commonly used types
pub use errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
pub use loader::{ConfigFormat, ConfigLoader};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The kind of document being normalized.
///
/// Typewritten pages have strong straight baselines, so small skew
/// estimates below the apply threshold are treated as noise. Handwritten
/// pages get the estimated fine correction unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Machine-printed text with regular baselines.
    Typewritten,
    /// Handwriting or other irregular content.
    Handwritten,
}

/// Which family of detected lines drives fine skew estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMethod {
    /// Pick between horizontal and vertical evidence by line count.
    Auto,
    /// Use near-horizontal lines only.
    Horizontal,
    /// Use near-vertical lines only.
    Vertical,
}

/// Coarse rotation selection.
///
/// Serialized as the literal string `"auto"` or as an integer number of
/// degrees, so config files can say `angle = 90` or `angle = "auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoarseAngle {
    /// Ask the orientation oracle for the page orientation.
    Auto,
    /// Rotate by a fixed number of degrees, clockwise.
    Fixed(i32),
}

impl Default for CoarseAngle {
    fn default() -> Self {
        CoarseAngle::Auto
    }
}

impl Serialize for CoarseAngle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CoarseAngle::Auto => serializer.serialize_str("auto"),
            CoarseAngle::Fixed(degrees) => serializer.serialize_i32(*degrees),
        }
    }
}

impl<'de> Deserialize<'de> for CoarseAngle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Fixed(i32),
            Named(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Fixed(degrees) => Ok(CoarseAngle::Fixed(degrees)),
            Repr::Named(name) if name.eq_ignore_ascii_case("auto") => Ok(CoarseAngle::Auto),
            Repr::Named(name) => Err(serde::de::Error::custom(format!(
                "coarse rotation angle must be an integer or \"auto\", got \"{name}\""
            ))),
        }
    }
}

/// Shape of the brightness gradient applied before contrast correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// Darken towards the corners, radially from the center.
    Radial,
    /// Linear ramp along the horizontal axis.
    Horizontal,
    /// Linear ramp along the vertical axis.
    Vertical,
    /// Darken a rectangular border, leaving the center untouched.
    Edges,
    /// No gradient; the mask is all ones.
    None,
}

/// Direction of a linear gradient ramp.
///
/// The named start side is the darkest. For [`GradientKind::Radial`] and
/// [`GradientKind::Edges`] the direction is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

/// Fractions of the image width/height excluded from edge scanning.
///
/// The crop scan for each side starts at the boundary of the central box
/// these margins describe and walks outwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideMargins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for SideMargins {
    fn default() -> Self {
        Self {
            left: 0.15,
            right: 0.15,
            top: 0.10,
            bottom: 0.10,
        }
    }
}

/// Per-side brightness difference thresholds, in intensity levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideThresholds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for SideThresholds {
    fn default() -> Self {
        Self {
            left: 30.0,
            right: 30.0,
            top: 30.0,
            bottom: 30.0,
        }
    }
}

/// Brightness difference threshold, either one value for all four sides
/// or an explicit per-side table.
///
/// A per-side table must name all four sides; there is no partial form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdSpec {
    /// One threshold shared by all sides.
    Scalar(f32),
    /// Independent thresholds per side.
    PerSide(SideThresholds),
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        ThresholdSpec::Scalar(30.0)
    }
}

impl ThresholdSpec {
    /// Expands to explicit per-side values, broadcasting a scalar to all
    /// four sides.
    pub fn resolve(&self) -> SideThresholds {
        match *self {
            ThresholdSpec::Scalar(value) => SideThresholds {
                left: value,
                right: value,
                top: value,
                bottom: value,
            },
            ThresholdSpec::PerSide(sides) => sides,
        }
    }
}

/// Settings for the rotation stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Whether rotation runs at all.
    pub enabled: bool,
    /// Coarse orientation: a fixed angle or oracle-driven detection.
    pub angle: CoarseAngle,
    /// Line family used for fine skew estimation.
    pub method: RotationMethod,
    /// Content kind, which picks the fine estimator and apply policy.
    pub document_type: DocumentType,
    /// Whether fine skew correction runs after the coarse rotation.
    pub fine: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            angle: CoarseAngle::Auto,
            method: RotationMethod::Auto,
            document_type: DocumentType::Typewritten,
            fine: true,
        }
    }
}

impl ConfigValidator for RotationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Settings for the adaptive edge cropping stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Whether cropping runs at all.
    pub enabled: bool,
    /// Pixels of context kept outside each detected boundary.
    pub padding: u32,
    /// Number of consecutive rows/columns that must stay on the far side
    /// of the threshold for a boundary to count.
    pub stability_range: u32,
    /// Central box the scans start from.
    pub margins: SideMargins,
    /// Mean brightness jump that marks a content boundary (0-255).
    pub brightness_diff_threshold: ThresholdSpec,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            padding: 0,
            stability_range: 10,
            margins: SideMargins::default(),
            brightness_diff_threshold: ThresholdSpec::default(),
        }
    }
}

impl ConfigValidator for CropConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_u32(self.stability_range, "stability range")?;
        self.validate_margin_pair(self.margins.left, self.margins.right, "left/right margins")?;
        self.validate_margin_pair(self.margins.top, self.margins.bottom, "top/bottom margins")?;

        let thresholds = self.brightness_diff_threshold.resolve();
        for (side, value) in [
            ("left", thresholds.left),
            ("right", thresholds.right),
            ("top", thresholds.top),
            ("bottom", thresholds.bottom),
        ] {
            self.validate_f32_range(
                value,
                0.0,
                255.0,
                &format!("{side} brightness difference threshold"),
            )?;
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Settings for the brightness gradient stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    /// Whether the gradient mask is applied.
    pub enabled: bool,
    /// Mask shape.
    pub kind: GradientKind,
    /// Ramp direction for the linear kinds.
    pub direction: GradientDirection,
    /// Maximum darkening at the far end of the mask, in `[0, 1]`.
    pub strength: f32,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: GradientKind::Vertical,
            direction: GradientDirection::TopToBottom,
            strength: 0.1,
        }
    }
}

impl ConfigValidator for GradientConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_f32_range(self.strength, 0.0, 1.0, "gradient strength")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Settings for percentile contrast stretching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    /// Whether the stretch is applied.
    pub enabled: bool,
    /// Lower and upper percentiles mapped to black and white.
    pub clip_limit: (f32, f32),
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            clip_limit: (1.0, 99.0),
        }
    }
}

impl ConfigValidator for ContrastConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_percentile_pair(self.clip_limit.0, self.clip_limit.1, "contrast clip limit")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Settings for global brightness, contrast and gamma correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Whether tone correction is applied.
    pub enabled: bool,
    /// Additive brightness offset, in `[-255, 255]`.
    pub brightness: f32,
    /// Contrast amount, in `[-127, 127]`. The correction formula has a
    /// pole at 131, safely outside this range.
    pub contrast: f32,
    /// Gamma exponent; values above 1 brighten midtones. Must be positive.
    pub gamma: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            brightness: 0.0,
            contrast: 0.0,
            gamma: 1.0,
        }
    }
}

impl ConfigValidator for ToneConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_f32_range(self.brightness, -255.0, 255.0, "brightness offset")?;
        self.validate_f32_range(self.contrast, -127.0, 127.0, "contrast amount")?;
        self.validate_positive_f32(self.gamma, "gamma exponent")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Settings for the photometric stage group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotometricConfig {
    /// Convert to single-channel grayscale during contrast stretching.
    pub force_grayscale: bool,
    /// Brightness gradient settings.
    pub gradient: GradientConfig,
    /// Percentile contrast stretch settings.
    pub contrast: ContrastConfig,
    /// Brightness/contrast/gamma settings.
    pub tone: ToneConfig,
}

impl Default for PhotometricConfig {
    fn default() -> Self {
        Self {
            force_grayscale: true,
            gradient: GradientConfig::default(),
            contrast: ContrastConfig::default(),
            tone: ToneConfig::default(),
        }
    }
}

impl ConfigValidator for PhotometricConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.gradient.validate()?;
        self.contrast.validate()?;
        self.tone.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Top-level configuration for the normalization pipeline.
///
/// Every field has a default, so an empty config file yields a working
/// pipeline. Sections can be overridden independently.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rotation stage settings.
    pub rotation: RotationConfig,
    /// Edge cropping stage settings.
    pub crop: CropConfig,
    /// Photometric stage settings.
    pub photometric: PhotometricConfig,
}

impl ConfigValidator for PipelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.rotation.validate()?;
        self.crop.validate()?;
        self.photometric.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
