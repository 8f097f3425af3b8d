//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
///
/// Configuration is validated once, when a pipeline is constructed; none of
/// these conditions can surface mid-run.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration value is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that validation failed.
    #[error("validation failed: {message}")]
    ValidationFailed { message: String },
}

/// A trait for validating configuration parameters.
///
/// This trait provides methods for validating the value ranges used by the
/// normalization pipeline, such as effect strengths, percentile pairs, and
/// per-side margin fractions.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    ///
    /// # Returns
    ///
    /// The default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a float value is within a specified range.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `min` - The minimum allowed value (inclusive).
    /// * `max` - The maximum allowed value (inclusive).
    /// * `field_name` - The name of the field being validated.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_f32_range(
        &self,
        value: f32,
        min: f32,
        max: f32,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        if value < min || value > max || !value.is_finite() {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "{} must be between {} and {}, got {}",
                    field_name, min, max, value
                ),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a float value is positive.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `field_name` - The name of the field being validated.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_positive_f32(&self, value: f32, field_name: &str) -> Result<(), ConfigError> {
        if value <= 0.0 || !value.is_finite() {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that an integer value is positive.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `field_name` - The name of the field being validated.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_positive_u32(&self, value: u32, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a pair of percentiles used for contrast stretching.
    ///
    /// The pair must satisfy `0 <= lower < upper <= 100`.
    ///
    /// # Arguments
    ///
    /// * `lower` - The lower percentile.
    /// * `upper` - The upper percentile.
    /// * `field_name` - The name of the field being validated.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_percentile_pair(
        &self,
        lower: f32,
        upper: f32,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&lower) || !(0.0..=100.0).contains(&upper) || lower >= upper {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "{} must satisfy 0 <= lower < upper <= 100, got ({}, {})",
                    field_name, lower, upper
                ),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a pair of opposing margin fractions.
    ///
    /// Each fraction must be non-negative and the pair must leave room for a
    /// non-empty seed rectangle (their sum must stay below 1.0).
    ///
    /// # Arguments
    ///
    /// * `near` - The margin fraction on the near side (left or top).
    /// * `far` - The margin fraction on the far side (right or bottom).
    /// * `field_name` - The name of the field being validated.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_margin_pair(
        &self,
        near: f32,
        far: f32,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        if near < 0.0 || far < 0.0 || !near.is_finite() || !far.is_finite() || near + far >= 1.0 {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "{} fractions must be non-negative and sum to less than 1.0, got ({}, {})",
                    field_name, near, far
                ),
            })
        } else {
            Ok(())
        }
    }
}

/// Extension trait for ConfigValidator that provides error wrapping utilities.
///
/// This trait extends ConfigValidator to provide a convenient method for
/// wrapping validation errors into NormalizeError, reducing duplication at
/// the construction sites.
pub trait ConfigValidatorExt: ConfigValidator {
    /// Validates the configuration and wraps any error into
    /// NormalizeError::ConfigError, returning the configuration by value on
    /// success so construction sites can validate-and-move in one step.
    ///
    /// # Returns
    ///
    /// A Result containing self or a NormalizeError if validation fails.
    fn validate_and_wrap(self) -> Result<Self, crate::core::errors::NormalizeError>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

// Blanket implementation for all ConfigValidator types
impl<T: ConfigValidator> ConfigValidatorExt for T {}

impl From<ConfigError> for String {
    /// Converts a ConfigError to a String representation.
    fn from(error: ConfigError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestValidator;
    impl ConfigValidator for TestValidator {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            TestValidator
        }
    }

    #[test]
    fn test_validate_f32_range() {
        let validator = TestValidator;
        assert!(validator.validate_f32_range(0.5, 0.0, 1.0, "strength").is_ok());
        assert!(validator.validate_f32_range(0.0, 0.0, 1.0, "strength").is_ok());
        assert!(validator.validate_f32_range(1.0, 0.0, 1.0, "strength").is_ok());
        assert!(validator.validate_f32_range(-0.1, 0.0, 1.0, "strength").is_err());
        assert!(validator.validate_f32_range(1.1, 0.0, 1.0, "strength").is_err());
        assert!(validator.validate_f32_range(f32::NAN, 0.0, 1.0, "strength").is_err());
    }

    #[test]
    fn test_validate_positive_f32() {
        let validator = TestValidator;
        assert!(validator.validate_positive_f32(4.8, "gamma").is_ok());
        assert!(validator.validate_positive_f32(0.0, "gamma").is_err());
        assert!(validator.validate_positive_f32(-1.0, "gamma").is_err());
    }

    #[test]
    fn test_validate_percentile_pair() {
        let validator = TestValidator;
        assert!(validator.validate_percentile_pair(1.0, 99.0, "clip_limit").is_ok());
        assert!(validator.validate_percentile_pair(0.0, 100.0, "clip_limit").is_ok());
        assert!(validator.validate_percentile_pair(99.0, 1.0, "clip_limit").is_err());
        assert!(validator.validate_percentile_pair(50.0, 50.0, "clip_limit").is_err());
        assert!(validator.validate_percentile_pair(-1.0, 99.0, "clip_limit").is_err());
        assert!(validator.validate_percentile_pair(1.0, 101.0, "clip_limit").is_err());
    }

    #[test]
    fn test_validate_margin_pair() {
        let validator = TestValidator;
        assert!(validator.validate_margin_pair(0.15, 0.15, "margins").is_ok());
        assert!(validator.validate_margin_pair(0.0, 0.0, "margins").is_ok());
        assert!(validator.validate_margin_pair(0.5, 0.5, "margins").is_err());
        assert!(validator.validate_margin_pair(-0.1, 0.15, "margins").is_err());
    }

    #[test]
    fn test_config_error_to_string() {
        let error = ConfigError::InvalidConfig {
            message: "contrast must be between -127 and 127, got 131".to_string(),
        };
        let error_string: String = error.into();
        assert!(error_string.contains("131"));
    }
}
