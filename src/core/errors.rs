//! Error types for the normalization pipeline.
//!
//! This module defines the error types that can occur while normalizing a
//! document image, including image I/O errors, processing errors, and
//! configuration errors. It also provides utility functions for creating
//! these errors with appropriate context.

use std::path::PathBuf;
use thiserror::Error;

/// Enum representing different stages of processing in the pipeline.
///
/// This enum is used to identify which stage of the pipeline an error
/// occurred in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred during coarse or fine rotation.
    Rotation,
    /// Error occurred during edge-based cropping.
    Cropping,
    /// Error occurred during photometric correction.
    Photometric,
    /// Error occurred during batch processing.
    BatchProcessing,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Rotation => write!(f, "rotation"),
            ProcessingStage::Cropping => write!(f, "cropping"),
            ProcessingStage::Photometric => write!(f, "photometric correction"),
            ProcessingStage::BatchProcessing => write!(f, "batch processing"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Enum representing the errors that can occur in the normalization pipeline.
///
/// Recoverable conditions (an unavailable orientation oracle, an image with
/// no detectable Hough lines, a crop scan that finds no boundary) are not
/// errors; they are absorbed by the stages with documented fallbacks. This
/// enum covers the genuinely fatal cases: unreadable or unwritable images,
/// malformed configuration, and invalid input buffers.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// Error occurred while reading an image from disk.
    #[error("failed to read image {path}")]
    ImageRead {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// Error occurred while writing an image to disk.
    #[error("failed to write image {path}")]
    ImageWrite {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying encoder error.
        #[source]
        source: image::ImageError,
    },

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Implementation of NormalizeError with utility functions for creating errors.
impl NormalizeError {
    /// Creates a NormalizeError for a failed image read.
    ///
    /// # Arguments
    ///
    /// * `path` - The path that could not be read.
    /// * `source` - The underlying decoder error.
    ///
    /// # Returns
    ///
    /// A NormalizeError instance.
    pub fn image_read(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::ImageRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a NormalizeError for a failed image write.
    ///
    /// # Arguments
    ///
    /// * `path` - The path that could not be written.
    /// * `source` - The underlying encoder error.
    ///
    /// # Returns
    ///
    /// A NormalizeError instance.
    pub fn image_write(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::ImageWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a NormalizeError for a processing failure.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    ///
    /// # Returns
    ///
    /// A NormalizeError instance.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a NormalizeError for invalid input.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the invalid input.
    ///
    /// # Returns
    ///
    /// A NormalizeError instance.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a NormalizeError for configuration errors.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the configuration error.
    ///
    /// # Returns
    ///
    /// A NormalizeError instance.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// Implementation of From<crate::core::config::ConfigError> for NormalizeError.
///
/// This allows configuration validation errors to be automatically converted
/// to NormalizeError.
impl From<crate::core::config::ConfigError> for NormalizeError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

/// Convenient result alias for normalization operations.
pub type NormalizeResult<T> = Result<T, NormalizeError>;
