//! Utility functions for the normalization pipeline.
//!
//! This module provides image file handling helpers used throughout the
//! pipeline, plus logging setup for binaries and examples.

pub mod image;

pub use image::{
    SUPPORTED_EXTENSIONS, is_supported_image, list_image_files, load_image, save_image,
};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
