//! The core module of the normalization pipeline.
//!
//! This module contains the fundamental components shared by every stage:
//! - Error handling
//! - Configuration management and validation
//!
//! It also re-exports the commonly used types for convenience.

pub mod config;
pub mod errors;

pub use config::{ConfigError, ConfigValidator, PipelineConfig};
pub use errors::{NormalizeError, NormalizeResult, ProcessingStage};
