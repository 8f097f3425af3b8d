//! Domain-level structures shared across the pipeline.
//!
//! This module groups the geometric and orientation types that represent
//! document-normalization concepts used throughout the crate.

pub mod orientation;
pub mod region;

pub use orientation::*;
pub use region::*;
