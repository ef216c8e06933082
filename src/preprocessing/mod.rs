//! # Image Preprocessing Module
//!
//! This module provides the classical filters applied to dataset images.
//! Every filter takes one decoded image and returns a new one.
//!
//! The module is organized into focused sub-modules:
//! - `filtering`: Laplacian high-pass and Gaussian low-pass filters
//! - `contrast`: Histogram equalization and contrast stretching
//! - `types`: Shared types and error definitions

pub mod contrast;
pub mod filtering;
pub mod types;

// Re-export commonly used types and functions for convenience
pub use types::{FilterKind, FilteredImage, PreprocessingError};

pub use contrast::{apply_contrast_stretching, apply_histogram_equalization};
pub use filtering::{apply_high_pass_filter, apply_low_pass_filter};
