//! # Dataset Filters
//!
//! Batch-applies classical image filters (high-pass, low-pass, histogram
//! equalization, contrast stretching) to a class-labeled image dataset and
//! writes the results into mirrored per-filter output directories.

pub mod config;
pub mod dataset;
pub mod errors;
pub mod observability;
pub mod preprocessing;

// Re-export types for easier access
pub use config::{AppConfig, DatasetConfig};
pub use dataset::{process_images, DatasetProcessor, FilterPolicy, RunSummary};
pub use errors::{AppError, AppResult};
pub use preprocessing::FilterKind;
