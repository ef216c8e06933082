//! # Application Error Types
//!
//! This module defines the error types used throughout the dataset filter run.
//! Only undecodable input images are recovered locally; every `AppError` is
//! fatal for the run.

use std::fmt;

use crate::preprocessing::PreprocessingError;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// File system errors (missing directories, unreadable or unwritable paths)
    FileSystem(String),
    /// Output image encoding errors
    ImageEncode(String),
    /// Filter processing errors
    Processing(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::FileSystem(msg) => write!(f, "[FILESYSTEM] {}", msg),
            AppError::ImageEncode(msg) => write!(f, "[IMAGE_ENCODE] {}", msg),
            AppError::Processing(msg) => write!(f, "[PROCESSING] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<PreprocessingError> for AppError {
    fn from(err: PreprocessingError) -> Self {
        AppError::Processing(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use std::path::Path;
    use tracing::{error, warn};

    /// Log file system errors with path and operation context
    pub fn log_filesystem_error(error: &impl std::fmt::Display, operation: &str, path: &Path) {
        error!(
            error = %error,
            operation = %operation,
            path = %path.display(),
            "File system operation failed"
        );
    }

    /// Log an input image that could not be decoded and is being skipped
    pub fn log_decode_error(error: &impl std::fmt::Display, path: &Path) {
        warn!(
            error = %error,
            operation = "decode_image",
            path = %path.display(),
            "Unable to read image, skipping"
        );
    }

    /// Log filter failures with the filter and image involved
    pub fn log_processing_error(error: &impl std::fmt::Display, filter: &str, path: &Path) {
        error!(
            error = %error,
            operation = "apply_filter",
            filter = %filter,
            path = %path.display(),
            "Filter processing failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_tags() {
        assert_eq!(
            AppError::Config("missing input".to_string()).to_string(),
            "[CONFIG] missing input"
        );
        assert_eq!(
            AppError::FileSystem("no image dir".to_string()).to_string(),
            "[FILESYSTEM] no image dir"
        );
        assert_eq!(
            AppError::ImageEncode("bad ext".to_string()).to_string(),
            "[IMAGE_ENCODE] bad ext"
        );
    }

    #[test]
    fn test_from_preprocessing_error() {
        let err: AppError = PreprocessingError::EmptyImage {
            width: 0,
            height: 3,
        }
        .into();

        assert!(matches!(err, AppError::Processing(ref msg) if msg.contains("0x3")));
    }
}
