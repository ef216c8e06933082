//! # Application Configuration
//!
//! This module loads the run configuration: the dataset input root, the output
//! root, and logging settings. Values come from environment variables (with
//! `.env` support in the binary) and may be overridden by positional
//! command-line arguments `<input_root> [output_root]`.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Environment variable holding the dataset root
pub const INPUT_ROOT_ENV: &str = "DATASET_INPUT_ROOT";
/// Environment variable holding the output tree root
pub const OUTPUT_ROOT_ENV: &str = "DATASET_OUTPUT_ROOT";
/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
/// Environment variable holding the log format (`pretty` or `json`)
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Name of the output directory used when no output root is given
const DEFAULT_OUTPUT_DIR: &str = "output";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Dataset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Root directory holding one subdirectory per class
    pub input_root: PathBuf,
    /// Root directory of the per-filter output tree
    pub output_root: PathBuf,
}

impl DatasetConfig {
    /// Creates a dataset configuration from explicit roots.
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Validate dataset configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.input_root.as_os_str().is_empty() {
            return Err(AppError::Config(format!(
                "Input root cannot be empty. Set {} or pass it as the first argument",
                INPUT_ROOT_ENV
            )));
        }

        if self.output_root.as_os_str().is_empty() {
            return Err(AppError::Config("Output root cannot be empty".to_string()));
        }

        if self.input_root == self.output_root {
            return Err(AppError::Config(format!(
                "Output root must differ from input root: {}",
                self.input_root.display()
            )));
        }

        Ok(())
    }
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "Invalid {} '{}'. Expected 'pretty' or 'json'",
                LOG_FORMAT_ENV, other
            ))),
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level for this crate's events
    pub level: String,
    /// Subscriber output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> AppResult<()> {
        if !VALID_LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(AppError::Config(format!(
                "Invalid log level '{}'. Expected one of: {}",
                self.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from command-line arguments and the process environment.
    pub fn load() -> AppResult<Self> {
        let args: Vec<String> = env::args().skip(1).collect();
        Self::from_sources(&args, |key| env::var(key).ok())
    }

    /// Build configuration from positional arguments and an environment lookup.
    ///
    /// Positional arguments take precedence over the environment. When no output
    /// root is given it defaults to `<input_root>/output`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dataset_filters::config::AppConfig;
    /// use std::path::PathBuf;
    ///
    /// let args = vec!["/data/xray".to_string()];
    /// let config = AppConfig::from_sources(&args, |_| None).unwrap();
    /// assert_eq!(config.dataset.output_root, PathBuf::from("/data/xray/output"));
    /// ```
    pub fn from_sources<F>(args: &[String], env_lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if args.len() > 2 {
            return Err(AppError::Config(format!(
                "Expected at most 2 arguments (<input_root> [output_root]), got {}",
                args.len()
            )));
        }

        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let input_root = non_empty(args.first().cloned())
            .or_else(|| non_empty(env_lookup(INPUT_ROOT_ENV)))
            .map(PathBuf::from)
            .unwrap_or_default();

        let output_root = non_empty(args.get(1).cloned())
            .or_else(|| non_empty(env_lookup(OUTPUT_ROOT_ENV)))
            .map(PathBuf::from)
            .unwrap_or_else(|| input_root.join(DEFAULT_OUTPUT_DIR));

        let mut logging = LoggingConfig::default();
        if let Some(level) = non_empty(env_lookup(LOG_LEVEL_ENV)) {
            logging.level = level.trim().to_ascii_lowercase();
        }
        if let Some(format) = non_empty(env_lookup(LOG_FORMAT_ENV)) {
            logging.format = format.parse()?;
        }

        Ok(Self {
            dataset: DatasetConfig {
                input_root,
                output_root,
            },
            logging,
        })
    }

    /// Validate the complete configuration
    pub fn validate(&self) -> AppResult<()> {
        self.dataset.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_roots_from_environment() {
        let config = AppConfig::from_sources(
            &[],
            lookup(&[(INPUT_ROOT_ENV, "/data/in"), (OUTPUT_ROOT_ENV, "/data/out")]),
        )
        .unwrap();

        assert_eq!(config.dataset, DatasetConfig::new("/data/in", "/data/out"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_arguments_override_environment() {
        let config = AppConfig::from_sources(
            &args(&["/cli/in", "/cli/out"]),
            lookup(&[(INPUT_ROOT_ENV, "/env/in"), (OUTPUT_ROOT_ENV, "/env/out")]),
        )
        .unwrap();

        assert_eq!(config.dataset, DatasetConfig::new("/cli/in", "/cli/out"));
    }

    #[test]
    fn test_output_root_defaults_under_input_root() {
        let config =
            AppConfig::from_sources(&[], lookup(&[(INPUT_ROOT_ENV, "/data/chest")])).unwrap();

        assert_eq!(
            config.dataset.output_root,
            PathBuf::from("/data/chest").join("output")
        );
    }

    #[test]
    fn test_missing_input_root_fails_validation() {
        let config = AppConfig::from_sources(&[], lookup(&[])).unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_identical_roots_rejected() {
        let config = DatasetConfig::new("/same", "/same");
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_too_many_arguments_rejected() {
        let result = AppConfig::from_sources(&args(&["a", "b", "c"]), lookup(&[]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_logging_defaults() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Pretty);
        assert!(logging.validate().is_ok());
    }

    #[test]
    fn test_logging_from_environment() {
        let config = AppConfig::from_sources(
            &args(&["/in"]),
            lookup(&[(LOG_LEVEL_ENV, "DEBUG"), (LOG_FORMAT_ENV, "json")]),
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        let result = AppConfig::from_sources(&args(&["/in"]), lookup(&[(LOG_FORMAT_ENV, "xml")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config =
            AppConfig::from_sources(&args(&["/in"]), lookup(&[(LOG_LEVEL_ENV, "verbose")]))
                .unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_config_serializes_to_json() {
        let config = AppConfig {
            dataset: DatasetConfig::new("/in", "/out"),
            logging: LoggingConfig::default(),
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["dataset"]["input_root"], "/in");
        assert_eq!(json["logging"]["format"], "pretty");
    }
}
