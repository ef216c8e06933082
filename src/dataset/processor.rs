//! # Dataset Processor
//!
//! Walks the dataset class by class and applies the filter policy to every
//! image. Each class is a fold over its sorted files, carrying a
//! [`ClassSummary`] whose `decoded` count drives the full-filter limit.
//!
//! Undecodable files are logged and skipped. Any other failure aborts the run
//! and leaves already-written outputs in place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::layout::{
    decode_image, list_class_dirs, list_image_files, save_image, ClassDir, OutputLayout,
};
use super::policy::FilterPolicy;
use crate::config::DatasetConfig;
use crate::errors::error_logging::{log_decode_error, log_processing_error};
use crate::errors::{AppError, AppResult};
use crate::preprocessing::{FilterKind, FilteredImage};

/// Outcome of processing one class folder
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassSummary {
    /// Class label (directory name)
    pub class_name: String,
    /// Images that decoded successfully
    pub decoded: usize,
    /// Images that received every filter
    pub fully_filtered: usize,
    /// Images past the full-filter limit that were only equalized
    pub equalized_only: usize,
    /// Files that could not be decoded
    pub skipped: Vec<PathBuf>,
    /// Output files written per filter
    pub outputs_written: BTreeMap<FilterKind, usize>,
}

impl ClassSummary {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Default::default()
        }
    }

    /// Number of outputs written for one filter.
    pub fn outputs_for(&self, kind: FilterKind) -> usize {
        self.outputs_written.get(&kind).copied().unwrap_or(0)
    }

    /// Number of outputs written across all filters.
    pub fn total_outputs(&self) -> usize {
        self.outputs_written.values().sum()
    }
}

/// Outcome of a whole dataset run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Per-class results, in processing order
    pub classes: Vec<ClassSummary>,
    /// Wall-clock time of the run in milliseconds
    pub processing_time_ms: u64,
}

impl RunSummary {
    pub fn total_decoded(&self) -> usize {
        self.classes.iter().map(|c| c.decoded).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.classes.iter().map(|c| c.skipped.len()).sum()
    }

    pub fn total_outputs(&self) -> usize {
        self.classes.iter().map(|c| c.total_outputs()).sum()
    }

    /// Looks up a class by label.
    pub fn class(&self, name: &str) -> Option<&ClassSummary> {
        self.classes.iter().find(|c| c.class_name == name)
    }
}

/// Applies the filter policy to every image of a dataset
#[derive(Debug, Clone)]
pub struct DatasetProcessor {
    config: DatasetConfig,
    layout: OutputLayout,
    policy: FilterPolicy,
}

impl DatasetProcessor {
    /// Creates a processor with the default filter policy.
    pub fn new(config: DatasetConfig) -> Self {
        let layout = OutputLayout::new(config.output_root.clone());
        Self {
            config,
            layout,
            policy: FilterPolicy::default(),
        }
    }

    /// Replaces the filter policy.
    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Processes every class under the input root.
    pub fn run(&self) -> AppResult<RunSummary> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            input_root = %self.config.input_root.display(),
            output_root = %self.config.output_root.display(),
            full_filter_limit = self.policy.full_filter_limit(),
            "Starting dataset filtering"
        );

        let classes = list_class_dirs(&self.config.input_root, &self.config.output_root)?;
        let mut summary = RunSummary::default();
        for class in &classes {
            summary.classes.push(self.process_class(class)?);
        }
        summary.processing_time_ms = start_time.elapsed().as_millis() as u64;

        tracing::info!(
            classes = summary.classes.len(),
            decoded = summary.total_decoded(),
            skipped = summary.total_skipped(),
            outputs = summary.total_outputs(),
            processing_time_ms = summary.processing_time_ms,
            "Dataset filtering completed"
        );

        Ok(summary)
    }

    /// Processes one class folder.
    ///
    /// Output directories are created before the `image` subdirectory is read,
    /// so a class with no `image` folder still leaves its (empty) output
    /// directories behind before the run fails.
    pub fn process_class(&self, class: &ClassDir) -> AppResult<ClassSummary> {
        self.layout.ensure_class_dirs(&class.name)?;

        let files = list_image_files(&class.image_dir())?;
        tracing::debug!(class = %class.label(), files = files.len(), "Processing class");

        let summary = files
            .iter()
            .try_fold(ClassSummary::new(class.label()), |summary, path| {
                self.process_file(summary, class, path)
            })?;

        tracing::info!(
            class = %summary.class_name,
            decoded = summary.decoded,
            fully_filtered = summary.fully_filtered,
            equalized_only = summary.equalized_only,
            skipped = summary.skipped.len(),
            "Class processed"
        );

        Ok(summary)
    }

    fn process_file(
        &self,
        mut summary: ClassSummary,
        class: &ClassDir,
        path: &Path,
    ) -> AppResult<ClassSummary> {
        let image = match decode_image(path) {
            Ok(image) => image,
            Err(e) => {
                log_decode_error(&e, path);
                summary.skipped.push(path.to_path_buf());
                return Ok(summary);
            }
        };

        let file_name = path.file_name().ok_or_else(|| {
            AppError::FileSystem(format!("Image path has no file name: {}", path.display()))
        })?;

        let kinds = self.policy.filters_for(summary.decoded);
        let results = kinds
            .iter()
            .map(|kind| {
                kind.apply(&image).map_err(|e| {
                    log_processing_error(&e, kind.dir_name(), path);
                    AppError::from(e)
                })
            })
            .collect::<AppResult<Vec<FilteredImage>>>()?;

        for result in &results {
            let output_path = self.layout.output_path(result.kind, &class.name, file_name);
            save_image(&result.image, &output_path)?;
            *summary.outputs_written.entry(result.kind).or_insert(0) += 1;
        }

        if self.policy.applies_full_set(summary.decoded) {
            summary.fully_filtered += 1;
        } else {
            summary.equalized_only += 1;
        }
        summary.decoded += 1;

        Ok(summary)
    }
}

/// Filters the dataset at `input_root` into `output_root` with the default policy.
///
/// # Examples
///
/// ```no_run
/// use dataset_filters::process_images;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = process_images("/data/chest_xray", "/data/chest_xray_filtered")?;
/// println!("decoded {} images", summary.total_decoded());
/// # Ok(())
/// # }
/// ```
pub fn process_images(
    input_root: impl Into<PathBuf>,
    output_root: impl Into<PathBuf>,
) -> AppResult<RunSummary> {
    DatasetProcessor::new(DatasetConfig::new(input_root, output_root)).run()
}
