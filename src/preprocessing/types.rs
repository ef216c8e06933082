//! # Shared Types for Image Preprocessing
//!
//! This module contains the shared types used across the filter sub-modules.

use image::{DynamicImage, GrayImage, Luma};
use serde::Serialize;

/// Errors that can occur during image preprocessing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PreprocessingError {
    /// Image has a zero width or height
    EmptyImage { width: u32, height: u32 },
}

impl std::fmt::Display for PreprocessingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreprocessingError::EmptyImage { width, height } => {
                write!(
                    f,
                    "Cannot filter an empty image: dimensions {}x{}",
                    width, height
                )
            }
        }
    }
}

impl std::error::Error for PreprocessingError {}

/// The four filters applied to every dataset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Laplacian edge emphasis, normalized to the full 0-255 range
    HighPass,
    /// 5x5 Gaussian smoothing of the color image
    LowPass,
    /// Global histogram equalization of the grayscale channel
    HistogramEqualization,
    /// Linear min-max remapping of the grayscale channel
    ContrastStretching,
}

impl FilterKind {
    /// Every filter kind, in output-tree order.
    pub const ALL: [FilterKind; 4] = [
        FilterKind::HighPass,
        FilterKind::LowPass,
        FilterKind::HistogramEqualization,
        FilterKind::ContrastStretching,
    ];

    /// Name of the output subdirectory holding this filter's results.
    pub fn dir_name(&self) -> &'static str {
        match self {
            FilterKind::HighPass => "high_pass",
            FilterKind::LowPass => "low_pass",
            FilterKind::HistogramEqualization => "histogram_equalization",
            FilterKind::ContrastStretching => "contrast_stretching",
        }
    }

    /// Applies this filter to `image`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dataset_filters::FilterKind;
    /// use image::{DynamicImage, RgbImage};
    ///
    /// let img = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
    /// let result = FilterKind::LowPass.apply(&img).unwrap();
    /// assert_eq!(result.kind, FilterKind::LowPass);
    /// assert_eq!(result.image.width(), 8);
    /// ```
    pub fn apply(&self, image: &DynamicImage) -> Result<FilteredImage, PreprocessingError> {
        match self {
            FilterKind::HighPass => super::filtering::apply_high_pass_filter(image),
            FilterKind::LowPass => super::filtering::apply_low_pass_filter(image),
            FilterKind::HistogramEqualization => {
                super::contrast::apply_histogram_equalization(image)
            }
            FilterKind::ContrastStretching => super::contrast::apply_contrast_stretching(image),
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Result of a single filter application.
#[derive(Debug, Clone)]
pub struct FilteredImage {
    /// The filtered image
    pub image: DynamicImage,
    /// Filter that produced the image
    pub kind: FilterKind,
    /// Processing time in milliseconds
    pub processing_time_ms: u32,
}

/// Rejects images with no pixels.
pub(crate) fn ensure_not_empty(image: &DynamicImage) -> Result<(), PreprocessingError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(PreprocessingError::EmptyImage { width, height });
    }
    Ok(())
}

/// Converts an image to grayscale with the BT.601 luma weights
/// (0.299, 0.587, 0.114) in 14-bit fixed point.
///
/// Gray inputs pass through unchanged and alpha is ignored.
pub(crate) fn to_gray_bt601(image: &DynamicImage) -> GrayImage {
    const R_WEIGHT: u32 = 4899;
    const G_WEIGHT: u32 = 9617;
    const B_WEIGHT: u32 = 1868;
    const SHIFT: u32 = 14;

    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT;
        Luma([((weighted + (1 << (SHIFT - 1))) >> SHIFT) as u8])
    })
}
