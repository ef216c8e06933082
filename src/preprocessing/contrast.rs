//! # Contrast Enhancement Module
//!
//! Global intensity remapping filters: histogram equalization and linear
//! contrast stretching. Both work on the grayscale channel and return it
//! replicated into RGB so every output in the tree shares a color layout.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::stats::cumulative_histogram;
use tracing;

use super::types::{
    ensure_not_empty, to_gray_bt601, FilterKind, FilteredImage, PreprocessingError,
};

/// Applies global histogram equalization to an image.
///
/// The image is converted to grayscale and each intensity `v` is remapped to
/// `(cdf[v] - cdf_min) * 255 / (total - cdf_min)`, where `cdf_min` is the
/// cumulative count of the darkest occupied intensity. The darkest pixels end
/// up at 0 and the brightest at 255. An image with a single intensity is left
/// as it is.
///
/// # Arguments
///
/// * `image` - The input image
///
/// # Returns
///
/// Returns an `Rgb8` result with the equalized channel in all three channels,
/// or a `PreprocessingError` for an empty image
///
/// # Examples
///
/// ```
/// use dataset_filters::preprocessing::apply_histogram_equalization;
/// use image::{DynamicImage, GrayImage, Luma};
///
/// let img = GrayImage::from_fn(16, 1, |x, _| Luma([100 + x as u8]));
/// let result = apply_histogram_equalization(&DynamicImage::ImageLuma8(img)).unwrap();
/// let rgb = result.image.as_rgb8().unwrap();
/// assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
/// assert_eq!(rgb.get_pixel(15, 0).0, [255, 255, 255]);
/// ```
pub fn apply_histogram_equalization(
    image: &DynamicImage,
) -> Result<FilteredImage, PreprocessingError> {
    ensure_not_empty(image)?;
    let start_time = std::time::Instant::now();

    let gray = to_gray_bt601(image);
    let equalized = equalize_histogram(&gray);

    let processing_time = start_time.elapsed();

    tracing::debug!(
        target: "dataset_preprocessing",
        "Histogram equalization completed in {}ms: dimensions={}x{}",
        processing_time.as_millis(),
        equalized.width(),
        equalized.height()
    );

    Ok(FilteredImage {
        image: DynamicImage::ImageRgb8(DynamicImage::ImageLuma8(equalized).to_rgb8()),
        kind: FilterKind::HistogramEqualization,
        processing_time_ms: processing_time.as_millis() as u32,
    })
}

/// Applies linear contrast stretching to an image.
///
/// The grayscale channel is remapped with `(v - min) * 255 / (max - min)` so the
/// observed intensity range covers 0-255. A flat image (`max == min`) has no
/// range to stretch and produces an all-zero image.
///
/// # Arguments
///
/// * `image` - The input image
///
/// # Returns
///
/// Returns an `Rgb8` result with the stretched channel in all three channels,
/// or a `PreprocessingError` for an empty image
pub fn apply_contrast_stretching(
    image: &DynamicImage,
) -> Result<FilteredImage, PreprocessingError> {
    ensure_not_empty(image)?;
    let start_time = std::time::Instant::now();

    let gray = to_gray_bt601(image);
    let (min, max) = intensity_range(&gray);
    let stretched = stretch_contrast(&gray, min, max);

    let processing_time = start_time.elapsed();

    tracing::debug!(
        target: "dataset_preprocessing",
        "Contrast stretching completed in {}ms: input_range={}..={}, dimensions={}x{}",
        processing_time.as_millis(),
        min,
        max,
        stretched.width(),
        stretched.height()
    );

    Ok(FilteredImage {
        image: DynamicImage::ImageRgb8(DynamicImage::ImageLuma8(stretched).to_rgb8()),
        kind: FilterKind::ContrastStretching,
        processing_time_ms: processing_time.as_millis() as u32,
    })
}

/// Equalizes the histogram of a grayscale image.
fn equalize_histogram(gray: &GrayImage) -> GrayImage {
    let cdf = cumulative_histogram(gray).channels[0];
    let total = cdf[255];
    let cdf_min = cdf.iter().copied().find(|&count| count > 0).unwrap_or(0);

    if total == cdf_min {
        return gray.clone();
    }

    let denominator = (total - cdf_min) as f64;
    let mut lookup = [0u8; 256];
    for (level, entry) in lookup.iter_mut().enumerate() {
        let rank = cdf[level].saturating_sub(cdf_min) as f64;
        *entry = (rank * 255.0 / denominator).round().clamp(0.0, 255.0) as u8;
    }

    apply_lookup(gray, &lookup)
}

/// Smallest and largest intensity in a grayscale image.
fn intensity_range(gray: &GrayImage) -> (u8, u8) {
    gray.pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), pixel| {
            (lo.min(pixel[0]), hi.max(pixel[0]))
        })
}

/// Linearly maps `min..=max` onto `0..=255`.
fn stretch_contrast(gray: &GrayImage, min: u8, max: u8) -> GrayImage {
    if max <= min {
        return GrayImage::new(gray.width(), gray.height());
    }

    let scale = 255.0 / (max - min) as f64;
    let mut lookup = [0u8; 256];
    for (level, entry) in lookup.iter_mut().enumerate().skip(min as usize) {
        let offset = (level as f64 - min as f64) * scale;
        *entry = offset.round().clamp(0.0, 255.0) as u8;
    }

    apply_lookup(gray, &lookup)
}

/// Replaces every intensity through a 256-entry lookup table.
fn apply_lookup(gray: &GrayImage, lookup: &[u8; 256]) -> GrayImage {
    let mut output = GrayImage::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        output.put_pixel(x, y, Luma([lookup[pixel[0] as usize]]));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gray_image_from(values: &[u8]) -> GrayImage {
        GrayImage::from_fn(values.len() as u32, 1, |x, _| Luma([values[x as usize]]))
    }

    fn create_gray_rgb_image(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let v = (60 + (x * 3 + y * 5) % 90) as u8;
            Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn channel_extremes(image: &DynamicImage) -> (u8, u8) {
        intensity_range(&image.to_luma8())
    }

    #[test]
    fn test_equalization_known_mapping() {
        let gray = gray_image_from(&[10, 10, 50, 50, 50, 200, 220, 220]);
        let equalized = equalize_histogram(&gray);

        let values: Vec<u8> = equalized.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![0, 0, 128, 128, 128, 170, 255, 255]);
    }

    #[test]
    fn test_equalization_is_stable_when_reapplied() {
        let gray = gray_image_from(&[10, 10, 50, 50, 50, 200, 220, 220]);
        let once = equalize_histogram(&gray);
        let twice = equalize_histogram(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_equalization_reapplied_on_gradient_stays_close() {
        let gray = GrayImage::from_fn(64, 64, |x, y| Luma([((x * x + y) % 200 + 20) as u8]));
        let once = equalize_histogram(&gray);
        let twice = equalize_histogram(&once);

        for (a, b) in once.pixels().zip(twice.pixels()) {
            assert!((a[0] as i16 - b[0] as i16).abs() <= 2);
        }
    }

    #[test]
    fn test_equalization_single_intensity_unchanged() {
        let gray = gray_image_from(&[42; 6]);
        assert_eq!(equalize_histogram(&gray), gray);
    }

    #[test]
    fn test_histogram_equalization_output_is_rgb_full_range() {
        let img = create_gray_rgb_image(30, 20);
        let result = apply_histogram_equalization(&img).unwrap();

        assert_eq!(result.kind, FilterKind::HistogramEqualization);
        let rgb = result.image.as_rgb8().expect("equalized output should be Rgb8");
        assert_eq!(rgb.dimensions(), (30, 20));
        assert!(rgb.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
        assert_eq!(channel_extremes(&result.image), (0, 255));
    }

    #[test]
    fn test_stretch_known_values() {
        let gray = gray_image_from(&[50, 60, 100]);
        let stretched = stretch_contrast(&gray, 50, 100);

        let values: Vec<u8> = stretched.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![0, 51, 255]);
    }

    #[test]
    fn test_contrast_stretching_output_is_rgb_full_range() {
        let img = create_gray_rgb_image(25, 25);
        let result = apply_contrast_stretching(&img).unwrap();

        assert_eq!(result.kind, FilterKind::ContrastStretching);
        let rgb = result.image.as_rgb8().expect("stretched output should be Rgb8");
        assert_eq!(rgb.dimensions(), (25, 25));
        assert_eq!(channel_extremes(&result.image), (0, 255));
    }

    #[test]
    fn test_contrast_stretching_flat_image_is_all_zero() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([90, 90, 90])));
        let result = apply_contrast_stretching(&img).unwrap();

        assert!(result.image.as_rgb8().unwrap().pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_contrast_stretching_uses_bt601_gray() {
        let img = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 0, 0]),
            _ => Rgb([255, 255, 255]),
        });

        let result = apply_contrast_stretching(&DynamicImage::ImageRgb8(img)).unwrap();

        // Black and white pin the range, so red keeps its gray value
        assert_eq!(result.image.as_rgb8().unwrap().get_pixel(0, 0).0, [76; 3]);
    }

    #[test]
    fn test_intensity_range() {
        let gray = gray_image_from(&[7, 250, 31, 7]);
        assert_eq!(intensity_range(&gray), (7, 250));
    }

    #[test]
    fn test_filters_reject_empty_image() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(3, 0));

        assert!(apply_histogram_equalization(&img).is_err());
        assert!(apply_contrast_stretching(&img).is_err());
    }
}
