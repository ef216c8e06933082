//! # Image Filtering Module
//!
//! Spatial-domain filters: a Laplacian high-pass filter for edge emphasis and a
//! 5x5 Gaussian low-pass filter for smoothing. Both reflect the image at its
//! borders without repeating the edge pixel (`dcb|abcd|cba`).

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use tracing;

use super::types::{
    ensure_not_empty, to_gray_bt601, FilterKind, FilteredImage, PreprocessingError,
};

/// Side length of the Gaussian smoothing kernel.
const GAUSSIAN_KERNEL_SIZE: usize = 5;

/// Integer taps of the 5-tap Gaussian kernel for the size-derived sigma.
/// They sum to 16, so a horizontal and a vertical pass scale by 256.
const GAUSSIAN_TAPS: [u32; GAUSSIAN_KERNEL_SIZE] = [1, 4, 6, 4, 1];

/// Applies a Laplacian high-pass filter and normalizes the response to 0-255.
///
/// The image is converted to grayscale and convolved with the 4-neighbour
/// Laplacian kernel `[0,1,0; 1,-4,1; 0,1,0]` in `f64`, so negative responses are
/// kept. The response is then min-max normalized so its minimum maps to 0 and
/// its maximum to 255. A constant response (flat or linear-gradient input) has
/// no range to stretch and yields an all-zero image.
///
/// # Arguments
///
/// * `image` - The input image, typically RGB
///
/// # Returns
///
/// Returns a single-channel (`Luma8`) result with the input's dimensions, or a
/// `PreprocessingError` for an empty image
///
/// # Examples
///
/// ```
/// use dataset_filters::preprocessing::apply_high_pass_filter;
/// use image::{DynamicImage, RgbImage};
///
/// let img = DynamicImage::ImageRgb8(RgbImage::new(16, 16));
/// let result = apply_high_pass_filter(&img).unwrap();
/// assert!(result.image.as_luma8().is_some());
/// ```
pub fn apply_high_pass_filter(image: &DynamicImage) -> Result<FilteredImage, PreprocessingError> {
    ensure_not_empty(image)?;
    let start_time = std::time::Instant::now();

    let gray = to_gray_bt601(image);
    let response = compute_laplacian(&gray);
    let normalized = normalize_min_max(&response, gray.width(), gray.height());

    let processing_time = start_time.elapsed();

    tracing::debug!(
        target: "dataset_preprocessing",
        "High-pass filter completed in {}ms: dimensions={}x{}",
        processing_time.as_millis(),
        normalized.width(),
        normalized.height()
    );

    Ok(FilteredImage {
        image: DynamicImage::ImageLuma8(normalized),
        kind: FilterKind::HighPass,
        processing_time_ms: processing_time.as_millis() as u32,
    })
}

/// Applies a 5x5 Gaussian blur to the full color image.
///
/// The standard deviation is derived from the kernel size
/// (`0.3 * ((ksize - 1) / 2 - 1) + 0.8`, i.e. 1.1 for a 5x5 kernel), which for a
/// 5-tap kernel gives the binomial weights `[1, 4, 6, 4, 1] / 16`. The kernel is
/// separable and is applied per channel with exact integer arithmetic.
///
/// # Arguments
///
/// * `image` - The input image
///
/// # Returns
///
/// Returns an `Rgb8` result with the input's dimensions, or a `PreprocessingError`
/// for an empty image
pub fn apply_low_pass_filter(image: &DynamicImage) -> Result<FilteredImage, PreprocessingError> {
    ensure_not_empty(image)?;
    let start_time = std::time::Instant::now();

    let rgb = image.to_rgb8();
    let blurred = gaussian_blur_5x5(&rgb);

    let processing_time = start_time.elapsed();

    tracing::debug!(
        target: "dataset_preprocessing",
        "Low-pass filter completed in {}ms: kernel={}x{}, sigma={:.2}, dimensions={}x{}",
        processing_time.as_millis(),
        GAUSSIAN_KERNEL_SIZE,
        GAUSSIAN_KERNEL_SIZE,
        derived_sigma(GAUSSIAN_KERNEL_SIZE),
        blurred.width(),
        blurred.height()
    );

    Ok(FilteredImage {
        image: DynamicImage::ImageRgb8(blurred),
        kind: FilterKind::LowPass,
        processing_time_ms: processing_time.as_millis() as u32,
    })
}

/// Standard deviation implied by a Gaussian kernel size when none is given.
fn derived_sigma(kernel_size: usize) -> f64 {
    0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Maps a possibly out-of-range coordinate back into `0..len` by mirroring
/// around the edge pixels without repeating them.
fn reflect_101(index: i64, len: u32) -> u32 {
    let len = len as i64;
    if len == 1 {
        return 0;
    }

    let mut i = index;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * (len - 1) - i;
        }
    }
    i as u32
}

/// Computes the 4-neighbour Laplacian of a grayscale image, row-major.
fn compute_laplacian(gray: &GrayImage) -> Vec<f64> {
    let (width, height) = gray.dimensions();
    let mut response = Vec::with_capacity(width as usize * height as usize);

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let sample = |dx: i64, dy: i64| -> f64 {
                let sx = reflect_101(x + dx, width);
                let sy = reflect_101(y + dy, height);
                gray.get_pixel(sx, sy)[0] as f64
            };

            let value = sample(0, -1) + sample(0, 1) + sample(-1, 0) + sample(1, 0)
                - 4.0 * sample(0, 0);
            response.push(value);
        }
    }

    response
}

/// Linearly rescales `values` so the minimum lands on 0 and the maximum on 255.
fn normalize_min_max(values: &[f64], width: u32, height: u32) -> GrayImage {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let range = max - min;
    if range <= 0.0 {
        return GrayImage::new(width, height);
    }

    let scale = 255.0 / range;
    GrayImage::from_fn(width, height, |x, y| {
        let value = values[y as usize * width as usize + x as usize];
        Luma([saturate_abs_u8((value - min) * scale)])
    })
}

/// Absolute value, rounded and clamped into `u8`.
fn saturate_abs_u8(value: f64) -> u8 {
    value.abs().round().clamp(0.0, 255.0) as u8
}

/// Separable 5x5 Gaussian blur over each RGB channel.
fn gaussian_blur_5x5(rgb: &RgbImage) -> RgbImage {
    let (width, height) = rgb.dimensions();
    let radius = (GAUSSIAN_KERNEL_SIZE / 2) as i64;
    let stride = width as usize;

    // Horizontal pass, kept unnormalized (scale 16)
    let mut horizontal = vec![[0u32; 3]; stride * height as usize];
    for y in 0..height {
        for x in 0..width as i64 {
            let mut acc = [0u32; 3];
            for (k, weight) in GAUSSIAN_TAPS.iter().enumerate() {
                let sx = reflect_101(x + k as i64 - radius, width);
                let pixel = rgb.get_pixel(sx, y);
                for c in 0..3 {
                    acc[c] += weight * pixel[c] as u32;
                }
            }
            horizontal[y as usize * stride + x as usize] = acc;
        }
    }

    // Vertical pass, then drop the combined scale of 256 with rounding
    let mut output = RgbImage::new(width, height);
    for y in 0..height as i64 {
        for x in 0..width {
            let mut acc = [0u32; 3];
            for (k, weight) in GAUSSIAN_TAPS.iter().enumerate() {
                let sy = reflect_101(y + k as i64 - radius, height);
                let row = horizontal[sy as usize * stride + x as usize];
                for c in 0..3 {
                    acc[c] += weight * row[c];
                }
            }
            let pixel = acc.map(|v| ((v + 128) >> 8).min(255) as u8);
            output.put_pixel(x, y as u32, Rgb(pixel));
        }
    }

    output
}
