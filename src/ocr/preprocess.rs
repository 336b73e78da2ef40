//! Best-effort image cleanup before OCR.
//!
//! Grayscale, then a contrast and a sharpness boost, then a 3x3 median
//! filter. The enhancement math mirrors the classic "blend with a degenerate
//! image" approach: contrast blends against the mean gray level, sharpness
//! against a smoothed copy.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use imageproc::filter::median_filter;
use tracing::debug;

use crate::core::{ExtractError, Result};

pub const CONTRAST_FACTOR: f32 = 2.0;
pub const SHARPNESS_FACTOR: f32 = 2.0;
const MEDIAN_RADIUS: u32 = 1;

/// 3x3 smoothing kernel, normalized by [`SMOOTH_WEIGHT`].
const SMOOTH_KERNEL: [u32; 9] = [1, 1, 1, 1, 5, 1, 1, 1, 1];
const SMOOTH_WEIGHT: u32 = 13;

/// Returns an OCR-friendly copy of `image`, or `image` itself if any step fails.
pub fn enhance(image: &DynamicImage) -> DynamicImage {
    match try_enhance(image) {
        Ok(gray) => DynamicImage::ImageLuma8(gray),
        Err(err) => {
            debug!("{err}; falling back to the original image");
            image.clone()
        }
    }
}

pub fn try_enhance(image: &DynamicImage) -> Result<GrayImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExtractError::Preprocess("image has no pixels"));
    }

    let gray = match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        other => other.to_luma8(),
    };

    let contrasted = boost_contrast(&gray, CONTRAST_FACTOR);
    let sharpened = boost_sharpness(&contrasted, SHARPNESS_FACTOR);
    Ok(median_filter(&sharpened, MEDIAN_RADIUS, MEDIAN_RADIUS))
}

pub fn boost_contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let mean = mean_level(gray);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        blend(mean, gray.get_pixel(x, y)[0] as f32, factor)
    })
}

pub fn boost_sharpness(gray: &GrayImage, factor: f32) -> GrayImage {
    let smooth = smooth(gray);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        blend(
            smooth.get_pixel(x, y)[0] as f32,
            gray.get_pixel(x, y)[0] as f32,
            factor,
        )
    })
}

fn blend(degenerate: f32, value: f32, factor: f32) -> Luma<u8> {
    let out = degenerate + factor * (value - degenerate);
    Luma([out.round().clamp(0.0, 255.0) as u8])
}

fn mean_level(gray: &GrayImage) -> f32 {
    let count = gray.width() as f64 * gray.height() as f64;
    let sum: f64 = gray.pixels().map(|p| p[0] as f64).sum();
    (sum / count).round() as f32
}

/// Border pixels are copied through unchanged.
fn smooth(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
            return *gray.get_pixel(x, y);
        }
        let mut acc = 0u32;
        for (i, weight) in SMOOTH_KERNEL.iter().enumerate() {
            let dx = (i % 3) as u32;
            let dy = (i / 3) as u32;
            acc += weight * gray.get_pixel(x + dx - 1, y + dy - 1)[0] as u32;
        }
        Luma([((acc + SMOOTH_WEIGHT / 2) / SMOOTH_WEIGHT) as u8])
    })
}
