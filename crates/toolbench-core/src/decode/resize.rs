//! Image resizing used by the downscale fallback.
//!
//! All functions return new `DecodedImage` instances without modifying the input.

use image::imageops::FilterType;

use super::{DecodeError, DecodedImage};

/// Resize an image to exact dimensions with a Lanczos3 filter.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero,
/// or `DecodeError::CorruptedFile` if the source buffer does not match its size.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, FilterType::Lanczos3);

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Compute `(width * factor, height * factor)`, truncated and clamped to 1.
pub fn scaled_dimensions(width: u32, height: u32, factor: f64) -> (u32, u32) {
    if width == 0 || height == 0 || !factor.is_finite() || factor <= 0.0 {
        return (0, 0);
    }

    let scale = |edge: u32| ((edge as f64 * factor) as u32).max(1);
    (scale(width), scale(height))
}
