//! JPEG encoding.
//!
//! Wraps the `image` crate's baseline JPEG encoder. This is the encoder the
//! size-targeted search drives by default.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{EncodeError, QualityBounds, QualityEncoder};
use crate::decode::{DecodedImage, SourceFormat};

/// Usable JPEG quality range. Settings above 95 mostly grow the file
/// without visible gain.
pub const JPEG_QUALITY_RANGE: QualityBounds = QualityBounds::new(1, 95);

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality, clamped to 1-100
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 60-90: Good to medium quality, fine for web and sharing
/// * Below 60: Visible artifacts
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// [`QualityEncoder`] producing baseline JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegQualityEncoder;

impl QualityEncoder for JpegQualityEncoder {
    fn quality_range(&self) -> QualityBounds {
        JPEG_QUALITY_RANGE
    }

    fn output_format(&self) -> SourceFormat {
        SourceFormat::Jpeg
    }

    fn encode(&self, image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
        encode_jpeg(&image.pixels, image.width, image.height, quality)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
