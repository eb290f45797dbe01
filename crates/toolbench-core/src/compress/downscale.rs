//! Dimension reduction for budgets that quality alone cannot meet.

use tracing::debug;

use super::{
    CompressError, CompressionRequest, CompressionResult, TargetStatus, DOWNSCALE_STEP,
    MIN_DOWNSCALE_EDGE,
};
use crate::decode::{resize, scaled_dimensions, DecodedImage};
use crate::encode::QualityEncoder;

/// Shrink `image` in 10% steps, re-encoding at `quality`, until the
/// output fits or either edge reaches [`MIN_DOWNSCALE_EDGE`].
///
/// Each step resamples from the original pixels. If no step fits, the
/// smallest attempt is returned since it is the closest to the budget.
pub(crate) fn shrink_to_fit<E: QualityEncoder>(
    encoder: &E,
    image: &DecodedImage,
    request: &CompressionRequest,
    quality: u8,
    current: CompressionResult,
) -> Result<CompressionResult, CompressError> {
    let target = request.target_bytes;
    let mut iterations = current.iterations;
    let mut best = current;
    let (mut width, mut height) = (image.width, image.height);

    while width > MIN_DOWNSCALE_EDGE && height > MIN_DOWNSCALE_EDGE {
        (width, height) = scaled_dimensions(width, height, DOWNSCALE_STEP);
        let resized = resize(image, width, height)?;
        let bytes = encoder.encode(&resized, quality)?;
        iterations += 1;

        let size = bytes.len() as u64;
        debug!(width, height, quality, size, "downscale probe");

        if size < best.size || size <= target {
            best = CompressionResult {
                size,
                bytes,
                quality: Some(quality),
                iterations,
                status: TargetStatus::classify(size, target, request.tolerance),
                width,
                height,
                downscaled: true,
                kept_original: false,
            };
        }

        if size <= target {
            break;
        }
    }

    best.iterations = iterations;
    Ok(best)
}
