//! Bisection over encoder quality.

use tracing::{debug, info, warn};

use super::downscale::shrink_to_fit;
use super::{CompressError, CompressionRequest, CompressionResult, TargetStatus};
use crate::decode::{decode_image, DecodedImage, SourceFormat};
use crate::encode::{EncodeError, JpegQualityEncoder, QualityBounds, QualityEncoder};

/// One encode at a given quality.
#[derive(Debug, Clone)]
pub(crate) struct Probe {
    pub quality: u8,
    pub bytes: Vec<u8>,
}

impl Probe {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Finds the highest encoder quality whose output fits a byte budget.
///
/// Stateless apart from the encoder; one instance can serve any number of
/// calls.
#[derive(Debug, Clone, Default)]
pub struct SizeTargetedCompressor<E = JpegQualityEncoder> {
    encoder: E,
}

impl SizeTargetedCompressor {
    /// Compressor driving the JPEG encoder.
    pub fn jpeg() -> Self {
        Self::new(JpegQualityEncoder)
    }
}

impl<E: QualityEncoder> SizeTargetedCompressor<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Compress a decoded image to fit `request.target_bytes`.
    ///
    /// An unreachable budget is not an error: the lowest-quality encoding is
    /// returned with status `WithinTolerance` or `Unmet`, or a downscaled one
    /// when the request allows it.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for zero-sized or inconsistent images, `InvalidRequest`
    /// for bad parameters, `Encoder` when the codec fails.
    pub fn compress(
        &self,
        image: &DecodedImage,
        request: &CompressionRequest,
    ) -> Result<CompressionResult, CompressError> {
        image.validate()?;
        let bounds = request.resolve_bounds(self.encoder.quality_range())?;
        let target = request.target_bytes;

        let (probe, iterations) = self.search(image, target, bounds, request.iteration_cap())?;
        let status = TargetStatus::classify(probe.size(), target, request.tolerance);
        let quality = probe.quality;

        let mut result = CompressionResult {
            size: probe.size(),
            bytes: probe.bytes,
            quality: Some(quality),
            iterations,
            status,
            width: image.width,
            height: image.height,
            downscaled: false,
            kept_original: false,
        };

        if !result.status.is_met() && request.allow_downscale {
            result = shrink_to_fit(&self.encoder, image, request, quality, result)?;
        }

        if result.status.is_met() {
            info!(
                size = result.size,
                target,
                quality = ?result.quality,
                iterations = result.iterations,
                "compressed within budget"
            );
        } else {
            warn!(
                size = result.size,
                target,
                quality = ?result.quality,
                status = %result.status,
                "budget not reachable, returning closest encoding"
            );
        }

        Ok(result)
    }

    /// Decode encoded bytes and compress them.
    ///
    /// When the input is already in the encoder's output format and re-encoding
    /// would not shrink it, the input bytes are returned untouched with
    /// `kept_original` set and no quality reported. Recompressing an earlier
    /// output therefore never grows it.
    pub fn compress_bytes(
        &self,
        bytes: &[u8],
        request: &CompressionRequest,
    ) -> Result<CompressionResult, CompressError> {
        let image = decode_image(bytes)?;
        let result = self.compress(&image, request)?;

        let same_format = SourceFormat::detect(bytes) == Some(self.encoder.output_format());
        let original_size = bytes.len() as u64;
        if same_format && original_size <= result.size {
            debug!(
                original_size,
                encoded_size = result.size,
                "re-encoding does not shrink input, keeping original bytes"
            );
            return Ok(CompressionResult {
                bytes: bytes.to_vec(),
                size: original_size,
                quality: None,
                status: TargetStatus::classify(
                    original_size,
                    request.target_bytes,
                    request.tolerance,
                ),
                width: image.width,
                height: image.height,
                downscaled: false,
                kept_original: true,
                ..result
            });
        }

        Ok(result)
    }

    /// Returns the chosen probe and the number of encodes performed.
    fn search(
        &self,
        image: &DecodedImage,
        target: u64,
        bounds: QualityBounds,
        max_iterations: u32,
    ) -> Result<(Probe, u32), EncodeError> {
        let mut iterations = 0u32;

        let ceiling = self.probe(image, bounds.max, &mut iterations)?;
        if ceiling.size() <= target {
            debug!(quality = bounds.max, size = ceiling.size(), "ceiling fits");
            return Ok((ceiling, iterations));
        }

        // Invariant: `high` never fits, `best` (when set) is the encoding at `low`.
        let mut low = bounds.min;
        let mut high = bounds.max;
        let mut best: Option<Probe> = None;
        let mut steps = 0u32;

        while high - low > 1 && steps < max_iterations {
            let mid = low + (high - low) / 2;
            let probe = self.probe(image, mid, &mut iterations)?;
            steps += 1;

            if probe.size() <= target {
                low = mid;
                best = Some(probe);
            } else {
                high = mid;
            }
        }

        if let Some(best) = best {
            return Ok((best, iterations));
        }

        // Nothing above the floor fits; settle for the floor either way.
        if bounds.min == bounds.max {
            return Ok((ceiling, iterations));
        }
        let floor = self.probe(image, bounds.min, &mut iterations)?;
        Ok((floor, iterations))
    }

    fn probe(
        &self,
        image: &DecodedImage,
        quality: u8,
        iterations: &mut u32,
    ) -> Result<Probe, EncodeError> {
        let bytes = self.encoder.encode(image, quality)?;
        *iterations += 1;
        debug!(quality, size = bytes.len(), "probe");
        Ok(Probe { quality, bytes })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::decode::DecodedImage;
    use crate::encode::JPEG_QUALITY_RANGE;
    use std::cell::RefCell;

    /// Encoder with a fixed size curve: `size(q) = base + q * per_step`,
    /// scaled by the pixel count relative to the source image. Output bytes
    /// carry a JPEG signature so format detection treats them as JPEG.
    pub(crate) struct CurveEncoder {
        pub base: u64,
        pub per_step: u64,
        pub reference_pixels: u64,
        pub calls: RefCell<Vec<u8>>,
    }

    impl CurveEncoder {
        pub fn new(base: u64, per_step: u64) -> Self {
            Self {
                base,
                per_step,
                reference_pixels: 100 * 100,
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn size_at(&self, quality: u8) -> u64 {
            self.base + quality as u64 * self.per_step
        }
    }

    impl QualityEncoder for CurveEncoder {
        fn quality_range(&self) -> QualityBounds {
            JPEG_QUALITY_RANGE
        }

        fn output_format(&self) -> SourceFormat {
            SourceFormat::Jpeg
        }

        fn encode(&self, image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
            self.calls.borrow_mut().push(quality);
            let full = self.size_at(quality);
            let size = (full * image.pixel_count() / self.reference_pixels).max(4) as usize;
            let mut bytes = vec![0u8; size];
            bytes[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
            Ok(bytes)
        }
    }

    struct FailingEncoder;

    impl QualityEncoder for FailingEncoder {
        fn quality_range(&self) -> QualityBounds {
            JPEG_QUALITY_RANGE
        }

        fn output_format(&self) -> SourceFormat {
            SourceFormat::Jpeg
        }

        fn encode(&self, _image: &DecodedImage, _quality: u8) -> Result<Vec<u8>, EncodeError> {
            Err(EncodeError::EncodingFailed("codec exploded".to_string()))
        }
    }

    pub(crate) fn gray_image(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(width, height, vec![128u8; (width * height * 3) as usize])
    }

    const KB: u64 = 1000;

    #[test]
    fn test_large_image_meets_smaller_target() {
        // 95 * 5KB + 25KB = 500KB at maximum quality
        let compressor = SizeTargetedCompressor::new(CurveEncoder::new(25 * KB, 5 * KB));
        let request = CompressionRequest::new(200 * KB);

        let result = compressor.compress(&gray_image(100, 100), &request).unwrap();

        assert!(result.size <= 200 * KB);
        assert!(matches!(result.quality, Some(q) if q < 95));
        // Highest quality with 25KB + q * 5KB <= 200KB is 35
        assert_eq!(result.quality, Some(35));
        assert_eq!(result.status, TargetStatus::Met);
    }

    #[test]
    fn test_small_image_short_circuits_at_max_quality() {
        // 150KB at quality 95
        let encoder = CurveEncoder::new(55 * KB, KB);
        let compressor = SizeTargetedCompressor::new(encoder);
        let request = CompressionRequest::new(200 * KB);

        let result = compressor.compress(&gray_image(100, 100), &request).unwrap();

        assert_eq!(result.quality, Some(95));
        assert_eq!(result.size, 150 * KB);
        assert_eq!(result.status, TargetStatus::Met);
        assert_eq!(result.iterations, 1);
        assert_eq!(*compressor.encoder().calls.borrow(), vec![95]);
    }

    #[test]
    fn test_unreachable_target_returns_min_quality_unmet() {
        // Even quality 1 yields 50KB
        let compressor = SizeTargetedCompressor::new(CurveEncoder::new(49 * KB, KB));
        let request = CompressionRequest::new(10 * KB);

        let result = compressor.compress(&gray_image(100, 100), &request).unwrap();

        assert_eq!(result.quality, Some(1));
        assert_eq!(result.size, 50 * KB);
        assert_eq!(result.status, TargetStatus::Unmet);
        assert!(!result.downscaled);
    }

    #[test]
    fn test_slight_overshoot_is_within_tolerance() {
        // Quality 1 yields 10_400 bytes against a 10_000 byte target (+4%)
        let compressor = SizeTargetedCompressor::new(CurveEncoder::new(10_300, 100));
        let request = CompressionRequest::new(10_000);

        let result = compressor.compress(&gray_image(100, 100), &request).unwrap();

        assert_eq!(result.quality, Some(1));
        assert_eq!(result.status, TargetStatus::WithinTolerance);
    }

    #[test]
    fn test_exact_target_selects_that_quality() {
        let encoder = CurveEncoder::new(0, KB);
        let target = encoder.size_at(62);
        let compressor = SizeTargetedCompressor::new(encoder);

        let result = compressor
            .compress(&gray_image(100, 100), &CompressionRequest::new(target))
            .unwrap();

        assert_eq!(result.quality, Some(62));
        assert_eq!(result.size, target);
    }

    #[test]
    fn test_flat_curve_prefers_highest_quality() {
        // Every quality between 40 and 95 exceeds the target except the
        // plateau [1, 40], which all produce the same size.
        struct PlateauEncoder;
        impl QualityEncoder for PlateauEncoder {
            fn quality_range(&self) -> QualityBounds {
                JPEG_QUALITY_RANGE
            }
            fn output_format(&self) -> SourceFormat {
                SourceFormat::Jpeg
            }
            fn encode(&self, _: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
                let size = if quality <= 40 { 1000 } else { 5000 };
                Ok(vec![0u8; size])
            }
        }

        let compressor = SizeTargetedCompressor::new(PlateauEncoder);
        let result = compressor
            .compress(&gray_image(10, 10), &CompressionRequest::new(1000))
            .unwrap();

        assert_eq!(result.quality, Some(40));
    }

    #[test]
    fn test_min_quality_fits_when_nothing_above_does() {
        let encoder = CurveEncoder::new(0, KB);
        let compressor = SizeTargetedCompressor::new(encoder);
        let request = CompressionRequest::new(5 * KB + 500).with_bounds(QualityBounds::new(5, 95));

        let result = compressor.compress(&gray_image(100, 100), &request).unwrap();

        assert_eq!(result.quality, Some(5));
        assert_eq!(result.status, TargetStatus::Met);
    }

    #[test]
    fn test_custom_bounds_are_respected() {
        let compressor = SizeTargetedCompressor::new(CurveEncoder::new(0, KB));
        let request = CompressionRequest::new(1000 * KB).with_bounds(QualityBounds::new(20, 60));

        let result = compressor.compress(&gray_image(100, 100), &request).unwrap();

        assert_eq!(result.quality, Some(60));
        assert!(compressor
            .encoder()
            .calls
            .borrow()
            .iter()
            .all(|q| (20..=60).contains(q)));
    }

    #[test]
    fn test_single_point_bounds_encode_once() {
        let compressor = SizeTargetedCompressor::new(CurveEncoder::new(0, KB));
        let request = CompressionRequest::new(KB).with_bounds(QualityBounds::new(50, 50));

        let result = compressor.compress(&gray_image(100, 100), &request).unwrap();

        assert_eq!(result.quality, Some(50));
        assert_eq!(result.iterations, 1);
        assert_eq!(result.status, TargetStatus::Unmet);
    }

    #[test]
    fn test_iteration_cap_bounds_encodes() {
        let compressor = SizeTargetedCompressor::new(CurveEncoder::new(0, KB));
        let request = CompressionRequest::new(30 * KB).with_max_iterations(2);

        let result = compressor.compress(&gray_image(100, 100), &request).unwrap();

        // Ceiling, two bisection probes, and at most one floor probe
        assert!(result.iterations <= 4);
        assert!(result.size <= 30 * KB);
    }

    #[test]
    fn test_default_search_converges_within_cap() {
        let compressor = SizeTargetedCompressor::new(CurveEncoder::new(0, KB));
        let request = CompressionRequest::new(77 * KB);

        let result = compressor.compress(&gray_image(100, 100), &request).unwrap();

        assert_eq!(result.quality, Some(77));
        assert!(result.iterations <= 1 + crate::compress::DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn test_zero_dimension_image_is_invalid_input() {
        let compressor = SizeTargetedCompressor::new(CurveEncoder::new(0, KB));
        let image = DecodedImage {
            width: 0,
            height: 10,
            pixels: vec![],
        };

        let err = compressor
            .compress(&image, &CompressionRequest::new(KB))
            .unwrap_err();
        assert!(matches!(err, CompressError::InvalidInput(_)));
    }

    #[test]
    fn test_encoder_failure_is_reported() {
        let compressor = SizeTargetedCompressor::new(FailingEncoder);
        let err = compressor
            .compress(&gray_image(4, 4), &CompressionRequest::new(KB))
            .unwrap_err();
        assert!(matches!(err, CompressError::Encoder(_)));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let compressor = SizeTargetedCompressor::new(CurveEncoder::new(0, KB));
        let image = gray_image(20, 20);
        let before = image.clone();

        compressor
            .compress(&image, &CompressionRequest::new(10))
            .unwrap();

        assert_eq!(image, before);
    }

    #[test]
    fn test_corrupt_bytes_are_invalid_input() {
        let compressor = SizeTargetedCompressor::jpeg();
        let err = compressor
            .compress_bytes(&[0xFF, 0xD8, 0x00], &CompressionRequest::new(KB))
            .unwrap_err();
        assert!(matches!(err, CompressError::InvalidInput(_)));
    }
}
