//! Size-targeted compression WASM bindings.
//!
//! This module backs the "Image Compressor" tab: the GUI reads the chosen
//! file into a `Uint8Array`, collects the target size, and calls
//! [`compress_to_target`].
//!
//! # Example
//!
//! ```typescript
//! import { compress_to_target } from '@toolbench/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_to_target(bytes, 200, undefined, undefined);
//! const quality = result.quality ?? 'original';
//! status.textContent = `${result.size} bytes at quality ${quality} (${result.status})`;
//! const blob = new Blob([result.bytes()], { type: 'image/jpeg' });
//! result.free();
//! ```

use crate::types::JsCompressionResult;
use toolbench_core::compress::{CompressionRequest, SizeTargetedCompressor};
use toolbench_core::encode::{QualityBounds, JPEG_QUALITY_RANGE};
use wasm_bindgen::prelude::*;

/// Compress an encoded image (JPEG or PNG) to approximately `target_kb` kilobytes.
///
/// # Arguments
///
/// * `bytes` - The input file bytes as a `Uint8Array`
/// * `target_kb` - Target size in kilobytes (1 KB = 1024 bytes)
/// * `min_quality` - Optional lower quality bound (default: 1)
/// * `max_quality` - Optional upper quality bound (default: 95)
///
/// # Errors
///
/// Returns an error if the bytes are not a decodable image, the parameters are
/// invalid, or encoding fails. An unreachable target is not an error; check
/// `result.status`.
#[wasm_bindgen]
pub fn compress_to_target(
    bytes: &[u8],
    target_kb: u32,
    min_quality: Option<u8>,
    max_quality: Option<u8>,
) -> Result<JsCompressionResult, JsValue> {
    let request = build_request(target_kb, min_quality, max_quality);
    SizeTargetedCompressor::jpeg()
        .compress_bytes(bytes, &request)
        .map(JsCompressionResult::from_result)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build a request from GUI form values; unset bounds come from the JPEG range.
pub(crate) fn build_request(
    target_kb: u32,
    min_quality: Option<u8>,
    max_quality: Option<u8>,
) -> CompressionRequest {
    let bounds = QualityBounds::new(
        min_quality.unwrap_or(JPEG_QUALITY_RANGE.min),
        max_quality.unwrap_or(JPEG_QUALITY_RANGE.max),
    );
    CompressionRequest::from_kb(target_kb as u64).with_bounds(bounds)
}


/// WASM-specific tests that require JsValue.
///
/// Run with `wasm-pack test`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use toolbench_core::encode::encode_jpeg;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_compress_to_target_basic() {
        let jpeg = encode_jpeg(&vec![128u8; 50 * 50 * 3], 50, 50, 95).unwrap();
        let result = compress_to_target(&jpeg, 100, None, None).unwrap();
        assert!(result.met());
    }

    #[wasm_bindgen_test]
    fn test_compress_to_target_invalid_bytes() {
        assert!(compress_to_target(&[0, 1, 2, 3], 100, None, None).is_err());
    }

    #[wasm_bindgen_test]
    fn test_compress_to_target_zero_target() {
        let jpeg = encode_jpeg(&vec![128u8; 10 * 10 * 3], 10, 10, 95).unwrap();
        assert!(compress_to_target(&jpeg, 0, None, None).is_err());
    }
}
