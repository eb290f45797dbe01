//! WASM-compatible wrapper types for compression results.
//!
//! This module provides JavaScript-friendly types that wrap the core Toolbench
//! types, handling the conversion between Rust and JavaScript representations.

use toolbench_core::compress::CompressionResult;
use wasm_bindgen::prelude::*;

/// A compression result wrapper for JavaScript.
///
/// Exposes the achieved size, quality and status for display in the GUI tab,
/// plus the encoded bytes for download.
///
/// # Memory Management
///
/// The encoded bytes live in WASM memory. `bytes()` copies them into a
/// JavaScript `Uint8Array`. Call `free()` to release WASM memory early.
#[wasm_bindgen]
pub struct JsCompressionResult {
    inner: CompressionResult,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// Achieved size in bytes
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.inner.bytes.len()
    }

    /// Quality parameter of the returned encoding, `undefined` when the
    /// input bytes were kept
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> Option<u8> {
        self.inner.quality
    }

    /// Number of encodes performed
    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> u32 {
        self.inner.iterations
    }

    /// One of "met", "within_tolerance", "unmet"
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.inner.status.as_str().to_string()
    }

    /// True when the output is no larger than the target
    #[wasm_bindgen(getter)]
    pub fn met(&self) -> bool {
        self.inner.status.is_met()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn downscaled(&self) -> bool {
        self.inner.downscaled
    }

    #[wasm_bindgen(getter)]
    pub fn kept_original(&self) -> bool {
        self.inner.kept_original
    }

    /// Returns the encoded output as Uint8Array.
    ///
    /// Note: This creates a copy of the data.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsCompressionResult {
    pub(crate) fn from_result(inner: CompressionResult) -> Self {
        Self { inner }
    }
}
