//! Image encoding for Toolbench.
//!
//! This module provides:
//! - The [`QualityEncoder`] trait: a lossy encoder driven by one quality knob
//! - [`JpegQualityEncoder`], the JPEG implementation used by default
//!
//! All operations are synchronous and single-threaded.
//!
//! # Examples
//!
//! ```ignore
//! use toolbench_core::encode::encode_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 90).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;
mod quality;

use thiserror::Error;

pub use jpeg::{encode_jpeg, JpegQualityEncoder, JPEG_QUALITY_RANGE};
pub use quality::{QualityBounds, QualityEncoder};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying codec failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
