//! Size-targeted compression.
//!
//! Given an image and a byte budget, find the highest encoder quality whose
//! output fits. The search is a bisection over the quality parameter:
//!
//! 1. Encode at the top of the quality range; if it fits, stop.
//! 2. Otherwise halve the range, keeping the highest quality that fits,
//!    until the range closes or the iteration cap is hit.
//! 3. If nothing fits, return the lowest-quality encoding flagged
//!    `WithinTolerance` or `Unmet`. Optionally shrink the image instead.
//!
//! Unreachable budgets are reported through [`TargetStatus`], never as errors.
//!
//! # Examples
//!
//! ```ignore
//! use toolbench_core::compress::{compress_file, CompressionRequest};
//!
//! let request = CompressionRequest::from_kb(200);
//! let result = compress_file("in.jpg".as_ref(), "out.jpg".as_ref(), &request)?;
//! println!("{} bytes at quality {:?} ({})", result.size, result.quality, result.status);
//! ```

mod downscale;
mod search;
mod types;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::decode::{DecodeError, DecodedImage};
use crate::encode::EncodeError;

pub use search::SizeTargetedCompressor;
pub use types::{kb_to_bytes, CompressionRequest, CompressionResult, TargetStatus};

/// Default cap on bisection probes. Enough to resolve a 1-100 scale.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Default overshoot ratio still reported as `WithinTolerance` (5%).
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// Downscaling stops once either edge is at or below this many pixels.
pub const MIN_DOWNSCALE_EDGE: u32 = 50;

/// Per-step scale factor of the downscale fallback.
pub const DOWNSCALE_STEP: f64 = 0.9;

/// Errors that can occur during compression.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The input could not be decoded or has no pixels.
    #[error("Invalid input image: {0}")]
    InvalidInput(#[from] DecodeError),

    /// The underlying encoder failed.
    #[error("Encoder error: {0}")]
    Encoder(#[from] EncodeError),

    /// The request parameters are inconsistent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Reading the input or writing the output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Compress a decoded image with the default JPEG encoder.
pub fn compress_image(
    image: &DecodedImage,
    request: &CompressionRequest,
) -> Result<CompressionResult, CompressError> {
    SizeTargetedCompressor::jpeg().compress(image, request)
}

/// Decode and compress encoded bytes with the default JPEG encoder.
pub fn compress_bytes(
    bytes: &[u8],
    request: &CompressionRequest,
) -> Result<CompressionResult, CompressError> {
    SizeTargetedCompressor::jpeg().compress_bytes(bytes, request)
}

/// Read `input`, compress it, and write the result to `output`.
///
/// The output is written even when the budget is unmet; check
/// `result.status`. It goes to a temporary file in the output directory first
/// and is renamed into place, so a failed write never leaves a truncated file.
pub fn compress_file(
    input: &Path,
    output: &Path,
    request: &CompressionRequest,
) -> Result<CompressionResult, CompressError> {
    let bytes = fs::read(input).map_err(|source| CompressError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let result = compress_bytes(&bytes, request)?;

    write_output(output, &result.bytes).map_err(|source| CompressError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(result)
}

fn write_output(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
