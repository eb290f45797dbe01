//! Request and result types for size-targeted compression.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CompressError, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::encode::QualityBounds;

/// Convert a size in kilobytes (1 KB = 1024 bytes) to bytes.
pub fn kb_to_bytes(kb: u64) -> u64 {
    kb.saturating_mul(1024)
}

/// Parameters of one compression call. The image travels separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionRequest {
    /// Maximum desired output size in bytes.
    pub target_bytes: u64,
    /// Quality range to search. `None` means the encoder's full range.
    pub bounds: Option<QualityBounds>,
    /// Cap on bisection probes. `None` means [`DEFAULT_MAX_ITERATIONS`].
    pub max_iterations: Option<u32>,
    /// Fraction above the target still reported as `WithinTolerance`.
    pub tolerance: f64,
    /// Shrink the image when even the lowest quality overshoots the target.
    pub allow_downscale: bool,
}

impl CompressionRequest {
    /// Create a request for `target_bytes` with default search settings.
    pub fn new(target_bytes: u64) -> Self {
        Self {
            target_bytes,
            bounds: None,
            max_iterations: None,
            tolerance: DEFAULT_TOLERANCE,
            allow_downscale: false,
        }
    }

    /// Create a request for a target given in kilobytes.
    pub fn from_kb(kb: u64) -> Self {
        Self::new(kb_to_bytes(kb))
    }

    pub fn with_bounds(mut self, bounds: QualityBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_downscale(mut self, allow: bool) -> Self {
        self.allow_downscale = allow;
        self
    }

    /// Effective probe cap.
    pub fn iteration_cap(&self) -> u32 {
        self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS)
    }

    /// Validate the request against an encoder's quality range and return the
    /// bounds to search.
    pub fn resolve_bounds(&self, encoder_range: QualityBounds) -> Result<QualityBounds, CompressError> {
        if self.target_bytes == 0 {
            return Err(CompressError::InvalidRequest(
                "target size must be greater than zero".to_string(),
            ));
        }

        if self.max_iterations == Some(0) {
            return Err(CompressError::InvalidRequest(
                "iteration cap must be at least 1".to_string(),
            ));
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(CompressError::InvalidRequest(format!(
                "tolerance must be a non-negative ratio, got {}",
                self.tolerance
            )));
        }

        let bounds = self.bounds.unwrap_or(encoder_range);
        if !bounds.is_valid() {
            return Err(CompressError::InvalidRequest(format!(
                "minimum quality {} exceeds maximum quality {}",
                bounds.min, bounds.max
            )));
        }
        if !bounds.is_within(&encoder_range) {
            return Err(CompressError::InvalidRequest(format!(
                "quality bounds {}-{} fall outside the encoder range {}-{}",
                bounds.min, bounds.max, encoder_range.min, encoder_range.max
            )));
        }

        Ok(bounds)
    }
}

/// How the achieved size relates to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    /// Output is no larger than the target.
    Met,
    /// Output overshoots the target by no more than the tolerance ratio.
    WithinTolerance,
    /// Best effort only: output overshoots beyond the tolerance.
    Unmet,
}

impl TargetStatus {
    /// Classify an achieved size against a target.
    pub fn classify(size: u64, target: u64, tolerance: f64) -> Self {
        if size <= target {
            TargetStatus::Met
        } else if (size as f64) <= target as f64 * (1.0 + tolerance) {
            TargetStatus::WithinTolerance
        } else {
            TargetStatus::Unmet
        }
    }

    pub fn is_met(self) -> bool {
        self == TargetStatus::Met
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetStatus::Met => "met",
            TargetStatus::WithinTolerance => "within_tolerance",
            TargetStatus::Unmet => "unmet",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a compression call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionResult {
    /// Encoded output.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Achieved size in bytes (`bytes.len()`).
    pub size: u64,
    /// Quality parameter of the returned encoding. `None` when the input
    /// bytes were kept, since their original setting is unknown.
    pub quality: Option<u8>,
    /// Number of encodes performed.
    pub iterations: u32,
    pub status: TargetStatus,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// The image was shrunk to approach the target.
    pub downscaled: bool,
    /// The input bytes were returned as-is because re-encoding would not
    /// make them smaller.
    pub kept_original: bool,
}
