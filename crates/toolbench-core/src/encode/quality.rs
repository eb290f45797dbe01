//! The quality-parameter encoder abstraction.

use serde::{Deserialize, Serialize};

use super::EncodeError;
use crate::decode::{DecodedImage, SourceFormat};

/// An inclusive range of encoder quality values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityBounds {
    /// Lowest quality the search may use.
    pub min: u8,
    /// Highest quality the search may use.
    pub max: u8,
}

impl QualityBounds {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Check that the range is non-empty.
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Check whether `quality` lies within the range.
    pub fn contains(&self, quality: u8) -> bool {
        (self.min..=self.max).contains(&quality)
    }

    /// Check whether this range lies entirely inside `outer`.
    pub fn is_within(&self, outer: &QualityBounds) -> bool {
        outer.contains(self.min) && outer.contains(self.max)
    }
}

/// A lossy encoder driven by a single quality parameter.
///
/// Output size is assumed to be non-decreasing in quality for a fixed image.
/// The size-targeted search relies on this but does not verify it.
pub trait QualityEncoder {
    /// The full range of quality values this encoder accepts.
    fn quality_range(&self) -> QualityBounds;

    /// Container format of the bytes produced by [`QualityEncoder::encode`].
    fn output_format(&self) -> SourceFormat;

    /// Encode `image` at `quality`.
    fn encode(&self, image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError>;
}
