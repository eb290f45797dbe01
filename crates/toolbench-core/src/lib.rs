//! Toolbench Core - size-targeted image compression
//!
//! This crate provides the functionality behind Toolbench's features:
//! decoding input images, driving a quality-parameter encoder, and searching
//! for the highest quality that fits a byte budget.
//!
//! # Module Structure
//!
//! - `decode` - Turn JPEG/PNG bytes into an opaque RGB raster
//! - `encode` - The quality encoder abstraction and its JPEG implementation
//! - `compress` - The size-targeted search and its entry points
//! - `features` - Static registry consumed by the CLI and browser front ends

pub mod compress;
pub mod decode;
pub mod encode;
pub mod features;

pub use compress::{
    compress_bytes, compress_file, compress_image, kb_to_bytes, CompressError,
    CompressionRequest, CompressionResult, SizeTargetedCompressor, TargetStatus,
};
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use encode::{EncodeError, JpegQualityEncoder, QualityBounds, QualityEncoder};
pub use features::{find_feature, Feature, FeatureArgs, FEATURES};
