//! Image decoding for Toolbench.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG input into an opaque RGB raster
//! - Applying EXIF orientation so re-encoded output keeps its appearance
//! - Resizing, used when quality reduction alone cannot meet a size budget
//!
//! # Examples
//!
//! ```ignore
//! use toolbench_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod resize;
mod types;

pub use reader::decode_image;
pub use resize::{resize, scaled_dimensions};
pub use types::{DecodeError, DecodedImage, Orientation, SourceFormat};
