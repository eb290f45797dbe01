//! Registry of user-facing features.
//!
//! Front ends (CLI, browser GUI) build their commands and tabs from
//! [`FEATURES`] rather than hard-coding each feature.

use std::path::PathBuf;

use serde::Serialize;

use crate::compress::{compress_file, CompressError, CompressionRequest, CompressionResult};

/// Kind of value a feature input expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Existing file to read.
    InputPath,
    /// File to create or overwrite.
    OutputPath,
    /// Positive size in kilobytes.
    SizeKb,
}

/// One input of a feature's form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
}

/// Which operation a feature runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    ImageCompressor,
}

/// Static description of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub inputs: &'static [InputField],
    pub kind: FeatureKind,
}

/// Values collected from a feature's form.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub request: CompressionRequest,
}

impl FeatureArgs {
    /// Form values with default search settings for a size in kilobytes.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, size_kb: u64) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            request: CompressionRequest::from_kb(size_kb),
        }
    }

    pub fn with_request(mut self, request: CompressionRequest) -> Self {
        self.request = request;
        self
    }
}

impl Feature {
    pub fn run(&self, args: &FeatureArgs) -> Result<CompressionResult, CompressError> {
        match self.kind {
            FeatureKind::ImageCompressor => compress_file(&args.input, &args.output, &args.request),
        }
    }
}

const IMAGE_COMPRESSOR_INPUTS: &[InputField] = &[
    InputField {
        name: "input",
        label: "Input Image",
        kind: InputKind::InputPath,
    },
    InputField {
        name: "output",
        label: "Output Image",
        kind: InputKind::OutputPath,
    },
    InputField {
        name: "size",
        label: "Target Size (KB)",
        kind: InputKind::SizeKb,
    },
];

/// All registered features, in display order.
pub static FEATURES: &[Feature] = &[Feature {
    id: "compress",
    name: "Image Compressor",
    description: "Compress an image to approximately a target file size",
    inputs: IMAGE_COMPRESSOR_INPUTS,
    kind: FeatureKind::ImageCompressor,
}];

/// Look up a feature by id.
pub fn find_feature(id: &str) -> Option<&'static Feature> {
    FEATURES.iter().find(|feature| feature.id == id)
}
