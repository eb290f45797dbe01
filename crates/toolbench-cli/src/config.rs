//! Command-line configuration for Toolbench.
//!
//! Arguments are parsed with clap; every compression option can also be set
//! through a `TOOLBENCH_` environment variable:
//!
//! - `TOOLBENCH_SIZE_KB` - Target size in kilobytes
//! - `TOOLBENCH_MIN_QUALITY` / `TOOLBENCH_MAX_QUALITY` - Quality search bounds
//! - `TOOLBENCH_MAX_ITERATIONS` - Bisection probe cap (default: 10)
//! - `TOOLBENCH_TOLERANCE` - Overshoot ratio reported as "within tolerance" (default: 0.05)
//! - `TOOLBENCH_DOWNSCALE` - Shrink the image when quality alone cannot meet the target

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use toolbench_core::compress::{
    CompressionRequest, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
use toolbench_core::encode::{QualityBounds, JPEG_QUALITY_RANGE};
use toolbench_core::features::FeatureArgs;

/// Toolbench - small image utilities.
#[derive(Parser, Debug, Clone)]
#[command(name = "toolbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true, env = "TOOLBENCH_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compress an image to approximately a target file size.
    Compress(CompressConfig),

    /// List available features.
    Features,
}

/// Arguments of the `compress` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CompressConfig {
    /// Image to compress (JPEG or PNG).
    pub input: PathBuf,

    /// Where to write the compressed JPEG (`.jpg` or `.jpeg`).
    pub output: PathBuf,

    /// Target size in kilobytes (1 KB = 1024 bytes).
    #[arg(short, long, env = "TOOLBENCH_SIZE_KB")]
    pub size: u64,

    /// Lowest quality the search may use.
    #[arg(long, env = "TOOLBENCH_MIN_QUALITY")]
    pub min_quality: Option<u8>,

    /// Highest quality the search may use.
    #[arg(long, env = "TOOLBENCH_MAX_QUALITY")]
    pub max_quality: Option<u8>,

    /// Maximum number of bisection probes.
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS, env = "TOOLBENCH_MAX_ITERATIONS")]
    pub max_iterations: u32,

    /// Overshoot ratio still reported as "within tolerance".
    #[arg(long, default_value_t = DEFAULT_TOLERANCE, env = "TOOLBENCH_TOLERANCE")]
    pub tolerance: f64,

    /// Shrink the image when even the lowest quality is too large.
    #[arg(long, env = "TOOLBENCH_DOWNSCALE")]
    pub downscale: bool,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl CompressConfig {
    /// Validate the configuration.
    ///
    /// Returns an error message if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.size == 0 {
            return Err("Target size must be greater than 0 KB".to_string());
        }

        let bounds = self.bounds();
        if !bounds.is_within(&JPEG_QUALITY_RANGE) {
            return Err(format!(
                "Quality must be between {} and {}",
                JPEG_QUALITY_RANGE.min, JPEG_QUALITY_RANGE.max
            ));
        }
        if !bounds.is_valid() {
            return Err(format!(
                "--min-quality ({}) must not exceed --max-quality ({})",
                bounds.min, bounds.max
            ));
        }

        if self.max_iterations == 0 {
            return Err("--max-iterations must be at least 1".to_string());
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err("--tolerance must be a non-negative number".to_string());
        }

        if self.input == self.output {
            return Err("Output path must differ from the input path".to_string());
        }

        let is_jpeg = self
            .output
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));
        if !is_jpeg {
            return Err(format!(
                "Output is always JPEG; use a .jpg or .jpeg extension instead of {}",
                self.output.display()
            ));
        }

        Ok(())
    }

    /// Quality bounds, with unset ends taken from the JPEG range.
    pub fn bounds(&self) -> QualityBounds {
        QualityBounds::new(
            self.min_quality.unwrap_or(JPEG_QUALITY_RANGE.min),
            self.max_quality.unwrap_or(JPEG_QUALITY_RANGE.max),
        )
    }

    /// Build the core request from the parsed arguments.
    pub fn to_request(&self) -> CompressionRequest {
        CompressionRequest::from_kb(self.size)
            .with_bounds(self.bounds())
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance)
            .with_downscale(self.downscale)
    }

    /// Form values for the image compressor feature.
    pub fn to_feature_args(&self) -> FeatureArgs {
        FeatureArgs::new(&self.input, &self.output, self.size).with_request(self.to_request())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CompressConfig {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Command::Compress(config) => config,
            other => panic!("expected compress, got {:?}", other),
        }
    }

    fn test_config() -> CompressConfig {
        parse(&["toolbench", "compress", "in.jpg", "out.jpg", "--size", "200"])
    }

    #[test]
    fn test_parse_defaults() {
        let config = test_config();
        assert_eq!(config.input, PathBuf::from("in.jpg"));
        assert_eq!(config.output, PathBuf::from("out.jpg"));
        assert_eq!(config.size, 200);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        assert!(!config.downscale);
        assert!(!config.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_all_options() {
        let config = parse(&[
            "toolbench",
            "compress",
            "a.png",
            "b.jpg",
            "-s",
            "50",
            "--min-quality",
            "10",
            "--max-quality",
            "80",
            "--max-iterations",
            "6",
            "--tolerance",
            "0.1",
            "--downscale",
            "--json",
        ]);

        assert_eq!(config.bounds(), QualityBounds::new(10, 80));
        assert!(config.downscale);
        assert!(config.json);
        assert!(config.validate().is_ok());

        let request = config.to_request();
        assert_eq!(request.target_bytes, 50 * 1024);
        assert_eq!(request.bounds, Some(QualityBounds::new(10, 80)));
        assert_eq!(request.max_iterations, Some(6));
        assert_eq!(request.tolerance, 0.1);
        assert!(request.allow_downscale);
    }

    #[test]
    fn test_missing_size_is_rejected() {
        let result = Cli::try_parse_from(["toolbench", "compress", "in.jpg", "out.jpg"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_features_subcommand() {
        let cli = Cli::try_parse_from(["toolbench", "features"]).unwrap();
        assert!(matches!(cli.command, Command::Features));
    }

    #[test]
    fn test_zero_size() {
        let mut config = test_config();
        config.size = 0;

        let result = config.validate();
        assert!(result.unwrap_err().contains("size"));
    }

    #[test]
    fn test_partial_bounds_fill_from_range() {
        let mut config = test_config();
        config.min_quality = Some(30);
        assert_eq!(config.bounds(), QualityBounds::new(30, JPEG_QUALITY_RANGE.max));

        config.min_quality = None;
        config.max_quality = Some(60);
        assert_eq!(config.bounds(), QualityBounds::new(JPEG_QUALITY_RANGE.min, 60));
    }

    #[test]
    fn test_invalid_quality() {
        let mut config = test_config();
        config.max_quality = Some(100);
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.min_quality = Some(0);
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.min_quality = Some(70);
        config.max_quality = Some(40);
        assert!(config.validate().unwrap_err().contains("must not exceed"));
    }

    #[test]
    fn test_invalid_iterations_and_tolerance() {
        let mut config = test_config();
        config.max_iterations = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.tolerance = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_must_be_jpeg() {
        let config = parse(&["toolbench", "compress", "a.png", "b.png", "--size", "50"]);
        assert!(config.validate().unwrap_err().contains(".jpg"));

        let mut config = test_config();
        config.output = PathBuf::from("out");
        assert!(config.validate().is_err());

        for name in ["out.jpeg", "OUT.JPG"] {
            let mut config = test_config();
            config.output = PathBuf::from(name);
            assert!(config.validate().is_ok(), "{} rejected", name);
        }
    }

    #[test]
    fn test_feature_args_carry_request() {
        let config = parse(&[
            "toolbench", "compress", "in.png", "out.jpg", "-s", "30", "--downscale",
        ]);
        let args = config.to_feature_args();

        assert_eq!(args.input, PathBuf::from("in.png"));
        assert_eq!(args.output, PathBuf::from("out.jpg"));
        assert_eq!(args.request, config.to_request());
    }

    #[test]
    fn test_same_input_and_output() {
        let mut config = test_config();
        config.output = config.input.clone();
        assert!(config.validate().unwrap_err().contains("differ"));
    }
}
