//! Toolbench - command-line front end.
//!
//! Parses arguments, configures logging, and hands off to `toolbench-core`.

mod config;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toolbench_core::compress::{CompressionResult, TargetStatus};
use toolbench_core::features::{find_feature, FEATURES};

use config::{Cli, Command, CompressConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compress(config) => run_compress(config),
        Command::Features => run_features(),
    }
}

// =============================================================================
// Compress Command
// =============================================================================

fn run_compress(config: CompressConfig) -> ExitCode {
    match compress(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(io::stderr(), &e);
            ExitCode::FAILURE
        }
    }
}

fn compress(config: &CompressConfig) -> Result<(), String> {
    config
        .validate()
        .map_err(|e| format!("Configuration error: {}", e))?;

    let feature =
        find_feature("compress").ok_or_else(|| "Image compressor is not registered".to_string())?;
    let args = config.to_feature_args();
    let request = &args.request;
    debug!(feature = feature.id, ?request, "compress request");

    let result = feature.run(&args).map_err(|e| e.to_string())?;

    if config.json {
        let json = serde_json::json!({
            "input": config.input.display().to_string(),
            "output": config.output.display().to_string(),
            "target_bytes": request.target_bytes,
            "result": result,
        });
        let text = serde_json::to_string_pretty(&json)
            .map_err(|e| format!("Failed to serialize result: {}", e))?;
        println!("{}", text);
    } else {
        print_summary(config, request.target_bytes, &result);
    }

    Ok(())
}

fn print_summary(config: &CompressConfig, target_bytes: u64, result: &CompressionResult) {
    println!(
        "{} -> {}",
        config.input.display(),
        config.output.display()
    );
    println!(
        "  Size:       {} (target {})",
        format_kb(result.size),
        format_kb(target_bytes)
    );
    match result.quality {
        Some(quality) => println!("  Quality:    {}", quality),
        None => println!("  Quality:    unchanged (input kept)"),
    }
    println!("  Encodes:    {}", result.iterations);
    println!("  Dimensions: {}x{}", result.width, result.height);
    if result.downscaled {
        println!("  Downscaled to meet the target");
    }
    if result.kept_original {
        println!("  Input was already smaller than any re-encoding; copied unchanged");
    }

    match result.status {
        TargetStatus::Met => println!("  Status:     target met"),
        TargetStatus::WithinTolerance => {
            println!("  Status:     within tolerance of target")
        }
        TargetStatus::Unmet => println!("  Status:     could not reach target size"),
    }
}

/// Errors go straight to stderr so they show even when logging is filtered out.
fn report_error(mut out: impl Write, message: &str) {
    let _ = writeln!(out, "Error: {}", message);
}

fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

// =============================================================================
// Features Command
// =============================================================================

fn run_features() -> ExitCode {
    for feature in FEATURES {
        println!("{:<12} {}", feature.id, feature.name);
        println!("{:<12} {}", "", feature.description);
        for input in feature.inputs {
            println!("{:<12}   - {} ({})", "", input.label, input.name);
        }
    }
    ExitCode::SUCCESS
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Initialize tracing. Logs go to stderr so `--json` output stays parseable.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "toolbench=debug,toolbench_core=debug"
    } else {
        "toolbench=info,toolbench_core=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
