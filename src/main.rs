//! series-mosaic - Tile layouts from multi-series microscopy files.
//!
//! This binary extracts the initial tile layout of a file, or inspects its
//! series metadata.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use series_mosaic::{
    config::{Cli, Command, ExtractConfig, InspectConfig, OutputFormat},
    extract_tiles,
    metadata::{Axis, FileMetadataService},
    tile::{Layout, StitchRequest, TileConfiguration},
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Extract(config) => run_extract(config),
        Command::Inspect(config) => run_inspect(config),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "series_mosaic=debug"
    } else {
        "series_mosaic=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Extract Command
// =============================================================================

fn run_extract(config: ExtractConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let path = config.file.to_string_lossy();
    let tiles = match extract_tiles(&path, &config.extract_options()) {
        Ok(tiles) => tiles,
        Err(e) => {
            error!("Failed to extract tiles from {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let layout = match Layout::from_tiles(tiles, config.fusion_settings()) {
        Ok(layout) => layout,
        Err(e) => {
            error!("Failed to build layout: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Extracted {} {} tiles from {}",
        layout.len(),
        layout.dimensionality(),
        path
    );

    let request = StitchRequest::new(
        layout,
        config.preview_only,
        config.compute_overlap,
        &config.file,
    );

    let rendered = match config.format {
        OutputFormat::TileConfig => TileConfiguration::render(&request.layout),
        OutputFormat::Json => match request.to_json() {
            Ok(json) => json + "\n",
            Err(e) => {
                error!("Failed to serialize stitch request: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    match config.output {
        Some(ref output) => {
            if let Err(e) = fs::write(output, rendered) {
                error!("Failed to write {}: {}", output.display(), e);
                return ExitCode::FAILURE;
            }
            info!("Wrote {}", output.display());
        }
        None => print!("{}", rendered),
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Inspect Command
// =============================================================================

fn run_inspect(config: InspectConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    println!("Series Metadata");
    println!("═══════════════");
    println!();

    let (format, mut metadata) = match FileMetadataService::new().open_detected(&config.file) {
        Ok(opened) => opened,
        Err(e) => {
            println!("✗ {}: {}", config.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let count = metadata.series_count();
    println!("✓ File: {}", config.file.display());
    println!("✓ Format: {}", format.name());
    println!("✓ Series: {}", count);
    println!();

    for series in 0..count {
        if let Err(e) = metadata.set_series(series) {
            println!("✗ Series {}: {}", series, e);
            return ExitCode::FAILURE;
        }

        let name = metadata
            .series_name()
            .map(|name| format!(" ({})", name))
            .unwrap_or_default();
        println!("Series {}{}", series, name);
        println!("─────────────────");
        println!("  Dimension order: {}", metadata.dimension_order());
        println!("  Z planes:        {}", metadata.size_z());
        if let Some((width, height)) = metadata.dimensions() {
            println!("  Pixels:          {} x {}", width, height);
        }
        println!(
            "  Stage position:  {}",
            format_axes(|axis| metadata
                .stage_position(0, axis)
                .or_else(|| metadata.stage_label(axis)))
        );
        println!(
            "  Pixel size:      {}",
            format_axes(|axis| metadata.physical_size(axis))
        );
        println!();
    }

    if count < 2 {
        println!("✗ At least two series are needed to stitch");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// `(x, y, z)` with `-` for missing values.
fn format_axes(value: impl Fn(Axis) -> Option<f64>) -> String {
    let parts: Vec<String> = Axis::ALL
        .iter()
        .map(|&axis| value(axis).map_or_else(|| "-".to_string(), |v| v.to_string()))
        .collect();
    format!("({})", parts.join(", "))
}
