//! Command-line configuration for series-mosaic.
//!
//! Every option can also be set through an environment variable with the
//! `MOSAIC_` prefix:
//!
//! - `MOSAIC_COMPUTE_OVERLAP` - Register tiles by content (default: true)
//! - `MOSAIC_IGNORE_CALIBRATION` - Treat stage coordinates as pixels
//! - `MOSAIC_INCREASE_OVERLAP` - Overlap increase in percent (default: 10)
//! - `MOSAIC_INVERT_X` / `MOSAIC_INVERT_Y` - Negate stage X / Y
//! - `MOSAIC_IGNORE_Z_STAGE` - Place every tile at Z = 0
//! - `MOSAIC_FUSION_METHOD` - Fusion method (default: linear-blending)
//! - `MOSAIC_ALPHA` - Linear blending alpha (default: 1.5)
//! - `MOSAIC_REGRESSION_THRESHOLD` - Registration R² threshold (default: 0.3)
//! - `MOSAIC_MAX_AVG_DISPLACEMENT` - Max/avg displacement ratio (default: 2.5)
//! - `MOSAIC_ABSOLUTE_DISPLACEMENT` - Absolute displacement in pixels (default: 3.5)
//! - `MOSAIC_PREVIEW_ONLY` - Only compute the layout
//! - `MOSAIC_FORMAT` - Output format (default: tile-config)
//! - `MOSAIC_OUTPUT` - Output file (default: stdout)

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::extract::ExtractOptions;
use crate::tile::{FusionMethod, FusionSettings};

// =============================================================================
// Default Values
// =============================================================================

/// Default overlap increase in percent.
pub const DEFAULT_INCREASE_OVERLAP: f64 = 10.0;

/// Default linear blending alpha.
pub const DEFAULT_ALPHA: f64 = 1.5;

/// Default regression threshold (R²).
pub const DEFAULT_REGRESSION_THRESHOLD: f64 = 0.3;

/// Default max/avg displacement ratio.
pub const DEFAULT_MAX_AVG_DISPLACEMENT: f64 = 2.5;

/// Default absolute displacement threshold in pixels.
pub const DEFAULT_ABSOLUTE_DISPLACEMENT: f64 = 3.5;

// =============================================================================
// CLI
// =============================================================================

/// series-mosaic - Tile layouts from multi-series microscopy files.
///
/// Reads the stage position and pixel calibration of every series in a file
/// and writes the initial tile layout for stitching.
#[derive(Parser, Debug, Clone)]
#[command(name = "series-mosaic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract the tile layout of a multi-series file.
    Extract(ExtractConfig),

    /// Show the series metadata of a file.
    Inspect(InspectConfig),
}

/// Output format for the extract command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tile configuration text file
    #[default]
    TileConfig,
    /// Stitch request as JSON
    Json,
}

// =============================================================================
// Extract Command
// =============================================================================

#[derive(Parser, Debug, Clone)]
pub struct ExtractConfig {
    /// Multi-series file (TIFF or JSON series manifest).
    pub file: PathBuf,

    // =========================================================================
    // Registration
    // =========================================================================
    /// Register tiles by image content instead of trusting the layout.
    #[arg(long, default_value_t = true, action = ArgAction::Set, env = "MOSAIC_COMPUTE_OVERLAP")]
    pub compute_overlap: bool,

    /// Only compute and show the layout; do not fuse.
    #[arg(long, default_value_t = false, env = "MOSAIC_PREVIEW_ONLY")]
    pub preview_only: bool,

    // =========================================================================
    // Coordinate Adjustments
    // =========================================================================
    /// Treat stage coordinates as pixel coordinates.
    #[arg(long, default_value_t = false, env = "MOSAIC_IGNORE_CALIBRATION")]
    pub ignore_calibration: bool,

    /// Shrink tile spacing by this percentage (0-100).
    #[arg(long, default_value_t = DEFAULT_INCREASE_OVERLAP, env = "MOSAIC_INCREASE_OVERLAP")]
    pub increase_overlap: f64,

    /// Negate the stage X coordinate.
    #[arg(long, default_value_t = false, env = "MOSAIC_INVERT_X")]
    pub invert_x: bool,

    /// Negate the stage Y coordinate.
    #[arg(long, default_value_t = false, env = "MOSAIC_INVERT_Y")]
    pub invert_y: bool,

    /// Ignore the Z stage position.
    #[arg(long, default_value_t = false, env = "MOSAIC_IGNORE_Z_STAGE")]
    pub ignore_z_stage: bool,

    // =========================================================================
    // Fusion
    // =========================================================================
    /// How overlapping tiles are blended.
    #[arg(long, value_enum, default_value_t = FusionMethod::default(), env = "MOSAIC_FUSION_METHOD")]
    pub fusion_method: FusionMethod,

    /// Linear blending alpha.
    #[arg(long, default_value_t = DEFAULT_ALPHA, env = "MOSAIC_ALPHA")]
    pub alpha: f64,

    /// Minimum R² of a pairwise registration (0-1).
    #[arg(long, default_value_t = DEFAULT_REGRESSION_THRESHOLD, env = "MOSAIC_REGRESSION_THRESHOLD")]
    pub regression_threshold: f64,

    /// Maximum ratio of a tile's displacement to the average displacement.
    #[arg(long, default_value_t = DEFAULT_MAX_AVG_DISPLACEMENT, env = "MOSAIC_MAX_AVG_DISPLACEMENT")]
    pub max_avg_displacement: f64,

    /// Maximum absolute displacement in pixels.
    #[arg(long, default_value_t = DEFAULT_ABSOLUTE_DISPLACEMENT, env = "MOSAIC_ABSOLUTE_DISPLACEMENT")]
    pub absolute_displacement: f64,

    // =========================================================================
    // Output
    // =========================================================================
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::TileConfig, env = "MOSAIC_FORMAT")]
    pub format: OutputFormat,

    /// Write the output to this file instead of stdout.
    #[arg(short, long, env = "MOSAIC_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ExtractConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.file.as_os_str().is_empty() {
            return Err("An input file is required".to_string());
        }

        if !(0.0..=100.0).contains(&self.increase_overlap) {
            return Err("increase_overlap must be between 0 and 100".to_string());
        }

        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err("alpha must be greater than 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.regression_threshold) {
            return Err("regression_threshold must be between 0 and 1".to_string());
        }

        for (name, value) in [
            ("max_avg_displacement", self.max_avg_displacement),
            ("absolute_displacement", self.absolute_displacement),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{} must be greater than 0", name));
            }
        }

        Ok(())
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            increase_overlap_percent: self.increase_overlap,
            ignore_calibration: self.ignore_calibration,
            invert_x: self.invert_x,
            invert_y: self.invert_y,
            ignore_z_stage: self.ignore_z_stage,
        }
    }

    pub fn fusion_settings(&self) -> FusionSettings {
        FusionSettings {
            method: self.fusion_method,
            alpha: self.alpha,
            regression_threshold: self.regression_threshold,
            max_avg_displacement: self.max_avg_displacement,
            absolute_displacement: self.absolute_displacement,
        }
    }
}

// =============================================================================
// Inspect Command
// =============================================================================

#[derive(Parser, Debug, Clone)]
pub struct InspectConfig {
    /// Multi-series file (TIFF or JSON series manifest).
    pub file: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl InspectConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.file.as_os_str().is_empty() {
            return Err("An input file is required".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
