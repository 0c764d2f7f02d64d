//! The layout handed to the stitching stage.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

use super::descriptor::{Dimensionality, TileDescriptor};

// =============================================================================
// Fusion
// =============================================================================

/// How overlapping tiles are blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FusionMethod {
    Average,
    #[default]
    LinearBlending,
    MaxIntensity,
    MinIntensity,
    None,
}

impl FusionMethod {
    /// Display label as shown to users.
    pub const fn label(self) -> &'static str {
        match self {
            FusionMethod::Average => "Average",
            FusionMethod::LinearBlending => "Linear Blending",
            FusionMethod::MaxIntensity => "Max. Intensity",
            FusionMethod::MinIntensity => "Min. Intensity",
            FusionMethod::None => "None",
        }
    }
}

/// Fusion method and registration thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionSettings {
    pub method: FusionMethod,

    /// Blending exponent for linear blending
    pub alpha: f64,

    /// Minimum R² a pairwise registration must reach
    pub regression_threshold: f64,

    /// Maximum ratio of a tile's displacement to the mean displacement
    pub max_avg_displacement: f64,

    /// Maximum absolute displacement, in pixels
    pub absolute_displacement: f64,
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self {
            method: FusionMethod::default(),
            alpha: 1.5,
            regression_threshold: 0.3,
            max_avg_displacement: 2.5,
            absolute_displacement: 3.5,
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Ordered tiles plus the fusion settings for one stitching run.
///
/// Tile `i` is series `i` of the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    dimensionality: Dimensionality,
    fusion: FusionSettings,
    tiles: Vec<TileDescriptor>,
}

impl Layout {
    /// Wrap extracted tiles. Fails on an empty list or mixed dimensionality.
    pub fn from_tiles(
        tiles: Vec<TileDescriptor>,
        fusion: FusionSettings,
    ) -> Result<Self, ExtractError> {
        let dimensionality = tiles
            .first()
            .map(TileDescriptor::dimensionality)
            .ok_or_else(|| ExtractError::InvalidInput("layout has no tiles".to_string()))?;

        if let Some(odd) = tiles
            .iter()
            .find(|tile| tile.dimensionality() != dimensionality)
        {
            return Err(ExtractError::InvalidInput(format!(
                "tile {} is {} but the layout is {}",
                odd.series_index(),
                odd.dimensionality(),
                dimensionality
            )));
        }

        Ok(Self {
            dimensionality,
            fusion,
            tiles,
        })
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    pub fn fusion(&self) -> &FusionSettings {
        &self.fusion
    }

    pub fn tiles(&self) -> &[TileDescriptor] {
        &self.tiles
    }

    /// Tiles, for the stage that refines positions.
    pub fn tiles_mut(&mut self) -> &mut [TileDescriptor] {
        &mut self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn into_tiles(self) -> Vec<TileDescriptor> {
        self.tiles
    }
}

// =============================================================================
// StitchRequest
// =============================================================================

/// Everything the stitching stage needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StitchRequest {
    pub layout: Layout,

    /// Only compute and show the layout; do not fuse
    pub preview_only: bool,

    /// Register tiles by image content instead of trusting the layout
    pub compute_overlap: bool,

    /// Where the tile configuration is written
    pub configuration_path: PathBuf,
}

impl StitchRequest {
    pub fn new(layout: Layout, preview_only: bool, compute_overlap: bool, source: &Path) -> Self {
        Self {
            layout,
            preview_only,
            compute_overlap,
            configuration_path: Self::default_configuration_path(source),
        }
    }

    /// `<source>.txt`, next to the source file.
    pub fn default_configuration_path(source: &Path) -> PathBuf {
        let mut path = OsString::from(source.as_os_str());
        path.push(".txt");
        PathBuf::from(path)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
