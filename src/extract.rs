//! Tile extraction from multi-series metadata.
//!
//! [`MetadataExtractor`] turns the stage positions of a multi-series file into
//! pixel-space tile offsets:
//!
//! 1. open the file through a [`MetadataService`]
//! 2. classify the dataset as 2D or 3D (3D if any series has more than one Z plane)
//! 3. read the physical pixel size of series 0, which calibrates every tile
//! 4. per series: read the stage position of plane 0, apply axis inversion and
//!    Z suppression, divide by the pixel size, shrink by the overlap factor
//!
//! The metadata handle is dropped on every return path, which releases the
//! underlying file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ExtractError, MetadataError};
use crate::metadata::{Axis, FileMetadataService, MetadataService, SeriesMetadata};
use crate::tile::{Dimensionality, TileDescriptor};

// =============================================================================
// ExtractOptions
// =============================================================================

/// Adjustments applied to the stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Shrink inter-tile spacing by this percentage, in [0, 100]
    pub increase_overlap_percent: f64,

    /// Treat stage coordinates as pixels
    pub ignore_calibration: bool,

    pub invert_x: bool,
    pub invert_y: bool,

    /// Place every tile at Z = 0
    pub ignore_z_stage: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            increase_overlap_percent: 10.0,
            ignore_calibration: false,
            invert_x: false,
            invert_y: false,
            ignore_z_stage: false,
        }
    }
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<(), ExtractError> {
        let percent = self.increase_overlap_percent;
        if !(0.0..=100.0).contains(&percent) {
            return Err(ExtractError::InvalidInput(format!(
                "overlap increase must be between 0 and 100 percent, got {}",
                percent
            )));
        }
        Ok(())
    }

    /// Factor applied to every coordinate: `(100 - p) / 100`.
    pub fn overlap_factor(&self) -> f64 {
        (100.0 - self.increase_overlap_percent) / 100.0
    }
}

// =============================================================================
// MetadataExtractor
// =============================================================================

/// Produces one [`TileDescriptor`] per series of a file.
///
/// The extractor holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor<S> {
    service: S,
}

impl<S: MetadataService> MetadataExtractor<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Extract the tiles of `path`, in series order.
    ///
    /// # Errors
    /// - `InvalidInput` for an empty path or an out-of-range overlap percentage
    /// - `MetadataRead` when the file cannot be opened or queried
    /// - `InsufficientSeries` when the file has fewer than two series
    pub fn extract(
        &self,
        path: &str,
        options: &ExtractOptions,
    ) -> Result<Vec<TileDescriptor>, ExtractError> {
        if path.trim().is_empty() {
            return Err(ExtractError::InvalidInput("file path is empty".to_string()));
        }
        options.validate()?;

        let mut metadata = self.service.open(Path::new(path))?;

        let count = metadata.series_count();
        debug!(path, series = count, "Opened multi-series file");
        if count < 2 {
            return Err(ExtractError::InsufficientSeries { count });
        }

        let dimensionality = scan_dimensionality(metadata.as_mut())?;
        debug!(path, %dimensionality, "Classified dataset");

        metadata.set_series(0)?;
        let calibration = Axis::ALL.map(|axis| metadata.physical_size(axis));
        debug!(
            x = ?calibration[0],
            y = ?calibration[1],
            z = ?calibration[2],
            "Calibration of series 0"
        );

        let factor = options.overlap_factor();
        let mut tiles = Vec::with_capacity(count);

        for series in 0..count {
            metadata.set_series(series)?;

            let mut coordinates = stage_coordinates(metadata.as_ref(), options);
            if !options.ignore_calibration {
                calibrate(metadata.as_ref(), &calibration, &mut coordinates);
            }
            // Adding 0.0 turns -0.0 into 0.0
            let coordinates = coordinates.map(|c| c * factor + 0.0);

            debug!(
                series,
                x = coordinates[0],
                y = coordinates[1],
                z = coordinates[2],
                "Tile location"
            );

            tiles.push(TileDescriptor::new(
                dimensionality,
                series,
                path,
                coordinates,
            ));
        }

        Ok(tiles)
    }
}

/// Extract tiles from a local file, detecting its format.
pub fn extract_tiles(
    path: &str,
    options: &ExtractOptions,
) -> Result<Vec<TileDescriptor>, ExtractError> {
    MetadataExtractor::new(FileMetadataService::new()).extract(path, options)
}

/// 3D if any series has more than one Z plane.
fn scan_dimensionality<M: SeriesMetadata + ?Sized>(
    metadata: &mut M,
) -> Result<Dimensionality, MetadataError> {
    let mut is_3d = false;
    for series in 0..metadata.series_count() {
        metadata.set_series(series)?;
        let size_z = metadata.size_z();
        if size_z > 1 {
            debug!(series, size_z, "Series has a Z stack");
            is_3d = true;
        }
    }
    Ok(Dimensionality::from_is_3d(is_3d))
}

/// Raw X, Y, Z stage position of plane 0 of the active series.
fn stage_coordinates<M: SeriesMetadata + ?Sized>(
    metadata: &M,
    options: &ExtractOptions,
) -> [f64; 3] {
    let mut coordinates = Axis::ALL.map(|axis| {
        metadata
            .stage_position(0, axis)
            .or_else(|| metadata.stage_label(axis))
            .unwrap_or(0.0)
    });

    if options.invert_x {
        coordinates[0] = -coordinates[0];
    }
    if options.invert_y {
        coordinates[1] = -coordinates[1];
    }
    if options.ignore_z_stage {
        coordinates[2] = 0.0;
    }

    coordinates
}

/// Convert physical units to pixels on every calibrated axis.
///
/// `calibration` holds the pixel sizes of series 0. The axes to convert come
/// from the dimension order of the active series; axes missing from it, or
/// with no usable pixel size, keep their stage units.
fn calibrate<M: SeriesMetadata + ?Sized>(
    metadata: &M,
    calibration: &[Option<f64>; 3],
    coordinates: &mut [f64; 3],
) {
    let series = metadata.series();
    let order = metadata.dimension_order();

    for axis in Axis::ALL {
        if !axis.is_declared_in(order) {
            continue;
        }

        match calibration[axis.index()] {
            Some(size) if size.is_finite() && size != 0.0 => {
                coordinates[axis.index()] /= size;
            }
            Some(size) => {
                warn!(
                    series,
                    %axis,
                    calibration = size,
                    "Unusable physical pixel size; keeping stage units"
                );
            }
            None => {
                debug!(series, %axis, "No physical pixel size; keeping stage units");
            }
        }
    }
}
