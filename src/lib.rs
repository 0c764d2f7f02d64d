//! # series-mosaic
//!
//! Initial tile layouts for stitching multi-series microscopy files.
//!
//! A multi-series file holds several independently acquired tiles of one
//! specimen. This library reads the stage position and pixel calibration of
//! every series and turns them into pixel-space tile offsets, ready for a
//! stitching stage that refines the alignment from image content.
//!
//! ## Features
//!
//! - **Metadata-driven layout**: stage positions converted to pixels through
//!   the physical pixel size of the first series
//! - **Coordinate adjustments**: axis inversion, overlap increase, calibration
//!   bypass and Z-stage suppression
//! - **2D / 3D detection**: a dataset is 3D as soon as one series has a Z stack
//! - **Format support**: TIFF / BigTIFF pages and JSON series manifests,
//!   detected from magic bytes
//! - **Output**: tile configuration text files and JSON stitch requests
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`io`] - Range reader trait with file and in-memory readers
//! - [`mod@format`] - TIFF directory parsing, manifest schema, format detection
//! - [`metadata`] - Series metadata handles and the services that open them
//! - [`extract`] - The metadata extractor
//! - [`tile`] - Tile descriptors, layouts and their output formats
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use series_mosaic::{extract_tiles, ExtractOptions, FusionSettings, Layout, TileConfiguration};
//!
//! let tiles = extract_tiles("mosaic.tif", &ExtractOptions::default())?;
//! let layout = Layout::from_tiles(tiles, FusionSettings::default())?;
//! print!("{}", TileConfiguration::render(&layout));
//! # Ok::<(), series_mosaic::ExtractError>(())
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod io;
pub mod metadata;
pub mod tile;

// Re-export commonly used types
pub use config::{Cli, Command, ExtractConfig, InspectConfig, OutputFormat};
pub use error::{ExtractError, FormatError, IoError, MetadataError, TiffError};
pub use extract::{extract_tiles, ExtractOptions, MetadataExtractor};
pub use format::{detect_format, SeriesFormat, SeriesManifest};
pub use io::{FileRangeReader, MemoryRangeReader, RangeReader};
pub use metadata::{
    Axis, FileMetadataService, InMemoryMetadata, MetadataService, SeriesMetadata, SeriesRecord,
    TiffSeriesMetadata,
};
pub use tile::{
    Dimensionality, FusionMethod, FusionSettings, ImageHandle, Layout, StitchRequest,
    TileConfiguration, TileDescriptor, TransformModel,
};
