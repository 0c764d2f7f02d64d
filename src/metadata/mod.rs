//! Metadata service layer.
//!
//! The extractor never parses files itself. It talks to a [`MetadataService`],
//! which opens a file and hands back a [`SeriesMetadata`] handle: a cursor over
//! the file's series that answers geometry queries for the active series.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           MetadataExtractor             │
//! └────────────────────┬────────────────────┘
//!                      │ open(path)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │      MetadataService (trait)            │
//! │  FileMetadataService: detects format    │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────────┐ ┌─────────────────────┐
//! │ TiffSeriesMetadata  │ │  InMemoryMetadata   │
//! │ (one IFD / series)  │ │ (manifest, tests)   │
//! └─────────────────────┘ └─────────────────────┘
//! ```
//!
//! A handle owns whatever file it reads from; dropping it releases the file.

mod axis;
mod memory;
mod service;
mod tiff;

use std::path::Path;

use crate::error::MetadataError;

pub use axis::Axis;
pub use memory::{InMemoryMetadata, SeriesRecord};
pub use service::FileMetadataService;
pub use tiff::{TiffSeriesMetadata, TIFF_DIMENSION_ORDER};

// =============================================================================
// SeriesMetadata Trait
// =============================================================================

/// An open multi-series file.
///
/// Per-series queries answer for the *active* series, selected with
/// [`set_series`](SeriesMetadata::set_series). Series 0 is active right after
/// opening.
pub trait SeriesMetadata {
    /// Identity of the underlying file (for logging).
    fn identifier(&self) -> &str;

    /// Number of series in the file.
    fn series_count(&self) -> usize;

    /// Index of the active series.
    fn series(&self) -> usize;

    /// Make `series` the active series.
    ///
    /// Fails with [`MetadataError::SeriesOutOfRange`] when the index is not
    /// below [`series_count`](SeriesMetadata::series_count), or when the
    /// series' metadata cannot be read.
    fn set_series(&mut self, series: usize) -> Result<(), MetadataError>;

    /// Declared axis ordering of the active series, e.g. `XYCZT`.
    fn dimension_order(&self) -> &str;

    /// Number of Z planes in the active series.
    fn size_z(&self) -> u32;

    /// Number of planes that carry position metadata.
    fn plane_count(&self) -> usize;

    /// Stage position of `plane` along `axis`, in physical units.
    fn stage_position(&self, plane: usize, axis: Axis) -> Option<f64>;

    /// Stage label position along `axis`, used when planes carry no position.
    fn stage_label(&self, _axis: Axis) -> Option<f64> {
        None
    }

    /// Physical size of one pixel along `axis`.
    fn physical_size(&self, axis: Axis) -> Option<f64>;

    /// Pixel width and height of the active series, when known.
    fn dimensions(&self) -> Option<(u32, u32)> {
        None
    }

    /// Display name of the active series, when known.
    fn series_name(&self) -> Option<String> {
        None
    }
}

// =============================================================================
// MetadataService Trait
// =============================================================================

/// Opens files and produces [`SeriesMetadata`] handles.
pub trait MetadataService {
    fn open(&self, path: &Path) -> Result<Box<dyn SeriesMetadata>, MetadataError>;
}

impl<S: MetadataService + ?Sized> MetadataService for &S {
    fn open(&self, path: &Path) -> Result<Box<dyn SeriesMetadata>, MetadataError> {
        (**self).open(path)
    }
}
