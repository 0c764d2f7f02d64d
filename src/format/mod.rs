//! Container formats that carry multi-series metadata.
//!
//! # Format Detection
//!
//! Use [`detect::detect_format`] to identify a file from its leading bytes.
//! Supported formats:
//!
//! - **TIFF / BigTIFF**: one series per full-resolution IFD, geometry from the
//!   baseline resolution and position tags
//! - **Series manifest**: JSON description of series, calibration and stage
//!   positions

pub mod detect;
pub mod manifest;
pub mod tiff;

pub use detect::{detect_format, is_tiff_header, SeriesFormat};
pub use manifest::{AxisValues, ManifestSeries, SeriesManifest};
