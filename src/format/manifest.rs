//! JSON series manifests.
//!
//! A manifest describes a multi-series acquisition without pixel data: one
//! entry per series with its axis ordering, Z size, physical pixel size and
//! per-plane stage positions.
//!
//! ```json
//! {
//!   "series": [
//!     {
//!       "dimension_order": "XYCZT",
//!       "size_z": 1,
//!       "physical_size": { "x": 0.65, "y": 0.65 },
//!       "planes": [ { "x": 1200.0, "y": -310.5 } ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::io::RangeReader;

/// Largest manifest accepted, in bytes.
pub const MAX_MANIFEST_BYTES: u64 = 64 * 1024 * 1024;

/// Optional per-axis values (positions or calibrations).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisValues {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
}

impl AxisValues {
    pub const fn new(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        Self { x, y, z }
    }

    /// All three axes present.
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(Some(x), Some(y), Some(z))
    }
}

/// One series entry of a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSeries {
    /// Display name of the series
    #[serde(default)]
    pub name: Option<String>,

    /// Axis ordering such as `XYCZT`
    #[serde(default)]
    pub dimension_order: Option<String>,

    /// Number of Z planes
    #[serde(default = "default_size_z")]
    pub size_z: u32,

    /// Physical size of one pixel per axis
    #[serde(default)]
    pub physical_size: AxisValues,

    /// Stage label position, used when a plane has no position
    #[serde(default)]
    pub stage_label: AxisValues,

    /// Stage position per plane
    #[serde(default)]
    pub planes: Vec<AxisValues>,
}

fn default_size_z() -> u32 {
    1
}

/// A decoded series manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesManifest {
    pub series: Vec<ManifestSeries>,
}

impl SeriesManifest {
    /// Decode a manifest from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FormatError> {
        serde_json::from_slice(bytes).map_err(|e| FormatError::Manifest(e.to_string()))
    }

    /// Read and decode the whole resource behind `reader`.
    pub fn read<R: RangeReader + ?Sized>(reader: &R) -> Result<Self, FormatError> {
        let size = reader.size();
        if size > MAX_MANIFEST_BYTES {
            return Err(FormatError::Manifest(format!(
                "{} is {} bytes, larger than the {} byte limit",
                reader.identifier(),
                size,
                MAX_MANIFEST_BYTES
            )));
        }

        let bytes = reader.read_exact_at(0, size as usize)?;
        Self::from_slice(&bytes)
    }
}
