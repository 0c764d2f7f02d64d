//! Series metadata held entirely in memory.
//!
//! Backs JSON manifests and lets callers describe a mosaic without a file on
//! disk.

use crate::error::MetadataError;
use crate::format::{AxisValues, ManifestSeries, SeriesManifest};

use super::{Axis, SeriesMetadata};

/// Geometry of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub name: Option<String>,
    pub dimension_order: String,
    pub size_z: u32,
    pub physical_size: AxisValues,
    pub stage_label: AxisValues,
    pub planes: Vec<AxisValues>,
}

impl SeriesRecord {
    /// A single-plane series with no calibration and no positions.
    pub fn new(dimension_order: impl Into<String>) -> Self {
        Self {
            name: None,
            dimension_order: dimension_order.into(),
            size_z: 1,
            physical_size: AxisValues::default(),
            stage_label: AxisValues::default(),
            planes: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_size_z(mut self, size_z: u32) -> Self {
        self.size_z = size_z;
        self
    }

    pub fn with_physical_size(mut self, physical_size: AxisValues) -> Self {
        self.physical_size = physical_size;
        self
    }

    pub fn with_stage_label(mut self, stage_label: AxisValues) -> Self {
        self.stage_label = stage_label;
        self
    }

    /// Append a plane with the given stage position.
    pub fn with_plane(mut self, position: AxisValues) -> Self {
        self.planes.push(position);
        self
    }

    /// Convert manifest entry `index`; the dimension order is required.
    pub fn from_manifest(index: usize, series: ManifestSeries) -> Result<Self, MetadataError> {
        let dimension_order = series
            .dimension_order
            .filter(|order| !order.trim().is_empty())
            .ok_or(MetadataError::MissingField {
                series: index,
                field: "dimension_order",
            })?;

        Ok(Self {
            name: series.name,
            dimension_order,
            size_z: series.size_z,
            physical_size: series.physical_size,
            stage_label: series.stage_label,
            planes: series.planes,
        })
    }
}

/// [`SeriesMetadata`] over a list of [`SeriesRecord`]s.
#[derive(Debug, Clone)]
pub struct InMemoryMetadata {
    identifier: String,
    records: Vec<SeriesRecord>,
    active: usize,
}

impl InMemoryMetadata {
    pub fn new(identifier: impl Into<String>, records: Vec<SeriesRecord>) -> Self {
        Self {
            identifier: identifier.into(),
            records,
            active: 0,
        }
    }

    /// Build from a decoded manifest, validating every entry up front.
    pub fn from_manifest(
        identifier: impl Into<String>,
        manifest: SeriesManifest,
    ) -> Result<Self, MetadataError> {
        let records = manifest
            .series
            .into_iter()
            .enumerate()
            .map(|(index, series)| SeriesRecord::from_manifest(index, series))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(identifier, records))
    }

    pub fn records(&self) -> &[SeriesRecord] {
        &self.records
    }

    fn current(&self) -> Option<&SeriesRecord> {
        self.records.get(self.active)
    }
}

impl SeriesMetadata for InMemoryMetadata {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn series_count(&self) -> usize {
        self.records.len()
    }

    fn series(&self) -> usize {
        self.active
    }

    fn set_series(&mut self, series: usize) -> Result<(), MetadataError> {
        if series >= self.records.len() {
            return Err(MetadataError::SeriesOutOfRange {
                series,
                count: self.records.len(),
            });
        }
        self.active = series;
        Ok(())
    }

    fn dimension_order(&self) -> &str {
        self.current().map_or("", |r| r.dimension_order.as_str())
    }

    fn size_z(&self) -> u32 {
        self.current().map_or(1, |r| r.size_z)
    }

    fn plane_count(&self) -> usize {
        self.current().map_or(0, |r| r.planes.len())
    }

    fn stage_position(&self, plane: usize, axis: Axis) -> Option<f64> {
        self.current()?.planes.get(plane)?.get(axis)
    }

    fn stage_label(&self, axis: Axis) -> Option<f64> {
        self.current()?.stage_label.get(axis)
    }

    fn physical_size(&self, axis: Axis) -> Option<f64> {
        self.current()?.physical_size.get(axis)
    }

    fn series_name(&self) -> Option<String> {
        self.current()?.name.clone()
    }
}
