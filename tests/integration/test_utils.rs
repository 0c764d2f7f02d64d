//! Test utilities for integration tests.
//!
//! This module provides TIFF and manifest builders, on-disk fixtures and
//! metadata services that record how they are used.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tempfile::NamedTempFile;

use series_mosaic::error::{IoError, MetadataError};
use series_mosaic::format::AxisValues;
use series_mosaic::io::RangeReader;
use series_mosaic::metadata::{
    Axis, InMemoryMetadata, MetadataService, SeriesMetadata, SeriesRecord,
};

// =============================================================================
// Tracking Range Reader
// =============================================================================

/// An in-memory range reader that counts read requests.
#[derive(Clone)]
pub struct TrackingReader {
    data: Bytes,
    identifier: String,
    request_count: Arc<AtomicUsize>,
}

impl TrackingReader {
    pub fn new(data: Vec<u8>, identifier: impl Into<String>) -> Self {
        Self {
            data: Bytes::from(data),
            identifier: identifier.into(),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl RangeReader for TrackingReader {
    fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        let start = offset as usize;
        let end = start + len;
        if end > self.data.len() {
            return Err(IoError::RangeOutOfBounds {
                offset,
                requested: len as u64,
                size: self.data.len() as u64,
            });
        }
        Ok(self.data.slice(start..end))
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

// =============================================================================
// Tracking Metadata Service
// =============================================================================

/// Counters shared between a [`TrackingService`] and the handles it opens.
#[derive(Debug, Default)]
pub struct HandleCounters {
    opened: AtomicUsize,
    released: AtomicUsize,
}

impl HandleCounters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

/// A metadata service over fixed records whose handles report when dropped.
///
/// `fail_on_series` makes selecting that series fail, to exercise error
/// paths after the file is open.
pub struct TrackingService {
    records: Vec<SeriesRecord>,
    fail_on_series: Option<usize>,
    counters: Arc<HandleCounters>,
}

impl TrackingService {
    pub fn new(records: Vec<SeriesRecord>) -> Self {
        Self {
            records,
            fail_on_series: None,
            counters: Arc::new(HandleCounters::default()),
        }
    }

    pub fn failing_on(mut self, series: usize) -> Self {
        self.fail_on_series = Some(series);
        self
    }

    pub fn counters(&self) -> Arc<HandleCounters> {
        Arc::clone(&self.counters)
    }
}

impl MetadataService for TrackingService {
    fn open(&self, path: &Path) -> Result<Box<dyn SeriesMetadata>, MetadataError> {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TrackedHandle {
            inner: InMemoryMetadata::new(path.display().to_string(), self.records.clone()),
            fail_on_series: self.fail_on_series,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct TrackedHandle {
    inner: InMemoryMetadata,
    fail_on_series: Option<usize>,
    counters: Arc<HandleCounters>,
}

impl Drop for TrackedHandle {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl SeriesMetadata for TrackedHandle {
    fn identifier(&self) -> &str {
        self.inner.identifier()
    }

    fn series_count(&self) -> usize {
        self.inner.series_count()
    }

    fn series(&self) -> usize {
        self.inner.series()
    }

    fn set_series(&mut self, series: usize) -> Result<(), MetadataError> {
        if self.fail_on_series == Some(series) {
            return Err(MetadataError::MissingField {
                series,
                field: "stage position",
            });
        }
        self.inner.set_series(series)
    }

    fn dimension_order(&self) -> &str {
        self.inner.dimension_order()
    }

    fn size_z(&self) -> u32 {
        self.inner.size_z()
    }

    fn plane_count(&self) -> usize {
        self.inner.plane_count()
    }

    fn stage_position(&self, plane: usize, axis: Axis) -> Option<f64> {
        self.inner.stage_position(plane, axis)
    }

    fn stage_label(&self, axis: Axis) -> Option<f64> {
        self.inner.stage_label(axis)
    }

    fn physical_size(&self, axis: Axis) -> Option<f64> {
        self.inner.physical_size(axis)
    }
}

/// A calibrated single-plane series at stage position `(x, y, z)`.
pub fn series_at(x: f64, y: f64, z: f64, pixel_size: f64) -> SeriesRecord {
    SeriesRecord::new("XYCZT")
        .with_physical_size(AxisValues::xyz(pixel_size, pixel_size, pixel_size))
        .with_plane(AxisValues::xyz(x, y, z))
}

/// Assert two coordinate lists are equal within floating point noise.
pub fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{:?} vs {:?}", actual, expected);
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Write `data` to a temporary file with the given suffix.
pub fn write_temp(data: &[u8], suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(data).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Path of a temporary file as a string.
pub fn path_str(file: &NamedTempFile) -> String {
    file.path().display().to_string()
}

// =============================================================================
// TIFF File Builders
// =============================================================================

/// Builder for creating test TIFF files.
///
/// Each IFD is written followed by the values that do not fit inline, and
/// chained to the next IFD.
pub struct TiffBuilder {
    byte_order: ByteOrderType,
    is_bigtiff: bool,
    ifds: Vec<IfdBuilder>,
}

#[derive(Clone, Copy)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

impl TiffBuilder {
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrderType::LittleEndian,
            is_bigtiff: false,
            ifds: Vec::new(),
        }
    }

    pub fn with_byte_order(mut self, order: ByteOrderType) -> Self {
        self.byte_order = order;
        self
    }

    pub fn with_bigtiff(mut self, is_bigtiff: bool) -> Self {
        self.is_bigtiff = is_bigtiff;
        self
    }

    pub fn add_ifd(mut self, ifd: IfdBuilder) -> Self {
        self.ifds.push(ifd);
        self
    }

    /// Build the TIFF file data.
    pub fn build(self) -> Vec<u8> {
        let order = self.byte_order;
        let mut data = Vec::new();

        match order {
            ByteOrderType::LittleEndian => data.extend(b"II"),
            ByteOrderType::BigEndian => data.extend(b"MM"),
        }

        if self.is_bigtiff {
            write_value(&mut data, order, 43, 2);
            write_value(&mut data, order, 8, 2); // Offset size
            write_value(&mut data, order, 0, 2);
            write_value(&mut data, order, 16, 8);
        } else {
            write_value(&mut data, order, 42, 2);
            write_value(&mut data, order, 8, 4);
        }

        let (count_size, entry_size, offset_size) = if self.is_bigtiff {
            (8, 20, 8)
        } else {
            (2, 12, 4)
        };

        for (idx, ifd) in self.ifds.iter().enumerate() {
            let mut entries: Vec<&IfdEntryBuilder> = ifd.entries.iter().collect();
            entries.sort_by_key(|e| e.tag);

            let ifd_size = count_size + entries.len() * entry_size + offset_size;
            let external_start = data.len() + ifd_size;
            let mut external = Vec::new();

            write_value(&mut data, order, entries.len() as u64, count_size);
            for entry in entries {
                let bytes = entry.value.encode(order);
                write_value(&mut data, order, entry.tag as u64, 2);
                write_value(&mut data, order, entry.value.field_type() as u64, 2);
                write_value(&mut data, order, entry.value.count() as u64, offset_size);

                if bytes.len() <= offset_size {
                    let mut inline = bytes;
                    inline.resize(offset_size, 0);
                    data.extend(inline);
                } else {
                    let offset = (external_start + external.len()) as u64;
                    write_value(&mut data, order, offset, offset_size);
                    external.extend(bytes);
                    if external.len() % 2 == 1 {
                        external.push(0);
                    }
                }
            }

            let next_ifd_offset = if idx + 1 < self.ifds.len() {
                (external_start + external.len()) as u64
            } else {
                0
            };
            write_value(&mut data, order, next_ifd_offset, offset_size);
            data.extend(external);
        }

        data
    }
}

impl Default for TiffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating IFD entries.
#[derive(Default)]
pub struct IfdBuilder {
    entries: Vec<IfdEntryBuilder>,
}

struct IfdEntryBuilder {
    tag: u16,
    value: EntryValue,
}

enum EntryValue {
    Short(u16),
    Long(u32),
    Rational(u32, u32),
    Double(f64),
    Ascii(String),
}

impl EntryValue {
    fn field_type(&self) -> u16 {
        match self {
            EntryValue::Short(_) => 3,
            EntryValue::Long(_) => 4,
            EntryValue::Rational(..) => 5,
            EntryValue::Double(_) => 12,
            EntryValue::Ascii(_) => 2,
        }
    }

    fn count(&self) -> usize {
        match self {
            EntryValue::Ascii(s) => s.len() + 1,
            _ => 1,
        }
    }

    fn encode(&self, order: ByteOrderType) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            EntryValue::Short(v) => write_value(&mut out, order, *v as u64, 2),
            EntryValue::Long(v) => write_value(&mut out, order, *v as u64, 4),
            EntryValue::Rational(num, den) => {
                write_value(&mut out, order, *num as u64, 4);
                write_value(&mut out, order, *den as u64, 4);
            }
            EntryValue::Double(v) => write_value(&mut out, order, v.to_bits(), 8),
            EntryValue::Ascii(s) => {
                out.extend(s.as_bytes());
                out.push(0);
            }
        }
        out
    }
}

impl IfdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A full-resolution page with width and height.
    pub fn page(width: u32, height: u32) -> Self {
        Self::new()
            .with_long(256, width) // ImageWidth
            .with_long(257, height) // ImageLength
    }

    /// A calibrated page in centimetre units.
    ///
    /// `pixels_per_cm` sets both resolutions; the position is given in
    /// micrometres and stored as a rational in centimetres.
    pub fn calibrated_page(pixels_per_cm: u32, x_um: u32, y_um: u32) -> Self {
        Self::page(64, 64)
            .with_rational(282, pixels_per_cm, 1) // XResolution
            .with_rational(283, pixels_per_cm, 1) // YResolution
            .with_rational(286, x_um, 10_000) // XPosition
            .with_rational(287, y_um, 10_000) // YPosition
            .with_short(296, 3) // ResolutionUnit = Centimeter
    }

    /// Mark the page as a reduced-resolution copy.
    pub fn reduced(self) -> Self {
        self.with_long(254, 1)
    }

    pub fn with_short(mut self, tag: u16, value: u16) -> Self {
        self.push(tag, EntryValue::Short(value));
        self
    }

    pub fn with_long(mut self, tag: u16, value: u32) -> Self {
        self.push(tag, EntryValue::Long(value));
        self
    }

    pub fn with_rational(mut self, tag: u16, num: u32, den: u32) -> Self {
        self.push(tag, EntryValue::Rational(num, den));
        self
    }

    pub fn with_double(mut self, tag: u16, value: f64) -> Self {
        self.push(tag, EntryValue::Double(value));
        self
    }

    pub fn with_ascii(mut self, tag: u16, value: &str) -> Self {
        self.push(tag, EntryValue::Ascii(value.to_string()));
        self
    }

    fn push(&mut self, tag: u16, value: EntryValue) {
        self.entries.retain(|e| e.tag != tag);
        self.entries.push(IfdEntryBuilder { tag, value });
    }
}

fn write_value(data: &mut Vec<u8>, order: ByteOrderType, value: u64, size: usize) {
    let bytes = match order {
        ByteOrderType::LittleEndian => value.to_le_bytes(),
        ByteOrderType::BigEndian => value.to_be_bytes(),
    };
    match order {
        ByteOrderType::LittleEndian => data.extend(&bytes[..size]),
        ByteOrderType::BigEndian => data.extend(&bytes[8 - size..]),
    }
}

// =============================================================================
// Manifest Builders
// =============================================================================

/// A JSON manifest with one single-plane series per `(x, y, z, size_z)`.
pub fn manifest_json(series: &[(f64, f64, f64, u32)], pixel_size: f64) -> Vec<u8> {
    let entries: Vec<serde_json::Value> = series
        .iter()
        .enumerate()
        .map(|(i, &(x, y, z, size_z))| {
            serde_json::json!({
                "name": format!("tile-{}", i),
                "dimension_order": "XYZCT",
                "size_z": size_z,
                "physical_size": { "x": pixel_size, "y": pixel_size, "z": pixel_size },
                "planes": [ { "x": x, "y": y, "z": z } ],
            })
        })
        .collect();

    serde_json::to_vec_pretty(&serde_json::json!({ "series": entries }))
        .expect("serialize manifest")
}
