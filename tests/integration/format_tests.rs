//! Format-specific integration tests.
//!
//! Tests verify:
//! - TIFF series metadata reads little-endian and big-endian files alike
//! - BigTIFF files are parsed correctly
//! - Tag values are read only when a series is selected
//! - Format detection through the file metadata service

use series_mosaic::format::tiff::{read_header, read_ifd_chain};
use series_mosaic::format::SeriesFormat;
use series_mosaic::metadata::{Axis, FileMetadataService, SeriesMetadata, TiffSeriesMetadata};
use series_mosaic::MetadataError;

use super::test_utils::{
    assert_close, manifest_json, write_temp, ByteOrderType, IfdBuilder, TiffBuilder,
    TrackingReader,
};

fn two_page_tiff(order: ByteOrderType, bigtiff: bool) -> Vec<u8> {
    TiffBuilder::new()
        .with_byte_order(order)
        .with_bigtiff(bigtiff)
        .add_ifd(IfdBuilder::calibrated_page(40_000, 2500, 500).with_ascii(270, "A1\nextra"))
        .add_ifd(IfdBuilder::calibrated_page(40_000, 5000, 750).with_ascii(270, "A2"))
        .build()
}

fn open(data: Vec<u8>) -> TiffSeriesMetadata<TrackingReader> {
    TiffSeriesMetadata::open(TrackingReader::new(data, "mem://mosaic.tif")).unwrap()
}

fn geometry(meta: &dyn SeriesMetadata) -> Vec<f64> {
    vec![
        meta.stage_position(0, Axis::X).unwrap(),
        meta.stage_position(0, Axis::Y).unwrap(),
        meta.physical_size(Axis::X).unwrap(),
        meta.physical_size(Axis::Y).unwrap(),
    ]
}

// =============================================================================
// TIFF Byte Order Tests
// =============================================================================

#[test]
fn test_little_endian_tiff() {
    let data = two_page_tiff(ByteOrderType::LittleEndian, false);
    assert_eq!(&data[0..2], b"II");

    let mut meta = open(data);
    assert_eq!(meta.series_count(), 2);
    assert_close(&geometry(&meta), &[2500.0, 500.0, 0.25, 0.25]);

    meta.set_series(1).unwrap();
    assert_close(&geometry(&meta), &[5000.0, 750.0, 0.25, 0.25]);
}

#[test]
fn test_big_endian_tiff() {
    let data = two_page_tiff(ByteOrderType::BigEndian, false);
    assert_eq!(&data[0..2], b"MM");

    let mut meta = open(data);
    assert_eq!(meta.series_count(), 2);
    assert_eq!(meta.dimensions(), Some((64, 64)));

    meta.set_series(1).unwrap();
    assert_close(&geometry(&meta), &[5000.0, 750.0, 0.25, 0.25]);
}

#[test]
fn test_both_byte_orders_produce_equivalent_results() {
    let mut le = open(two_page_tiff(ByteOrderType::LittleEndian, false));
    let mut be = open(two_page_tiff(ByteOrderType::BigEndian, false));

    for series in 0..2 {
        le.set_series(series).unwrap();
        be.set_series(series).unwrap();
        assert_eq!(geometry(&le), geometry(&be));
        assert_eq!(le.series_name(), be.series_name());
    }
}

// =============================================================================
// BigTIFF Tests
// =============================================================================

#[test]
fn test_bigtiff_parsing() {
    for order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        let reader = TrackingReader::new(two_page_tiff(order, true), "mem://big.tif");
        let header = read_header(&reader).unwrap();
        assert!(header.is_bigtiff);
        assert_eq!(read_ifd_chain(&reader, &header).unwrap().len(), 2);

        let mut meta = TiffSeriesMetadata::open(reader).unwrap();
        meta.set_series(1).unwrap();
        assert_close(&geometry(&meta), &[5000.0, 750.0, 0.25, 0.25]);
    }
}

// =============================================================================
// Tag Values
// =============================================================================

#[test]
fn test_series_name_from_description() {
    let mut meta = open(two_page_tiff(ByteOrderType::LittleEndian, false));
    assert_eq!(meta.series_name().as_deref(), Some("A1"));

    meta.set_series(1).unwrap();
    assert_eq!(meta.series_name().as_deref(), Some("A2"));
}

#[test]
fn test_double_positions() {
    let data = TiffBuilder::new()
        .add_ifd(
            IfdBuilder::page(16, 16)
                .with_double(286, 0.125)
                .with_double(287, -0.5)
                .with_short(296, 3),
        )
        .build();

    let meta = open(data);
    assert_close(
        &[
            meta.stage_position(0, Axis::X).unwrap(),
            meta.stage_position(0, Axis::Y).unwrap(),
        ],
        &[1250.0, -5000.0],
    );
    assert_eq!(meta.physical_size(Axis::X), None);
}

#[test]
fn test_values_read_on_selection() {
    let data = two_page_tiff(ByteOrderType::LittleEndian, false);
    let reader = TrackingReader::new(data, "mem://lazy.tif");
    let mut meta = TiffSeriesMetadata::open(reader.clone()).unwrap();

    let after_open = reader.request_count();

    // Selecting the active series again reads nothing
    meta.set_series(0).unwrap();
    assert_eq!(reader.request_count(), after_open);

    meta.set_series(1).unwrap();
    assert!(reader.request_count() > after_open);
}

#[test]
fn test_ifd_loop_is_rejected() {
    let mut data = TiffBuilder::new()
        .add_ifd(IfdBuilder::page(8, 8))
        .build();
    // Point the only IFD's next offset back at itself (offset 8)
    let next_pos = data.len() - 4;
    data[next_pos..].copy_from_slice(&8u32.to_le_bytes());

    let result = TiffSeriesMetadata::open(TrackingReader::new(data, "mem://loop.tif"));
    assert!(matches!(result, Err(MetadataError::Format(_))));
}

// =============================================================================
// Format Detection
// =============================================================================

#[test]
fn test_service_detects_tiff() {
    let file = write_temp(&two_page_tiff(ByteOrderType::BigEndian, true), ".tif");
    let (format, meta) = FileMetadataService::new()
        .open_detected(file.path())
        .unwrap();

    assert_eq!(format, SeriesFormat::Tiff);
    assert_eq!(meta.series_count(), 2);
    assert_eq!(meta.dimension_order(), "XYCZT");
}

#[test]
fn test_service_detects_manifest() {
    let file = write_temp(&manifest_json(&[(0.0, 0.0, 0.0, 3)], 0.5), ".json");
    let (format, meta) = FileMetadataService::new()
        .open_detected(file.path())
        .unwrap();

    assert_eq!(format, SeriesFormat::Manifest);
    assert_eq!(meta.series_count(), 1);
    assert_eq!(meta.size_z(), 3);
    assert_eq!(meta.series_name().as_deref(), Some("tile-0"));
}
