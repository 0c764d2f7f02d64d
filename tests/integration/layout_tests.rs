//! Layout and output integration tests.
//!
//! Tests verify:
//! - Extracted tiles assemble into a layout in series order
//! - Tile configuration text for 2D and 3D layouts
//! - Stitch request JSON carries the pass-through flags

use std::path::Path;

use series_mosaic::{
    extract_tiles, Dimensionality, ExtractOptions, FusionMethod, FusionSettings, Layout,
    StitchRequest, TileConfiguration,
};

use super::test_utils::{manifest_json, path_str, write_temp, IfdBuilder, TiffBuilder};

fn exact() -> ExtractOptions {
    ExtractOptions {
        increase_overlap_percent: 0.0,
        ..ExtractOptions::default()
    }
}

#[test]
fn test_tile_configuration_from_tiff() {
    let tiff = TiffBuilder::new()
        .add_ifd(IfdBuilder::calibrated_page(10_000, 0, 0))
        .add_ifd(IfdBuilder::calibrated_page(10_000, 100, 0))
        .build();
    let file = write_temp(&tiff, ".tif");
    let path = path_str(&file);

    let tiles = extract_tiles(&path, &exact()).unwrap();
    let layout = Layout::from_tiles(tiles, FusionSettings::default()).unwrap();

    let expected = format!(
        "# Define the number of dimensions we are working on\n\
         dim = 2\n\
         \n\
         # Define the image coordinates\n\
         {path}; 0; (0.0, 0.0)\n\
         {path}; 1; (100.0, 0.0)\n"
    );
    assert_eq!(TileConfiguration::render(&layout), expected);
}

#[test]
fn test_tile_configuration_3d_manifest() {
    let manifest = manifest_json(&[(0.0, 0.0, 0.0, 5), (10.0, 0.0, 3.0, 5)], 1.0);
    let file = write_temp(&manifest, ".json");

    let tiles = extract_tiles(&path_str(&file), &exact()).unwrap();
    let layout = Layout::from_tiles(tiles, FusionSettings::default()).unwrap();
    assert_eq!(layout.dimensionality(), Dimensionality::Three);

    let text = TileConfiguration::render(&layout);
    assert!(text.contains("dim = 3\n"));
    assert!(text.ends_with("; 1; (10.0, 0.0, 3.0)\n"));
}

#[test]
fn test_layout_keeps_series_order() {
    let manifest = manifest_json(
        &[
            (30.0, 0.0, 0.0, 1),
            (10.0, 0.0, 0.0, 1),
            (20.0, 0.0, 0.0, 1),
        ],
        1.0,
    );
    let file = write_temp(&manifest, ".json");

    let tiles = extract_tiles(&path_str(&file), &exact()).unwrap();
    let layout = Layout::from_tiles(tiles, FusionSettings::default()).unwrap();

    let order: Vec<_> = layout.tiles().iter().map(|t| t.series_index()).collect();
    assert_eq!(order, vec![0, 1, 2]);
    assert_eq!(layout.tiles()[0].offset(), &[30.0, 0.0]);
}

#[test]
fn test_stitch_request_json() {
    let manifest = manifest_json(&[(0.0, 0.0, 0.0, 1), (50.0, 0.0, 0.0, 1)], 1.0);
    let file = write_temp(&manifest, ".json");
    let path = path_str(&file);

    let tiles = extract_tiles(&path, &exact()).unwrap();
    let fusion = FusionSettings {
        method: FusionMethod::Average,
        ..FusionSettings::default()
    };
    let layout = Layout::from_tiles(tiles, fusion).unwrap();
    let request = StitchRequest::new(layout, true, false, Path::new(&path));

    let json: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
    assert_eq!(json["preview_only"], true);
    assert_eq!(json["compute_overlap"], false);
    assert_eq!(json["configuration_path"], format!("{}.txt", path));
    assert_eq!(json["layout"]["dimensionality"], 2);
    assert_eq!(json["layout"]["fusion"]["method"], "average");
    assert_eq!(json["layout"]["fusion"]["alpha"], 1.5);
    assert_eq!(json["layout"]["tiles"][1]["offset"], serde_json::json!([50.0, 0.0]));
    assert_eq!(json["layout"]["tiles"][1]["source"], path);
}

#[test]
fn test_refined_positions_do_not_move_offsets() {
    let manifest = manifest_json(&[(0.0, 0.0, 0.0, 1), (50.0, 0.0, 0.0, 1)], 1.0);
    let file = write_temp(&manifest, ".json");

    let tiles = extract_tiles(&path_str(&file), &exact()).unwrap();
    let mut layout = Layout::from_tiles(tiles, FusionSettings::default()).unwrap();

    layout.tiles_mut()[1].set_position(&[47.5, 1.25]).unwrap();
    assert_eq!(layout.tiles()[1].position(), &[47.5, 1.25]);
    assert_eq!(layout.tiles()[1].offset(), &[50.0, 0.0]);
}
