//! Series metadata read from baseline TIFF tags.
//!
//! Every full-resolution IFD is one series. Reduced-resolution IFDs
//! (`NewSubfileType` bit 0) are previews of another image and are skipped.
//!
//! Geometry comes from the baseline tags:
//!
//! | Quantity          | Tags                                       |
//! |-------------------|--------------------------------------------|
//! | Pixel size        | `XResolution`, `YResolution` (pixels/unit) |
//! | Stage position    | `XPosition`, `YPosition` (units)           |
//! | Unit              | `ResolutionUnit` (inch when absent)        |
//!
//! Both quantities are reported in micrometres. A TIFF page is a single plane,
//! so there is no Z calibration and no Z position. The first line of
//! `ImageDescription` names the series.

use tracing::debug;

use crate::error::{MetadataError, TiffError};
use crate::format::tiff::{
    read_header, read_ifd_chain, Ifd, ResolutionUnit, TiffHeader, TiffTag, ValueReader,
};
use crate::io::RangeReader;

use super::{Axis, SeriesMetadata};

/// Axis ordering reported for every TIFF series.
pub const TIFF_DIMENSION_ORDER: &str = "XYCZT";

/// Geometry of the active page, in micrometres.
#[derive(Debug, Clone, Default, PartialEq)]
struct PageGeometry {
    width: u32,
    height: u32,
    physical_size: [Option<f64>; 2],
    position: [Option<f64>; 2],
    name: Option<String>,
}

impl PageGeometry {
    fn planar(values: &[Option<f64>; 2], axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => values[0],
            Axis::Y => values[1],
            Axis::Z => None,
        }
    }
}

/// [`SeriesMetadata`] over the pages of a TIFF or BigTIFF file.
///
/// The directory chain is read once on open; tag values of a page are read
/// when the page becomes the active series.
pub struct TiffSeriesMetadata<R: RangeReader> {
    reader: R,
    header: TiffHeader,
    pages: Vec<Ifd>,
    active: usize,
    geometry: PageGeometry,
}

impl<R: RangeReader> TiffSeriesMetadata<R> {
    pub fn open(reader: R) -> Result<Self, MetadataError> {
        let header = read_header(&reader)?;
        let chain = read_ifd_chain(&reader, &header)?;
        let ifd_count = chain.len();

        let pages: Vec<Ifd> = chain
            .into_iter()
            .map(|(_, ifd)| ifd)
            .filter(|ifd| !ifd.is_reduced_resolution(header.byte_order))
            .collect();

        debug!(
            identifier = reader.identifier(),
            bigtiff = header.is_bigtiff,
            ifds = ifd_count,
            series = pages.len(),
            "Read TIFF directory chain"
        );

        let mut metadata = Self {
            reader,
            header,
            pages,
            active: 0,
            geometry: PageGeometry::default(),
        };

        if !metadata.pages.is_empty() {
            metadata.geometry = metadata.read_geometry(0)?;
        }

        Ok(metadata)
    }

    fn read_geometry(&self, series: usize) -> Result<PageGeometry, MetadataError> {
        let ifd = self.pages.get(series).ok_or(MetadataError::SeriesOutOfRange {
            series,
            count: self.pages.len(),
        })?;
        let values = ValueReader::new(&self.reader, &self.header);

        let read_u32 = |tag: TiffTag| -> Result<Option<u32>, TiffError> {
            ifd.get_entry_by_tag(tag)
                .map(|entry| values.read_u32(entry))
                .transpose()
        };
        let read_f64 = |tag: TiffTag| -> Result<Option<f64>, TiffError> {
            ifd.get_entry_by_tag(tag)
                .map(|entry| values.read_f64(entry))
                .transpose()
        };

        let width = read_u32(TiffTag::ImageWidth)?.ok_or(MetadataError::MissingField {
            series,
            field: "ImageWidth",
        })?;
        let height = read_u32(TiffTag::ImageLength)?.ok_or(MetadataError::MissingField {
            series,
            field: "ImageLength",
        })?;

        let unit = read_u32(TiffTag::ResolutionUnit)?
            .map(|value| {
                u16::try_from(value).map_or(ResolutionUnit::None, ResolutionUnit::from_u16)
            })
            .unwrap_or_default();
        let micrometres = unit.micrometres();

        // Resolution is pixels per unit; zero means the page is uncalibrated.
        let pixel_size = |resolution: Option<f64>| {
            resolution
                .filter(|r| r.is_finite() && *r > 0.0)
                .map(|r| micrometres / r)
        };

        let name = ifd
            .get_entry_by_tag(TiffTag::ImageDescription)
            .map(|entry| values.read_string(entry))
            .transpose()?
            .and_then(|description| {
                let line = description.lines().next().unwrap_or("").trim();
                (!line.is_empty()).then(|| line.to_string())
            });

        Ok(PageGeometry {
            width,
            height,
            name,
            physical_size: [
                pixel_size(read_f64(TiffTag::XResolution)?),
                pixel_size(read_f64(TiffTag::YResolution)?),
            ],
            position: [
                read_f64(TiffTag::XPosition)?.map(|p| p * micrometres),
                read_f64(TiffTag::YPosition)?.map(|p| p * micrometres),
            ],
        })
    }
}

impl<R: RangeReader> SeriesMetadata for TiffSeriesMetadata<R> {
    fn identifier(&self) -> &str {
        self.reader.identifier()
    }

    fn series_count(&self) -> usize {
        self.pages.len()
    }

    fn series(&self) -> usize {
        self.active
    }

    fn set_series(&mut self, series: usize) -> Result<(), MetadataError> {
        if series >= self.pages.len() {
            return Err(MetadataError::SeriesOutOfRange {
                series,
                count: self.pages.len(),
            });
        }
        if series != self.active {
            self.geometry = self.read_geometry(series)?;
            self.active = series;
        }
        Ok(())
    }

    fn dimension_order(&self) -> &str {
        TIFF_DIMENSION_ORDER
    }

    fn size_z(&self) -> u32 {
        1
    }

    fn plane_count(&self) -> usize {
        usize::from(!self.pages.is_empty())
    }

    fn stage_position(&self, plane: usize, axis: Axis) -> Option<f64> {
        if plane != 0 {
            return None;
        }
        PageGeometry::planar(&self.geometry.position, axis)
    }

    fn physical_size(&self, axis: Axis) -> Option<f64> {
        PageGeometry::planar(&self.geometry.physical_size, axis)
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        (!self.pages.is_empty()).then_some((self.geometry.width, self.geometry.height))
    }

    fn series_name(&self) -> Option<String> {
        self.geometry.name.clone()
    }
}
