use std::path::Path;

use tracing::debug;

use crate::error::MetadataError;
use crate::format::{detect_format, SeriesFormat, SeriesManifest};
use crate::io::{FileRangeReader, RangeReader};

use super::{InMemoryMetadata, MetadataService, SeriesMetadata, TiffSeriesMetadata};

/// Opens series files from the local filesystem.
///
/// The format is detected from the file's leading bytes:
/// TIFF files are read through [`TiffSeriesMetadata`], which keeps the file
/// open until the handle is dropped. Manifests are decoded eagerly and the file
/// is closed before `open` returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMetadataService;

impl FileMetadataService {
    pub fn new() -> Self {
        Self
    }

    /// Open `path` and report which format it was read as.
    pub fn open_detected(
        &self,
        path: &Path,
    ) -> Result<(SeriesFormat, Box<dyn SeriesMetadata>), MetadataError> {
        let reader = FileRangeReader::open(path)?;
        let format = detect_format(&reader)?;

        debug!(
            path = %path.display(),
            format = format.name(),
            size = reader.size(),
            "Opened series file"
        );

        let metadata: Box<dyn SeriesMetadata> = match format {
            SeriesFormat::Tiff => Box::new(TiffSeriesMetadata::open(reader)?),
            SeriesFormat::Manifest => {
                let manifest = SeriesManifest::read(&reader)?;
                Box::new(InMemoryMetadata::from_manifest(
                    reader.identifier(),
                    manifest,
                )?)
            }
        };

        Ok((format, metadata))
    }
}

impl MetadataService for FileMetadataService {
    fn open(&self, path: &Path) -> Result<Box<dyn SeriesMetadata>, MetadataError> {
        self.open_detected(path).map(|(_, metadata)| metadata)
    }
}
