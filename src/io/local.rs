//! Local range readers.
//!
//! [`FileRangeReader`] owns an open file handle for the lifetime of a
//! metadata query session; the handle is closed when the reader is dropped.
//! [`MemoryRangeReader`] serves the same interface from a byte buffer.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::error::IoError;

use super::range_reader::{check_range, RangeReader};

// =============================================================================
// FileRangeReader
// =============================================================================

/// Range reader backed by a local file.
#[derive(Debug)]
pub struct FileRangeReader {
    file: File,
    size: u64,
    identifier: String,
}

impl FileRangeReader {
    /// Open `path` for reading.
    ///
    /// A missing file maps to [`IoError::NotFound`]; any other failure to open
    /// or stat the file maps to [`IoError::Io`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let identifier = path.display().to_string();

        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => IoError::NotFound(identifier.clone()),
            _ => IoError::Io(format!("{}: {}", identifier, e)),
        })?;
        let size = file.metadata()?.len();

        debug!(file = %identifier, size, "Opened series file");

        Ok(Self {
            file,
            size,
            identifier,
        })
    }
}

impl RangeReader for FileRangeReader {
    fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        check_range(offset, len, self.size)?;

        // `&File` implements Read + Seek, so a shared borrow is enough.
        let mut handle = &self.file;
        handle.seek(SeekFrom::Start(offset))?;

        let mut buf = vec![0u8; len];
        handle.read_exact(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl Drop for FileRangeReader {
    fn drop(&mut self) {
        debug!(file = %self.identifier, "Closing series file");
    }
}

// =============================================================================
// MemoryRangeReader
// =============================================================================

/// Range reader over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct MemoryRangeReader {
    data: Bytes,
    identifier: String,
}

impl MemoryRangeReader {
    pub fn new(data: impl Into<Bytes>, identifier: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            identifier: identifier.into(),
        }
    }
}

impl RangeReader for MemoryRangeReader {
    fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        check_range(offset, len, self.data.len() as u64)?;
        let start = offset as usize;
        Ok(self.data.slice(start..start + len))
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
