use bytes::Bytes;

use crate::error::IoError;

/// Trait for reading byte ranges from a series file.
///
/// The TIFF parser and metadata readers only ever ask for the handful of
/// bytes they need (headers, IFDs, tag values), so a reader never has to
/// load a multi-gigabyte acquisition into memory. The underlying handle is
/// released when the reader is dropped.
pub trait RangeReader {
    /// Read exactly `len` bytes starting at `offset`.
    ///
    /// Returns an error if the range is out of bounds or if the read fails.
    fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError>;

    /// Get the total size of the resource in bytes.
    fn size(&self) -> u64;

    /// Get a unique identifier for this resource (for logging).
    ///
    /// For local files this is the path as given by the caller.
    fn identifier(&self) -> &str;
}

/// Check that `len` bytes at `offset` fit inside a resource of `size` bytes.
pub(crate) fn check_range(offset: u64, len: usize, size: u64) -> Result<(), IoError> {
    let end = offset.checked_add(len as u64);
    match end {
        Some(end) if end <= size => Ok(()),
        _ => Err(IoError::RangeOutOfBounds {
            offset,
            requested: len as u64,
            size,
        }),
    }
}
