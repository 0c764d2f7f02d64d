//! Walking the IFD chain of a TIFF file.

use std::collections::HashSet;

use crate::error::TiffError;
use crate::io::RangeReader;

use super::parser::{Ifd, TiffHeader, BIGTIFF_HEADER_SIZE};

/// Maximum number of IFDs to parse (safety limit)
pub const MAX_IFDS: usize = 1024;

/// Read and parse the file header.
pub fn read_header<R: RangeReader + ?Sized>(reader: &R) -> Result<TiffHeader, TiffError> {
    let len = (reader.size() as usize).min(BIGTIFF_HEADER_SIZE);
    let header_bytes = reader.read_exact_at(0, len)?;
    TiffHeader::parse(&header_bytes, reader.size())
}

/// Read a single IFD located at `offset`.
pub fn read_ifd<R: RangeReader + ?Sized>(
    reader: &R,
    header: &TiffHeader,
    offset: u64,
) -> Result<Ifd, TiffError> {
    if offset >= reader.size() {
        return Err(TiffError::InvalidIfdOffset(offset));
    }

    // Entry count first, then the whole directory in one read.
    let count_bytes = reader.read_exact_at(offset, header.ifd_count_size())?;
    let entry_count = header.read_entry_count(&count_bytes);

    let ifd_size = Ifd::calculate_size(entry_count, header);
    let ifd_bytes = reader.read_exact_at(offset, ifd_size)?;
    Ifd::parse(&ifd_bytes, header)
}

/// Read every IFD on the next-IFD chain, in file order.
///
/// Each IFD is returned with the offset it was read from. The walk stops at a
/// zero next offset or after [`MAX_IFDS`] directories; a chain that revisits
/// an offset is rejected.
pub fn read_ifd_chain<R: RangeReader + ?Sized>(
    reader: &R,
    header: &TiffHeader,
) -> Result<Vec<(u64, Ifd)>, TiffError> {
    let mut ifds = Vec::new();
    let mut seen = HashSet::new();
    let mut offset = header.first_ifd_offset;

    while offset != 0 && ifds.len() < MAX_IFDS {
        if !seen.insert(offset) {
            return Err(TiffError::IfdLoop(offset));
        }

        let ifd = read_ifd(reader, header, offset)?;
        let next_offset = ifd.next_ifd_offset;
        ifds.push((offset, ifd));

        offset = next_offset;
    }

    Ok(ifds)
}
