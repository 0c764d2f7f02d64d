//! TIFF structure parsing.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF files declare their endianness (II = little-endian, MM = big-endian)
//!   in the header. All multi-byte values must be read respecting this order.
//!
//! - **Classic TIFF vs BigTIFF**: Classic TIFF uses 32-bit offsets, BigTIFF uses 64-bit
//!   offsets. The parser handles both transparently.
//!
//! - **IFD (Image File Directory)**: Metadata for one image. A multi-series
//!   acquisition stores one full-resolution IFD per tile, optionally followed
//!   by reduced-resolution copies.
//!
//! - **Inline vs offset values**: Small values are stored inline in the IFD entry,
//!   larger values (rationals, strings) at an offset pointed to by the entry.

mod directory;
mod parser;
mod tags;
mod values;

pub use directory::{read_header, read_ifd, read_ifd_chain, MAX_IFDS};
pub use parser::{ByteOrder, Ifd, IfdEntry, TiffHeader, BIGTIFF_HEADER_SIZE, TIFF_HEADER_SIZE};
pub use tags::{FieldType, ResolutionUnit, TiffTag};
pub use values::ValueReader;
