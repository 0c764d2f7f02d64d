//! I/O layer.
//!
//! Parsers read through the [`RangeReader`] trait and never see whether the
//! bytes come from a file or from memory.

mod local;
mod range_reader;

pub use local::{FileRangeReader, MemoryRangeReader};
pub use range_reader::RangeReader;
