//! Format detection for multi-series files.
//!
//! Detection looks at magic bytes only:
//!
//! - **TIFF / BigTIFF**: `II` or `MM` followed by version 42 or 43
//! - **Series manifest**: a JSON object (first non-whitespace byte is `{`)
//!
//! Anything else is reported as [`FormatError::UnsupportedFormat`].

use crate::error::FormatError;
use crate::io::RangeReader;

use super::tiff::{ByteOrder, TIFF_HEADER_SIZE};

// =============================================================================
// SeriesFormat
// =============================================================================

/// Detected container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesFormat {
    /// TIFF or BigTIFF; each full-resolution IFD is one series
    Tiff,

    /// JSON series manifest
    Manifest,
}

impl SeriesFormat {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            SeriesFormat::Tiff => "TIFF",
            SeriesFormat::Manifest => "Series manifest (JSON)",
        }
    }
}

// =============================================================================
// Format Detection
// =============================================================================

/// Number of leading bytes inspected for detection.
const SNIFF_BYTES: usize = 512;

/// Detect the format of a series file.
pub fn detect_format<R: RangeReader + ?Sized>(reader: &R) -> Result<SeriesFormat, FormatError> {
    let len = (reader.size() as usize).min(SNIFF_BYTES);
    if len == 0 {
        return Err(FormatError::UnsupportedFormat {
            reason: format!("{} is empty", reader.identifier()),
        });
    }

    let head = reader.read_exact_at(0, len)?;

    if is_tiff_header(&head) {
        return Ok(SeriesFormat::Tiff);
    }

    if is_json_object(&head) {
        return Ok(SeriesFormat::Manifest);
    }

    Err(FormatError::UnsupportedFormat {
        reason: format!(
            "{} is neither a TIFF file nor a series manifest",
            reader.identifier()
        ),
    })
}

/// Check if bytes represent a valid TIFF header.
pub fn is_tiff_header(bytes: &[u8]) -> bool {
    if bytes.len() < TIFF_HEADER_SIZE {
        return false;
    }

    let byte_order = match &bytes[0..2] {
        b"II" => ByteOrder::LittleEndian,
        b"MM" => ByteOrder::BigEndian,
        _ => return false,
    };

    let version = byte_order.read_u16(&bytes[2..4]);
    version == 42 || version == 43
}

/// Check if bytes start a JSON object, ignoring leading whitespace and a UTF-8 BOM.
fn is_json_object(bytes: &[u8]) -> bool {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'{')
}

// =============================================================================
// Tests
// =============================================================================
