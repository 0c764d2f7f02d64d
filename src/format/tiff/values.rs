//! TIFF tag value reading.
//!
//! Values are stored either inline in the IFD entry (small values) or at an
//! offset in the file. [`ValueReader`] hides the difference and decodes the
//! numeric and string types that carry series geometry.

use bytes::Bytes;

use crate::error::TiffError;
use crate::io::RangeReader;

use super::parser::{ByteOrder, IfdEntry, TiffHeader};
use super::tags::FieldType;

// =============================================================================
// ValueReader
// =============================================================================

/// Reads tag values from a TIFF file, respecting its byte order and layout.
pub struct ValueReader<'a, R: RangeReader + ?Sized> {
    reader: &'a R,
    header: &'a TiffHeader,
}

impl<'a, R: RangeReader + ?Sized> ValueReader<'a, R> {
    pub fn new(reader: &'a R, header: &'a TiffHeader) -> Self {
        Self { reader, header }
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    /// Read raw bytes for an IFD entry's value.
    pub fn read_bytes(&self, entry: &IfdEntry) -> Result<Bytes, TiffError> {
        let size = entry
            .value_byte_size()
            .ok_or(TiffError::UnknownFieldType(entry.field_type_raw))?;

        if entry.is_inline {
            Ok(Bytes::copy_from_slice(
                &entry.value_offset_bytes[..size as usize],
            ))
        } else {
            let offset = entry.value_offset(self.header.byte_order);
            Ok(self.reader.read_exact_at(offset, size as usize)?)
        }
    }

    /// Read a single unsigned integer (Short or Long).
    pub fn read_u32(&self, entry: &IfdEntry) -> Result<u32, TiffError> {
        if let Some(value) = entry.inline_u32(self.header.byte_order) {
            return Ok(value);
        }

        let field_type = entry
            .field_type
            .ok_or(TiffError::UnknownFieldType(entry.field_type_raw))?;

        if entry.count == 0 {
            return Err(TiffError::InvalidTagValue {
                tag: tag_name(entry),
                message: "entry has no values".to_string(),
            });
        }

        let bytes = self.read_bytes(entry)?;
        let byte_order = self.header.byte_order;

        match field_type {
            FieldType::Short => Ok(byte_order.read_u16(&bytes) as u32),
            FieldType::Long => Ok(byte_order.read_u32(&bytes)),
            _ => Err(TiffError::InvalidTagValue {
                tag: tag_name(entry),
                message: format!("expected Short or Long, got {:?}", field_type),
            }),
        }
    }

    /// Read the first value of a numeric entry as `f64`.
    ///
    /// Integer, rational and floating point types are accepted. A rational
    /// with a zero denominator reads as 0.0.
    pub fn read_f64(&self, entry: &IfdEntry) -> Result<f64, TiffError> {
        let field_type = entry
            .field_type
            .ok_or(TiffError::UnknownFieldType(entry.field_type_raw))?;

        if entry.count == 0 {
            return Err(TiffError::InvalidTagValue {
                tag: tag_name(entry),
                message: "entry has no values".to_string(),
            });
        }

        let bytes = self.read_bytes(entry)?;
        let order = self.header.byte_order;

        let value = match field_type {
            FieldType::Byte => bytes[0] as f64,
            FieldType::Short => order.read_u16(&bytes) as f64,
            FieldType::Long => order.read_u32(&bytes) as f64,
            FieldType::SLong => order.read_u32(&bytes) as i32 as f64,
            FieldType::Long8 => order.read_u64(&bytes) as f64,
            FieldType::Rational => {
                ratio(order.read_u32(&bytes[0..4]) as f64, order.read_u32(&bytes[4..8]) as f64)
            }
            FieldType::SRational => ratio(
                order.read_u32(&bytes[0..4]) as i32 as f64,
                order.read_u32(&bytes[4..8]) as i32 as f64,
            ),
            FieldType::Float => f32::from_bits(order.read_u32(&bytes)) as f64,
            FieldType::Double => f64::from_bits(order.read_u64(&bytes)),
            FieldType::Ascii | FieldType::Undefined => {
                return Err(TiffError::InvalidTagValue {
                    tag: tag_name(entry),
                    message: format!("expected a numeric type, got {:?}", field_type),
                });
            }
        };

        Ok(value)
    }

    /// Read a string value (ASCII type), stripping the null terminator.
    pub fn read_string(&self, entry: &IfdEntry) -> Result<String, TiffError> {
        let field_type = entry
            .field_type
            .ok_or(TiffError::UnknownFieldType(entry.field_type_raw))?;

        if field_type != FieldType::Ascii {
            return Err(TiffError::InvalidTagValue {
                tag: tag_name(entry),
                message: format!("expected Ascii type for string, got {:?}", field_type),
            });
        }

        let bytes = self.read_bytes(entry)?;

        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn tag_name(entry: &IfdEntry) -> &'static str {
    entry.tag().map(|t| t.name()).unwrap_or("unknown")
}

// =============================================================================
// Tests
// =============================================================================
