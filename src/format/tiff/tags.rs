//! TIFF tag and field type definitions.
//!
//! Only the vocabulary needed to locate series and read their geometry is
//! defined here: image size, subfile type, resolution and position.

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer (1 byte)
    Byte = 1,

    /// 8-bit ASCII character (1 byte)
    Ascii = 2,

    /// Unsigned 16-bit integer (2 bytes)
    Short = 3,

    /// Unsigned 32-bit integer (4 bytes)
    Long = 4,

    /// Two Longs: numerator, denominator (8 bytes)
    Rational = 5,

    /// Undefined byte data (1 byte per element)
    Undefined = 7,

    /// Signed 32-bit integer (4 bytes)
    SLong = 9,

    /// Two SLongs: numerator, denominator (8 bytes)
    SRational = 10,

    /// IEEE single precision (4 bytes)
    Float = 11,

    /// IEEE double precision (8 bytes)
    Double = 12,

    /// Unsigned 64-bit integer (8 bytes) - BigTIFF only
    Long8 = 16,
}

impl FieldType {
    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::Undefined => 1,
            FieldType::Short => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double | FieldType::Long8 => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unsupported or unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            7 => Some(FieldType::Undefined),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            16 => Some(FieldType::Long8),
            _ => None,
        }
    }

    /// Maximum bytes that can be stored inline in a classic TIFF IFD entry.
    pub const INLINE_THRESHOLD_TIFF: usize = 4;

    /// Maximum bytes that can be stored inline in a BigTIFF IFD entry.
    pub const INLINE_THRESHOLD_BIGTIFF: usize = 8;

    /// Check if a value with this type and count fits inline in an entry.
    #[inline]
    pub fn fits_inline(self, count: u64, is_bigtiff: bool) -> bool {
        let total_size = (self.size_in_bytes() as u64).saturating_mul(count);
        let threshold = if is_bigtiff {
            Self::INLINE_THRESHOLD_BIGTIFF as u64
        } else {
            Self::INLINE_THRESHOLD_TIFF as u64
        };
        total_size <= threshold
    }
}

// =============================================================================
// TIFF Tags
// =============================================================================

/// TIFF tag IDs used when reading series geometry.
///
/// Tags not listed here are kept as raw entries and otherwise ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TiffTag {
    /// Bit field; bit 0 marks a reduced-resolution image
    NewSubfileType = 254,

    /// Image width in pixels
    ImageWidth = 256,

    /// Image height (length) in pixels
    ImageLength = 257,

    /// Free-form description, often holding acquisition software metadata
    ImageDescription = 270,

    /// Pixels per resolution unit along X
    XResolution = 282,

    /// Pixels per resolution unit along Y
    YResolution = 283,

    /// Horizontal offset of the image, in resolution units
    XPosition = 286,

    /// Vertical offset of the image, in resolution units
    YPosition = 287,

    /// Unit of resolution and position (1=none, 2=inch, 3=centimeter)
    ResolutionUnit = 296,
}

impl TiffTag {
    /// Create a TiffTag from its numeric value.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            254 => Some(TiffTag::NewSubfileType),
            256 => Some(TiffTag::ImageWidth),
            257 => Some(TiffTag::ImageLength),
            270 => Some(TiffTag::ImageDescription),
            282 => Some(TiffTag::XResolution),
            283 => Some(TiffTag::YResolution),
            286 => Some(TiffTag::XPosition),
            287 => Some(TiffTag::YPosition),
            296 => Some(TiffTag::ResolutionUnit),
            _ => None,
        }
    }

    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Tag name for error messages.
    pub const fn name(self) -> &'static str {
        match self {
            TiffTag::NewSubfileType => "NewSubfileType",
            TiffTag::ImageWidth => "ImageWidth",
            TiffTag::ImageLength => "ImageLength",
            TiffTag::ImageDescription => "ImageDescription",
            TiffTag::XResolution => "XResolution",
            TiffTag::YResolution => "YResolution",
            TiffTag::XPosition => "XPosition",
            TiffTag::YPosition => "YPosition",
            TiffTag::ResolutionUnit => "ResolutionUnit",
        }
    }
}

// =============================================================================
// Resolution Unit
// =============================================================================

/// Unit shared by the resolution and position tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionUnit {
    /// No absolute unit
    None,
    /// Inch (the TIFF default when the tag is absent)
    #[default]
    Inch,
    /// Centimeter
    Centimeter,
}

impl ResolutionUnit {
    /// Decode the `ResolutionUnit` tag value. Unknown values are treated as
    /// unit-less.
    pub fn from_u16(value: u16) -> Self {
        match value {
            2 => ResolutionUnit::Inch,
            3 => ResolutionUnit::Centimeter,
            _ => ResolutionUnit::None,
        }
    }

    /// Length of one unit in micrometres (1.0 for unit-less files).
    pub const fn micrometres(self) -> f64 {
        match self {
            ResolutionUnit::None => 1.0,
            ResolutionUnit::Inch => 25_400.0,
            ResolutionUnit::Centimeter => 10_000.0,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
