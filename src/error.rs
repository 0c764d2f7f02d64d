use thiserror::Error;

/// I/O errors that can occur when reading from a series file
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// Error reported by the operating system while opening or reading
    #[error("I/O error: {0}")]
    Io(String),

    /// Requested range exceeds resource bounds
    #[error("Range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// File not found
    #[error("File not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        IoError::Io(err.to_string())
    }
}

/// Errors that can occur when parsing TIFF files
#[derive(Debug, Clone, Error)]
pub enum TiffError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Invalid TIFF magic bytes (not II or MM)
    #[error("Invalid TIFF magic bytes: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidMagic(u16),

    /// Invalid TIFF version number
    #[error("Invalid TIFF version: expected 42 (TIFF) or 43 (BigTIFF), got {0}")]
    InvalidVersion(u16),

    /// Invalid BigTIFF offset byte size (must be 8)
    #[error("Invalid BigTIFF offset byte size: expected 8, got {0}")]
    InvalidBigTiffOffsetSize(u16),

    /// File is too small to contain a valid TIFF header
    #[error("File too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: u64, actual: u64 },

    /// Invalid IFD offset (points outside file or to invalid location)
    #[error("Invalid IFD offset: {0}")]
    InvalidIfdOffset(u64),

    /// The next-IFD chain points back at an IFD that was already read
    #[error("IFD chain loops back to offset {0}")]
    IfdLoop(u64),

    /// Required tag is missing from IFD
    #[error("Missing required tag: {0}")]
    MissingTag(&'static str),

    /// Tag has unexpected type or count
    #[error("Invalid tag value for {tag}: {message}")]
    InvalidTagValue { tag: &'static str, message: String },

    /// Unknown field type in IFD entry
    #[error("Unknown field type: {0}")]
    UnknownFieldType(u16),
}

/// Errors related to format detection and manifest decoding
#[derive(Debug, Clone, Error)]
pub enum FormatError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// TIFF parsing error
    #[error("TIFF error: {0}")]
    Tiff(#[from] TiffError),

    /// Series manifest could not be decoded
    #[error("Invalid series manifest: {0}")]
    Manifest(String),

    /// File format is not supported
    #[error("Unsupported format: {reason}")]
    UnsupportedFormat { reason: String },
}

/// Errors raised by a metadata service while answering series queries
#[derive(Debug, Clone, Error)]
pub enum MetadataError {
    /// The file could not be opened or decoded
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A series index outside `0..count` was selected
    #[error("Series {series} out of range: file has {count} series")]
    SeriesOutOfRange { series: usize, count: usize },

    /// Metadata that every series must carry is absent
    #[error("Series {series} is missing required metadata: {field}")]
    MissingField { series: usize, field: &'static str },
}

impl From<IoError> for MetadataError {
    fn from(err: IoError) -> Self {
        MetadataError::Format(FormatError::Io(err))
    }
}

impl From<TiffError> for MetadataError {
    fn from(err: TiffError) -> Self {
        MetadataError::Format(FormatError::Tiff(err))
    }
}

/// Terminal failures of a tile extraction run.
///
/// None of these carry a partial result: the caller reports the error and
/// stops the workflow.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// Caller-supplied arguments are unusable (empty path, bad percentage)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The metadata service could not open the file or answer a query
    #[error("Failed to read metadata: {0}")]
    MetadataRead(#[from] MetadataError),

    /// The file does not hold enough series to form a mosaic
    #[error("File contains {count} series; at least two tiles are needed to stitch")]
    InsufficientSeries { count: usize },
}
