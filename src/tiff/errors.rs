//! Custom error types for GeoTIFF processing

use std::fmt;
use std::io;

/// Errors surfaced by the sniffer, the decoder and the hyperslab reader
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// Header magic/version mismatch; a negative detection result, not a fault
    NotThisFormat,
    /// Structurally broken or hostile file (bad offsets, counts, missing tags)
    InvalidFormat(String),
    /// Requested operation is not supported by a read-only engine
    Unsupported(String),
    /// Caller passed something unusable (empty path, short buffer, wrong type)
    InvalidArgument(String),
    /// Hyperslab start/count outside the dimension bounds
    OutOfRange(String),
    /// Scratch buffer would exceed the configured ceiling
    ResourceExhausted(String),
    /// A tile or strip could not be read or decoded
    DecodeFailure(String),
}

impl TiffError {
    /// True for the "try the next format" signal
    pub fn is_not_this_format(&self) -> bool {
        matches!(self, TiffError::NotThisFormat)
    }
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::NotThisFormat => write!(f, "Not a GeoTIFF file"),
            TiffError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            TiffError::Unsupported(msg) => write!(f, "Unsupported operation: {}", msg),
            TiffError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            TiffError::OutOfRange(msg) => write!(f, "Index out of range: {}", msg),
            TiffError::ResourceExhausted(msg) => write!(f, "Resource exhausted: {}", msg),
            TiffError::DecodeFailure(msg) => write!(f, "Decode failure: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;
