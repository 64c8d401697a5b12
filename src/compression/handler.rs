//! Compression handler trait definition

use crate::tiff::errors::TiffResult;

/// Strategy trait for handling different compression methods
pub trait CompressionHandler: Send + Sync {
    /// Decompress one tile or strip
    ///
    /// `expected_size` is the decoded size of a complete chunk; codecs that
    /// decode into a preallocated buffer use it as the capacity.
    fn decompress(&self, data: &[u8], expected_size: usize) -> TiffResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code
    fn code(&self) -> u16;
}
