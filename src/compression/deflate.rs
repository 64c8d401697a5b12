//! Handler for Adobe Deflate compressed data

use std::io::Read;
use flate2::read::ZlibDecoder;
use log::warn;
use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Adobe Deflate (Zlib) compression handler (compression codes 8 and 32946)
pub struct AdobeDeflateHandler {
    code: u16,
}

impl AdobeDeflateHandler {
    pub fn new() -> Self {
        AdobeDeflateHandler { code: compression::DEFLATE }
    }

    /// Handler registered under the legacy PKZIP code
    pub fn legacy() -> Self {
        AdobeDeflateHandler { code: compression::DEFLATE_OLD }
    }
}

impl Default for AdobeDeflateHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8], expected_size: usize) -> TiffResult<Vec<u8>> {
        // one byte past the chunk size is enough to detect an overrun
        let mut decoder = ZlibDecoder::new(data).take(expected_size as u64 + 1);
        let mut decompressed_data = Vec::with_capacity(expected_size);
        match decoder.read_to_end(&mut decompressed_data) {
            Ok(_) if decompressed_data.len() > expected_size => {
                warn!("Deflate stream inflates past {} bytes", expected_size);
                Err(TiffError::DecodeFailure(format!(
                    "Deflate stream inflates past the {} byte chunk",
                    expected_size
                )))
            }
            Ok(_) => Ok(decompressed_data),
            Err(e) => {
                warn!("Deflate decompression error: {}", e);
                Err(TiffError::DecodeFailure(format!("Deflate decompression error: {}", e)))
            }
        }
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u16 {
        self.code
    }
}
