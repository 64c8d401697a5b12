//! Handler for LZW compressed data

use log::warn;
use weezl::{decode::Decoder, BitOrder, LzwStatus};

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// TIFF-flavoured LZW handler (compression code 5)
///
/// TIFF writers switch code size one code early, which the weezl decoder
/// models with its TIFF size switch.
pub struct LzwHandler;

impl CompressionHandler for LzwHandler {
    fn decompress(&self, data: &[u8], expected_size: usize) -> TiffResult<Vec<u8>> {
        let mut decoder = Decoder::with_tiff_size_switch(BitOrder::Msb, 8);
        let mut output = vec![0u8; expected_size];
        let result = decoder.decode_bytes(data, &mut output);

        match result.status {
            Ok(LzwStatus::Ok) | Ok(LzwStatus::Done) => {
                output.truncate(result.consumed_out);
                Ok(output)
            }
            Ok(LzwStatus::NoProgress) => {
                warn!("LZW decoder made no progress after {} bytes", result.consumed_out);
                Err(TiffError::DecodeFailure("LZW decoder reported no progress".to_string()))
            }
            Err(e) => {
                warn!("LZW decompression error: {}", e);
                Err(TiffError::DecodeFailure(format!("LZW decompression error: {}", e)))
            }
        }
    }

    fn name(&self) -> &'static str {
        "LZW"
    }

    fn code(&self) -> u16 {
        compression::LZW
    }
}
