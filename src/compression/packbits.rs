//! Handler for PackBits compressed data
//!
//! PackBits is a byte-oriented run-length scheme. Each run starts with a
//! signed header byte:
//! - 0..=127: copy the next (header + 1) bytes literally
//! - -127..=-1: repeat the next byte (1 - header) times
//! - -128: no operation

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// PackBits handler (compression code 32773)
pub struct PackBitsHandler;

impl CompressionHandler for PackBitsHandler {
    fn decompress(&self, data: &[u8], expected_size: usize) -> TiffResult<Vec<u8>> {
        let mut output = Vec::with_capacity(expected_size);
        let mut pos = 0;

        while pos < data.len() && output.len() < expected_size {
            let header = data[pos] as i8;
            pos += 1;

            match header {
                -128 => continue,
                0..=127 => {
                    let count = header as usize + 1;
                    if pos + count > data.len() {
                        return Err(TiffError::DecodeFailure(
                            "PackBits: insufficient literal bytes".to_string(),
                        ));
                    }
                    output.extend_from_slice(&data[pos..pos + count]);
                    pos += count;
                }
                -127..=-1 => {
                    let byte = *data.get(pos).ok_or_else(|| {
                        TiffError::DecodeFailure("PackBits: missing run byte".to_string())
                    })?;
                    pos += 1;
                    let count = (1 - header as isize) as usize;
                    output.resize(output.len() + count, byte);
                }
            }
        }

        Ok(output)
    }

    fn name(&self) -> &'static str {
        "PackBits"
    }

    fn code(&self) -> u16 {
        compression::PACKBITS
    }
}
