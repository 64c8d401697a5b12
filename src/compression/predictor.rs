//! Reversal of TIFF predictors and byte order normalisation
//!
//! After decompression a chunk is still in file byte order and may carry a
//! horizontal or floating-point predictor. These helpers turn it into plain
//! native-order samples, one row at a time.

use byteorder::{ByteOrder as _, NativeEndian};

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::predictor;
use crate::tiff::errors::{TiffError, TiffResult};

/// Geometry of one decoded chunk as the predictor sees it
#[derive(Debug, Clone, Copy)]
pub struct PredictorLayout {
    /// Pixels per row of the chunk (tile width or image width)
    pub row_pixels: usize,
    /// Samples stored per pixel in this chunk (1 for separate planes)
    pub samples: usize,
    /// Bytes per sample
    pub sample_bytes: usize,
}

impl PredictorLayout {
    pub fn row_stride(&self) -> usize {
        self.row_pixels * self.samples * self.sample_bytes
    }
}

/// Converts `buf` from the file's byte order to native order and undoes the predictor
pub fn unpredict(
    buf: &mut [u8],
    code: u16,
    byte_order: ByteOrder,
    layout: &PredictorLayout,
) -> TiffResult<()> {
    match code {
        predictor::NONE => {
            fix_endianness(buf, byte_order, layout.sample_bytes);
            Ok(())
        }
        predictor::HORIZONTAL_DIFFERENCING => {
            fix_endianness(buf, byte_order, layout.sample_bytes);
            let stride = layout.row_stride();
            if stride == 0 {
                return Ok(());
            }
            for row in buf.chunks_mut(stride) {
                rev_hpredict_nsamp(row, layout.sample_bytes, layout.samples);
            }
            Ok(())
        }
        predictor::FLOATING_POINT => {
            if layout.sample_bytes != 4 && layout.sample_bytes != 8 {
                return Err(TiffError::DecodeFailure(format!(
                    "Floating point predictor needs 32 or 64-bit samples, got {} bytes",
                    layout.sample_bytes
                )));
            }
            let stride = layout.row_stride();
            if stride == 0 {
                return Ok(());
            }
            let mut scratch = vec![0u8; stride];
            for row in buf.chunks_exact_mut(stride) {
                rev_predict_float(row, &mut scratch, layout.sample_bytes, layout.samples);
                row.copy_from_slice(&scratch);
            }
            Ok(())
        }
        other => Err(TiffError::DecodeFailure(format!("Unsupported predictor {}", other))),
    }
}

/// Swaps every sample in place when the file order differs from the host's
pub fn fix_endianness(buf: &mut [u8], byte_order: ByteOrder, sample_bytes: usize) {
    if sample_bytes <= 1 || !byte_order.needs_swap() {
        return;
    }
    buf.chunks_exact_mut(sample_bytes).for_each(|sample| sample.reverse());
}

/// Undoes horizontal differencing on one row of native-order samples
pub fn rev_hpredict_nsamp(buf: &mut [u8], sample_bytes: usize, samples: usize) {
    match sample_bytes {
        1 => {
            for i in samples..buf.len() {
                buf[i] = buf[i].wrapping_add(buf[i - samples]);
            }
        }
        2 => {
            for i in (samples * 2..buf.len().saturating_sub(1)).step_by(2) {
                let v = NativeEndian::read_u16(&buf[i..]);
                let p = NativeEndian::read_u16(&buf[i - 2 * samples..]);
                NativeEndian::write_u16(&mut buf[i..], v.wrapping_add(p));
            }
        }
        4 => {
            for i in (samples * 4..buf.len().saturating_sub(3)).step_by(4) {
                let v = NativeEndian::read_u32(&buf[i..]);
                let p = NativeEndian::read_u32(&buf[i - 4 * samples..]);
                NativeEndian::write_u32(&mut buf[i..], v.wrapping_add(p));
            }
        }
        8 => {
            for i in (samples * 8..buf.len().saturating_sub(7)).step_by(8) {
                let v = NativeEndian::read_u64(&buf[i..]);
                let p = NativeEndian::read_u64(&buf[i - 8 * samples..]);
                NativeEndian::write_u64(&mut buf[i..], v.wrapping_add(p));
            }
        }
        _ => {}
    }
}

/// Undoes the floating point predictor on one row
///
/// The row holds byte-differenced planes of the big-endian sample bytes:
/// all most significant bytes first, then the next byte of every sample, and
/// so on. The result written to `output` is native-order samples.
pub fn rev_predict_float(input: &mut [u8], output: &mut [u8], sample_bytes: usize, samples: usize) {
    for i in samples..input.len() {
        input[i] = input[i].wrapping_add(input[i - samples]);
    }

    let plane = input.len() / sample_bytes;
    let mut be = [0u8; 8];
    for (i, chunk) in output.chunks_exact_mut(sample_bytes).enumerate() {
        for (b, slot) in be.iter_mut().take(sample_bytes).enumerate() {
            *slot = input[b * plane + i];
        }
        match sample_bytes {
            4 => NativeEndian::write_u32(chunk, u32::from_be_bytes([be[0], be[1], be[2], be[3]])),
            _ => NativeEndian::write_u64(chunk, u64::from_be_bytes(be)),
        }
    }
}
