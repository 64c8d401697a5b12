//! Strip-based hyperslab extraction
//!
//! Striped images store full-width rows in horizontal bands. Each requested
//! scanline is taken from the strip holding it; a [`StripCursor`] keeps the
//! last decoded strip so one covering several rows is decoded only once per
//! read.
//!
//! The scratch buffer holds a whole strip, not a single scanline, because a
//! compressed strip can only be decoded as a unit. Its size is
//! `rows_per_strip * image_width * samples * element_size`, so an image with
//! a large RowsPerStrip can exceed `max_scratch_bytes` and fail with
//! `ResourceExhausted` even when only one row is requested.

use log::{debug, trace};

use crate::config::ReaderConfig;
use crate::tiff::decoder::TiffDecoder;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::organization::OrganizationInfo;

use super::buffer::ScratchBuffer;
use super::hyperslab::{PlaneRead, Target};
use super::region::Window;

/// Last decoded strip, valid for one read call
struct StripCursor {
    scratch: ScratchBuffer,
    loaded: Option<(usize, usize)>,
    rows_per_strip: usize,
    scanline_bytes: usize,
}

impl StripCursor {
    /// Scanline `row` of `plane`, decoding its strip if not already loaded
    fn scanline(&mut self, decoder: &mut TiffDecoder, plane: usize, row: usize) -> TiffResult<&[u8]> {
        let strip = row / self.rows_per_strip;
        if self.loaded != Some((plane, strip)) {
            self.loaded = None;
            decoder.read_strip(strip, plane, self.scratch.as_mut_slice())?;
            self.loaded = Some((plane, strip));
        }
        let start = (row - strip * self.rows_per_strip) * self.scanline_bytes;
        Ok(&self.scratch.as_slice()[start..start + self.scanline_bytes])
    }
}

/// Reads windows out of striped storage
pub struct StripReader<'a> {
    decoder: &'a mut TiffDecoder,
    org: &'a OrganizationInfo,
    config: &'a ReaderConfig,
}

impl<'a> StripReader<'a> {
    pub fn new(decoder: &'a mut TiffDecoder, org: &'a OrganizationInfo, config: &'a ReaderConfig) -> Self {
        StripReader { decoder, org, config }
    }

    /// Copy every pass of `window` into `target`, one scanline at a time
    pub fn extract(
        &mut self,
        window: &Window,
        passes: &[PlaneRead],
        element_size: usize,
        target: &mut Target<'_>,
    ) -> TiffResult<()> {
        let rows_per_strip = self
            .org
            .rows_per_strip()
            .ok_or_else(|| TiffError::InvalidArgument("Image is not striped".to_string()))?
            as usize;
        let pixel_bytes = self.org.samples_per_chunk_pixel() * element_size;

        let mut cursor = StripCursor {
            scratch: ScratchBuffer::for_strip(self.org, element_size, self.config)?,
            loaded: None,
            rows_per_strip,
            scanline_bytes: self.org.image_width as usize * pixel_bytes,
        };
        debug!(
            "Strips {} to {} of {} rows",
            window.row / rows_per_strip,
            (window.end_row() - 1) / rows_per_strip,
            rows_per_strip
        );

        let col_start = window.col * pixel_bytes;
        let col_end = window.end_col() * pixel_bytes;
        for pass in passes {
            for y in window.row..window.end_row() {
                let line = cursor.scanline(self.decoder, pass.plane, y)?;
                trace!("Scanline {} plane {}", y, pass.plane);
                target.put(&line[col_start..col_end], pass, y - window.row, 0, window.cols);
            }
        }

        Ok(())
    }
}
