//! Tile-based hyperslab extraction
//!
//! Tiled images divide the raster into a grid of equally sized blocks. A
//! window is served by visiting only the tiles it intersects, decoding each
//! of them once and copying the covered rows out of it.

use log::{debug, trace};

use crate::config::ReaderConfig;
use crate::tiff::decoder::TiffDecoder;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::organization::OrganizationInfo;

use super::buffer::ScratchBuffer;
use super::hyperslab::{PlaneRead, Target};
use super::region::Window;

/// Reads windows out of tiled storage
pub struct TileReader<'a> {
    decoder: &'a mut TiffDecoder,
    org: &'a OrganizationInfo,
    config: &'a ReaderConfig,
}

impl<'a> TileReader<'a> {
    pub fn new(decoder: &'a mut TiffDecoder, org: &'a OrganizationInfo, config: &'a ReaderConfig) -> Self {
        TileReader { decoder, org, config }
    }

    /// Copy every pass of `window` into `target`
    ///
    /// # Arguments
    /// * `window` - Validated window in image coordinates
    /// * `passes` - Plane passes from [`super::hyperslab::plan`]
    /// * `element_size` - Bytes per sample
    /// * `target` - Band-major destination
    ///
    /// # Returns
    /// Ok once the window is filled, or the first decode error
    pub fn extract(
        &mut self,
        window: &Window,
        passes: &[PlaneRead],
        element_size: usize,
        target: &mut Target<'_>,
    ) -> TiffResult<()> {
        let (tile_width, tile_height) = self
            .org
            .tile_size()
            .ok_or_else(|| TiffError::InvalidArgument("Image is not tiled".to_string()))?;
        let (tw, th) = (tile_width as usize, tile_height as usize);

        let first_tx = window.col / tw;
        let last_tx = (window.end_col() - 1) / tw;
        let first_ty = window.row / th;
        let last_ty = (window.end_row() - 1) / th;
        debug!("Tiles ({},{}) to ({},{}) of {}x{}", first_tx, first_ty, last_tx, last_ty, tw, th);

        let mut scratch = ScratchBuffer::for_tile(self.org, element_size, self.config)?;
        let pixel_bytes = self.org.samples_per_chunk_pixel() * element_size;

        for pass in passes {
            for ty in first_ty..=last_ty {
                for tx in first_tx..=last_tx {
                    self.decoder
                        .read_tile(tx as u32, ty as u32, pass.plane, scratch.as_mut_slice())?;

                    let tile_x0 = tx * tw;
                    let tile_y0 = ty * th;
                    let rows = window.row.max(tile_y0)..window.end_row().min(tile_y0 + th);
                    let c0 = window.col.max(tile_x0);
                    let c1 = window.end_col().min(tile_x0 + tw);
                    let pixels = c1 - c0;
                    trace!("Tile ({},{}) plane {}: rows {:?}, columns {}..{}", tx, ty, pass.plane, rows, c0, c1);

                    for y in rows {
                        let src_start = ((y - tile_y0) * tw + (c0 - tile_x0)) * pixel_bytes;
                        let src = &scratch.as_slice()[src_start..src_start + pixels * pixel_bytes];
                        target.put(src, pass, y - window.row, c0 - window.col, pixels);
                    }
                }
            }
        }

        Ok(())
    }
}
