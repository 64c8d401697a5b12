//! Hyperslab reads against tiled or striped storage
//!
//! Output is always band-major: `out[((band * rows) + row) * cols + col]`,
//! one element of `element_size` bytes each. Separate-plane images are read
//! one plane per requested band; interleaved images are decoded once per
//! tile or strip and de-interleaved on copy.

use log::debug;

use crate::config::ReaderConfig;
use crate::tiff::decoder::TiffDecoder;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::organization::{OrganizationInfo, PlanarConfig};

use super::region::Window;
use super::strip_reader::StripReader;
use super::tile_reader::TileReader;

/// One pass over a native plane and the bands it feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneRead {
    /// Native plane to decode
    pub plane: usize,
    /// First sample taken from each chunk pixel
    pub first_sample: usize,
    /// Consecutive samples taken from each chunk pixel
    pub samples: usize,
    /// Output band receiving `first_sample`
    pub out_band: usize,
}

/// Plane passes needed to fill `window`
pub fn plan(org: &OrganizationInfo, window: &Window) -> Vec<PlaneRead> {
    match org.planar_config {
        PlanarConfig::SeparatePlanes => (0..window.bands)
            .map(|b| PlaneRead { plane: window.band + b, first_sample: 0, samples: 1, out_band: b })
            .collect(),
        PlanarConfig::Interleaved => vec![PlaneRead {
            plane: 0,
            first_sample: window.band,
            samples: window.bands,
            out_band: 0,
        }],
    }
}

/// Band-major destination for a window
pub struct Target<'o> {
    out: &'o mut [u8],
    rows: usize,
    cols: usize,
    element_size: usize,
    chunk_samples: usize,
}

impl<'o> Target<'o> {
    pub fn new(out: &'o mut [u8], window: &Window, element_size: usize, chunk_samples: usize) -> Self {
        Target { out, rows: window.rows, cols: window.cols, element_size, chunk_samples }
    }

    /// Copies `pixels` chunk pixels from `src` into output row `row` at column `col`
    pub fn put(&mut self, src: &[u8], pass: &PlaneRead, row: usize, col: usize, pixels: usize) {
        let elem = self.element_size;
        let stride = self.chunk_samples * elem;
        for s in 0..pass.samples {
            let band = pass.out_band + s;
            let dst_start = ((band * self.rows + row) * self.cols + col) * elem;
            let dst = &mut self.out[dst_start..dst_start + pixels * elem];
            if self.chunk_samples == 1 {
                dst.copy_from_slice(&src[..pixels * elem]);
                continue;
            }
            let sample_offset = (pass.first_sample + s) * elem;
            for (p, out) in dst.chunks_exact_mut(elem).enumerate() {
                let at = p * stride + sample_offset;
                out.copy_from_slice(&src[at..at + elem]);
            }
        }
    }
}

/// Fills `out` with the elements of `window`
///
/// `out` must hold at least `window.element_count() * element_size` bytes.
/// On failure its contents are unspecified; the decoder stays usable.
pub fn read_window(
    decoder: &mut TiffDecoder,
    org: &OrganizationInfo,
    window: &Window,
    element_size: usize,
    config: &ReaderConfig,
    out: &mut [u8],
) -> TiffResult<()> {
    let needed = window
        .element_count()
        .and_then(|n| n.checked_mul(element_size as u64))
        .ok_or_else(|| TiffError::ResourceExhausted("Hyperslab size overflows".to_string()))?;
    if (out.len() as u64) < needed {
        return Err(TiffError::InvalidArgument(format!(
            "Output buffer of {} bytes cannot hold {} bytes",
            out.len(),
            needed
        )));
    }

    let passes = plan(org, window);
    debug!("Reading {:?} in {} plane pass(es), {}", window, passes.len(), org);

    let mut target = Target::new(out, window, element_size, org.samples_per_chunk_pixel());
    if org.is_tiled() {
        TileReader::new(decoder, org, config).extract(window, &passes, element_size, &mut target)
    } else {
        StripReader::new(decoder, org, config).extract(window, &passes, element_size, &mut target)
    }
}
