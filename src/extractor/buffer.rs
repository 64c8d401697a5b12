//! Scratch buffers for decoded tiles and strips
//!
//! Every buffer is sized from the cached organization and checked against
//! the configured ceiling before anything is allocated, so hostile tile or
//! strip geometry fails fast instead of exhausting memory.

use log::debug;

use crate::config::ReaderConfig;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::organization::OrganizationInfo;

/// Decode target for one tile or one strip, freed when dropped
#[derive(Debug)]
pub struct ScratchBuffer {
    data: Vec<u8>,
}

impl ScratchBuffer {
    /// Buffer for one full tile: `tile_width * tile_height * samples * element_size`
    pub fn for_tile(org: &OrganizationInfo, element_size: usize, config: &ReaderConfig) -> TiffResult<Self> {
        let (tile_width, tile_height) = org
            .tile_size()
            .ok_or_else(|| TiffError::InvalidArgument("Tile buffer requested for a striped image".to_string()))?;
        let bytes = checked_product(&[
            tile_width as u64,
            tile_height as u64,
            org.samples_per_chunk_pixel() as u64,
            element_size as u64,
        ]);
        Self::allocate(bytes, "tile", config)
    }

    /// Buffer for one full strip: `rows_per_strip * image_width * samples * element_size`
    pub fn for_strip(org: &OrganizationInfo, element_size: usize, config: &ReaderConfig) -> TiffResult<Self> {
        let rows_per_strip = org
            .rows_per_strip()
            .ok_or_else(|| TiffError::InvalidArgument("Strip buffer requested for a tiled image".to_string()))?;
        let bytes = checked_product(&[
            rows_per_strip as u64,
            org.image_width as u64,
            org.samples_per_chunk_pixel() as u64,
            element_size as u64,
        ]);
        Self::allocate(bytes, "strip", config)
    }

    /// Allocates `bytes` zeroed bytes, None meaning the size overflowed
    pub fn allocate(bytes: Option<u64>, what: &str, config: &ReaderConfig) -> TiffResult<Self> {
        let bytes = match bytes {
            Some(b) if b <= config.max_scratch_bytes => b,
            Some(b) => {
                return Err(TiffError::ResourceExhausted(format!(
                    "{} buffer of {} bytes exceeds the {} byte limit",
                    what, b, config.max_scratch_bytes
                )))
            }
            None => {
                return Err(TiffError::ResourceExhausted(format!("{} buffer size overflows", what)));
            }
        };
        let len = usize::try_from(bytes)
            .map_err(|_| TiffError::ResourceExhausted(format!("{} buffer of {} bytes is not addressable", what, bytes)))?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| TiffError::ResourceExhausted(format!("Allocating {} byte {} buffer: {}", len, what, e)))?;
        data.resize(len, 0);
        debug!("Allocated {} byte {} buffer", len, what);
        Ok(ScratchBuffer { data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Product of `factors`, None on overflow
pub fn checked_product(factors: &[u64]) -> Option<u64> {
    factors.iter().try_fold(1u64, |acc, &f| acc.checked_mul(f))
}
