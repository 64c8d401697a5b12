//! Storage organization detection
//!
//! Classifies the first image as tiled or striped and as interleaved or
//! planar, once per open. Two format defaults are assumed rather than read:
//! a missing RowsPerStrip means a single strip covering the whole image, and
//! a missing PlanarConfiguration means interleaved samples.

use log::{debug, info};
use std::fmt;

use crate::tiff::constants::planar_config;
use crate::tiff::decoder::TiffDecoder;

/// How samples of a multi-band pixel are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanarConfig {
    /// All samples of a pixel are contiguous
    Interleaved,
    /// Each band is stored as its own plane
    SeparatePlanes,
}

/// Tile grid or strip geometry; exactly one applies to an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkLayout {
    Tiled { tile_width: u32, tile_height: u32 },
    Striped { rows_per_strip: u32 },
}

/// Immutable description of how pixel data is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizationInfo {
    pub layout: ChunkLayout,
    pub planar_config: PlanarConfig,
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u16,
}

impl OrganizationInfo {
    /// Queries the decoder once and applies the format defaults
    pub fn detect(decoder: &TiffDecoder) -> Self {
        let image_width = decoder.image_width();
        let image_height = decoder.image_height();

        let layout = match decoder.tile_size() {
            Some((tile_width, tile_height)) => ChunkLayout::Tiled { tile_width, tile_height },
            None => {
                let rows_per_strip = decoder.rows_per_strip().unwrap_or_else(|| {
                    debug!("RowsPerStrip absent, assuming one strip of {} rows", image_height);
                    image_height
                });
                ChunkLayout::Striped { rows_per_strip }
            }
        };

        let planar_config = match decoder.planar_config() {
            Some(planar_config::PLANAR) => PlanarConfig::SeparatePlanes,
            Some(_) => PlanarConfig::Interleaved,
            None => {
                debug!("PlanarConfiguration absent, assuming interleaved samples");
                PlanarConfig::Interleaved
            }
        };

        let info = OrganizationInfo {
            layout,
            planar_config,
            image_width,
            image_height,
            samples_per_pixel: decoder.samples_per_pixel(),
        };
        info!("Organization: {}", info);
        info
    }

    pub fn is_tiled(&self) -> bool {
        matches!(self.layout, ChunkLayout::Tiled { .. })
    }

    pub fn tile_size(&self) -> Option<(u32, u32)> {
        match self.layout {
            ChunkLayout::Tiled { tile_width, tile_height } => Some((tile_width, tile_height)),
            ChunkLayout::Striped { .. } => None,
        }
    }

    pub fn rows_per_strip(&self) -> Option<u32> {
        match self.layout {
            ChunkLayout::Striped { rows_per_strip } => Some(rows_per_strip),
            ChunkLayout::Tiled { .. } => None,
        }
    }

    /// Samples held per pixel inside a single tile or strip
    pub fn samples_per_chunk_pixel(&self) -> usize {
        match self.planar_config {
            PlanarConfig::Interleaved => self.samples_per_pixel as usize,
            PlanarConfig::SeparatePlanes => 1,
        }
    }
}

impl fmt::Display for OrganizationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}, {} band(s), ", self.image_width, self.image_height, self.samples_per_pixel)?;
        match self.layout {
            ChunkLayout::Tiled { tile_width, tile_height } => write!(f, "tiled {}x{}", tile_width, tile_height)?,
            ChunkLayout::Striped { rows_per_strip } => write!(f, "striped, {} rows per strip", rows_per_strip)?,
        }
        match self.planar_config {
            PlanarConfig::Interleaved => write!(f, ", interleaved"),
            PlanarConfig::SeparatePlanes => write!(f, ", separate planes"),
        }
    }
}
