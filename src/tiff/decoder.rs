//! Decode handle for the first image of a TIFF file
//!
//! `TiffDecoder` is what the rest of the engine treats as "the decode
//! library": it owns the byte stream and the decoded first directory, answers
//! field queries, and reads individual tiles or strips as plain native-order
//! samples. It applies no defaults beyond those needed to address chunks;
//! interpreting the storage organization is left to
//! [`crate::tiff::organization`].

use log::{debug, info, trace};
use std::io::{Read, Seek, SeekFrom};

use crate::compression::predictor::{self, PredictorLayout};
use crate::compression::{CompressionFactory, CompressionHandler};
use crate::config::ReaderConfig;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{compression, planar_config, predictor as predictor_codes, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::header::TiffHeader;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::validation;

/// Largest sane image or tile side; anything larger is treated as corrupt
const MAX_DIMENSION: u64 = u32::MAX as u64;

/// Native decode handle over one open file
pub struct TiffDecoder {
    stream: Box<dyn SeekableReader>,
    tiff: TiffReader,
    ifd: IFD,
    image_width: u32,
    image_height: u32,
    samples_per_pixel: u16,
    bits_per_sample: u16,
    sample_format: u16,
    compression: u16,
    predictor: u16,
    planar_config: Option<u16>,
    tile_size: Option<(u32, u32)>,
    rows_per_strip: Option<u32>,
    chunk_offsets: Vec<u64>,
    chunk_byte_counts: Vec<u64>,
    codec: Option<Box<dyn CompressionHandler>>,
    chunk_reads: u64,
    chunks_per_plane: usize,
    tile_bytes: usize,
    scanline_bytes: usize,
}

/// Chunk counts and decoded sizes, all computed without overflow
struct ChunkGeometry {
    chunks_per_plane: usize,
    chunk_count: usize,
    tile_bytes: usize,
    scanline_bytes: usize,
}

impl TiffDecoder {
    /// Decodes the first directory of a sniffed stream and caches its fields
    pub fn new(mut stream: Box<dyn SeekableReader>, header: TiffHeader, config: &ReaderConfig) -> TiffResult<Self> {
        let file_size = validation::get_file_size(stream.as_mut())?;
        let tiff = TiffReader::new(header, file_size);
        let ifd = tiff.read_first_ifd(stream.as_mut(), config)?;
        let reader = stream.as_mut();

        let image_width = required_u32(&tiff, reader, &ifd, tags::IMAGE_WIDTH, "ImageWidth")?;
        let image_height = required_u32(&tiff, reader, &ifd, tags::IMAGE_LENGTH, "ImageLength")?;

        let samples_per_pixel = tiff.read_optional_u64(reader, &ifd, tags::SAMPLES_PER_PIXEL)?.unwrap_or(1);
        validation::validate_range(samples_per_pixel, 1, u16::MAX as u64, "SamplesPerPixel")?;
        let samples_per_pixel = samples_per_pixel as u16;

        let bits_per_sample = if ifd.has_tag(tags::BITS_PER_SAMPLE) {
            let bits = tiff.read_tag_values(reader, &ifd, tags::BITS_PER_SAMPLE)?;
            let first = bits.first().copied().unwrap_or(8);
            if bits.iter().any(|&b| b != first) {
                return Err(TiffError::InvalidFormat(format!(
                    "Mixed BitsPerSample values are not supported: {:?}",
                    bits
                )));
            }
            first as u16
        } else {
            8
        };

        let sample_format = tiff
            .read_optional_u64(reader, &ifd, tags::SAMPLE_FORMAT)?
            .map(|v| v as u16)
            .unwrap_or(sample_format::UNSIGNED);
        let compression = tiff
            .read_optional_u64(reader, &ifd, tags::COMPRESSION)?
            .map(|v| v as u16)
            .unwrap_or(compression::NONE);
        let predictor = tiff
            .read_optional_u64(reader, &ifd, tags::PREDICTOR)?
            .map(|v| v as u16)
            .unwrap_or(predictor_codes::NONE);
        let planar_config = tiff
            .read_optional_u64(reader, &ifd, tags::PLANAR_CONFIGURATION)?
            .map(|v| v as u16);
        if let Some(planar) = planar_config {
            validation::validate_range(planar, planar_config::CHUNKY, planar_config::PLANAR, "PlanarConfiguration")?;
        }

        let tile_size = if ifd.has_tag(tags::TILE_WIDTH) || ifd.has_tag(tags::TILE_OFFSETS) {
            let tile_width = required_u32(&tiff, reader, &ifd, tags::TILE_WIDTH, "TileWidth")?;
            let tile_height = required_u32(&tiff, reader, &ifd, tags::TILE_LENGTH, "TileLength")?;
            Some((tile_width, tile_height))
        } else {
            None
        };

        let rows_per_strip = match tiff.read_optional_u64(reader, &ifd, tags::ROWS_PER_STRIP)? {
            Some(0) => return Err(TiffError::InvalidFormat("RowsPerStrip is zero".to_string())),
            Some(rows) => Some(rows.min(image_height as u64) as u32),
            None => None,
        };

        let (offsets_tag, counts_tag) = if tile_size.is_some() {
            (tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)
        } else {
            (tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS)
        };
        let chunk_offsets = tiff.read_tag_values(reader, &ifd, offsets_tag)?;
        let chunk_byte_counts = tiff.read_tag_values(reader, &ifd, counts_tag)?;

        let codec = match CompressionFactory::create_handler(compression) {
            Ok(codec) => Some(codec),
            Err(e) => {
                debug!("{}; pixel reads will fail", e);
                None
            }
        };

        let mut decoder = TiffDecoder {
            stream,
            tiff,
            ifd,
            image_width,
            image_height,
            samples_per_pixel,
            bits_per_sample,
            sample_format,
            compression,
            predictor,
            planar_config,
            tile_size,
            rows_per_strip,
            chunk_offsets,
            chunk_byte_counts,
            codec,
            chunk_reads: 0,
            chunks_per_plane: 0,
            tile_bytes: 0,
            scanline_bytes: 0,
        };

        let geometry = decoder.checked_geometry().ok_or_else(|| {
            TiffError::InvalidFormat(format!(
                "Chunk layout of a {}x{} image with {} samples overflows",
                image_width, image_height, samples_per_pixel
            ))
        })?;
        decoder.chunks_per_plane = geometry.chunks_per_plane;
        decoder.tile_bytes = geometry.tile_bytes;
        decoder.scanline_bytes = geometry.scanline_bytes;

        let expected = geometry.chunk_count;
        if decoder.chunk_offsets.len() < expected || decoder.chunk_byte_counts.len() < expected {
            return Err(TiffError::InvalidFormat(format!(
                "Expected {} chunks, found {} offsets and {} byte counts",
                expected,
                decoder.chunk_offsets.len(),
                decoder.chunk_byte_counts.len()
            )));
        }

        info!(
            "Decoded IFD: {}x{}, {} samples of {} bits, compression {}, {} chunks",
            image_width, image_height, samples_per_pixel, bits_per_sample, compression, expected
        );
        Ok(decoder)
    }

    pub fn header(&self) -> &TiffHeader {
        self.tiff.header()
    }

    pub fn ifd(&self) -> &IFD {
        &self.ifd
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u16 {
        self.samples_per_pixel
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn sample_format(&self) -> u16 {
        self.sample_format
    }

    pub fn compression(&self) -> u16 {
        self.compression
    }

    pub fn is_tiled(&self) -> bool {
        self.tile_size.is_some()
    }

    /// Tile width and height, None for striped images
    pub fn tile_size(&self) -> Option<(u32, u32)> {
        self.tile_size
    }

    /// RowsPerStrip as stored, None when the tag is absent
    pub fn rows_per_strip(&self) -> Option<u32> {
        self.rows_per_strip
    }

    /// PlanarConfiguration as stored, None when the tag is absent
    pub fn planar_config(&self) -> Option<u16> {
        self.planar_config
    }

    /// Number of chunks decoded since open
    pub fn chunk_reads(&self) -> u64 {
        self.chunk_reads
    }

    fn is_separate_planes(&self) -> bool {
        self.planar_config == Some(planar_config::PLANAR)
    }

    fn sample_bytes(&self) -> usize {
        (self.bits_per_sample as usize).div_ceil(8)
    }

    fn samples_per_chunk_pixel(&self) -> usize {
        if self.is_separate_planes() {
            1
        } else {
            self.samples_per_pixel as usize
        }
    }

    fn planes(&self) -> usize {
        if self.is_separate_planes() {
            self.samples_per_pixel as usize
        } else {
            1
        }
    }

    fn effective_rows_per_strip(&self) -> u32 {
        self.rows_per_strip.unwrap_or(self.image_height).max(1)
    }

    /// Tiles across and down the image
    pub fn tile_grid(&self) -> Option<(u32, u32)> {
        self.tile_size.map(|(tw, th)| {
            (
                self.image_width.div_ceil(tw.max(1)),
                self.image_height.div_ceil(th.max(1)),
            )
        })
    }

    fn strips_per_plane(&self) -> usize {
        self.image_height.div_ceil(self.effective_rows_per_strip()) as usize
    }

    fn checked_geometry(&self) -> Option<ChunkGeometry> {
        let pixel_bytes = self.samples_per_chunk_pixel().checked_mul(self.sample_bytes())?;
        let chunks_per_plane = match self.tile_grid() {
            Some((across, down)) => (across as usize).checked_mul(down as usize)?,
            None => self.strips_per_plane(),
        };
        let tile_bytes = match self.tile_size {
            Some((tw, th)) => (tw as usize).checked_mul(th as usize)?.checked_mul(pixel_bytes)?,
            None => 0,
        };
        Some(ChunkGeometry {
            chunks_per_plane,
            chunk_count: chunks_per_plane.checked_mul(self.planes())?,
            tile_bytes,
            scanline_bytes: (self.image_width as usize).checked_mul(pixel_bytes)?,
        })
    }

    /// Decoded size in bytes of one full tile
    pub fn tile_bytes(&self) -> usize {
        self.tile_bytes
    }

    /// Decoded size in bytes of one image row inside a chunk
    pub fn scanline_bytes(&self) -> usize {
        self.scanline_bytes
    }

    /// Rows actually held by strip `strip` of a plane; the last may be short
    pub fn rows_in_strip(&self, strip: usize) -> usize {
        let rps = self.effective_rows_per_strip() as usize;
        let start = strip * rps;
        (self.image_height as usize).saturating_sub(start).min(rps)
    }

    /// Reads tile (`tile_x`, `tile_y`) of `plane` into `out`, which must hold a full tile
    pub fn read_tile(&mut self, tile_x: u32, tile_y: u32, plane: usize, out: &mut [u8]) -> TiffResult<()> {
        let (across, down) = self
            .tile_grid()
            .ok_or_else(|| TiffError::InvalidArgument("Image is not tiled".to_string()))?;
        if tile_x >= across || tile_y >= down || plane >= self.planes() {
            return Err(TiffError::InvalidArgument(format!(
                "Tile ({}, {}) plane {} outside {}x{} grid",
                tile_x, tile_y, plane, across, down
            )));
        }
        // bounded by the chunk count checked at open
        let index = plane * self.chunks_per_plane + tile_y as usize * across as usize + tile_x as usize;
        let expected = self.tile_bytes();
        let row_pixels = self.tile_size.map(|(tw, _)| tw as usize).unwrap_or(0);
        self.read_chunk(index, expected, row_pixels, out)
    }

    /// Reads strip `strip` of `plane` into `out`, which must hold at least the strip's rows
    pub fn read_strip(&mut self, strip: usize, plane: usize, out: &mut [u8]) -> TiffResult<usize> {
        if self.is_tiled() {
            return Err(TiffError::InvalidArgument("Image is tiled".to_string()));
        }
        if strip >= self.strips_per_plane() || plane >= self.planes() {
            return Err(TiffError::InvalidArgument(format!(
                "Strip {} plane {} outside {} strips",
                strip,
                plane,
                self.strips_per_plane()
            )));
        }
        let index = plane * self.chunks_per_plane + strip;
        let expected = self
            .rows_in_strip(strip)
            .checked_mul(self.scanline_bytes)
            .ok_or_else(|| TiffError::ResourceExhausted(format!("Strip {} size overflows", strip)))?;
        let row_pixels = self.image_width as usize;
        self.read_chunk(index, expected, row_pixels, out)?;
        Ok(expected)
    }

    fn read_chunk(&mut self, index: usize, expected: usize, row_pixels: usize, out: &mut [u8]) -> TiffResult<()> {
        if out.len() < expected {
            return Err(TiffError::InvalidArgument(format!(
                "Chunk buffer of {} bytes cannot hold {} bytes",
                out.len(),
                expected
            )));
        }
        let compression = self.compression;
        let codec = self.codec.as_ref().ok_or_else(|| {
            TiffError::DecodeFailure(format!("Compression method {} is not supported", compression))
        })?;

        let offset = self.chunk_offsets[index];
        let byte_count = self.chunk_byte_counts[index];
        validation::validate_extent(offset, byte_count, self.tiff.file_size(), "Chunk")
            .map_err(|e| TiffError::DecodeFailure(e.to_string()))?;
        trace!("Chunk {} at {} ({} bytes, {} expected)", index, offset, byte_count, expected);

        let target = &mut out[..expected];
        let read_error = |e: std::io::Error| TiffError::DecodeFailure(format!("Reading chunk {}: {}", index, e));
        self.stream.seek(SeekFrom::Start(offset)).map_err(read_error)?;

        if compression == compression::NONE {
            if (byte_count as usize) < expected {
                return Err(TiffError::DecodeFailure(format!(
                    "Chunk {} holds {} bytes, {} needed",
                    index, byte_count, expected
                )));
            }
            self.stream.read_exact(target).map_err(read_error)?;
        } else {
            let mut raw = vec![0u8; byte_count as usize];
            self.stream.read_exact(&mut raw).map_err(read_error)?;
            let decoded = codec.decompress(&raw, expected)?;
            if decoded.len() < expected {
                return Err(TiffError::DecodeFailure(format!(
                    "Chunk {} decoded to {} bytes, {} needed",
                    index,
                    decoded.len(),
                    expected
                )));
            }
            target.copy_from_slice(&decoded[..expected]);
        }

        let layout = PredictorLayout {
            row_pixels,
            samples: self.samples_per_chunk_pixel(),
            sample_bytes: self.sample_bytes(),
        };
        predictor::unpredict(target, self.predictor, self.header().byte_order, &layout)?;

        self.chunk_reads += 1;
        Ok(())
    }

    pub fn has_tag(&self, tag: u16) -> bool {
        self.ifd.has_tag(tag)
    }

    pub fn read_tag_values(&mut self, tag: u16) -> TiffResult<Vec<u64>> {
        self.tiff.read_tag_values(self.stream.as_mut(), &self.ifd, tag)
    }

    pub fn read_tag_doubles(&mut self, tag: u16) -> TiffResult<Vec<f64>> {
        self.tiff.read_tag_doubles(self.stream.as_mut(), &self.ifd, tag)
    }

    pub fn read_tag_ascii(&mut self, tag: u16) -> TiffResult<String> {
        self.tiff.read_tag_ascii(self.stream.as_mut(), &self.ifd, tag)
    }
}

fn required_u32(
    tiff: &TiffReader,
    reader: &mut dyn SeekableReader,
    ifd: &IFD,
    tag: u16,
    name: &str,
) -> TiffResult<u32> {
    let value = tiff
        .read_optional_u64(reader, ifd, tag)?
        .ok_or_else(|| TiffError::InvalidFormat(format!("Missing required tag {}", name)))?;
    validation::validate_range(value, 1, MAX_DIMENSION, name)?;
    Ok(value as u32)
}
