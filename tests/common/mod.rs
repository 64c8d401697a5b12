//! Synthetic GeoTIFF writer shared by the integration tests
//!
//! Pixel values come from [`sample`], so any window can be checked against
//! [`TiffBuilder::expected`] independently of how the file is chunked.

#![allow(dead_code)]

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SHORT: u16 = 3;
const LONG: u16 = 4;
const ASCII: u16 = 2;
const DOUBLE: u16 = 12;
const LONG8: u16 = 16;

/// Deterministic pixel value for (band, row, col)
pub fn sample(band: usize, row: usize, col: usize) -> u64 {
    (band * 97 + row * 31 + col * 7 + (row * col) % 13) as u64
}

#[derive(Debug, Clone)]
pub enum Layout {
    Tiled { tile_width: u32, tile_height: u32 },
    Striped { rows_per_strip: Option<u32> },
}

/// Raw GeoKey directory plus its double and ASCII parameter tags
#[derive(Debug, Clone)]
pub struct GeoKeys {
    pub shorts: Vec<u16>,
    pub doubles: Vec<f64>,
    pub ascii: String,
}

impl GeoKeys {
    fn directory(keys: &[[u16; 4]]) -> Vec<u16> {
        let mut shorts = vec![1, 1, 0, keys.len() as u16];
        for key in keys {
            shorts.extend_from_slice(key);
        }
        shorts
    }

    /// Geographic WGS 84 by EPSG code
    pub fn wgs84() -> Self {
        GeoKeys {
            shorts: Self::directory(&[[1024, 0, 1, 2], [1025, 0, 1, 1], [2048, 0, 1, 4326]]),
            doubles: Vec::new(),
            ascii: String::new(),
        }
    }

    /// WGS 84 / UTM zone 33N by EPSG code
    pub fn utm33n() -> Self {
        GeoKeys {
            shorts: Self::directory(&[[1024, 0, 1, 1], [3072, 0, 1, 32633]]),
            doubles: Vec::new(),
            ascii: String::new(),
        }
    }

    /// Geographic model with a user-defined datum and no axes
    pub fn geographic_without_ellipsoid() -> Self {
        GeoKeys {
            shorts: Self::directory(&[[1024, 0, 1, 2], [2048, 0, 1, 32767]]),
            doubles: Vec::new(),
            ascii: String::new(),
        }
    }

    /// User-defined geographic CRS with explicit axis, flattening and citation
    pub fn custom_ellipsoid() -> Self {
        GeoKeys {
            shorts: Self::directory(&[
                [1024, 0, 1, 2],
                [2048, 0, 1, 32767],
                [2049, 34737, 13, 0],
                [2057, 34736, 1, 0],
                [2059, 34736, 1, 1],
            ]),
            doubles: vec![6378137.0, 298.257223563],
            ascii: "Custom datum|".to_string(),
        }
    }
}

/// One directory entry with its value bytes already in file order
struct Entry {
    tag: u16,
    field_type: u16,
    count: u64,
    bytes: Vec<u8>,
}

/// A written test file, deleted with its directory
pub struct TestFile {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone)]
pub struct TiffBuilder {
    pub big_endian: bool,
    pub wide: bool,
    pub width: u32,
    pub height: u32,
    pub samples: u16,
    pub bits: u16,
    pub sample_format: u16,
    pub layout: Layout,
    pub planar: bool,
    pub deflate: bool,
    pub geokeys: Option<GeoKeys>,
    pub tiepoint: Option<([f64; 6], [f64; 3])>,
}

impl TiffBuilder {
    /// Little-endian classic, 8-bit single band, one strip, WGS 84 GeoKeys
    pub fn new(width: u32, height: u32) -> Self {
        TiffBuilder {
            big_endian: false,
            wide: false,
            width,
            height,
            samples: 1,
            bits: 8,
            sample_format: 1,
            layout: Layout::Striped { rows_per_strip: None },
            planar: false,
            deflate: false,
            geokeys: Some(GeoKeys::wgs84()),
            tiepoint: None,
        }
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn wide(mut self) -> Self {
        self.wide = true;
        self
    }

    pub fn samples(mut self, samples: u16) -> Self {
        self.samples = samples;
        self
    }

    pub fn bits(mut self, bits: u16) -> Self {
        self.bits = bits;
        self
    }

    pub fn sample_format(mut self, format: u16) -> Self {
        self.sample_format = format;
        self
    }

    pub fn tiled(mut self, tile_width: u32, tile_height: u32) -> Self {
        self.layout = Layout::Tiled { tile_width, tile_height };
        self
    }

    pub fn striped(mut self, rows_per_strip: u32) -> Self {
        self.layout = Layout::Striped { rows_per_strip: Some(rows_per_strip) };
        self
    }

    pub fn planar(mut self) -> Self {
        self.planar = true;
        self
    }

    pub fn deflate(mut self) -> Self {
        self.deflate = true;
        self
    }

    pub fn geokeys(mut self, keys: Option<GeoKeys>) -> Self {
        self.geokeys = keys;
        self
    }

    pub fn tiepoint(mut self, tiepoint: [f64; 6], scale: [f64; 3]) -> Self {
        self.tiepoint = Some((tiepoint, scale));
        self
    }

    fn element_size(&self) -> usize {
        (self.bits as usize).div_ceil(8)
    }

    fn mask(&self) -> u64 {
        if self.bits >= 64 {
            u64::MAX
        } else {
            (1u64 << self.bits) - 1
        }
    }

    /// Native-order bytes of one sample, as the reader returns them
    pub fn native_sample(&self, band: usize, row: usize, col: usize) -> Vec<u8> {
        let v = sample(band, row, col) & self.mask();
        let size = self.element_size();
        if cfg!(target_endian = "big") {
            v.to_be_bytes()[8 - size..].to_vec()
        } else {
            v.to_le_bytes()[..size].to_vec()
        }
    }

    fn file_sample(&self, band: usize, row: usize, col: usize) -> Vec<u8> {
        let v = sample(band, row, col) & self.mask();
        let size = self.element_size();
        if self.big_endian {
            v.to_be_bytes()[8 - size..].to_vec()
        } else {
            v.to_le_bytes()[..size].to_vec()
        }
    }

    /// Band-major native-order bytes the reader must return for a window
    pub fn expected(&self, start: &[u64], count: &[u64]) -> Vec<u8> {
        let (b0, nb, lead) = if start.len() == 3 {
            (start[0] as usize, count[0] as usize, 1)
        } else {
            (0, 1, 0)
        };
        let (r0, nr) = (start[lead] as usize, count[lead] as usize);
        let (c0, nc) = (start[lead + 1] as usize, count[lead + 1] as usize);

        let mut out = Vec::new();
        for b in b0..b0 + nb {
            for r in r0..r0 + nr {
                for c in c0..c0 + nc {
                    out.extend(self.native_sample(b, r, c));
                }
            }
        }
        out
    }

    /// Chunk payloads in on-disk order, before compression
    fn chunks(&self) -> Vec<Vec<u8>> {
        let (w, h) = (self.width as usize, self.height as usize);
        let spp = self.samples as usize;
        let (planes, per_pixel) = if self.planar { (spp, 1) } else { (1, spp) };
        let mut chunks = Vec::new();

        for plane in 0..planes {
            let band_of = |s: usize| if self.planar { plane } else { s };
            match self.layout {
                Layout::Tiled { tile_width, tile_height } => {
                    let (tw, th) = (tile_width as usize, tile_height as usize);
                    for ty in 0..h.div_ceil(th) {
                        for tx in 0..w.div_ceil(tw) {
                            let mut chunk = Vec::new();
                            for r in 0..th {
                                for c in 0..tw {
                                    let (row, col) = (ty * th + r, tx * tw + c);
                                    for s in 0..per_pixel {
                                        if row < h && col < w {
                                            chunk.extend(self.file_sample(band_of(s), row, col));
                                        } else {
                                            chunk.extend(vec![0u8; self.element_size()]);
                                        }
                                    }
                                }
                            }
                            chunks.push(chunk);
                        }
                    }
                }
                Layout::Striped { rows_per_strip } => {
                    let rps = rows_per_strip.unwrap_or(self.height) as usize;
                    for strip in 0..h.div_ceil(rps) {
                        let mut chunk = Vec::new();
                        for row in strip * rps..((strip + 1) * rps).min(h) {
                            for col in 0..w {
                                for s in 0..per_pixel {
                                    chunk.extend(self.file_sample(band_of(s), row, col));
                                }
                            }
                        }
                        chunks.push(chunk);
                    }
                }
            }
        }

        if self.deflate {
            chunks
                .into_iter()
                .map(|chunk| {
                    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                    encoder.write_all(&chunk).unwrap();
                    encoder.finish().unwrap()
                })
                .collect()
        } else {
            chunks
        }
    }

    fn u16s(&self, values: &[u16]) -> Vec<u8> {
        let mut out = Vec::new();
        for &v in values {
            if self.big_endian {
                out.write_u16::<BigEndian>(v).unwrap();
            } else {
                out.write_u16::<LittleEndian>(v).unwrap();
            }
        }
        out
    }

    fn u32s(&self, values: &[u32]) -> Vec<u8> {
        let mut out = Vec::new();
        for &v in values {
            if self.big_endian {
                out.write_u32::<BigEndian>(v).unwrap();
            } else {
                out.write_u32::<LittleEndian>(v).unwrap();
            }
        }
        out
    }

    fn u64s(&self, values: &[u64]) -> Vec<u8> {
        let mut out = Vec::new();
        for &v in values {
            if self.big_endian {
                out.write_u64::<BigEndian>(v).unwrap();
            } else {
                out.write_u64::<LittleEndian>(v).unwrap();
            }
        }
        out
    }

    fn f64s(&self, values: &[f64]) -> Vec<u8> {
        let mut out = Vec::new();
        for &v in values {
            if self.big_endian {
                out.write_f64::<BigEndian>(v).unwrap();
            } else {
                out.write_f64::<LittleEndian>(v).unwrap();
            }
        }
        out
    }

    fn offsets_entry(&self, tag: u16, values: &[u64]) -> Entry {
        if self.wide {
            Entry { tag, field_type: LONG8, count: values.len() as u64, bytes: self.u64s(values) }
        } else {
            let narrow: Vec<u32> = values.iter().map(|&v| v as u32).collect();
            Entry { tag, field_type: LONG, count: values.len() as u64, bytes: self.u32s(&narrow) }
        }
    }

    fn short_entry(&self, tag: u16, values: &[u16]) -> Entry {
        Entry { tag, field_type: SHORT, count: values.len() as u64, bytes: self.u16s(values) }
    }

    fn long_entry(&self, tag: u16, value: u32) -> Entry {
        Entry { tag, field_type: LONG, count: 1, bytes: self.u32s(&[value]) }
    }

    fn double_entry(&self, tag: u16, values: &[f64]) -> Entry {
        Entry { tag, field_type: DOUBLE, count: values.len() as u64, bytes: self.f64s(values) }
    }

    /// Serialises the whole file
    pub fn build(&self) -> Vec<u8> {
        let header_size: u64 = if self.wide { 16 } else { 8 };
        let inline_capacity: usize = if self.wide { 8 } else { 4 };

        let chunks = self.chunks();
        let mut offsets = Vec::new();
        let mut counts = Vec::new();
        let mut data = Vec::new();
        for chunk in &chunks {
            offsets.push(header_size + data.len() as u64);
            counts.push(chunk.len() as u64);
            data.extend_from_slice(chunk);
        }

        let spp = self.samples as usize;
        let mut entries = vec![
            self.long_entry(256, self.width),
            self.long_entry(257, self.height),
            self.short_entry(258, &vec![self.bits; spp]),
            self.short_entry(259, &[if self.deflate { 8 } else { 1 }]),
            self.short_entry(277, &[self.samples]),
        ];
        match self.layout {
            Layout::Tiled { tile_width, tile_height } => {
                entries.push(self.long_entry(322, tile_width));
                entries.push(self.long_entry(323, tile_height));
                entries.push(self.offsets_entry(324, &offsets));
                entries.push(self.offsets_entry(325, &counts));
            }
            Layout::Striped { rows_per_strip } => {
                entries.push(self.offsets_entry(273, &offsets));
                if let Some(rps) = rows_per_strip {
                    entries.push(self.long_entry(278, rps));
                }
                entries.push(self.offsets_entry(279, &counts));
            }
        }
        if self.planar {
            entries.push(self.short_entry(284, &[2]));
        }
        if self.sample_format != 1 {
            entries.push(self.short_entry(339, &vec![self.sample_format; spp]));
        }
        if let Some((tiepoint, scale)) = &self.tiepoint {
            entries.push(self.double_entry(33550, scale));
            entries.push(self.double_entry(33922, tiepoint));
        }
        if let Some(keys) = &self.geokeys {
            entries.push(self.short_entry(34735, &keys.shorts));
            if !keys.doubles.is_empty() {
                entries.push(self.double_entry(34736, &keys.doubles));
            }
            if !keys.ascii.is_empty() {
                let mut bytes = keys.ascii.as_bytes().to_vec();
                bytes.push(0);
                entries.push(Entry { tag: 34737, field_type: ASCII, count: bytes.len() as u64, bytes });
            }
        }
        entries.sort_by_key(|e| e.tag);

        // out-of-line values follow the chunk data, the directory follows them
        let mut extra = Vec::new();
        let mut value_offsets = Vec::new();
        let extra_start = header_size + data.len() as u64;
        for entry in &entries {
            if entry.bytes.len() > inline_capacity {
                if extra.len() % 2 == 1 {
                    extra.push(0);
                }
                value_offsets.push(Some(extra_start + extra.len() as u64));
                extra.extend_from_slice(&entry.bytes);
            } else {
                value_offsets.push(None);
            }
        }
        if extra.len() % 2 == 1 {
            extra.push(0);
        }
        let ifd_offset = extra_start + extra.len() as u64;

        let mut out = Vec::new();
        out.extend_from_slice(if self.big_endian { b"MM" } else { b"II" });
        if self.wide {
            out.extend(self.u16s(&[43, 8, 0]));
            out.extend(self.u64s(&[ifd_offset]));
        } else {
            out.extend(self.u16s(&[42]));
            out.extend(self.u32s(&[ifd_offset as u32]));
        }
        out.extend_from_slice(&data);
        out.extend_from_slice(&extra);

        if self.wide {
            out.extend(self.u64s(&[entries.len() as u64]));
        } else {
            out.extend(self.u16s(&[entries.len() as u16]));
        }
        for (entry, value_offset) in entries.iter().zip(&value_offsets) {
            out.extend(self.u16s(&[entry.tag, entry.field_type]));
            if self.wide {
                out.extend(self.u64s(&[entry.count]));
            } else {
                out.extend(self.u32s(&[entry.count as u32]));
            }
            match value_offset {
                Some(offset) if self.wide => out.extend(self.u64s(&[*offset])),
                Some(offset) => out.extend(self.u32s(&[*offset as u32])),
                None => {
                    let mut field = entry.bytes.clone();
                    field.resize(inline_capacity, 0);
                    out.extend(field);
                }
            }
        }
        if self.wide {
            out.extend(self.u64s(&[0]));
        } else {
            out.extend(self.u32s(&[0]));
        }
        out
    }

    /// Writes the file into a fresh temporary directory
    pub fn write(&self) -> TestFile {
        write_bytes(&self.build())
    }
}

/// Writes arbitrary bytes to a temporary file
pub fn write_bytes(bytes: &[u8]) -> TestFile {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.tif");
    std::fs::write(&path, bytes).unwrap();
    TestFile { _dir: dir, path }
}
