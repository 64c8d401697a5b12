//! TIFF header sniffing
//!
//! Reads the fixed-size header at offset 0 and decides whether the stream is
//! a classic TIFF, a BigTIFF, or something else entirely. "Something else" is
//! a normal answer, reported as [`Sniff::NotThisFormat`] rather than an error,
//! so a host can cheaply probe many candidate files.

use log::{debug, trace};
use std::fmt;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::config::ReaderConfig;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{directory, header};
use crate::tiff::errors::TiffResult;
use crate::tiff::validation;

/// Container generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffVariant {
    /// Version 42: 4-byte offsets, 12-byte directory entries
    Classic,
    /// Version 43 (BigTIFF): 8-byte offsets, 20-byte directory entries
    Wide,
}

impl TiffVariant {
    pub fn header_size(&self) -> u64 {
        match self {
            TiffVariant::Classic => header::CLASSIC_HEADER_SIZE,
            TiffVariant::Wide => header::BIGTIFF_HEADER_SIZE,
        }
    }

    pub fn entry_size(&self) -> u64 {
        match self {
            TiffVariant::Classic => directory::CLASSIC_ENTRY_SIZE,
            TiffVariant::Wide => directory::BIGTIFF_ENTRY_SIZE,
        }
    }

    /// Width of the directory entry-count field
    pub fn count_size(&self) -> u64 {
        match self {
            TiffVariant::Classic => directory::CLASSIC_COUNT_SIZE,
            TiffVariant::Wide => directory::BIGTIFF_COUNT_SIZE,
        }
    }

    /// Bytes available for a value stored inside a directory entry
    pub fn inline_capacity(&self) -> u64 {
        match self {
            TiffVariant::Classic => 4,
            TiffVariant::Wide => 8,
        }
    }
}

impl fmt::Display for TiffVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffVariant::Classic => write!(f, "TIFF"),
            TiffVariant::Wide => write!(f, "BigTIFF"),
        }
    }
}

/// Facts established by a successful sniff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    pub byte_order: ByteOrder,
    pub variant: TiffVariant,
    pub first_ifd_offset: u64,
}

impl TiffHeader {
    /// Whether 16/32/64-bit fields must be byte swapped on this host
    pub fn needs_swap(&self) -> bool {
        self.byte_order.needs_swap()
    }

    pub fn handler(&self) -> Box<dyn ByteOrderHandler> {
        self.byte_order.create_handler()
    }
}

/// Outcome of sniffing a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sniff {
    Classic(TiffHeader),
    Wide(TiffHeader),
    NotThisFormat,
}

impl Sniff {
    pub fn header(&self) -> Option<&TiffHeader> {
        match self {
            Sniff::Classic(h) | Sniff::Wide(h) => Some(h),
            Sniff::NotThisFormat => None,
        }
    }
}

/// Sniffs the header at the start of `reader`
///
/// Magic or version mismatches and streams too short to hold a header yield
/// `Ok(Sniff::NotThisFormat)`. A recognised header with a malformed BigTIFF
/// prologue or an out-of-bounds first directory offset is `InvalidFormat`.
pub fn sniff(reader: &mut dyn SeekableReader, config: &ReaderConfig) -> TiffResult<Sniff> {
    reader.seek(SeekFrom::Start(0))?;

    let mut prologue = [0u8; 8];
    if !read_fully(reader, &mut prologue)? {
        debug!("Stream shorter than a TIFF header");
        return Ok(Sniff::NotThisFormat);
    }

    let byte_order = match ByteOrder::from_marker([prologue[0], prologue[1]]) {
        Some(order) => order,
        None => {
            trace!("Unknown byte order marker {:02x}{:02x}", prologue[0], prologue[1]);
            return Ok(Sniff::NotThisFormat);
        }
    };
    let handler = byte_order.create_handler();
    let version = handler.u16_from(&prologue[2..4]);

    let variant = match version {
        header::TIFF_VERSION => TiffVariant::Classic,
        header::BIG_TIFF_VERSION => TiffVariant::Wide,
        other => {
            debug!("Unrecognised TIFF version {}", other);
            return Ok(Sniff::NotThisFormat);
        }
    };

    let first_ifd_offset = match variant {
        TiffVariant::Classic => handler.u32_from(&prologue[4..8]) as u64,
        TiffVariant::Wide => {
            let offset_size = handler.u16_from(&prologue[4..6]);
            let reserved = handler.u16_from(&prologue[6..8]);
            validation::validate_bigtiff_header(offset_size, reserved)?;

            let mut offset_bytes = [0u8; 8];
            if !read_fully(reader, &mut offset_bytes)? {
                debug!("BigTIFF header truncated before the directory offset");
                return Ok(Sniff::NotThisFormat);
            }
            handler.u64_from(&offset_bytes)
        }
    };

    validation::validate_ifd_offset(first_ifd_offset, variant.header_size(), config.max_ifd_offset)?;

    let header = TiffHeader { byte_order, variant, first_ifd_offset };
    debug!(
        "Sniffed {} ({}), first IFD at {}, swap needed: {}",
        variant,
        byte_order.name(),
        first_ifd_offset,
        header.needs_swap()
    );

    Ok(match variant {
        TiffVariant::Classic => Sniff::Classic(header),
        TiffVariant::Wide => Sniff::Wide(header),
    })
}

/// Fills `buf`, returning false on a clean end of stream
fn read_fully(reader: &mut dyn SeekableReader, buf: &mut [u8]) -> TiffResult<bool> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}
