//! Directory tag scanner
//!
//! Cheap pre-check run before the full directory decode: it walks the first
//! directory reading only the two-byte tag identifier of each entry and stops
//! at the first match. Values are never parsed here.

use log::{debug, trace};
use std::io::{ErrorKind, Seek, SeekFrom};

use crate::config::ReaderConfig;
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::header::{TiffHeader, TiffVariant};
use crate::tiff::validation;

/// Reads the directory entry count at `offset` and checks it against the ceiling
pub fn read_entry_count(
    reader: &mut dyn SeekableReader,
    header: &TiffHeader,
    offset: u64,
    config: &ReaderConfig,
) -> TiffResult<u64> {
    let handler = header.handler();
    reader.seek(SeekFrom::Start(offset))?;

    let count = match header.variant {
        TiffVariant::Classic => handler.read_u16(reader).map(u64::from),
        TiffVariant::Wide => handler.read_u64(reader),
    }
    .map_err(truncated)?;

    validation::validate_entry_count(count, config.max_directory_entries)?;
    Ok(count)
}

/// Reports whether the first directory contains `tag`
pub fn scan_for_tag(
    reader: &mut dyn SeekableReader,
    header: &TiffHeader,
    tag: u16,
    config: &ReaderConfig,
) -> TiffResult<bool> {
    let handler = header.handler();
    let count = read_entry_count(reader, header, header.first_ifd_offset, config)?;
    let entries_start = header.first_ifd_offset + header.variant.count_size();
    let entry_size = header.variant.entry_size();

    debug!("Scanning {} directory entries for tag {}", count, tag);

    for index in 0..count {
        reader.seek(SeekFrom::Start(entries_start + index * entry_size))?;
        let entry_tag = handler.read_u16(reader).map_err(truncated)?;
        trace!("Entry {} has tag {}", index, entry_tag);
        if entry_tag == tag {
            debug!("Found tag {} at entry {}", tag, index);
            return Ok(true);
        }
    }

    Ok(false)
}

pub(crate) fn truncated(e: std::io::Error) -> TiffError {
    if e.kind() == ErrorKind::UnexpectedEof {
        TiffError::InvalidFormat("Directory truncated by end of file".to_string())
    } else {
        TiffError::IoError(e)
    }
}
