//! TIFF validation utilities
//!
//! Bounds checks applied before any offset taken from the file is used to
//! seek or allocate. Every failure here is an `InvalidFormat`.

use log::{debug, error, warn};
use std::io::{Seek, SeekFrom};

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Validates the first directory offset against the header size and a ceiling
///
/// The directory may start right after the header but never inside it.
pub fn validate_ifd_offset(offset: u64, header_size: u64, max_offset: u64) -> TiffResult<()> {
    if offset < header_size || offset > max_offset {
        error!("Rejecting IFD offset {} (header {} bytes, ceiling {})", offset, header_size, max_offset);
        return Err(TiffError::InvalidFormat(format!(
            "Invalid IFD offset: {} (must be between {} and {})",
            offset, header_size, max_offset
        )));
    }

    Ok(())
}

/// Validates the two BigTIFF-only header fields
pub fn validate_bigtiff_header(offset_size: u16, reserved: u16) -> TiffResult<()> {
    debug!("BigTIFF offset size: {}, reserved: {}", offset_size, reserved);

    if offset_size != header::BIGTIFF_OFFSET_SIZE || reserved != 0 {
        error!("Invalid BigTIFF header: offset_size={}, reserved={}", offset_size, reserved);
        return Err(TiffError::InvalidFormat(format!(
            "Invalid BigTIFF header: offset size {} reserved {}",
            offset_size, reserved
        )));
    }

    Ok(())
}

/// Rejects directory entry counts above the configured ceiling
pub fn validate_entry_count(count: u64, max_entries: u64) -> TiffResult<()> {
    if count > max_entries {
        error!("Directory entry count {} exceeds limit {}", count, max_entries);
        return Err(TiffError::InvalidFormat(format!(
            "Too many directory entries: {} (limit {})",
            count, max_entries
        )));
    }

    Ok(())
}

/// Checks that `len` bytes starting at `offset` lie inside the file
pub fn validate_extent(offset: u64, len: u64, file_size: u64, what: &str) -> TiffResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= file_size => Ok(()),
        _ => Err(TiffError::InvalidFormat(format!(
            "{} at offset {} with length {} runs past end of file ({} bytes)",
            what, offset, len, file_size
        ))),
    }
}

/// Gets the file size for validation purposes
///
/// Restores the reader position afterwards. Returns u64::MAX when the end
/// cannot be determined, which disables extent checks rather than failing.
pub fn get_file_size(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.seek(SeekFrom::Current(0))?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine file size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;

    Ok(file_size)
}

/// Validates a numeric range to ensure it's within bounds
pub fn validate_range<T>(value: T, min: T, max: T, name: &str) -> TiffResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(TiffError::InvalidFormat(format!(
            "Invalid {}: {} (must be between {} and {})",
            name, value, min, max
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_ifd_offset_bounds() {
        assert!(validate_ifd_offset(8, 8, 1000).is_ok());
        assert!(validate_ifd_offset(1000, 8, 1000).is_ok());
        assert!(validate_ifd_offset(7, 8, 1000).is_err());
        assert!(validate_ifd_offset(8, 16, 1000).is_err());
        assert!(validate_ifd_offset(1001, 8, 1000).is_err());
    }

    #[test]
    fn test_extent_overflow_is_rejected() {
        assert!(validate_extent(10, 10, 20, "tile").is_ok());
        assert!(validate_extent(10, 11, 20, "tile").is_err());
        assert!(validate_extent(u64::MAX, 2, u64::MAX, "tile").is_err());
    }

    #[test]
    fn test_file_size_keeps_position() {
        let mut cursor = Cursor::new(vec![0u8; 32]);
        cursor.set_position(5);
        assert_eq!(get_file_size(&mut cursor).unwrap(), 32);
        assert_eq!(cursor.position(), 5);
    }
}
