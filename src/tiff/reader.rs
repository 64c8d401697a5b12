//! Full directory decoding
//!
//! Once the sniffer and the scanner have accepted a file, this reader decodes
//! the first directory completely and fetches tag values, whether they sit
//! inline in the entry or elsewhere in the file.

use log::{debug, info};
use std::io::{Read, Seek, SeekFrom};

use crate::config::ReaderConfig;
use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::field_types;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::header::{TiffHeader, TiffVariant};
use crate::tiff::ifd::{ClassicEntry, IFDEntry, WideEntry, IFD};
use crate::tiff::scanner;
use crate::tiff::validation;

/// Reader for the directories and tag values of one sniffed file
pub struct TiffReader {
    header: TiffHeader,
    handler: Box<dyn ByteOrderHandler>,
    file_size: u64,
}

impl TiffReader {
    pub fn new(header: TiffHeader, file_size: u64) -> Self {
        TiffReader {
            handler: header.handler(),
            header,
            file_size,
        }
    }

    pub fn header(&self) -> &TiffHeader {
        &self.header
    }

    pub fn handler(&self) -> &dyn ByteOrderHandler {
        self.handler.as_ref()
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Decodes the first directory of the file
    pub fn read_first_ifd(&self, reader: &mut dyn SeekableReader, config: &ReaderConfig) -> TiffResult<IFD> {
        self.read_ifd(reader, self.header.first_ifd_offset, 0, config)
    }

    /// Decodes the directory at `offset`
    pub fn read_ifd(
        &self,
        reader: &mut dyn SeekableReader,
        offset: u64,
        number: usize,
        config: &ReaderConfig,
    ) -> TiffResult<IFD> {
        let entry_count = scanner::read_entry_count(reader, &self.header, offset, config)?;
        let table_size = entry_count * self.header.variant.entry_size();
        validation::validate_extent(
            offset + self.header.variant.count_size(),
            table_size,
            self.file_size,
            "Directory",
        )?;
        debug!("IFD #{} at {} has {} entries", number, offset, entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader).map_err(scanner::truncated)?;
            ifd.add_entry(entry);
        }

        info!("Read IFD #{} with {} entries", number, ifd.entry_count());
        Ok(ifd)
    }

    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> std::io::Result<IFDEntry> {
        let handler = self.handler();
        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;

        Ok(match self.header.variant {
            TiffVariant::Classic => {
                let count = handler.read_u32(reader)?;
                let mut value = [0u8; 4];
                reader.read_exact(&mut value)?;
                IFDEntry::Classic(ClassicEntry { tag, field_type, count, value })
            }
            TiffVariant::Wide => {
                let count = handler.read_u64(reader)?;
                let mut value = [0u8; 8];
                reader.read_exact(&mut value)?;
                IFDEntry::Wide(WideEntry { tag, field_type, count, value })
            }
        })
    }

    /// Returns the raw bytes of an entry's values, in file byte order
    fn entry_data(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> TiffResult<Vec<u8>> {
        let size = entry.data_size().ok_or_else(|| {
            TiffError::InvalidFormat(format!(
                "Tag {} has unsupported field type {} or oversized count {}",
                entry.tag(),
                entry.field_type(),
                entry.count()
            ))
        })?;

        if entry.is_value_inline() {
            return Ok(entry.value_bytes()[..size as usize].to_vec());
        }

        let offset = entry.value_offset(self.handler());
        validation::validate_extent(offset, size, self.file_size, "Tag value")?;
        reader.seek(SeekFrom::Start(offset))?;
        let mut data = vec![0u8; size as usize];
        reader.read_exact(&mut data)?;
        Ok(data)
    }

    /// Reads an integer-typed tag as a vector of u64
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd
            .get_entry(tag)
            .ok_or_else(|| TiffError::InvalidFormat(format!("Required tag {} not found", tag)))?;
        let data = self.entry_data(reader, entry)?;
        let handler = self.handler();

        let values = match entry.field_type() {
            field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED => {
                data.iter().map(|&b| b as u64).collect()
            }
            field_types::SHORT | field_types::SSHORT => {
                data.chunks_exact(2).map(|c| handler.u16_from(c) as u64).collect()
            }
            field_types::LONG | field_types::SLONG | field_types::IFD => {
                data.chunks_exact(4).map(|c| handler.u32_from(c) as u64).collect()
            }
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => {
                data.chunks_exact(8).map(|c| handler.u64_from(c)).collect()
            }
            other => {
                return Err(TiffError::InvalidFormat(format!(
                    "Tag {} has non-integer field type {}",
                    tag, other
                )))
            }
        };

        Ok(values)
    }

    /// Reads the first value of an integer tag, None when the tag is absent
    pub fn read_optional_u64(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Option<u64>> {
        if !ifd.has_tag(tag) {
            return Ok(None);
        }
        let values = self.read_tag_values(reader, ifd, tag)?;
        Ok(values.first().copied())
    }

    /// Reads a numeric tag as doubles; integer and rational types are converted
    pub fn read_tag_doubles(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let entry = ifd
            .get_entry(tag)
            .ok_or_else(|| TiffError::InvalidFormat(format!("Required tag {} not found", tag)))?;
        let handler = self.handler();

        match entry.field_type() {
            field_types::DOUBLE => {
                let data = self.entry_data(reader, entry)?;
                Ok(data.chunks_exact(8).map(|c| handler.f64_from(c)).collect())
            }
            field_types::FLOAT => {
                let data = self.entry_data(reader, entry)?;
                Ok(data.chunks_exact(4).map(|c| handler.f32_from(c) as f64).collect())
            }
            field_types::RATIONAL => {
                let data = self.entry_data(reader, entry)?;
                Ok(data
                    .chunks_exact(8)
                    .map(|c| {
                        let numerator = handler.u32_from(&c[0..4]);
                        let denominator = handler.u32_from(&c[4..8]);
                        if denominator == 0 {
                            0.0
                        } else {
                            numerator as f64 / denominator as f64
                        }
                    })
                    .collect())
            }
            _ => Ok(self
                .read_tag_values(reader, ifd, tag)?
                .into_iter()
                .map(|v| v as f64)
                .collect()),
        }
    }

    /// Reads an ASCII tag, dropping everything from the first NUL on
    pub fn read_tag_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let entry = ifd
            .get_entry(tag)
            .ok_or_else(|| TiffError::InvalidFormat(format!("Required tag {} not found", tag)))?;
        let data = self.entry_data(reader, entry)?;
        let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        Ok(String::from_utf8_lossy(&data[..end]).into_owned())
    }
}
