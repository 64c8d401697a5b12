//! Image File Directory (IFD) structures
//!
//! Directory entries come in two layouts: classic TIFF packs a 4-byte count
//! and a 4-byte value field into 12 bytes, BigTIFF widens both to 8 bytes for
//! a 20-byte entry. [`IFDEntry`] keeps the two apart so each layout carries
//! exactly the fields it has on disk, with the value field left as raw file
//! bytes until a reader decodes it in the file's byte order.

use log::trace;
use std::collections::HashMap;
use std::fmt;

use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::constants::field_types;

/// A 12-byte classic directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    pub value: [u8; 4],
}

/// A 20-byte BigTIFF directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u64,
    pub value: [u8; 8],
}

/// Directory entry in either layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IFDEntry {
    Classic(ClassicEntry),
    Wide(WideEntry),
}

impl IFDEntry {
    pub fn tag(&self) -> u16 {
        match self {
            IFDEntry::Classic(e) => e.tag,
            IFDEntry::Wide(e) => e.tag,
        }
    }

    pub fn field_type(&self) -> u16 {
        match self {
            IFDEntry::Classic(e) => e.field_type,
            IFDEntry::Wide(e) => e.field_type,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            IFDEntry::Classic(e) => e.count as u64,
            IFDEntry::Wide(e) => e.count,
        }
    }

    /// Raw value-field bytes, in file byte order
    pub fn value_bytes(&self) -> &[u8] {
        match self {
            IFDEntry::Classic(e) => &e.value,
            IFDEntry::Wide(e) => &e.value,
        }
    }

    /// Total size of the entry's values in bytes, None for unknown types or overflow
    pub fn data_size(&self) -> Option<u64> {
        match field_types::size_of(self.field_type()) {
            0 => None,
            size => size.checked_mul(self.count()),
        }
    }

    /// Whether the values fit inside the entry's own value field
    pub fn is_value_inline(&self) -> bool {
        let capacity = self.value_bytes().len() as u64;
        let inline = matches!(self.data_size(), Some(size) if size <= capacity);
        trace!("Tag {} value is {}", self.tag(), if inline { "inline" } else { "at an offset" });
        inline
    }

    /// Interprets the value field as an offset into the file
    pub fn value_offset(&self, handler: &dyn ByteOrderHandler) -> u64 {
        match self {
            IFDEntry::Classic(e) => handler.u32_from(&e.value) as u64,
            IFDEntry::Wide(e) => handler.u64_from(&e.value),
        }
    }
}

impl fmt::Display for IFDEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tag: {}, Type: {}, Count: {}, Value: {:02x?}",
            self.tag(),
            self.field_type(),
            self.count(),
            self.value_bytes()
        )
    }
}

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Tag to entry index
    tag_map: HashMap<u16, usize>,
}

impl IFD {
    pub fn new(number: usize, offset: u64) -> Self {
        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry; a repeated tag replaces the earlier lookup target
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("Adding entry to IFD #{}: {}", self.number, entry);
        self.tag_map.insert(entry.tag(), self.entries.len());
        self.entries.push(entry);
    }

    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&index| &self.entries[index])
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "    {}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::byte_order::{BigEndianHandler, LittleEndianHandler};

    fn classic(tag: u16, field_type: u16, count: u32, value: [u8; 4]) -> IFDEntry {
        IFDEntry::Classic(ClassicEntry { tag, field_type, count, value })
    }

    #[test]
    fn test_inline_capacity_depends_on_layout() {
        let two_longs_classic = classic(273, field_types::LONG, 2, [0; 4]);
        assert!(!two_longs_classic.is_value_inline());

        let two_longs_wide = IFDEntry::Wide(WideEntry {
            tag: 273,
            field_type: field_types::LONG,
            count: 2,
            value: [0; 8],
        });
        assert!(two_longs_wide.is_value_inline());
    }

    #[test]
    fn test_unknown_field_type_is_never_inline() {
        assert!(!classic(1, 99, 1, [0; 4]).is_value_inline());
    }

    #[test]
    fn test_value_offset_honours_byte_order() {
        let entry = classic(273, field_types::LONG, 4, [0x00, 0x00, 0x01, 0x00]);
        assert_eq!(entry.value_offset(&LittleEndianHandler), 0x0001_0000);
        assert_eq!(entry.value_offset(&BigEndianHandler), 0x0100);
    }

    #[test]
    fn test_lookup_by_tag() {
        let mut ifd = IFD::new(0, 8);
        ifd.add_entry(classic(256, field_types::SHORT, 1, [10, 0, 0, 0]));
        ifd.add_entry(classic(257, field_types::SHORT, 1, [20, 0, 0, 0]));
        assert!(ifd.has_tag(257));
        assert!(!ifd.has_tag(258));
        assert_eq!(ifd.get_entry(256).map(|e| e.value_bytes()[0]), Some(10));
        assert_eq!(ifd.entry_count(), 2);
    }
}
