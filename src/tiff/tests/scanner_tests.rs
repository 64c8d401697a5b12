//! Tests for the directory tag scanner

use std::io::Cursor;

use super::test_utils::{self, long, short};
use crate::config::ReaderConfig;
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::tags;
use crate::tiff::errors::TiffError;
use crate::tiff::header::{sniff, TiffHeader};
use crate::tiff::scanner::{read_entry_count, scan_for_tag};

fn header_of(cursor: &mut Cursor<Vec<u8>>) -> TiffHeader {
    *sniff(cursor, &ReaderConfig::default()).unwrap().header().unwrap()
}

fn geotiff_entries() -> Vec<test_utils::Entry> {
    vec![
        long(tags::IMAGE_WIDTH, 10),
        long(tags::IMAGE_LENGTH, 10),
        short(tags::GEO_KEY_DIRECTORY_TAG, 0),
    ]
}

#[test]
fn test_finds_tag_in_classic_directory() {
    for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let mut cursor = test_utils::classic(order, &geotiff_entries(), &[]);
        let header = header_of(&mut cursor);
        assert!(scan_for_tag(&mut cursor, &header, tags::GEO_KEY_DIRECTORY_TAG, &ReaderConfig::default()).unwrap());
    }
}

#[test]
fn test_finds_tag_in_wide_directory() {
    let mut cursor = test_utils::wide(ByteOrder::BigEndian, &geotiff_entries(), &[]);
    let header = header_of(&mut cursor);
    assert!(scan_for_tag(&mut cursor, &header, tags::GEO_KEY_DIRECTORY_TAG, &ReaderConfig::default()).unwrap());
}

#[test]
fn test_plain_tiff_has_no_geokeys() {
    let entries = [long(tags::IMAGE_WIDTH, 10), long(tags::IMAGE_LENGTH, 10)];
    let mut cursor = test_utils::classic(ByteOrder::LittleEndian, &entries, &[]);
    let header = header_of(&mut cursor);
    assert!(!scan_for_tag(&mut cursor, &header, tags::GEO_KEY_DIRECTORY_TAG, &ReaderConfig::default()).unwrap());
}

#[test]
fn test_entry_count_ceiling() {
    let mut cursor = test_utils::classic(ByteOrder::LittleEndian, &geotiff_entries(), &[]);
    let header = header_of(&mut cursor);
    let strict = ReaderConfig { max_directory_entries: 2, ..ReaderConfig::default() };

    assert_eq!(read_entry_count(&mut cursor, &header, 8, &ReaderConfig::default()).unwrap(), 3);
    assert!(matches!(
        scan_for_tag(&mut cursor, &header, tags::GEO_KEY_DIRECTORY_TAG, &strict),
        Err(TiffError::InvalidFormat(_))
    ));
}

#[test]
fn test_truncated_directory_is_invalid() {
    let mut bytes = test_utils::classic(ByteOrder::LittleEndian, &geotiff_entries(), &[]).into_inner();
    bytes.truncate(8 + 2 + 12 + 6);
    let mut cursor = Cursor::new(bytes);
    let header = header_of(&mut cursor);
    assert!(matches!(
        scan_for_tag(&mut cursor, &header, tags::GEO_KEY_DIRECTORY_TAG, &ReaderConfig::default()),
        Err(TiffError::InvalidFormat(_))
    ));
}
