mod common;

use common::{write_bytes, GeoKeys, TiffBuilder};
use tiffslab::{
    ChunkLayout, GeoTiffFile, MemoryCatalog, NumericType, OpenMode, PlanarConfig, ReaderConfig, TiffError,
};

fn open(path: &std::path::Path) -> (GeoTiffFile, MemoryCatalog) {
    let mut catalog = MemoryCatalog::new();
    let file = GeoTiffFile::open(path, OpenMode::Read, &mut catalog, &ReaderConfig::default()).unwrap();
    (file, catalog)
}

#[test]
fn test_single_band_catalog() {
    let file = TiffBuilder::new(2000, 1500).tiled(256, 256).write();
    let (tiff, catalog) = open(file.path());

    assert_eq!(tiff.shape(), &[1500, 2000]);
    assert_eq!(tiff.numeric_type(), NumericType::UByte);
    assert_eq!(catalog.dimension_count(), 2);
    let x = catalog.find_dimension("x").unwrap();
    let y = catalog.find_dimension("y").unwrap();
    assert_eq!(catalog.dimension(x).unwrap().len, 2000);
    assert_eq!(catalog.dimension(y).unwrap().len, 1500);

    let var = catalog.find_variable("data").unwrap();
    assert_eq!(var, tiff.variable());
    assert_eq!(catalog.variable(var).unwrap().dims, vec![y, x]);
    assert_eq!(catalog.shape(var), Some(vec![1500, 2000]));
    assert_eq!(tiff.organization().layout, ChunkLayout::Tiled { tile_width: 256, tile_height: 256 });
    tiff.close().unwrap();
}

#[test]
fn test_multi_band_catalog() {
    let file = TiffBuilder::new(40, 30).samples(3).planar().striped(7).write();
    let (tiff, catalog) = open(file.path());

    assert_eq!(tiff.shape(), &[3, 30, 40]);
    assert_eq!(tiff.organization().planar_config, PlanarConfig::SeparatePlanes);
    let band = catalog.find_dimension("band").unwrap();
    assert_eq!(catalog.dimension(band).unwrap().len, 3);
    let var = catalog.find_variable("data").unwrap();
    assert_eq!(catalog.variable(var).unwrap().dims[0], band);
}

#[test]
fn test_sample_types() {
    let cases = [
        (8, 2, NumericType::Byte),
        (16, 1, NumericType::UShort),
        (16, 2, NumericType::Short),
        (32, 1, NumericType::UInt),
        (32, 3, NumericType::Float),
        (64, 3, NumericType::Double),
    ];
    for (bits, format, expected) in cases {
        let file = TiffBuilder::new(4, 4).bits(bits).sample_format(format).write();
        let (tiff, _) = open(file.path());
        assert_eq!(tiff.numeric_type(), expected, "bits={} format={}", bits, format);
    }
}

#[test]
fn test_unsupported_bit_depth_is_invalid_format() {
    let file = TiffBuilder::new(4, 4).bits(12).write();
    let mut catalog = MemoryCatalog::new();
    let result = GeoTiffFile::open(file.path(), OpenMode::Read, &mut catalog, &ReaderConfig::default());
    assert!(matches!(result, Err(TiffError::InvalidFormat(_))));
}

#[test]
fn test_big_endian_and_wide_open() {
    for builder in [
        TiffBuilder::new(10, 10).big_endian(),
        TiffBuilder::new(10, 10).wide(),
        TiffBuilder::new(10, 10).wide().big_endian().tiled(16, 16),
    ] {
        let file = builder.write();
        let (tiff, _) = open(file.path());
        assert_eq!(tiff.shape(), &[10, 10]);
        let format = tiff.format().to_string();
        assert!(format.contains(if builder.big_endian { "Big" } else { "Little" }), "{}", format);
    }
}

#[test]
fn test_plain_tiff_rejected_by_default() {
    let file = TiffBuilder::new(8, 8).geokeys(None).write();
    let mut catalog = MemoryCatalog::new();
    let result = GeoTiffFile::open(file.path(), OpenMode::Read, &mut catalog, &ReaderConfig::default());
    assert!(matches!(result, Err(TiffError::NotThisFormat)));
    assert_eq!(catalog.dimension_count(), 0);
}

#[test]
fn test_plain_tiff_opens_when_georeferencing_optional() {
    let file = TiffBuilder::new(8, 8).geokeys(None).write();
    let config = ReaderConfig { require_georeferencing: false, ..ReaderConfig::default() };
    let mut catalog = MemoryCatalog::new();
    let tiff = GeoTiffFile::open(file.path(), OpenMode::Read, &mut catalog, &config).unwrap();
    assert!(tiff.crs().is_none());
    assert_eq!(catalog.attributes().count(), 0);
}

#[test]
fn test_non_tiff_is_not_this_format() {
    let file = write_bytes(b"GIF89a not a tiff at all");
    let mut catalog = MemoryCatalog::new();
    let result = GeoTiffFile::open(file.path(), OpenMode::Read, &mut catalog, &ReaderConfig::default());
    assert!(matches!(result, Err(TiffError::NotThisFormat)));
}

#[test]
fn test_write_mode_unsupported() {
    let file = TiffBuilder::new(4, 4).write();
    let mut catalog = MemoryCatalog::new();
    let result = GeoTiffFile::open(file.path(), OpenMode::Write, &mut catalog, &ReaderConfig::default());
    assert!(matches!(result, Err(TiffError::Unsupported(_))));
}

#[test]
fn test_empty_path_is_invalid_argument() {
    let mut catalog = MemoryCatalog::new();
    let result = GeoTiffFile::open("", OpenMode::Read, &mut catalog, &ReaderConfig::default());
    assert!(matches!(result, Err(TiffError::InvalidArgument(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = MemoryCatalog::new();
    let result = GeoTiffFile::open(dir.path().join("absent.tif"), OpenMode::Read, &mut catalog, &ReaderConfig::default());
    assert!(matches!(result, Err(TiffError::IoError(_))));
}

#[test]
fn test_incomplete_crs_still_opens() {
    let file = TiffBuilder::new(4, 4).geokeys(Some(GeoKeys::geographic_without_ellipsoid())).write();
    let (tiff, catalog) = open(file.path());
    assert!(tiff.crs().map_or(true, |crs| !crs.is_complete()));
    assert!(catalog.attribute("geotiff_crs_type").is_none());
    assert!(catalog.find_variable("data").is_some());
}
