mod common;

use common::{TiffBuilder, TestFile};
use tiffslab::{GeoTiffFile, MemoryCatalog, NumericType, OpenMode, ReaderConfig, TiffError};

fn open_with(file: &TestFile, config: &ReaderConfig) -> GeoTiffFile {
    let mut catalog = MemoryCatalog::new();
    GeoTiffFile::open(file.path(), OpenMode::Read, &mut catalog, config).unwrap()
}

fn open(file: &TestFile) -> GeoTiffFile {
    open_with(file, &ReaderConfig::default())
}

fn read(tiff: &mut GeoTiffFile, start: &[u64], count: &[u64]) -> Vec<u8> {
    let (var, ty) = (tiff.variable(), tiff.numeric_type());
    tiff.read_hyperslab(var, start, count, ty).unwrap()
}

fn assert_window(builder: &TiffBuilder, tiff: &mut GeoTiffFile, start: &[u64], count: &[u64]) {
    assert_eq!(read(tiff, start, count), builder.expected(start, count), "start={:?} count={:?}", start, count);
}

#[test]
fn test_tiled_top_left_block() {
    let builder = TiffBuilder::new(2000, 1500).tiled(256, 256);
    let file = builder.write();
    let mut tiff = open(&file);

    let data = read(&mut tiff, &[0, 0], &[10, 10]);
    assert_eq!(data.len(), 100);
    assert_eq!(data, builder.expected(&[0, 0], &[10, 10]));

    // first tile starts right after the 8 byte header
    let raw = std::fs::read(file.path()).unwrap();
    for row in 0..10 {
        let tile_row = &raw[8 + row * 256..8 + row * 256 + 10];
        assert_eq!(&data[row * 10..row * 10 + 10], tile_row);
    }
}

#[test]
fn test_tiled_corners() {
    let builder = TiffBuilder::new(2000, 1500).tiled(256, 256);
    let file = builder.write();
    let mut tiff = open(&file);

    let corner = read(&mut tiff, &[1499, 1999], &[1, 1]);
    assert_eq!(corner, builder.native_sample(0, 1499, 1999));

    for start in [[0, 0], [0, 1999], [1499, 0], [1499, 1999]] {
        assert_window(&builder, &mut tiff, &start, &[1, 1]);
    }
    // edge tiles are partial in both directions
    assert_window(&builder, &mut tiff, &[1490, 1990], &[10, 10]);
}

#[test]
fn test_out_of_range_requests() {
    let file = TiffBuilder::new(2000, 1500).tiled(256, 256).write();
    let mut tiff = open(&file);
    let (var, ty) = (tiff.variable(), tiff.numeric_type());

    let cases: [(&[u64], &[u64]); 4] = [
        (&[1500, 0], &[1, 1]),
        (&[0, 2000], &[1, 1]),
        (&[1490, 0], &[11, 1]),
        (&[0, 0], &[0, 1]),
    ];
    for (start, count) in cases {
        let result = tiff.read_hyperslab(var, start, count, ty);
        assert!(matches!(result, Err(TiffError::OutOfRange(_))), "start={:?} count={:?}", start, count);
    }
    assert!(matches!(tiff.read_hyperslab(var, &[0, 0, 0], &[1, 1, 1], ty), Err(TiffError::InvalidArgument(_))));
    assert_eq!(tiff.chunk_reads(), 0);
}

#[test]
fn test_tile_straddling_windows() {
    let builder = TiffBuilder::new(100, 80).tiled(32, 32);
    let file = builder.write();
    let mut tiff = open(&file);

    for (start, count) in [
        ([30, 30], [4, 4]),
        ([0, 31], [80, 2]),
        ([31, 0], [2, 100]),
        ([5, 7], [70, 90]),
        ([0, 0], [80, 100]),
    ] {
        assert_window(&builder, &mut tiff, &start, &count);
    }
}

#[test]
fn test_strip_straddling_windows() {
    let builder = TiffBuilder::new(50, 45).striped(8);
    let file = builder.write();
    let mut tiff = open(&file);

    for (start, count) in [([7, 0], [2, 50]), ([0, 10], [45, 5]), ([40, 49], [5, 1]), ([3, 3], [33, 40])] {
        assert_window(&builder, &mut tiff, &start, &count);
    }
}

#[test]
fn test_single_row_matches_full_read() {
    for builder in [TiffBuilder::new(70, 40).tiled(16, 16), TiffBuilder::new(70, 40).striped(6)] {
        let file = builder.write();
        let mut tiff = open(&file);
        let full = read(&mut tiff, &[0, 0], &[40, 70]);
        for row in [0usize, 15, 16, 39] {
            let line = read(&mut tiff, &[row as u64, 0], &[1, 70]);
            assert_eq!(line, full[row * 70..(row + 1) * 70]);
        }
    }
}

#[test]
fn test_single_strip_without_rows_per_strip() {
    let builder = TiffBuilder::new(12, 9);
    let file = builder.write();
    let mut tiff = open(&file);
    assert_window(&builder, &mut tiff, &[0, 0], &[9, 12]);
    assert_window(&builder, &mut tiff, &[4, 5], &[3, 2]);
}

#[test]
fn test_planar_matches_interleaved() {
    let layouts = [
        TiffBuilder::new(45, 37).samples(3).tiled(16, 16),
        TiffBuilder::new(45, 37).samples(3).striped(5),
    ];
    for interleaved in layouts {
        let planar = interleaved.clone().planar();
        let (a, b) = (interleaved.write(), planar.write());
        let (mut chunky, mut separate) = (open(&a), open(&b));

        for (start, count) in [
            ([0, 0, 0], [3, 37, 45]),
            ([1, 10, 12], [2, 20, 20]),
            ([2, 36, 44], [1, 1, 1]),
            ([0, 15, 0], [1, 3, 45]),
        ] {
            let x = read(&mut chunky, &start, &count);
            let y = read(&mut separate, &start, &count);
            assert_eq!(x, y, "start={:?} count={:?}", start, count);
            assert_eq!(x, interleaved.expected(&start, &count));
        }
    }
}

#[test]
fn test_big_endian_16_bit_native_values() {
    let builder = TiffBuilder::new(30, 20).bits(16).big_endian().tiled(16, 16);
    let file = builder.write();
    let mut tiff = open(&file);
    assert_eq!(tiff.numeric_type(), NumericType::UShort);

    let data = read(&mut tiff, &[3, 4], &[5, 6]);
    let values: Vec<u16> = data.chunks_exact(2).map(|b| u16::from_ne_bytes([b[0], b[1]])).collect();
    let expected: Vec<u16> = (3..8)
        .flat_map(|r| (4..10).map(move |c| common::sample(0, r, c) as u16))
        .collect();
    assert_eq!(values, expected);
}

#[test]
fn test_wide_files() {
    for builder in [
        TiffBuilder::new(40, 33).wide().tiled(16, 16),
        TiffBuilder::new(40, 33).wide().big_endian().bits(32).striped(4),
        TiffBuilder::new(40, 33).wide().samples(2).planar().tiled(16, 16),
    ] {
        let file = builder.write();
        let mut tiff = open(&file);
        let shape = tiff.shape().to_vec();
        let start = vec![0; shape.len()];
        assert_window(&builder, &mut tiff, &start, &shape);
    }
}

#[test]
fn test_deflate_chunks() {
    for builder in [
        TiffBuilder::new(64, 48).deflate().tiled(16, 16),
        TiffBuilder::new(64, 48).deflate().bits(16).big_endian().striped(10),
        TiffBuilder::new(64, 48).deflate().samples(3).planar().striped(10),
    ] {
        let file = builder.write();
        let mut tiff = open(&file);
        let shape = tiff.shape().to_vec();
        let start = vec![0; shape.len()];
        assert_window(&builder, &mut tiff, &start, &shape);
    }
}

#[test]
fn test_one_decode_per_tile() {
    let file = TiffBuilder::new(2000, 1500).tiled(256, 256).write();
    let mut tiff = open(&file);

    read(&mut tiff, &[256, 512], &[256, 256]);
    assert_eq!(tiff.chunk_reads(), 1);

    read(&mut tiff, &[250, 250], &[12, 12]);
    assert_eq!(tiff.chunk_reads(), 5);
}

#[test]
fn test_one_decode_per_strip() {
    let file = TiffBuilder::new(20, 64).striped(16).write();
    let mut tiff = open(&file);

    read(&mut tiff, &[0, 0], &[16, 20]);
    assert_eq!(tiff.chunk_reads(), 1);

    read(&mut tiff, &[10, 3], &[10, 5]);
    assert_eq!(tiff.chunk_reads(), 3);
}

#[test]
fn test_planar_decodes_only_requested_planes() {
    let file = TiffBuilder::new(16, 16).samples(4).planar().tiled(16, 16).write();
    let mut tiff = open(&file);
    read(&mut tiff, &[1, 0, 0], &[2, 16, 16]);
    assert_eq!(tiff.chunk_reads(), 2);
}

#[test]
fn test_element_type_mismatch() {
    let file = TiffBuilder::new(8, 8).write();
    let mut tiff = open(&file);
    let var = tiff.variable();
    let result = tiff.read_hyperslab(var, &[0, 0], &[1, 1], NumericType::Float);
    assert!(matches!(result, Err(TiffError::InvalidArgument(_))));
}

#[test]
fn test_output_buffer_too_small() {
    let file = TiffBuilder::new(8, 8).write();
    let mut tiff = open(&file);
    let (var, ty) = (tiff.variable(), tiff.numeric_type());
    let mut out = vec![0u8; 3];
    let result = tiff.read_hyperslab_into(var, &[0, 0], &[2, 2], ty, &mut out);
    assert!(matches!(result, Err(TiffError::InvalidArgument(_))));

    let mut out = vec![0u8; 4];
    tiff.read_hyperslab_into(var, &[0, 0], &[2, 2], ty, &mut out).unwrap();
}

#[test]
fn test_scratch_ceiling() {
    let file = TiffBuilder::new(512, 512).tiled(256, 256).write();
    let config = ReaderConfig { max_scratch_bytes: 1000, ..ReaderConfig::default() };
    let mut tiff = open_with(&file, &config);
    let (var, ty) = (tiff.variable(), tiff.numeric_type());
    let result = tiff.read_hyperslab(var, &[0, 0], &[1, 1], ty);
    assert!(matches!(result, Err(TiffError::ResourceExhausted(_))));
}

#[test]
fn test_strip_ceiling_applies_to_whole_strip() {
    let config = ReaderConfig { max_scratch_bytes: 5000, ..ReaderConfig::default() };

    let one_strip = TiffBuilder::new(100, 100).write();
    let mut tiff = open_with(&one_strip, &config);
    let (var, ty) = (tiff.variable(), tiff.numeric_type());
    let result = tiff.read_hyperslab(var, &[0, 0], &[1, 100], ty);
    assert!(matches!(result, Err(TiffError::ResourceExhausted(_))));

    let builder = TiffBuilder::new(100, 100).striped(10);
    let short_strips = builder.write();
    let mut tiff = open_with(&short_strips, &config);
    assert_window(&builder, &mut tiff, &[0, 0], &[1, 100]);
}

#[test]
fn test_truncated_chunk_is_decode_failure() {
    let builder = TiffBuilder::new(16, 16).striped(8);
    let mut bytes = builder.build();
    // point the second strip past the end of the file
    let len = bytes.len();
    let offsets_at = (0..len - 4)
        .find(|&i| bytes[i..i + 4] == 8u32.to_le_bytes() && bytes[i + 4..i + 8] == 136u32.to_le_bytes())
        .unwrap();
    bytes[offsets_at + 4..offsets_at + 8].copy_from_slice(&((len + 1000) as u32).to_le_bytes());
    let file = common::write_bytes(&bytes);

    let mut tiff = open(&file);
    let (var, ty) = (tiff.variable(), tiff.numeric_type());
    assert_window(&builder, &mut tiff, &[0, 0], &[8, 16]);
    let result = tiff.read_hyperslab(var, &[8, 0], &[8, 16], ty);
    assert!(matches!(result, Err(TiffError::DecodeFailure(_))));
    // the handle stays usable
    assert_window(&builder, &mut tiff, &[2, 2], &[4, 4]);
}
