//! TIFF and GeoTIFF format constants
//!
//! Named values for header fields, directory tags, codec identifiers and
//! GeoKeys, so the parsing code never deals in bare numbers.

/// TIFF header constants
pub mod header {
    /// Classic TIFF version number (42)
    pub const TIFF_VERSION: u16 = 42;

    /// BigTIFF version number (43)
    pub const BIG_TIFF_VERSION: u16 = 43;

    /// "II" byte order marker for little-endian
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = [0x49, 0x49];

    /// "MM" byte order marker for big-endian
    pub const BIG_ENDIAN_MARKER: [u8; 2] = [0x4D, 0x4D];

    /// BigTIFF offset size field (must be 8)
    pub const BIGTIFF_OFFSET_SIZE: u16 = 8;

    /// Size of a classic header in bytes
    pub const CLASSIC_HEADER_SIZE: u64 = 8;

    /// Size of a BigTIFF header in bytes
    pub const BIGTIFF_HEADER_SIZE: u64 = 16;
}

/// Directory layout constants
pub mod directory {
    pub const CLASSIC_ENTRY_SIZE: u64 = 12;
    pub const BIGTIFF_ENTRY_SIZE: u64 = 20;
    pub const CLASSIC_COUNT_SIZE: u64 = 2;
    pub const BIGTIFF_COUNT_SIZE: u64 = 8;
}

/// Field types as defined in the TIFF spec
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
    pub const IFD: u16 = 13;       // 32-bit IFD offset
    pub const LONG8: u16 = 16;     // BigTIFF 64-bit unsigned integer
    pub const SLONG8: u16 = 17;    // BigTIFF 64-bit signed integer
    pub const IFD8: u16 = 18;      // BigTIFF 64-bit IFD offset

    /// Size in bytes of one value of the given field type, 0 if unknown
    pub fn size_of(field_type: u16) -> u64 {
        match field_type {
            BYTE | ASCII | SBYTE | UNDEFINED => 1,
            SHORT | SSHORT => 2,
            LONG | SLONG | FLOAT | IFD => 4,
            RATIONAL | SRATIONAL | DOUBLE | LONG8 | SLONG8 | IFD8 => 8,
            _ => 0,
        }
    }
}

/// Baseline and extension tags needed to address pixel bytes
pub mod tags {
    pub const IMAGE_WIDTH: u16 = 256;              // Width of the image in pixels
    pub const IMAGE_LENGTH: u16 = 257;             // Height of the image in pixels
    pub const BITS_PER_SAMPLE: u16 = 258;          // Bits per component
    pub const COMPRESSION: u16 = 259;              // Compression scheme
    pub const STRIP_OFFSETS: u16 = 273;            // Offsets to the data strips
    pub const SAMPLES_PER_PIXEL: u16 = 277;        // Number of components per pixel
    pub const ROWS_PER_STRIP: u16 = 278;           // Rows per strip of data
    pub const STRIP_BYTE_COUNTS: u16 = 279;        // Bytes counts for strips
    pub const PLANAR_CONFIGURATION: u16 = 284;     // How components are stored
    pub const PREDICTOR: u16 = 317;                // Prediction scheme used on image data
    pub const TILE_WIDTH: u16 = 322;               // Width of a tile
    pub const TILE_LENGTH: u16 = 323;              // Length of a tile
    pub const TILE_OFFSETS: u16 = 324;             // Offsets to the data tiles
    pub const TILE_BYTE_COUNTS: u16 = 325;         // Byte counts for tiles
    pub const SAMPLE_FORMAT: u16 = 339;            // Interpretation of sample data

    // GeoTIFF tags
    pub const MODEL_PIXEL_SCALE_TAG: u16 = 33550;   // Pixel size in map units
    pub const MODEL_TIEPOINT_TAG: u16 = 33922;      // Links raster to world coordinates
    pub const GEO_KEY_DIRECTORY_TAG: u16 = 34735;   // GeoTIFF keys structure
    pub const GEO_DOUBLE_PARAMS_TAG: u16 = 34736;   // GeoTIFF double parameters
    pub const GEO_ASCII_PARAMS_TAG: u16 = 34737;    // GeoTIFF ASCII parameters
}

/// Compression types
pub mod compression {
    pub const NONE: u16 = 1;              // No compression
    pub const LZW: u16 = 5;               // LZW compression
    pub const DEFLATE: u16 = 8;           // Adobe Deflate (zlib)
    pub const ZSTD: u16 = 14;             // Zstandard compression
    pub const PACKBITS: u16 = 32773;      // PackBits compression
    pub const DEFLATE_OLD: u16 = 32946;   // Legacy Deflate code
}

/// Planar configuration values
pub mod planar_config {
    pub const CHUNKY: u16 = 1;            // Components stored interleaved (RGBRGBRGB)
    pub const PLANAR: u16 = 2;            // Components stored separately (RRR...GGG...BBB)
}

/// Sample format values
pub mod sample_format {
    pub const UNSIGNED: u16 = 1;          // Unsigned integer data
    pub const SIGNED: u16 = 2;            // Signed integer data
    pub const IEEEFP: u16 = 3;            // IEEE floating point data
}

/// Predictor values
pub mod predictor {
    pub const NONE: u16 = 1;                    // No prediction scheme
    pub const HORIZONTAL_DIFFERENCING: u16 = 2; // Horizontal differencing
    pub const FLOATING_POINT: u16 = 3;          // Floating point predictor
}

/// GeoKey directory layout
pub mod geo_key_directory {
    /// Highest key directory version this reader understands
    pub const SUPPORTED_VERSION: u16 = 1;
    /// Shorts per key entry and in the directory header
    pub const ENTRY_SHORTS: usize = 4;
    /// Location value meaning "stored inline in value_offset"
    pub const INLINE_LOCATION: u16 = 0;
}

/// GeoTIFF Key ID constants
pub mod geo_keys {
    pub const GT_MODEL_TYPE: u16 = 1024;          // GTModelTypeGeoKey
    pub const GT_RASTER_TYPE: u16 = 1025;         // GTRasterTypeGeoKey
    pub const GT_CITATION: u16 = 1026;            // GTCitationGeoKey
    pub const GEOGRAPHIC_TYPE: u16 = 2048;        // GeographicTypeGeoKey
    pub const GEOG_CITATION: u16 = 2049;          // GeogCitationGeoKey
    pub const GEOG_GEODETIC_DATUM: u16 = 2050;    // GeogGeodeticDatumGeoKey
    pub const GEOG_ELLIPSOID: u16 = 2056;         // GeogEllipsoidGeoKey
    pub const GEOG_SEMI_MAJOR_AXIS: u16 = 2057;   // GeogSemiMajorAxisGeoKey
    pub const GEOG_SEMI_MINOR_AXIS: u16 = 2058;   // GeogSemiMinorAxisGeoKey
    pub const GEOG_INV_FLATTENING: u16 = 2059;    // GeogInvFlatteningGeoKey
    pub const PROJECTED_CS_TYPE: u16 = 3072;      // ProjectedCSTypeGeoKey
    pub const PCS_CITATION: u16 = 3073;           // PCSCitationGeoKey
    pub const PROJECTION: u16 = 3074;             // ProjectionGeoKey
    pub const PROJ_COORD_TRANS: u16 = 3075;       // ProjCoordTransGeoKey
    pub const PROJ_LINEAR_UNITS: u16 = 3076;      // ProjLinearUnitsGeoKey
    pub const PROJ_NAT_ORIGIN_LONG: u16 = 3080;   // ProjNatOriginLongGeoKey
    pub const PROJ_NAT_ORIGIN_LAT: u16 = 3081;    // ProjNatOriginLatGeoKey
    pub const PROJ_FALSE_EASTING: u16 = 3082;     // ProjFalseEastingGeoKey
    pub const PROJ_FALSE_NORTHING: u16 = 3083;    // ProjFalseNorthingGeoKey
    pub const PROJ_FALSE_ORIGIN_LONG: u16 = 3084; // ProjFalseOriginLongGeoKey
    pub const PROJ_FALSE_ORIGIN_LAT: u16 = 3085;  // ProjFalseOriginLatGeoKey
    pub const PROJ_CENTER_LONG: u16 = 3088;       // ProjCenterLongGeoKey
    pub const PROJ_CENTER_LAT: u16 = 3089;        // ProjCenterLatGeoKey
    pub const PROJ_SCALE_AT_NAT_ORIGIN: u16 = 3092; // ProjScaleAtNatOriginGeoKey
    pub const PROJ_SCALE_AT_CENTER: u16 = 3093;   // ProjScaleAtCenterGeoKey
}

/// GTModelTypeGeoKey values
pub mod model_type {
    pub const PROJECTED: u16 = 1;
    pub const GEOGRAPHIC: u16 = 2;
    pub const GEOCENTRIC: u16 = 3;
}

/// GeoKey value meaning "user defined"
pub const USER_DEFINED: u16 = 32767;

/// Coordinate transformation codes (ProjCoordTransGeoKey)
pub mod coord_trans {
    pub const TRANSVERSE_MERCATOR: u16 = 1;
}

/// EPSG code ranges and constants used during normalisation
pub mod epsg {
    pub const WGS84: u16 = 4326;
    pub const NAD83: u16 = 4269;
    pub const NAD27: u16 = 4267;
    pub const ETRS89: u16 = 4258;
    pub const ED50: u16 = 4230;
    pub const OSGB36: u16 = 4277;

    pub const WGS84_UTM_NORTH_BASE: u16 = 32600;
    pub const WGS84_UTM_SOUTH_BASE: u16 = 32700;
    pub const NAD83_UTM_NORTH_BASE: u16 = 26900;
    pub const UTM_MAX_ZONE: u16 = 60;
}

/// EPSG ellipsoid codes (GeogEllipsoidGeoKey values)
pub mod ellipsoid {
    pub const AIRY_1830: u16 = 7001;
    pub const BESSEL_1841: u16 = 7004;
    pub const CLARKE_1866: u16 = 7008;
    pub const GRS_1980: u16 = 7019;
    pub const INTERNATIONAL_1924: u16 = 7022;
    pub const WGS_84: u16 = 7030;
}
