//! GeoKey directory parsing and projection normalisation
//!
//! GeoTIFF stores its georeferencing as a directory of keys packed into the
//! GeoKeyDirectoryTag, with double and ASCII values spilled into two side
//! tags. This module resolves every key to its value and then normalises the
//! result into a [`ProjectionDefinition`]: model type, EPSG codes, ellipsoid
//! axes and the projection parameters keyed by GeoKey id. Well-known EPSG
//! codes are expanded from static tables when the file only names them.

use lazy_static::lazy_static;
use log::{debug, trace, warn};
use std::collections::HashMap;

use crate::tiff::constants::{coord_trans, ellipsoid, epsg, geo_key_directory, geo_keys, model_type, tags, USER_DEFINED};
use crate::tiff::decoder::TiffDecoder;
use crate::tiff::errors::{TiffError, TiffResult};

/// Resolved value of one GeoKey
#[derive(Debug, Clone, PartialEq)]
pub enum GeoKeyValue {
    Short(Vec<u16>),
    Double(Vec<f64>),
    Ascii(String),
}

impl GeoKeyValue {
    pub fn as_short(&self) -> Option<u16> {
        match self {
            GeoKeyValue::Short(values) => values.first().copied(),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            GeoKeyValue::Double(values) => values.first().copied(),
            GeoKeyValue::Short(values) => values.first().map(|&v| v as f64),
            GeoKeyValue::Ascii(_) => None,
        }
    }

    pub fn as_ascii(&self) -> Option<&str> {
        match self {
            GeoKeyValue::Ascii(text) => Some(text),
            _ => None,
        }
    }
}

/// Parsed GeoKey directory
#[derive(Debug, Clone, PartialEq)]
pub struct GeoKeyDirectory {
    pub version: u16,
    pub revision: u16,
    pub minor_revision: u16,
    keys: Vec<(u16, GeoKeyValue)>,
}

impl GeoKeyDirectory {
    /// Parses the directory shorts, resolving values against the side tags
    ///
    /// Returns `Ok(None)` for a directory version this reader does not
    /// understand. Keys whose values point outside the side tags are dropped
    /// with a warning.
    pub fn parse(shorts: &[u16], doubles: &[f64], ascii: &str) -> TiffResult<Option<Self>> {
        let width = geo_key_directory::ENTRY_SHORTS;
        if shorts.len() < width {
            return Err(TiffError::InvalidFormat(format!(
                "GeoKey directory holds {} shorts, header needs {}",
                shorts.len(),
                width
            )));
        }

        let (version, revision, minor_revision, key_count) = (shorts[0], shorts[1], shorts[2], shorts[3] as usize);
        debug!(
            "GeoKey directory: version={}, revision={}.{}, keys={}",
            version, revision, minor_revision, key_count
        );

        if version > geo_key_directory::SUPPORTED_VERSION {
            warn!("Ignoring GeoKey directory with unsupported version {}", version);
            return Ok(None);
        }

        let needed = width * (key_count + 1);
        if shorts.len() < needed {
            return Err(TiffError::InvalidFormat(format!(
                "GeoKey directory declares {} keys but holds only {} shorts",
                key_count,
                shorts.len()
            )));
        }

        let mut keys = Vec::with_capacity(key_count);
        for entry in shorts[width..needed].chunks_exact(width) {
            let (key_id, location, count, value_offset) = (entry[0], entry[1], entry[2] as usize, entry[3]);
            let start = value_offset as usize;
            trace!("GeoKey {}: location={}, count={}, value={}", key_id, location, count, value_offset);

            let value = match location {
                geo_key_directory::INLINE_LOCATION => Some(GeoKeyValue::Short(vec![value_offset])),
                tags::GEO_KEY_DIRECTORY_TAG => shorts.get(start..start + count).map(|s| GeoKeyValue::Short(s.to_vec())),
                tags::GEO_DOUBLE_PARAMS_TAG => doubles.get(start..start + count).map(|d| GeoKeyValue::Double(d.to_vec())),
                tags::GEO_ASCII_PARAMS_TAG => ascii.get(start..start + count).map(|text| {
                    GeoKeyValue::Ascii(text.trim_end_matches(|c| c == '|' || c == '\0').to_string())
                }),
                other => {
                    warn!("GeoKey {} stored in unknown tag {}", key_id, other);
                    None
                }
            };

            match value {
                Some(value) => keys.push((key_id, value)),
                None => warn!("GeoKey {} points outside its value tag, skipping", key_id),
            }
        }

        Ok(Some(GeoKeyDirectory { version, revision, minor_revision, keys }))
    }

    pub fn get(&self, key_id: u16) -> Option<&GeoKeyValue> {
        self.keys.iter().find(|(id, _)| *id == key_id).map(|(_, value)| value)
    }

    pub fn short(&self, key_id: u16) -> Option<u16> {
        self.get(key_id).and_then(GeoKeyValue::as_short)
    }

    pub fn double(&self, key_id: u16) -> Option<f64> {
        self.get(key_id).and_then(GeoKeyValue::as_double)
    }

    pub fn ascii(&self, key_id: u16) -> Option<&str> {
        self.get(key_id).and_then(GeoKeyValue::as_ascii)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Normalised projection definition
///
/// Axes are 0.0 when unknown. Parameters are keyed by the GeoKey id that
/// carries them (for example `ProjFalseEastingGeoKey`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionDefinition {
    /// GTModelTypeGeoKey value, 0 when unknown
    pub model: u16,
    pub pcs: Option<u16>,
    pub gcs: Option<u16>,
    pub ellipsoid: Option<u16>,
    pub name: Option<String>,
    pub semi_major: f64,
    pub semi_minor: f64,
    pub coord_trans: Option<u16>,
    pub parameters: Vec<(u16, f64)>,
}

impl ProjectionDefinition {
    /// Builds the normalised definition from a parsed key directory
    pub fn from_directory(keys: &GeoKeyDirectory) -> Self {
        let mut defn = ProjectionDefinition::default();

        defn.pcs = keys.short(geo_keys::PROJECTED_CS_TYPE).filter(|&c| c != USER_DEFINED);
        defn.gcs = keys.short(geo_keys::GEOGRAPHIC_TYPE).filter(|&c| c != USER_DEFINED);
        defn.model = keys.short(geo_keys::GT_MODEL_TYPE).unwrap_or_else(|| {
            if defn.pcs.is_some() {
                model_type::PROJECTED
            } else if defn.gcs.is_some() {
                model_type::GEOGRAPHIC
            } else {
                0
            }
        });

        if let Some(utm) = defn.pcs.and_then(UtmZone::from_epsg) {
            debug!("Expanding {} to Transverse Mercator parameters", utm.name());
            defn.gcs = defn.gcs.or(Some(utm.gcs));
            defn.coord_trans = Some(coord_trans::TRANSVERSE_MERCATOR);
            defn.name = Some(utm.name());
            defn.parameters = utm.parameters();
        }

        if let Some(code) = keys.short(geo_keys::PROJ_COORD_TRANS).filter(|&c| c != USER_DEFINED) {
            defn.coord_trans = Some(code);
        }

        for &key_id in PARAMETER_KEYS.iter() {
            if let Some(value) = keys.double(key_id) {
                match defn.parameters.iter_mut().find(|(id, _)| *id == key_id) {
                    Some(slot) => slot.1 = value,
                    None => defn.parameters.push((key_id, value)),
                }
            }
        }

        defn.ellipsoid = keys
            .short(geo_keys::GEOG_ELLIPSOID)
            .filter(|&c| c != USER_DEFINED)
            .or_else(|| defn.gcs.and_then(|gcs| GCS_ELLIPSOIDS.get(&gcs).map(|(_, e)| *e)));

        if let Some(axes) = defn.ellipsoid.and_then(|code| ELLIPSOIDS.get(&code)) {
            defn.semi_major = axes.semi_major;
            defn.semi_minor = axes.semi_minor;
        }
        if let Some(a) = keys.double(geo_keys::GEOG_SEMI_MAJOR_AXIS) {
            defn.semi_major = a;
        }
        if let Some(b) = keys.double(geo_keys::GEOG_SEMI_MINOR_AXIS) {
            defn.semi_minor = b;
        } else if let Some(inv_f) = keys.double(geo_keys::GEOG_INV_FLATTENING).filter(|&f| f != 0.0) {
            defn.semi_minor = defn.semi_major * (1.0 - 1.0 / inv_f);
        }

        let citation = keys
            .ascii(geo_keys::PCS_CITATION)
            .or_else(|| keys.ascii(geo_keys::GT_CITATION))
            .or_else(|| keys.ascii(geo_keys::GEOG_CITATION))
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        defn.name = citation.or(defn.name.take()).or_else(|| {
            if defn.model == model_type::GEOGRAPHIC {
                defn.gcs.and_then(|gcs| GCS_ELLIPSOIDS.get(&gcs).map(|(name, _)| name.to_string()))
            } else {
                None
            }
        });

        debug!("Projection definition: {:?}", defn);
        defn
    }

    /// EPSG code of the CRS: the projected code if any, else the geographic one
    pub fn epsg_code(&self) -> Option<u16> {
        match self.model {
            model_type::PROJECTED => self.pcs,
            model_type::GEOGRAPHIC => self.gcs,
            _ => self.pcs.or(self.gcs),
        }
    }

    pub fn parameter(&self, key_id: u16) -> Option<f64> {
        self.parameters.iter().find(|(id, _)| *id == key_id).map(|(_, v)| *v)
    }
}

/// Reads the GeoKey tags through the decoder and normalises them
///
/// `Ok(None)` means the file has no usable key directory.
pub fn read_projection_definition(decoder: &mut TiffDecoder) -> TiffResult<Option<ProjectionDefinition>> {
    if !decoder.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
        return Ok(None);
    }

    let shorts: Vec<u16> = decoder
        .read_tag_values(tags::GEO_KEY_DIRECTORY_TAG)?
        .into_iter()
        .map(|v| v as u16)
        .collect();
    let doubles = if decoder.has_tag(tags::GEO_DOUBLE_PARAMS_TAG) {
        decoder.read_tag_doubles(tags::GEO_DOUBLE_PARAMS_TAG)?
    } else {
        Vec::new()
    };
    let ascii = if decoder.has_tag(tags::GEO_ASCII_PARAMS_TAG) {
        decoder.read_tag_ascii(tags::GEO_ASCII_PARAMS_TAG)?
    } else {
        String::new()
    };

    Ok(GeoKeyDirectory::parse(&shorts, &doubles, &ascii)?.map(|keys| ProjectionDefinition::from_directory(&keys)))
}

/// Ellipsoid axis lengths in metres
#[derive(Debug, Clone, Copy)]
pub struct EllipsoidAxes {
    pub name: &'static str,
    pub semi_major: f64,
    pub semi_minor: f64,
}

/// GeoKeys that carry projection parameters
const PARAMETER_KEYS: [u16; 10] = [
    geo_keys::PROJ_NAT_ORIGIN_LONG,
    geo_keys::PROJ_NAT_ORIGIN_LAT,
    geo_keys::PROJ_FALSE_EASTING,
    geo_keys::PROJ_FALSE_NORTHING,
    geo_keys::PROJ_FALSE_ORIGIN_LONG,
    geo_keys::PROJ_FALSE_ORIGIN_LAT,
    geo_keys::PROJ_CENTER_LONG,
    geo_keys::PROJ_CENTER_LAT,
    geo_keys::PROJ_SCALE_AT_NAT_ORIGIN,
    geo_keys::PROJ_SCALE_AT_CENTER,
];

lazy_static! {
    static ref ELLIPSOIDS: HashMap<u16, EllipsoidAxes> = {
        let mut m = HashMap::new();
        m.insert(ellipsoid::WGS_84, EllipsoidAxes { name: "WGS 84", semi_major: 6378137.0, semi_minor: 6356752.314245179 });
        m.insert(ellipsoid::GRS_1980, EllipsoidAxes { name: "GRS 1980", semi_major: 6378137.0, semi_minor: 6356752.314140356 });
        m.insert(ellipsoid::CLARKE_1866, EllipsoidAxes { name: "Clarke 1866", semi_major: 6378206.4, semi_minor: 6356583.8 });
        m.insert(ellipsoid::INTERNATIONAL_1924, EllipsoidAxes { name: "International 1924", semi_major: 6378388.0, semi_minor: 6356911.946127946 });
        m.insert(ellipsoid::BESSEL_1841, EllipsoidAxes { name: "Bessel 1841", semi_major: 6377397.155, semi_minor: 6356078.962818189 });
        m.insert(ellipsoid::AIRY_1830, EllipsoidAxes { name: "Airy 1830", semi_major: 6377563.396, semi_minor: 6356256.909237285 });
        m
    };

    // Geographic CRS code -> (name, ellipsoid code)
    static ref GCS_ELLIPSOIDS: HashMap<u16, (&'static str, u16)> = {
        let mut m = HashMap::new();
        m.insert(epsg::WGS84, ("WGS 84", ellipsoid::WGS_84));
        m.insert(epsg::NAD83, ("NAD83", ellipsoid::GRS_1980));
        m.insert(epsg::NAD27, ("NAD27", ellipsoid::CLARKE_1866));
        m.insert(epsg::ETRS89, ("ETRS89", ellipsoid::GRS_1980));
        m.insert(epsg::ED50, ("ED50", ellipsoid::INTERNATIONAL_1924));
        m.insert(epsg::OSGB36, ("OSGB 1936", ellipsoid::AIRY_1830));
        m
    };
}

/// Looks up a well-known ellipsoid by EPSG code
pub fn ellipsoid_axes(code: u16) -> Option<EllipsoidAxes> {
    ELLIPSOIDS.get(&code).copied()
}

/// A UTM zone named by a projected EPSG code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UtmZone {
    zone: u16,
    south: bool,
    gcs: u16,
}

impl UtmZone {
    fn from_epsg(code: u16) -> Option<Self> {
        let in_range = |base: u16| code > base && code <= base + epsg::UTM_MAX_ZONE;
        if in_range(epsg::WGS84_UTM_NORTH_BASE) {
            Some(UtmZone { zone: code - epsg::WGS84_UTM_NORTH_BASE, south: false, gcs: epsg::WGS84 })
        } else if in_range(epsg::WGS84_UTM_SOUTH_BASE) {
            Some(UtmZone { zone: code - epsg::WGS84_UTM_SOUTH_BASE, south: true, gcs: epsg::WGS84 })
        } else if in_range(epsg::NAD83_UTM_NORTH_BASE) {
            Some(UtmZone { zone: code - epsg::NAD83_UTM_NORTH_BASE, south: false, gcs: epsg::NAD83 })
        } else {
            None
        }
    }

    fn name(&self) -> String {
        let datum = if self.gcs == epsg::NAD83 { "NAD83" } else { "WGS 84" };
        format!("{} / UTM zone {}{}", datum, self.zone, if self.south { 'S' } else { 'N' })
    }

    fn parameters(&self) -> Vec<(u16, f64)> {
        vec![
            (geo_keys::PROJ_NAT_ORIGIN_LONG, self.zone as f64 * 6.0 - 183.0),
            (geo_keys::PROJ_NAT_ORIGIN_LAT, 0.0),
            (geo_keys::PROJ_SCALE_AT_NAT_ORIGIN, 0.9996),
            (geo_keys::PROJ_FALSE_EASTING, 500000.0),
            (geo_keys::PROJ_FALSE_NORTHING, if self.south { 10000000.0 } else { 0.0 }),
        ]
    }
}
