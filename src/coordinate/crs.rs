//! Coordinate Reference System extraction
//!
//! Flattens a normalised projection definition into a [`CrsInfo`] record.
//! Extraction never fails an open: a missing or broken definition simply
//! yields no CRS, and an incomplete one is kept but flagged.

use lazy_static::lazy_static;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;

use crate::tiff::constants::{geo_keys, model_type};
use crate::tiff::decoder::TiffDecoder;
use crate::tiff::geokeys::{self, ProjectionDefinition};

/// Broad classification of a CRS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsType {
    Unknown,
    Geographic,
    Projected,
    Geocentric,
}

impl CrsType {
    pub fn from_model(model: u16) -> Self {
        match model {
            model_type::PROJECTED => CrsType::Projected,
            model_type::GEOGRAPHIC => CrsType::Geographic,
            model_type::GEOCENTRIC => CrsType::Geocentric,
            _ => CrsType::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CrsType::Unknown => "unknown",
            CrsType::Geographic => "geographic",
            CrsType::Projected => "projected",
            CrsType::Geocentric => "geocentric",
        }
    }
}

impl fmt::Display for CrsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role a projection parameter plays in a projected CRS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterRole {
    FalseEasting,
    FalseNorthing,
    ScaleFactor,
    CentralMeridian,
    LatitudeOfOrigin,
}

lazy_static! {
    static ref PARAMETER_ROLES: HashMap<u16, ParameterRole> = {
        let mut m = HashMap::new();
        m.insert(geo_keys::PROJ_FALSE_EASTING, ParameterRole::FalseEasting);
        m.insert(geo_keys::PROJ_FALSE_NORTHING, ParameterRole::FalseNorthing);
        m.insert(geo_keys::PROJ_SCALE_AT_NAT_ORIGIN, ParameterRole::ScaleFactor);
        m.insert(geo_keys::PROJ_SCALE_AT_CENTER, ParameterRole::ScaleFactor);
        m.insert(geo_keys::PROJ_NAT_ORIGIN_LONG, ParameterRole::CentralMeridian);
        m.insert(geo_keys::PROJ_FALSE_ORIGIN_LONG, ParameterRole::CentralMeridian);
        m.insert(geo_keys::PROJ_CENTER_LONG, ParameterRole::CentralMeridian);
        m.insert(geo_keys::PROJ_NAT_ORIGIN_LAT, ParameterRole::LatitudeOfOrigin);
        m.insert(geo_keys::PROJ_FALSE_ORIGIN_LAT, ParameterRole::LatitudeOfOrigin);
        m.insert(geo_keys::PROJ_CENTER_LAT, ParameterRole::LatitudeOfOrigin);
        m
    };
}

/// Role of the parameter carried by GeoKey `key_id`, if recognised
pub fn parameter_role(key_id: u16) -> Option<ParameterRole> {
    PARAMETER_ROLES.get(&key_id).copied()
}

/// Flat coordinate reference system record
#[derive(Debug, Clone, PartialEq)]
pub struct CrsInfo {
    pub crs_type: CrsType,
    pub epsg_code: Option<u16>,
    pub crs_name: Option<String>,
    pub semi_major_axis: f64,
    pub inverse_flattening: f64,
    pub false_easting: Option<f64>,
    pub false_northing: Option<f64>,
    pub scale_factor: Option<f64>,
    pub central_meridian: Option<f64>,
    pub latitude_of_origin: Option<f64>,
}

impl CrsInfo {
    /// Flattens a projection definition
    pub fn from_definition(defn: &ProjectionDefinition) -> Self {
        let crs_type = CrsType::from_model(defn.model);
        let semi_major_axis = defn.semi_major;
        let semi_minor_axis = defn.semi_minor;

        let inverse_flattening = if semi_major_axis != 0.0 && semi_minor_axis != 0.0 && semi_major_axis != semi_minor_axis {
            semi_major_axis / (semi_major_axis - semi_minor_axis)
        } else {
            0.0
        };

        let mut info = CrsInfo {
            crs_type,
            epsg_code: defn.epsg_code(),
            crs_name: defn.name.clone(),
            semi_major_axis,
            inverse_flattening,
            false_easting: None,
            false_northing: None,
            scale_factor: None,
            central_meridian: None,
            latitude_of_origin: None,
        };

        if crs_type == CrsType::Projected {
            for &(key_id, value) in &defn.parameters {
                match parameter_role(key_id) {
                    Some(ParameterRole::FalseEasting) => info.false_easting = Some(value),
                    Some(ParameterRole::FalseNorthing) => info.false_northing = Some(value),
                    Some(ParameterRole::ScaleFactor) => info.scale_factor = Some(value),
                    Some(ParameterRole::CentralMeridian) => info.central_meridian = Some(value),
                    Some(ParameterRole::LatitudeOfOrigin) => info.latitude_of_origin = Some(value),
                    None => {}
                }
            }
        }

        info
    }

    /// A geographic or projected CRS is complete only with a nonzero semi-major axis
    pub fn is_complete(&self) -> bool {
        match self.crs_type {
            CrsType::Geographic | CrsType::Projected => self.semi_major_axis != 0.0,
            CrsType::Geocentric | CrsType::Unknown => false,
        }
    }
}

/// Extracts the CRS of an open file, swallowing every failure
///
/// Returns None when the file carries no usable definition. An incomplete
/// record is returned as-is so callers can inspect it; use
/// [`CrsInfo::is_complete`] before publishing it.
pub fn extract(decoder: &mut TiffDecoder) -> Option<CrsInfo> {
    match geokeys::read_projection_definition(decoder) {
        Ok(Some(defn)) => {
            let info = CrsInfo::from_definition(&defn);
            if !info.is_complete() {
                warn!("CRS definition is incomplete ({} without semi-major axis); attributes omitted", info.crs_type);
            }
            debug!("Extracted CRS: {:?}", info);
            Some(info)
        }
        Ok(None) => {
            debug!("No usable GeoKey directory");
            None
        }
        Err(e) => {
            warn!("Failed to read projection definition: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geographic_with_axis_is_complete() {
        let defn = ProjectionDefinition {
            model: model_type::GEOGRAPHIC,
            gcs: Some(4326),
            semi_major: 6378137.0,
            semi_minor: 6356752.314245179,
            ..Default::default()
        };
        let info = CrsInfo::from_definition(&defn);
        assert!(info.is_complete());
        assert_eq!(info.epsg_code, Some(4326));
        assert!((info.inverse_flattening - 298.257223563).abs() < 1e-6);
        assert_eq!(info.false_easting, None);
    }

    #[test]
    fn test_missing_axis_is_incomplete() {
        let defn = ProjectionDefinition { model: model_type::GEOGRAPHIC, ..Default::default() };
        let info = CrsInfo::from_definition(&defn);
        assert!(!info.is_complete());
        assert_eq!(info.inverse_flattening, 0.0);
    }

    #[test]
    fn test_sphere_has_no_inverse_flattening() {
        let defn = ProjectionDefinition {
            model: model_type::GEOGRAPHIC,
            semi_major: 6371000.0,
            semi_minor: 6371000.0,
            ..Default::default()
        };
        assert_eq!(CrsInfo::from_definition(&defn).inverse_flattening, 0.0);
    }

    #[test]
    fn test_projected_parameters_by_role() {
        let defn = ProjectionDefinition {
            model: model_type::PROJECTED,
            pcs: Some(32633),
            semi_major: 6378137.0,
            parameters: vec![
                (geo_keys::PROJ_FALSE_EASTING, 500000.0),
                (geo_keys::PROJ_CENTER_LONG, 15.0),
                (geo_keys::PROJ_SCALE_AT_CENTER, 0.9996),
                (geo_keys::PROJ_FALSE_ORIGIN_LAT, 0.0),
                (9999, 1.0),
            ],
            ..Default::default()
        };
        let info = CrsInfo::from_definition(&defn);
        assert_eq!(info.false_easting, Some(500000.0));
        assert_eq!(info.central_meridian, Some(15.0));
        assert_eq!(info.scale_factor, Some(0.9996));
        assert_eq!(info.latitude_of_origin, Some(0.0));
        assert_eq!(info.false_northing, None);
    }

    #[test]
    fn test_geocentric_is_never_complete() {
        let defn = ProjectionDefinition {
            model: model_type::GEOCENTRIC,
            semi_major: 6378137.0,
            ..Default::default()
        };
        assert!(!CrsInfo::from_definition(&defn).is_complete());
    }
}
