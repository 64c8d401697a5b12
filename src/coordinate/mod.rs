//! Georeferencing
//!
//! CRS extraction from the GeoKey directory and the pixel-to-model
//! transform from the tiepoint and pixel-scale tags.

pub mod crs;
mod transform;

pub use self::crs::{CrsInfo, CrsType, ParameterRole};
pub use self::transform::GeoTransform;
