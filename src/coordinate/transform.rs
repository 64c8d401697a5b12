//! Pixel to model space transform

use log::{debug, warn};

use crate::tiff::constants::tags;
use crate::tiff::decoder::TiffDecoder;

/// Affine geotransform in GDAL order:
/// `[origin_x, pixel_width, row_rotation, origin_y, column_rotation, pixel_height]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform(pub [f64; 6]);

impl GeoTransform {
    /// Builds the transform from the first tiepoint and the pixel scale
    ///
    /// A tiepoint is (i, j, k, x, y, z): raster position (i, j) maps to model
    /// position (x, y). Rows run southwards, so the pixel height is negative.
    pub fn from_tiepoint(tiepoint: &[f64], scale: &[f64]) -> Option<Self> {
        if tiepoint.len() < 6 || scale.len() < 2 {
            return None;
        }
        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
        let (sx, sy) = (scale[0], scale[1]);
        Some(GeoTransform([x - i * sx, sx, 0.0, y + j * sy, 0.0, -sy]))
    }

    /// Reads ModelTiepointTag and ModelPixelScaleTag, None if either is absent or unreadable
    pub fn read(decoder: &mut TiffDecoder) -> Option<Self> {
        if !decoder.has_tag(tags::MODEL_TIEPOINT_TAG) || !decoder.has_tag(tags::MODEL_PIXEL_SCALE_TAG) {
            return None;
        }
        let tiepoint = match decoder.read_tag_doubles(tags::MODEL_TIEPOINT_TAG) {
            Ok(values) => values,
            Err(e) => {
                warn!("Unreadable ModelTiepointTag: {}", e);
                return None;
            }
        };
        let scale = match decoder.read_tag_doubles(tags::MODEL_PIXEL_SCALE_TAG) {
            Ok(values) => values,
            Err(e) => {
                warn!("Unreadable ModelPixelScaleTag: {}", e);
                return None;
            }
        };
        let transform = Self::from_tiepoint(&tiepoint, &scale);
        debug!("Geotransform: {:?}", transform);
        transform
    }

    /// Model coordinates of the upper-left corner of pixel (`col`, `row`)
    pub fn pixel_to_model(&self, col: f64, row: f64) -> (f64, f64) {
        let t = &self.0;
        (t[0] + col * t[1] + row * t[2], t[3] + col * t[4] + row * t[5])
    }
}
