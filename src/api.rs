//! Public file handle
//!
//! `GeoTiffFile` ties the pieces together: sniffing, the georeferencing
//! pre-check, the full directory decode, organization and CRS detection,
//! catalog population and, later, hyperslab reads.

use log::{debug, info, warn};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::catalog::{AttributeValue, CatalogBuilder, NumericType, VarId};
use crate::config::ReaderConfig;
use crate::coordinate::{self, CrsInfo, GeoTransform};
use crate::extractor::{self, HyperslabRequest};
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::tags;
use crate::tiff::decoder::TiffDecoder;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::header::{self, Sniff, TiffVariant};
use crate::tiff::organization::OrganizationInfo;
use crate::tiff::scanner;

/// Tag whose presence marks a file as georeferenced
pub const GEOREFERENCING_TAG: u16 = tags::GEO_KEY_DIRECTORY_TAG;

/// Name of the single data variable
pub const DATA_VARIABLE: &str = "data";

/// Requested access mode; only reading is supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

/// Result of a format probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    ThisFormat,
    NotThisFormat,
}

/// Container facts established at open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub variant: TiffVariant,
    pub byte_order: ByteOrder,
}

impl fmt::Display for FormatInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.variant, self.byte_order.name())
    }
}

/// An open, read-only GeoTIFF
pub struct GeoTiffFile {
    path: PathBuf,
    decoder: TiffDecoder,
    format: FormatInfo,
    organization: OrganizationInfo,
    numeric_type: NumericType,
    variable: VarId,
    shape: Vec<u64>,
    crs: Option<CrsInfo>,
    geotransform: Option<GeoTransform>,
    config: ReaderConfig,
}

impl GeoTiffFile {
    /// Opens `path` read-only and registers its contents with `catalog`
    ///
    /// Fails with `NotThisFormat` when the file is not a TIFF, or is a plain
    /// TIFF while `config.require_georeferencing` is set. CRS problems never
    /// fail the open; the CRS attributes are simply left out.
    pub fn open<P: AsRef<Path>>(
        path: P,
        mode: OpenMode,
        catalog: &mut dyn CatalogBuilder,
        config: &ReaderConfig,
    ) -> TiffResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(TiffError::InvalidArgument("Empty path".to_string()));
        }
        if mode != OpenMode::Read {
            return Err(TiffError::Unsupported("Write access is not supported".to_string()));
        }

        info!("Opening {}", path.display());
        let mut stream: Box<dyn SeekableReader> = Box::new(BufReader::new(File::open(path)?));

        let header = match header::sniff(stream.as_mut(), config)? {
            Sniff::Classic(h) | Sniff::Wide(h) => h,
            Sniff::NotThisFormat => return Err(TiffError::NotThisFormat),
        };

        let georeferenced = scanner::scan_for_tag(stream.as_mut(), &header, GEOREFERENCING_TAG, config)?;
        if !georeferenced {
            if config.require_georeferencing {
                debug!("No GeoKey directory; not a GeoTIFF");
                return Err(TiffError::NotThisFormat);
            }
            info!("Opening plain TIFF without georeferencing");
        }

        let mut decoder = TiffDecoder::new(stream, header, config)?;
        let organization = OrganizationInfo::detect(&decoder);
        let numeric_type = NumericType::from_sample(decoder.sample_format(), decoder.bits_per_sample())?;

        let crs = if georeferenced { coordinate::crs::extract(&mut decoder) } else { None };
        let geotransform = GeoTransform::read(&mut decoder);

        let (variable, shape) = populate_catalog(catalog, &organization, numeric_type, crs.as_ref(), geotransform)?;

        let format = FormatInfo { variant: header.variant, byte_order: header.byte_order };
        info!("Opened {} as {}, variable {} {:?} of {}", path.display(), format, DATA_VARIABLE, shape, numeric_type);

        Ok(GeoTiffFile {
            path: path.to_path_buf(),
            decoder,
            format,
            organization,
            numeric_type,
            variable,
            shape,
            crs,
            geotransform,
            config: config.clone(),
        })
    }

    /// Probes `path` with default limits
    pub fn detect<P: AsRef<Path>>(path: P) -> TiffResult<Detection> {
        Self::detect_with_config(path, &ReaderConfig::default())
    }

    /// Probes `path` using only the header sniff and the tag scan
    ///
    /// Only a failure to open the path is an error; malformed headers and
    /// directories are reported as `NotThisFormat`.
    pub fn detect_with_config<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> TiffResult<Detection> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(TiffError::InvalidArgument("Empty path".to_string()));
        }
        let mut reader = BufReader::new(File::open(path)?);

        let header = match header::sniff(&mut reader, config) {
            Ok(Sniff::Classic(h)) | Ok(Sniff::Wide(h)) => h,
            Ok(Sniff::NotThisFormat) => return Ok(Detection::NotThisFormat),
            Err(e) => {
                warn!("Rejecting {}: {}", path.display(), e);
                return Ok(Detection::NotThisFormat);
            }
        };

        match scanner::scan_for_tag(&mut reader, &header, GEOREFERENCING_TAG, config) {
            Ok(true) => Ok(Detection::ThisFormat),
            Ok(false) => Ok(Detection::NotThisFormat),
            Err(e) => {
                warn!("Rejecting {}: {}", path.display(), e);
                Ok(Detection::NotThisFormat)
            }
        }
    }

    /// Reads a window of `var` into a new buffer
    pub fn read_hyperslab(&mut self, var: VarId, start: &[u64], count: &[u64], ty: NumericType) -> TiffResult<Vec<u8>> {
        let bytes = self.checked_request_bytes(var, start, count, ty)?;
        let mut out = Vec::new();
        out.try_reserve_exact(bytes)
            .map_err(|e| TiffError::ResourceExhausted(format!("Allocating {} byte output: {}", bytes, e)))?;
        out.resize(bytes, 0);
        self.read_hyperslab_into(var, start, count, ty, &mut out)?;
        Ok(out)
    }

    /// Reads a window of `var` into `out`, which must be large enough
    pub fn read_hyperslab_into(
        &mut self,
        var: VarId,
        start: &[u64],
        count: &[u64],
        ty: NumericType,
        out: &mut [u8],
    ) -> TiffResult<()> {
        self.check_variable(var, ty)?;
        let window = HyperslabRequest::new(start, count).validate(&self.shape)?;
        extractor::read_window(
            &mut self.decoder,
            &self.organization,
            &window,
            self.numeric_type.size(),
            &self.config,
            out,
        )
    }

    fn check_variable(&self, var: VarId, ty: NumericType) -> TiffResult<()> {
        if var != self.variable {
            return Err(TiffError::InvalidArgument(format!("Unknown variable id {}", var.0)));
        }
        if ty != self.numeric_type {
            return Err(TiffError::InvalidArgument(format!(
                "Requested {} elements from a {} variable",
                ty, self.numeric_type
            )));
        }
        Ok(())
    }

    fn checked_request_bytes(&self, var: VarId, start: &[u64], count: &[u64], ty: NumericType) -> TiffResult<usize> {
        self.check_variable(var, ty)?;
        let window = HyperslabRequest::new(start, count).validate(&self.shape)?;
        window
            .element_count()
            .and_then(|n| n.checked_mul(ty.size() as u64))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| TiffError::ResourceExhausted("Hyperslab size overflows".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FormatInfo {
        self.format
    }

    pub fn organization(&self) -> &OrganizationInfo {
        &self.organization
    }

    /// CRS as extracted, complete or not
    pub fn crs(&self) -> Option<&CrsInfo> {
        self.crs.as_ref()
    }

    pub fn geotransform(&self) -> Option<GeoTransform> {
        self.geotransform
    }

    pub fn variable(&self) -> VarId {
        self.variable
    }

    pub fn numeric_type(&self) -> NumericType {
        self.numeric_type
    }

    /// Shape of the data variable, outermost first
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Tiles or strips decoded since open
    pub fn chunk_reads(&self) -> u64 {
        self.decoder.chunk_reads()
    }

    /// Releases the handle and everything cached with it
    pub fn close(self) -> TiffResult<()> {
        info!("Closing {} after {} chunk reads", self.path.display(), self.decoder.chunk_reads());
        Ok(())
    }
}

/// Registers dimensions, the data variable and global attributes
fn populate_catalog(
    catalog: &mut dyn CatalogBuilder,
    org: &OrganizationInfo,
    numeric_type: NumericType,
    crs: Option<&CrsInfo>,
    geotransform: Option<GeoTransform>,
) -> TiffResult<(VarId, Vec<u64>)> {
    let x = catalog.define_dimension("x", org.image_width as u64)?;
    let y = catalog.define_dimension("y", org.image_height as u64)?;

    let (dims, shape) = if org.samples_per_pixel > 1 {
        let band = catalog.define_dimension("band", org.samples_per_pixel as u64)?;
        (
            vec![band, y, x],
            vec![org.samples_per_pixel as u64, org.image_height as u64, org.image_width as u64],
        )
    } else {
        (vec![y, x], vec![org.image_height as u64, org.image_width as u64])
    };
    let variable = catalog.define_variable(DATA_VARIABLE, numeric_type, &dims)?;

    if let Some(info) = crs.filter(|c| c.is_complete()) {
        catalog.set_attribute("geotiff_crs_type", AttributeValue::Text(info.crs_type.name().to_string()))?;
        if let Some(code) = info.epsg_code {
            catalog.set_attribute("geotiff_epsg_code", AttributeValue::Int(code as i64))?;
        }
        if let Some(name) = &info.crs_name {
            catalog.set_attribute("geotiff_crs_name", AttributeValue::Text(name.clone()))?;
        }
        catalog.set_attribute("geotiff_semi_major_axis", AttributeValue::Double(info.semi_major_axis))?;
        catalog.set_attribute("geotiff_inverse_flattening", AttributeValue::Double(info.inverse_flattening))?;

        let projected = [
            ("geotiff_false_easting", info.false_easting),
            ("geotiff_false_northing", info.false_northing),
            ("geotiff_scale_factor", info.scale_factor),
            ("geotiff_central_meridian", info.central_meridian),
            ("geotiff_latitude_of_origin", info.latitude_of_origin),
        ];
        for (name, value) in projected {
            if let Some(v) = value {
                catalog.set_attribute(name, AttributeValue::Double(v))?;
            }
        }
    }

    if let Some(gt) = geotransform {
        catalog.set_attribute("geotiff_geotransform", AttributeValue::Doubles(gt.0.to_vec()))?;
    }

    Ok((variable, shape))
}
