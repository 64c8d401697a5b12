//! Reader configuration
//!
//! Sanity ceilings applied while sniffing headers, scanning directories and
//! sizing scratch buffers. Defaults match what well-formed GeoTIFFs need;
//! a TOML file can tighten or relax them.
//!
//! ```toml
//! require_georeferencing = false
//!
//! [limits]
//! max_ifd_offset = 104857600
//! max_directory_entries = 4096
//! max_scratch_bytes = 1073741824
//! ```

use log::debug;
use std::fs;
use std::path::Path;

use crate::tiff::errors::{TiffError, TiffResult};

/// Largest first-directory offset accepted by the sniffer (100 MiB)
pub const DEFAULT_MAX_IFD_OFFSET: u64 = 104_857_600;
/// Largest directory entry count accepted by the scanner
pub const DEFAULT_MAX_DIRECTORY_ENTRIES: u64 = 4096;
/// Largest scratch buffer the hyperslab reader may allocate (1 GiB)
pub const DEFAULT_MAX_SCRATCH_BYTES: u64 = 1_073_741_824;

/// Limits and policy for opening and reading files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    pub max_ifd_offset: u64,
    pub max_directory_entries: u64,
    pub max_scratch_bytes: u64,
    /// Reject TIFFs without a GeoKey directory as "not this format"
    pub require_georeferencing: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            max_ifd_offset: DEFAULT_MAX_IFD_OFFSET,
            max_directory_entries: DEFAULT_MAX_DIRECTORY_ENTRIES,
            max_scratch_bytes: DEFAULT_MAX_SCRATCH_BYTES,
            require_georeferencing: true,
        }
    }
}

impl ReaderConfig {
    /// Parse a configuration from TOML text
    ///
    /// Missing keys keep their defaults and unknown keys are ignored.
    pub fn from_toml_str(content: &str) -> TiffResult<Self> {
        let value: toml::Value = content
            .parse()
            .map_err(|e| TiffError::InvalidArgument(format!("Failed to parse config TOML: {}", e)))?;

        let mut config = ReaderConfig::default();

        if let Some(flag) = value.get("require_georeferencing") {
            config.require_georeferencing = flag.as_bool().ok_or_else(|| {
                TiffError::InvalidArgument("require_georeferencing must be a boolean".to_string())
            })?;
        }

        if let Some(limits) = value.get("limits").and_then(|v| v.as_table()) {
            if let Some(v) = limits.get("max_ifd_offset") {
                config.max_ifd_offset = positive_limit("max_ifd_offset", v)?;
            }
            if let Some(v) = limits.get("max_directory_entries") {
                config.max_directory_entries = positive_limit("max_directory_entries", v)?;
            }
            if let Some(v) = limits.get("max_scratch_bytes") {
                config.max_scratch_bytes = positive_limit("max_scratch_bytes", v)?;
            }
        }

        debug!("Loaded reader config: {:?}", config);
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!("Reading reader config from {}", path.display());
        Self::from_toml_str(&content)
    }
}

fn positive_limit(name: &str, value: &toml::Value) -> TiffResult<u64> {
    match value.as_integer() {
        Some(n) if n > 0 => Ok(n as u64),
        Some(n) => Err(TiffError::InvalidArgument(format!("{} must be positive, got {}", name, n))),
        None => Err(TiffError::InvalidArgument(format!("{} must be an integer", name))),
    }
}
