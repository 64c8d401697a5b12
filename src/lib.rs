pub mod api;
pub mod catalog;
pub mod commands;
pub mod compression;
pub mod config;
pub mod coordinate;
pub mod extractor;
pub mod io;
pub mod tiff;
pub mod utils;

pub use crate::api::{Detection, FormatInfo, GeoTiffFile, OpenMode};
pub use crate::catalog::{AttributeValue, CatalogBuilder, DimId, MemoryCatalog, NumericType, VarId};
pub use crate::config::ReaderConfig;
pub use crate::coordinate::{CrsInfo, CrsType, GeoTransform};
pub use crate::extractor::HyperslabRequest;
pub use crate::tiff::errors::{TiffError, TiffResult};
pub use crate::tiff::organization::{ChunkLayout, OrganizationInfo, PlanarConfig};
