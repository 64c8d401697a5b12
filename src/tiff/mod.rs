//! TIFF and BigTIFF parsing
//!
//! Header sniffing, the cheap directory tag scan, full first-directory
//! decoding and the decode handle used for pixel reads.

pub mod constants;
pub mod decoder;
pub mod errors;
pub mod geokeys;
pub mod header;
pub mod ifd;
pub mod organization;
pub mod reader;
pub mod scanner;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use decoder::TiffDecoder;
pub use errors::{TiffError, TiffResult};
pub use header::{Sniff, TiffHeader, TiffVariant};
pub use ifd::{IFDEntry, IFD};
pub use organization::{ChunkLayout, OrganizationInfo, PlanarConfig};
pub use reader::TiffReader;
