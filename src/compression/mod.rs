//! Compression handling for TIFF files
//!
//! This module implements strategies for decoding the compression methods a
//! GeoTIFF chunk may use, plus the predictors applied after decompression.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod lzw;
mod packbits;
mod zstd;
pub mod predictor;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use lzw::LzwHandler;
pub use packbits::PackBitsHandler;
pub use self::zstd::ZstdHandler;
