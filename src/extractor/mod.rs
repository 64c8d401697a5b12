//! Hyperslab extraction
//!
//! Validates requests, sizes scratch buffers and copies the requested
//! window out of tiled or striped storage.

pub mod buffer;
pub mod hyperslab;
mod region;
mod strip_reader;
mod tile_reader;

pub use buffer::ScratchBuffer;
pub use hyperslab::read_window;
pub use region::{HyperslabRequest, Window};
pub use strip_reader::StripReader;
pub use tile_reader::TileReader;
