//! Byte source abstraction
//!
//! The sniffer, tag scanner and decoder all work against `&mut dyn
//! SeekableReader`, so files on disk and in-memory cursors are handled the
//! same way.

use std::io::{Read, Seek};

/// Random-access byte source
///
/// `Send` lets an open handle move to another thread; handles are never
/// shared between threads.
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
