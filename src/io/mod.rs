//! Byte-level input: random-access sources and byte order handling

pub mod byte_order;
pub mod seekable;
