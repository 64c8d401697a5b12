//! Generic numeric element types
//!
//! The host-facing type tag for a variable. Sample format and bit depth of
//! the image map onto exactly one of these, or the image is rejected.

use std::fmt;

use crate::tiff::constants::sample_format;
use crate::tiff::errors::{TiffError, TiffResult};

/// Element type of a catalog variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericType {
    /// Signed 8-bit integer
    Byte,
    /// Unsigned 8-bit integer
    UByte,
    /// Signed 16-bit integer
    Short,
    /// Unsigned 16-bit integer
    UShort,
    /// Signed 32-bit integer
    Int,
    /// Unsigned 32-bit integer
    UInt,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// 32-bit IEEE float
    Float,
    /// 64-bit IEEE float
    Double,
}

impl NumericType {
    /// Maps a SampleFormat code and BitsPerSample onto an element type
    pub fn from_sample(format: u16, bits: u16) -> TiffResult<Self> {
        let ty = match (format, bits) {
            (sample_format::UNSIGNED, 8) => NumericType::UByte,
            (sample_format::UNSIGNED, 16) => NumericType::UShort,
            (sample_format::UNSIGNED, 32) => NumericType::UInt,
            (sample_format::UNSIGNED, 64) => NumericType::UInt64,
            (sample_format::SIGNED, 8) => NumericType::Byte,
            (sample_format::SIGNED, 16) => NumericType::Short,
            (sample_format::SIGNED, 32) => NumericType::Int,
            (sample_format::SIGNED, 64) => NumericType::Int64,
            (sample_format::IEEEFP, 32) => NumericType::Float,
            (sample_format::IEEEFP, 64) => NumericType::Double,
            _ => {
                return Err(TiffError::InvalidFormat(format!(
                    "Unsupported sample layout: format {} with {} bits per sample",
                    format, bits
                )))
            }
        };
        Ok(ty)
    }

    /// Size of one element in bytes
    pub const fn size(self) -> usize {
        match self {
            NumericType::Byte | NumericType::UByte => 1,
            NumericType::Short | NumericType::UShort => 2,
            NumericType::Int | NumericType::UInt | NumericType::Float => 4,
            NumericType::Int64 | NumericType::UInt64 | NumericType::Double => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            NumericType::Byte => "byte",
            NumericType::UByte => "ubyte",
            NumericType::Short => "short",
            NumericType::UShort => "ushort",
            NumericType::Int => "int",
            NumericType::UInt => "uint",
            NumericType::Int64 => "int64",
            NumericType::UInt64 => "uint64",
            NumericType::Float => "float",
            NumericType::Double => "double",
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
