//! Host catalog adapter
//!
//! The engine registers what it finds in a file through [`CatalogBuilder`]
//! and nothing else. Hosts supply their own implementation at open time;
//! [`MemoryCatalog`] is a ready-made one with a read-only query surface.

mod memory;
mod numeric_type;

pub use memory::{Dimension, MemoryCatalog, Variable};
pub use numeric_type::NumericType;

use std::fmt;

use crate::tiff::errors::TiffResult;

/// Handle of a defined dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimId(pub usize);

/// Handle of a defined variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

/// Value of a global attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Int(i64),
    Double(f64),
    Doubles(Vec<f64>),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Double(v) => write!(f, "{}", v),
            AttributeValue::Doubles(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            AttributeValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Narrow registration interface implemented by the host
pub trait CatalogBuilder {
    /// Registers a named dimension of the given length
    fn define_dimension(&mut self, name: &str, len: u64) -> TiffResult<DimId>;

    /// Registers a variable spanning `dims`, outermost first
    fn define_variable(&mut self, name: &str, ty: NumericType, dims: &[DimId]) -> TiffResult<VarId>;

    /// Sets a global attribute, replacing any previous value
    fn set_attribute(&mut self, name: &str, value: AttributeValue) -> TiffResult<()>;
}
