use log::trace;

use super::{AttributeValue, CatalogBuilder, DimId, NumericType, VarId};
use crate::tiff::errors::{TiffError, TiffResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub numeric_type: NumericType,
    pub dims: Vec<DimId>,
}

impl Variable {
    pub fn rank(&self) -> usize {
        self.dims.len()
    }
}

/// In-memory catalog, populated once and then only queried
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    dimensions: Vec<Dimension>,
    variables: Vec<Variable>,
    attributes: Vec<(String, AttributeValue)>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    pub fn dimension(&self, id: DimId) -> Option<&Dimension> {
        self.dimensions.get(id.0)
    }

    pub fn find_dimension(&self, name: &str) -> Option<DimId> {
        self.dimensions.iter().position(|d| d.name == name).map(DimId)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    pub fn find_variable(&self, name: &str) -> Option<VarId> {
        self.variables.iter().position(|v| v.name == name).map(VarId)
    }

    /// Dimension lengths of a variable, outermost first
    pub fn shape(&self, id: VarId) -> Option<Vec<u64>> {
        let var = self.variable(id)?;
        var.dims.iter().map(|d| self.dimension(*d).map(|dim| dim.len)).collect()
    }

    /// Attributes in definition order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

impl CatalogBuilder for MemoryCatalog {
    fn define_dimension(&mut self, name: &str, len: u64) -> TiffResult<DimId> {
        if len == 0 {
            return Err(TiffError::InvalidArgument(format!("Dimension '{}' has zero length", name)));
        }
        if self.find_dimension(name).is_some() {
            return Err(TiffError::InvalidArgument(format!("Dimension '{}' already defined", name)));
        }
        trace!("Defining dimension {} = {}", name, len);
        self.dimensions.push(Dimension { name: name.to_string(), len });
        Ok(DimId(self.dimensions.len() - 1))
    }

    fn define_variable(&mut self, name: &str, ty: NumericType, dims: &[DimId]) -> TiffResult<VarId> {
        if let Some(bad) = dims.iter().find(|d| d.0 >= self.dimensions.len()) {
            return Err(TiffError::InvalidArgument(format!("Unknown dimension id {}", bad.0)));
        }
        if self.find_variable(name).is_some() {
            return Err(TiffError::InvalidArgument(format!("Variable '{}' already defined", name)));
        }
        trace!("Defining variable {} ({}, rank {})", name, ty, dims.len());
        self.variables.push(Variable { name: name.to_string(), numeric_type: ty, dims: dims.to_vec() });
        Ok(VarId(self.variables.len() - 1))
    }

    fn set_attribute(&mut self, name: &str, value: AttributeValue) -> TiffResult<()> {
        trace!("Setting attribute {} = {}", name, value);
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        Ok(())
    }
}
