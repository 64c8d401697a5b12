//! Catalog listing command
//!
//! Opens the file, then prints the dimensions, the data variable, the
//! global attributes and the storage organization.

use clap::ArgMatches;
use log::debug;

use crate::api::{GeoTiffFile, OpenMode};
use crate::catalog::{DimId, MemoryCatalog, VarId};
use crate::commands::command_traits::Command;
use crate::config::ReaderConfig;
use crate::tiff::errors::TiffResult;

/// Prints what an open registers in the catalog
pub struct InfoCommand<'a> {
    input_file: String,
    config: &'a ReaderConfig,
}

impl<'a> InfoCommand<'a> {
    pub fn new(args: &ArgMatches, config: &'a ReaderConfig) -> TiffResult<Self> {
        Ok(InfoCommand { input_file: super::input_path(args)?, config })
    }

    /// Renders the catalog as indented text
    pub fn describe(file: &GeoTiffFile, catalog: &MemoryCatalog) -> String {
        let mut out = format!("File: {}\n", file.path().display());
        out.push_str(&format!("  Format: {}\n", file.format()));
        out.push_str(&format!("  Organization: {}\n", file.organization()));

        out.push_str("Dimensions:\n");
        for i in 0..catalog.dimension_count() {
            if let Some(dim) = catalog.dimension(DimId(i)) {
                out.push_str(&format!("  {} = {}\n", dim.name, dim.len));
            }
        }

        out.push_str("Variables:\n");
        for i in 0..catalog.variable_count() {
            if let Some(var) = catalog.variable(VarId(i)) {
                let dims: Vec<&str> = var
                    .dims
                    .iter()
                    .filter_map(|d| catalog.dimension(*d).map(|dim| dim.name.as_str()))
                    .collect();
                out.push_str(&format!("  {} {}({})\n", var.numeric_type, var.name, dims.join(", ")));
            }
        }

        out.push_str("Attributes:\n");
        for (name, value) in catalog.attributes() {
            out.push_str(&format!("  {} = {}\n", name, value));
        }
        if let Some(crs) = file.crs().filter(|c| !c.is_complete()) {
            out.push_str(&format!("  (incomplete {} CRS omitted)\n", crs.crs_type));
        }
        out
    }
}

impl Command for InfoCommand<'_> {
    fn execute(&self) -> TiffResult<()> {
        let mut catalog = MemoryCatalog::new();
        let file = GeoTiffFile::open(&self.input_file, OpenMode::Read, &mut catalog, self.config)?;
        debug!("Catalog has {} attributes", catalog.attributes().count());
        print!("{}", Self::describe(&file, &catalog));
        file.close()
    }
}
