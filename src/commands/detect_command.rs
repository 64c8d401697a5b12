//! Format probe command

use clap::ArgMatches;
use log::info;

use crate::api::{Detection, GeoTiffFile};
use crate::commands::command_traits::Command;
use crate::config::ReaderConfig;
use crate::tiff::errors::TiffResult;

/// Prints whether the input is a GeoTIFF, without decoding it
pub struct DetectCommand<'a> {
    input_file: String,
    config: &'a ReaderConfig,
}

impl<'a> DetectCommand<'a> {
    pub fn new(args: &ArgMatches, config: &'a ReaderConfig) -> TiffResult<Self> {
        Ok(DetectCommand { input_file: super::input_path(args)?, config })
    }
}

impl Command for DetectCommand<'_> {
    fn execute(&self) -> TiffResult<()> {
        let detection = GeoTiffFile::detect_with_config(&self.input_file, self.config)?;
        info!("Detection for {}: {:?}", self.input_file, detection);
        match detection {
            Detection::ThisFormat => println!("{}: GeoTIFF", self.input_file),
            Detection::NotThisFormat => println!("{}: not a GeoTIFF", self.input_file),
        }
        Ok(())
    }
}
