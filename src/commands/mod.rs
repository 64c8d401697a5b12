//! CLI command implementations

pub mod command_traits;
pub mod detect_command;
pub mod info_command;
pub mod read_command;

pub use command_traits::{Command, CommandFactory};
pub use detect_command::DetectCommand;
pub use info_command::InfoCommand;
pub use read_command::ReadCommand;

use clap::ArgMatches;

use crate::config::ReaderConfig;
use crate::tiff::errors::{TiffError, TiffResult};

/// Picks detect, read or (by default) info from the parsed arguments
#[derive(Debug, Default)]
pub struct TiffslabCommandFactory;

impl TiffslabCommandFactory {
    pub fn new() -> Self {
        TiffslabCommandFactory
    }
}

impl<'a> CommandFactory<'a> for TiffslabCommandFactory {
    fn create_command(&self, args: &ArgMatches, config: &'a ReaderConfig) -> TiffResult<Box<dyn Command + 'a>> {
        if args.get_flag("detect") {
            Ok(Box::new(DetectCommand::new(args, config)?))
        } else if args.get_flag("read") {
            Ok(Box::new(ReadCommand::new(args, config)?))
        } else {
            Ok(Box::new(InfoCommand::new(args, config)?))
        }
    }
}

/// The positional input path
pub(crate) fn input_path(args: &ArgMatches) -> TiffResult<String> {
    args.get_one::<String>("input")
        .cloned()
        .ok_or_else(|| TiffError::InvalidArgument("Missing input file".to_string()))
}
