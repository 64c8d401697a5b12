//! Command pattern interfaces
//!
//! Each CLI action is a [`Command`] built from parsed arguments by a
//! [`CommandFactory`].

use crate::config::ReaderConfig;
use crate::tiff::errors::TiffResult;

/// An executable CLI action
pub trait Command {
    /// Execute the command
    ///
    /// # Returns
    /// Result indicating success or an error
    fn execute(&self) -> TiffResult<()>;
}

/// Builds the command selected by the CLI arguments
pub trait CommandFactory<'a> {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Reader limits shared by every command
    ///
    /// # Returns
    /// A command that implements the Command trait, or an error
    fn create_command(&self, args: &clap::ArgMatches, config: &'a ReaderConfig) -> TiffResult<Box<dyn Command + 'a>>;
}
