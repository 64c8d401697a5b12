//! Utilities for the command-line front end

pub mod logger;

pub use logger::FileLogger;
