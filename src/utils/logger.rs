//! File-backed logger for the `log` facade
//!
//! Installed by the binary when `--log-file` is given; the library itself
//! never installs a logger.

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Writes every enabled record as one line to a file
pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    /// Creates (or truncates) the log file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the log file
    /// * `level` - Most verbose level written
    pub fn new<P: AsRef<Path>>(path: P, level: LevelFilter) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(FileLogger { file: Mutex::new(file), level })
    }

    /// Installs a file logger as the global `log` backend
    pub fn init<P: AsRef<Path>>(path: P, level: LevelFilter) -> io::Result<()> {
        let logger = FileLogger::new(path, level)?;
        log::set_boxed_logger(Box::new(logger))
            .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
