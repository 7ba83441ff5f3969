//! Log file module
//!
//! Opens the append-only files behind the access and error log layers.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

/// Open or create a log file for appending, creating parent directories
pub fn open_log_file(path: impl AsRef<Path>) -> io::Result<File> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// A log file usable as a `tracing_subscriber` writer
pub fn log_file_writer(path: impl AsRef<Path>) -> io::Result<Mutex<File>> {
    open_log_file(path).map(Mutex::new)
}
