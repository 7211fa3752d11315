//! Destination for `VISIBLE` output
//!
//! Output goes through a shared, swappable writer so embedders and tests can
//! capture what a program prints.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Shared output sink used by the interpreter
pub type OutputWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Writer that forwards to the process's standard output
pub fn stdout_writer() -> OutputWriter {
    Arc::new(Mutex::new(Box::new(std::io::stdout())))
}

/// Write one line to `writer`, reporting failures as plain messages
pub(crate) fn write_line(writer: &OutputWriter, line: &str) -> Result<(), String> {
    let mut out = writer.lock().map_err(|_| "output writer lock poisoned".to_string())?;
    writeln!(out, "{}", line).map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())
}
