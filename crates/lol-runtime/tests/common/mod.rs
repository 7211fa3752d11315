//! Shared test utilities
//!
//! Helpers for running whole programs with their output captured in memory.

#![allow(dead_code)]

use lol_runtime::{Lol, LolError, OutputWriter, RuntimeConfig};
use std::io::Write;
use std::sync::{Arc, Mutex};

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// Call-depth limit for tests; keeps deep recursion well inside the test thread's stack
pub const TEST_MAX_CALL_DEPTH: usize = 16;

/// In-memory sink shared between a test and the interpreter
#[derive(Clone, Default)]
pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output writer feeding this buffer
    pub fn writer(&self) -> OutputWriter {
        Arc::new(Mutex::new(Box::new(self.clone())))
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runtime whose output goes to `capture`
pub fn runtime_with(capture: &CaptureWriter) -> Lol {
    Lol::with_config(
        RuntimeConfig::new()
            .with_output(capture.writer())
            .with_max_call_depth(TEST_MAX_CALL_DEPTH),
    )
}

/// Run a complete program, returning its output and result
pub fn run_source(source: &str) -> (String, Result<(), LolError>) {
    let capture = CaptureWriter::new();
    let result = runtime_with(&capture).eval(source);
    (capture.contents(), result)
}

/// Wrap statement lines in `HAI` / `KTHXBYE`
pub fn program(body: &str) -> String {
    format!("HAI 1.2\n{}\nKTHXBYE\n", body)
}

/// Run `body` as a program that must succeed, returning its output
pub fn output_of(body: &str) -> String {
    let (output, result) = run_source(&program(body));
    if let Err(err) = result {
        panic!("program failed: {}\noutput so far:\n{}", err, output);
    }
    output
}

/// Run `body` as a program that must fail, returning the error code
pub fn error_code_of(body: &str) -> String {
    match run_source(&program(body)).1 {
        Ok(()) => panic!("expected an error, program succeeded"),
        Err(err) => err.to_diagnostic().code,
    }
}
