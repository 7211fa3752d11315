//! CLI command implementations

pub mod ast;
pub mod run;

use anyhow::Result;
use lol_runtime::{ColorMode, Diagnostic, DiagnosticFormatter, LolError};
use std::path::Path;
use std::process::ExitCode;

/// Outcome of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// An error was reported to the user
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Failure => ExitCode::FAILURE,
        }
    }
}

/// How diagnostics are written to stderr
#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub json: bool,
    pub color: ColorMode,
}

impl Report {
    /// Print one diagnostic
    pub fn emit(&self, diag: &Diagnostic) -> Result<()> {
        if self.json {
            eprintln!("{}", diag.to_json_string()?);
        } else {
            DiagnosticFormatter::new(self.color).emit(diag)?;
        }
        Ok(())
    }

    /// Report `err` against `path` and its source text, then signal failure
    pub fn fail(&self, err: &LolError, path: &Path, source: Option<&str>) -> Result<Status> {
        let mut diag = err.to_diagnostic().with_file(path.display().to_string());
        if let Some(source) = source {
            diag = diag.with_source(source);
        }
        self.emit(&diag)?;
        Ok(Status::Failure)
    }
}

/// Read a program file
pub fn read_source(path: &Path) -> Result<String, LolError> {
    std::fs::read_to_string(path).map_err(|e| LolError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
