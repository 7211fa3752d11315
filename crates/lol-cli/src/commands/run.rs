//! Run command - execute a program file

use super::{read_source, Report, Status};
use anyhow::Result;
use lol_runtime::{Lol, RuntimeConfig};
use std::path::Path;
use tracing::debug;

/// Printed on stdout after a program completes without error
pub const SUCCESS_MESSAGE: &str = "KTHXBYE! Program finished successfully.";

/// Options for a program run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub quiet: bool,
    pub max_call_depth: usize,
}

/// Run a program file
///
/// Program output goes to stdout; any error is reported as a diagnostic and
/// yields a failing exit code.
pub fn run(path: &Path, options: &RunOptions, report: &Report) -> Result<Status> {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(err) => return report.fail(&err, path, None),
    };

    debug!(path = %path.display(), max_call_depth = options.max_call_depth, "running program");
    let runtime = Lol::with_config(RuntimeConfig::new().with_max_call_depth(options.max_call_depth));

    match runtime.eval(&source) {
        Ok(()) => {
            if !options.quiet {
                println!("{}", SUCCESS_MESSAGE);
            }
            Ok(Status::Success)
        }
        Err(err) => report.fail(&err, path, Some(&source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lol_runtime::ColorMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn report() -> Report {
        Report {
            json: false,
            color: ColorMode::Never,
        }
    }

    fn options() -> RunOptions {
        RunOptions {
            quiet: true,
            max_call_depth: 32,
        }
    }

    #[test]
    fn test_run_simple_program() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "HAI 1.2\nI HAS A X ITZ 1\nKTHXBYE").unwrap();

        let code = run(temp_file.path(), &options(), &report()).unwrap();
        assert_eq!(code, Status::Success);
    }

    #[test]
    fn test_run_runtime_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "HAI 1.2\nI HAS A X ITZ QUOSHUNT OF 1 AN 0\nKTHXBYE").unwrap();

        let code = run(temp_file.path(), &options(), &report()).unwrap();
        assert_eq!(code, Status::Failure);
    }

    #[test]
    fn test_run_missing_file() {
        let code = run(Path::new("nonexistent.lol"), &options(), &report()).unwrap();
        assert_eq!(code, Status::Failure);
    }
}
