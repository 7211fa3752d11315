//! AST dump command - output AST as JSON

use super::{read_source, Report, Status};
use anyhow::Result;
use lol_runtime::ast::VersionedProgram;
use std::path::Path;

/// Dump AST to JSON
///
/// Parses the source file and outputs the versioned AST as JSON to stdout.
/// Nothing is executed.
pub fn run(path: &Path, report: &Report) -> Result<Status> {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(err) => return report.fail(&err, path, None),
    };

    match lol_runtime::parse(&source) {
        Ok(program) => {
            println!("{}", VersionedProgram::new(program).to_json()?);
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
            json: true,
            color: ColorMode::Never,
        }
    }

    #[test]
    fn test_ast_dump_simple() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "HAI 1.2\nI HAS A X ITZ 42\nKTHXBYE").unwrap();

        let code = run(temp_file.path(), &report()).unwrap();
        assert_eq!(code, Status::Success);
    }

    #[test]
    fn test_ast_dump_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "HAI 1.2\nI HAS A\nKTHXBYE").unwrap();

        let code = run(temp_file.path(), &report()).unwrap();
        assert_eq!(code, Status::Failure);
    }
}
