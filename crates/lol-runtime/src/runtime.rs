//! LOL runtime API for embedding
//!
//! Runs the whole pipeline (tokenize, parse, interpret) against one
//! interpreter whose globals persist between calls.

use crate::ast::Program;
use crate::diagnostic::{error_codes, Diagnostic};
use crate::interpreter::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
use crate::lexer::{LexError, Lexer};
use crate::output::{stdout_writer, OutputWriter};
use crate::parser::{ParseError, Parser};
use crate::span::Span;
use crate::token::Token;
use crate::value::{RuntimeError, Value};
use std::cell::RefCell;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Any error produced while running a program
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LolError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },
}

impl LolError {
    /// Source location of the error, if it has one
    pub fn span(&self) -> Option<Span> {
        match self {
            LolError::Lex(err) => Some(err.span()),
            LolError::Parse(err) => Some(err.span()),
            LolError::Runtime(err) => Some(err.span()),
            LolError::Io { .. } => None,
        }
    }

    /// Convert to a diagnostic (without file name or snippet)
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LolError::Lex(err) => Diagnostic::from(err),
            LolError::Parse(err) => Diagnostic::from(err),
            LolError::Runtime(err) => Diagnostic::from(err),
            LolError::Io { path, .. } => {
                Diagnostic::error_with_code(error_codes::IO_ERROR, self.to_string(), Span::dummy())
                    .with_file(path.clone())
            }
        }
    }
}

/// Runtime configuration
///
/// # Examples
///
/// ```
/// use lol_runtime::RuntimeConfig;
///
/// let config = RuntimeConfig::new().with_max_call_depth(64);
/// assert_eq!(config.max_call_depth, 64);
/// ```
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Where `VISIBLE` writes
    pub output: OutputWriter,
    /// Maximum nesting of function calls before `StackOverflow`
    pub max_call_depth: usize,
}

impl RuntimeConfig {
    /// Default configuration: standard output, default call depth
    pub fn new() -> Self {
        Self {
            output: stdout_writer(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Send program output to `output`
    pub fn with_output(mut self, output: OutputWriter) -> Self {
        self.output = output;
        self
    }

    /// Set the call-depth limit
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("max_call_depth", &self.max_call_depth)
            .finish_non_exhaustive()
    }
}

/// LOL runtime instance
///
/// # Examples
///
/// ```no_run
/// use lol_runtime::Lol;
///
/// let runtime = Lol::new();
/// runtime.eval("HAI 1.2\nVISIBLE \"HAI WORLD\"\nKTHXBYE").unwrap();
/// ```
pub struct Lol {
    interpreter: RefCell<Interpreter>,
}

impl Lol {
    /// Create a runtime writing to standard output
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::new())
    }

    /// Create a runtime from an explicit configuration
    pub fn with_config(config: RuntimeConfig) -> Self {
        let mut interpreter = Interpreter::with_output(config.output);
        interpreter.set_max_call_depth(config.max_call_depth);
        Self {
            interpreter: RefCell::new(interpreter),
        }
    }

    /// Tokenize, parse and run a complete program
    ///
    /// Nothing is executed unless the whole source parses. Output written
    /// before a runtime error stays written.
    pub fn eval(&self, source: &str) -> Result<(), LolError> {
        let program = parse(source)?;
        self.run(&program)
    }

    /// Run an already parsed program
    pub fn run(&self, program: &Program) -> Result<(), LolError> {
        self.interpreter.borrow_mut().run(program)?;
        Ok(())
    }

    /// Read and run a program file
    pub fn eval_file(&self, path: impl AsRef<Path>) -> Result<(), LolError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| LolError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), bytes = source.len(), "read source file");
        self.eval(&source)
    }

    /// Read a global variable left behind by earlier runs
    pub fn global(&self, name: &str) -> Option<Value> {
        self.interpreter.borrow().global(name)
    }
}

impl Default for Lol {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenize `source`
pub fn tokenize(source: &str) -> Result<Vec<Token>, LolError> {
    Ok(Lexer::new(source).tokenize()?)
}

/// Tokenize and parse `source` into a program
pub fn parse(source: &str) -> Result<Program, LolError> {
    let tokens = tokenize(source)?;
    let program = Parser::new(tokens).parse()?;
    debug!(statements = program.statements.len(), "parsed program");
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn quiet() -> Lol {
        let sink: OutputWriter = Arc::new(Mutex::new(Box::new(std::io::sink())));
        Lol::with_config(RuntimeConfig::new().with_output(sink))
    }

    #[test]
    fn test_globals_persist_between_evals() {
        let runtime = quiet();
        runtime.eval("HAI\nI HAS A X ITZ 5\nKTHXBYE").unwrap();
        runtime.eval("HAI\nX R SUM OF X AN 1\nKTHXBYE").unwrap();
        assert_eq!(runtime.global("X"), Some(Value::Numbr(6)));
    }

    #[test]
    fn test_parse_error_runs_nothing() {
        let runtime = quiet();
        let err = runtime
            .eval("HAI\nI HAS A X ITZ 1\nVISIBLE (\nKTHXBYE")
            .unwrap_err();
        assert!(matches!(err, LolError::Lex(_)));
        assert_eq!(runtime.global("X"), None);
    }

    #[test]
    fn test_error_kinds_map_to_codes() {
        let runtime = quiet();
        let lex = runtime.eval("HAI\n\"open\nKTHXBYE").unwrap_err();
        assert_eq!(lex.to_diagnostic().code, "LOL1002");

        let parse = runtime.eval("VISIBLE 1").unwrap_err();
        assert_eq!(parse.to_diagnostic().code, "LOL1010");

        let run = runtime.eval("HAI\nVISIBLE Y\nKTHXBYE").unwrap_err();
        let diag = run.to_diagnostic();
        assert_eq!(diag.code, "LOL0001");
        assert_eq!((diag.line, diag.column), (2, 9));
    }

    #[test]
    fn test_missing_file() {
        let err = quiet().eval_file("/definitely/not/here.lol").unwrap_err();
        assert!(matches!(err, LolError::Io { .. }));
        assert_eq!(err.span(), None);
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, "LOL9003");
        assert_eq!(diag.file, "/definitely/not/here.lol");
    }

    #[test]
    fn test_max_call_depth_is_applied() {
        let sink: OutputWriter = Arc::new(Mutex::new(Box::new(std::io::sink())));
        let runtime = Lol::with_config(
            RuntimeConfig::new()
                .with_output(sink)
                .with_max_call_depth(8),
        );
        let err = runtime
            .eval("HAI\nHOW IZ I LOOP YR N\nFOUND YR LOOP YR N\nIF U SAY SO\nLOOP YR 1\nKTHXBYE")
            .unwrap_err();
        assert!(matches!(
            err,
            LolError::Runtime(RuntimeError::StackOverflow { limit: 8, .. })
        ));
    }
}
