//! Diagnostic system for errors
//!
//! Lex, parse and runtime errors are all reported through the `Diagnostic`
//! type, which renders either as human-readable text with a source snippet or
//! as JSON for tooling.

pub mod formatter;

use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::span::Span;
use crate::value::RuntimeError;
use serde::{Deserialize, Serialize};

/// Diagnostic schema version
pub const DIAG_VERSION: u32 = 1;

/// An error diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic schema version
    pub diag_version: u32,
    /// Error code (e.g., "LOL0001")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// File path
    pub file: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Length of error span
    pub length: usize,
    /// Source line string
    pub snippet: String,
    /// Short label for caret range
    pub label: String,
    /// Additional notes (optional)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
    /// Suggested fix (optional)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic with code
    pub fn error_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            diag_version: DIAG_VERSION,
            code: code.into(),
            message: message.into(),
            file: "<unknown>".to_string(),
            line: span.line as usize,
            column: span.column as usize,
            length: span.len(),
            snippet: String::new(),
            label: String::new(),
            notes: Vec::new(),
            help: None,
        }
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Set the line number
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Set the snippet (source line)
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Set the label (caret description)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Fill in the snippet from the full source text
    pub fn with_source(self, source: &str) -> Self {
        match formatter::extract_snippet(source, self.line) {
            Some(snippet) => self.with_snippet(snippet),
            None => self,
        }
    }

    /// Number of carets to draw under the snippet
    ///
    /// Spans that run past the end of the line are clipped to it.
    pub fn caret_len(&self) -> usize {
        let remaining = self
            .snippet
            .chars()
            .count()
            .saturating_sub(self.column.saturating_sub(1));
        self.length.min(remaining).max(1)
    }

    /// Format as human-readable string
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        // Header: error[LOL0001]: Variable 'X' is not declared
        output.push_str(&format!("error[{}]: {}\n", self.code, self.message));

        // Location: --> path/to/file.lol:12:9
        output.push_str(&format!(
            "  --> {}:{}:{}\n",
            self.file, self.line, self.column
        ));

        if !self.snippet.is_empty() {
            output.push_str("   |\n");
            output.push_str(&format!("{:>2} | {}\n", self.line, self.snippet));

            let padding = " ".repeat(self.column.saturating_sub(1));
            let carets = "^".repeat(self.caret_len());
            output.push_str(&format!("   | {}{}", padding, carets));
            if !self.label.is_empty() {
                output.push_str(&format!(" {}", self.label));
            }
            output.push('\n');
        }

        for note in &self.notes {
            output.push_str(&format!("   = note: {}\n", note));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {}\n", help));
        }

        output
    }

    /// Format as JSON string
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&LexError> for Diagnostic {
    fn from(err: &LexError) -> Self {
        let code = match err {
            LexError::UnexpectedCharacter { .. } => error_codes::UNEXPECTED_CHARACTER,
            LexError::UnterminatedString { .. } => error_codes::UNTERMINATED_STRING,
            LexError::InvalidEscape { .. } => error_codes::INVALID_ESCAPE,
            LexError::UnterminatedComment { .. } => error_codes::UNTERMINATED_COMMENT,
            LexError::InvalidNumber { .. } => error_codes::INVALID_NUMBER,
        };
        let diag = Diagnostic::error_with_code(code, err.to_string(), err.span())
            .with_label("syntax error");

        match err {
            LexError::UnterminatedString { .. } => {
                diag.with_help("close the YARN with '\"' before the end of the line")
            }
            LexError::InvalidEscape { .. } => {
                diag.with_help("valid escapes are :) :> :\" and ::")
            }
            LexError::UnterminatedComment { .. } => diag.with_help("close the comment with TLDR"),
            _ => diag,
        }
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        let code = match err {
            ParseError::UnexpectedToken { .. } => error_codes::UNEXPECTED_TOKEN,
            ParseError::InvalidAssignmentTarget { .. } => error_codes::INVALID_ASSIGNMENT_TARGET,
            ParseError::BareExpression { .. } => error_codes::BARE_EXPRESSION,
            ParseError::InvalidNumber { .. } => error_codes::INVALID_NUMBER,
        };
        let diag =
            Diagnostic::error_with_code(code, err.to_string(), err.span()).with_label("syntax error");

        match err {
            ParseError::InvalidAssignmentTarget { .. } => {
                diag.with_help("only variables, 'Z members and AT elements can be assigned")
            }
            ParseError::BareExpression { .. } => {
                diag.with_help("call a function with YR, or assign the value with R")
            }
            _ => diag,
        }
    }
}

impl From<&RuntimeError> for Diagnostic {
    fn from(err: &RuntimeError) -> Self {
        let (code, label) = match err {
            RuntimeError::UndeclaredVariable { .. } => {
                (error_codes::UNDECLARED_VARIABLE, "not declared")
            }
            RuntimeError::DuplicateDeclaration { .. } => {
                (error_codes::DUPLICATE_DECLARATION, "already declared")
            }
            RuntimeError::TypeError { .. } => (error_codes::TYPE_ERROR, "type error"),
            RuntimeError::DivisionByZero { .. } => (error_codes::DIVISION_BY_ZERO, "divisor is zero"),
            RuntimeError::IntegerOverflow { .. } => (error_codes::INTEGER_OVERFLOW, "overflow"),
            RuntimeError::ArityMismatch { .. } => (error_codes::ARITY_MISMATCH, "wrong argument count"),
            RuntimeError::NotAFunction { .. } => (error_codes::NOT_A_FUNCTION, "not callable"),
            RuntimeError::NotAClass { .. } => (error_codes::NOT_A_CLASS, "not a class"),
            RuntimeError::NotAnInstance { .. } => (error_codes::NOT_AN_INSTANCE, "not an instance"),
            RuntimeError::NotAnArray { .. } => (error_codes::NOT_AN_ARRAY, "not a BUKKIT"),
            RuntimeError::NoSuchMember { .. } => (error_codes::NO_SUCH_MEMBER, "unknown member"),
            RuntimeError::SelfOutsideMethod { .. } => {
                (error_codes::SELF_OUTSIDE_METHOD, "no instance here")
            }
            RuntimeError::IndexNotInteger { .. } => (error_codes::INDEX_NOT_INTEGER, "not a NUMBR"),
            RuntimeError::NegativeIndex { .. } => (error_codes::NEGATIVE_INDEX, "negative index"),
            RuntimeError::UnsupportedCoercion { .. } => {
                (error_codes::UNSUPPORTED_COERCION, "cannot coerce")
            }
            RuntimeError::ReturnOutsideFunction { .. } => {
                (error_codes::RETURN_OUTSIDE_FUNCTION, "not inside a function")
            }
            RuntimeError::StackOverflow { .. } => (error_codes::STACK_OVERFLOW, "call nested too deeply"),
            RuntimeError::Output { .. } => (error_codes::OUTPUT_ERROR, "output failed"),
        };

        let diag = Diagnostic::error_with_code(code, err.to_string(), err.span()).with_label(label);

        match err {
            RuntimeError::UndeclaredVariable { name, .. } => {
                diag.with_help(format!("declare it first with 'I HAS A {}'", name))
            }
            RuntimeError::UnsupportedCoercion { .. } => {
                diag.with_note("only MAEK <BUKKIT> A NUMBR is supported")
            }
            RuntimeError::StackOverflow { .. } => {
                diag.with_help("check for unbounded recursion or raise --max-call-depth")
            }
            _ => diag,
        }
    }
}

/// Error code registry
pub mod error_codes {
    // LOL0xxx - Runtime errors
    pub const UNDECLARED_VARIABLE: &str = "LOL0001";
    pub const DUPLICATE_DECLARATION: &str = "LOL0002";
    pub const TYPE_ERROR: &str = "LOL0003";
    pub const DIVISION_BY_ZERO: &str = "LOL0004";
    pub const INTEGER_OVERFLOW: &str = "LOL0005";
    pub const ARITY_MISMATCH: &str = "LOL0006";
    pub const NOT_A_FUNCTION: &str = "LOL0007";
    pub const NOT_A_CLASS: &str = "LOL0008";
    pub const NOT_AN_INSTANCE: &str = "LOL0009";
    pub const NOT_AN_ARRAY: &str = "LOL0010";
    pub const NO_SUCH_MEMBER: &str = "LOL0011";
    pub const SELF_OUTSIDE_METHOD: &str = "LOL0012";
    pub const INDEX_NOT_INTEGER: &str = "LOL0013";
    pub const NEGATIVE_INDEX: &str = "LOL0014";
    pub const UNSUPPORTED_COERCION: &str = "LOL0015";
    pub const RETURN_OUTSIDE_FUNCTION: &str = "LOL0016";

    // LOL1xxx - Syntax errors
    pub const UNEXPECTED_CHARACTER: &str = "LOL1001";
    pub const UNTERMINATED_STRING: &str = "LOL1002";
    pub const INVALID_ESCAPE: &str = "LOL1003";
    pub const UNTERMINATED_COMMENT: &str = "LOL1004";
    pub const INVALID_NUMBER: &str = "LOL1005";
    pub const UNEXPECTED_TOKEN: &str = "LOL1010";
    pub const INVALID_ASSIGNMENT_TARGET: &str = "LOL1011";
    pub const BARE_EXPRESSION: &str = "LOL1012";

    // LOL9xxx - Fatal errors
    pub const STACK_OVERFLOW: &str = "LOL9001";
    pub const OUTPUT_ERROR: &str = "LOL9002";
    pub const IO_ERROR: &str = "LOL9003";
    pub const GENERIC_ERROR: &str = "LOL9999";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_with_code_uses_span_position() {
        let diag = Diagnostic::error_with_code("LOL0001", "oops", Span::new(10, 13, 2, 5));
        assert_eq!(diag.line, 2);
        assert_eq!(diag.column, 5);
        assert_eq!(diag.length, 3);
        assert_eq!(diag.diag_version, DIAG_VERSION);
    }

    #[test]
    fn test_builder_pattern() {
        let diag = Diagnostic::error_with_code(error_codes::GENERIC_ERROR, "test", Span::new(0, 4, 1, 1))
            .with_file("test.lol")
            .with_line(10)
            .with_snippet("VISIBLE Y")
            .with_label("not declared")
            .with_note("a note")
            .with_help("declare Y");

        assert_eq!(diag.code, error_codes::GENERIC_ERROR);
        assert_eq!(diag.file, "test.lol");
        assert_eq!(diag.line, 10);
        assert_eq!(diag.notes.len(), 1);
        assert!(diag.help.is_some());
    }

    #[test]
    fn test_human_format() {
        let source = "HAI\nVISIBLE NOPE\nKTHXBYE";
        let diag = Diagnostic::error_with_code("LOL0001", "Variable 'NOPE' is not declared", Span::new(12, 16, 2, 9))
            .with_file("test.lol")
            .with_source(source)
            .with_label("not declared");

        let expected = "error[LOL0001]: Variable 'NOPE' is not declared\n  --> test.lol:2:9\n   |\n 2 | VISIBLE NOPE\n   |         ^^^^ not declared\n";
        assert_eq!(diag.to_human_string(), expected);
    }

    #[test]
    fn test_carets_clipped_to_line() {
        let diag = Diagnostic::error_with_code("LOL0001", "x", Span::new(0, 40, 1, 3)).with_snippet("ABCDE");
        assert_eq!(diag.caret_len(), 3);
    }

    #[test]
    fn test_json_format() {
        let diag = Diagnostic::error_with_code("LOL0004", "Division by zero", Span::new(0, 5, 1, 1))
            .with_file("test.lol");

        let json = diag.to_json_string().unwrap();
        assert!(json.contains("\"diag_version\": 1"));
        assert!(json.contains("\"code\": \"LOL0004\""));
        assert!(json.contains("\"message\": \"Division by zero\""));
        assert!(!json.contains("\"help\""));
    }

    #[test]
    fn test_runtime_error_conversion() {
        let err = RuntimeError::UndeclaredVariable {
            name: "X".to_string(),
            span: Span::new(4, 5, 3, 2),
        };
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.code, error_codes::UNDECLARED_VARIABLE);
        assert_eq!(diag.line, 3);
        assert_eq!(diag.help.as_deref(), Some("declare it first with 'I HAS A X'"));
    }

    #[test]
    fn test_lex_error_conversion() {
        let err = LexError::UnterminatedComment {
            span: Span::new(0, 4, 7, 1),
        };
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.code, error_codes::UNTERMINATED_COMMENT);
        assert_eq!(diag.label, "syntax error");
    }
}
