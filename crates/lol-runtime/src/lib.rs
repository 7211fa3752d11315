//! LOL Runtime - Core language implementation
//!
//! This library provides the complete runtime for a small LOLCODE-style
//! language:
//! - Regex-driven tokenization
//! - Recursive-descent parsing into a serializable AST
//! - Tree-walking interpretation with classes, methods and BUKKIT arrays
//! - Diagnostics with stable error codes

/// LOL runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod runtime;
pub mod span;
pub mod token;
pub mod value;

// Re-export commonly used types
pub use ast::{Program, VersionedProgram, AST_VERSION};
pub use diagnostic::formatter::{ColorMode, DiagnosticFormatter};
pub use diagnostic::{error_codes, Diagnostic, DIAG_VERSION};
pub use interpreter::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
pub use lexer::{LexError, Lexer};
pub use output::{stdout_writer, OutputWriter};
pub use parser::{ParseError, Parser};
pub use runtime::{parse, tokenize, Lol, LolError, RuntimeConfig};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use value::{RuntimeError, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        assert_eq!(VERSION, "0.1.0");
    }
}
