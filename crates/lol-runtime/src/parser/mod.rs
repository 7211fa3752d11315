//! Parsing (tokens to AST)
//!
//! Recursive descent over the token stream with one token of lookahead. There
//! is no error recovery: the first unexpected token aborts the parse.
//!
//! Binary operators are prefix keywords that take exactly two postfix
//! operands, so there is no precedence table. `SUM OF SUM OF 1 AN 2 AN 3` is
//! rejected; nesting goes through call arguments or index suffixes instead.

mod expr;
mod stmt;

use crate::ast::*;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use thiserror::Error;
use tracing::debug;

/// Errors raised while parsing
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Expected {expected} but found {} at line {}", found_text(*.found, .lexeme), .span.line)]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        lexeme: String,
        span: Span,
    },
    #[error("Cannot assign to {found} at line {}", .span.line)]
    InvalidAssignmentTarget { found: &'static str, span: Span },
    #[error("Only function calls can be used as statements, found {found} at line {}", .span.line)]
    BareExpression { found: &'static str, span: Span },
    #[error("Invalid number literal '{lexeme}' at line {}", .span.line)]
    InvalidNumber { lexeme: String, span: Span },
}

impl ParseError {
    /// Get the source span for this error
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidAssignmentTarget { span, .. }
            | ParseError::BareExpression { span, .. }
            | ParseError::InvalidNumber { span, .. } => *span,
        }
    }
}

fn found_text(kind: TokenKind, lexeme: &str) -> String {
    match kind {
        TokenKind::Identifier
        | TokenKind::Number
        | TokenKind::Yarn
        | TokenKind::Troof
        | TokenKind::TypeName => format!("{} '{}'", kind, lexeme),
        _ => kind.to_string(),
    }
}

/// Parser state for building AST from tokens
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
}

impl Parser {
    /// Create a new parser for the given tokens
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let span = tokens
                .last()
                .map(|t| Span::new(t.span.end, t.span.end, t.span.line, t.span.column))
                .unwrap_or_else(Span::dummy);
            tokens.push(Token::new(TokenKind::Eof, "", span));
        }
        Self { tokens, current: 0 }
    }

    /// Parse tokens into an AST
    ///
    /// Program := 'HAI' StatementList 'KTHXBYE' EndOfInput
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        self.skip_separators();
        let start = self.consume(TokenKind::Hai, "'HAI'")?.span;
        self.end_of_statement()?;

        let statements = self.parse_block_body()?;

        let end = self.consume(TokenKind::Kthxbye, "'KTHXBYE'")?.span;
        self.skip_separators();
        self.consume(TokenKind::Eof, "end of input")?;

        debug!(statements = statements.len(), "parsed program");
        Ok(Program {
            statements,
            span: start.merge(end),
        })
    }

    /// Parse statements until a block terminator or end of input
    pub(super) fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        loop {
            self.skip_separators();
            let kind = self.peek().kind;
            if kind.is_block_terminator() || kind == TokenKind::Eof {
                break;
            }
            statements.push(self.parse_statement()?);
            self.end_of_statement()?;
        }

        Ok(statements)
    }

    // === Token helpers ===

    /// Skip newlines and comments between statements
    pub(super) fn skip_separators(&mut self) {
        while matches!(self.peek().kind, TokenKind::Newline | TokenKind::Comment) {
            self.advance();
        }
    }

    /// Require that the statement just parsed ends the line
    pub(super) fn end_of_statement(&mut self) -> Result<(), ParseError> {
        if self.peek().kind.is_line_terminator() {
            Ok(())
        } else {
            Err(self.unexpected("end of line"))
        }
    }

    /// Advance to next token
    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    /// Peek at current token
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// Check if current token matches kind
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Match and consume token if it matches
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume token of given kind or error
    pub(super) fn consume(&mut self, kind: TokenKind, expected: &str) -> Result<&Token, ParseError> {
        if self.check(kind) {
            if kind == TokenKind::Eof {
                return Ok(self.peek());
            }
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Consume an identifier token
    pub(super) fn consume_identifier(&mut self, context: &str) -> Result<Identifier, ParseError> {
        let token = self.consume(TokenKind::Identifier, context)?;
        Ok(Identifier::new(token.lexeme.clone(), token.span))
    }

    /// Check if at end of token stream
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() - 1 || self.tokens[self.current].kind == TokenKind::Eof
    }

    /// Build an error for the current token
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: token.kind,
            lexeme: token.lexeme.clone(),
            span: token.span,
        }
    }

    /// Span of the most recently consumed token
    pub(super) fn previous_span(&self) -> Span {
        self.tokens[self.current.saturating_sub(1)].span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> Result<Program, ParseError> {
        let tokens = Lexer::new(source).tokenize().unwrap();
        Parser::new(tokens).parse()
    }

    #[test]
    fn test_empty_program() {
        let program = parse("HAI 1.2\nKTHXBYE\n").unwrap();
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_missing_hai() {
        let err = parse("VISIBLE 1\nKTHXBYE").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected 'HAI' but found 'VISIBLE' at line 1"
        );
    }

    #[test]
    fn test_missing_kthxbye() {
        let err = parse("HAI\nVISIBLE 1\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected 'KTHXBYE' but found end of input at line 3"
        );
    }

    #[test]
    fn test_trailing_tokens_after_kthxbye() {
        let err = parse("HAI\nKTHXBYE\nVISIBLE 1").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                found: TokenKind::Visible,
                ..
            }
        ));
    }

    #[test]
    fn test_comments_between_statements() {
        let program = parse("HAI BTW start\nOBTW\nblock\nTLDR\nVISIBLE 1 BTW trailing\nKTHXBYE").unwrap();
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_statement_must_end_line() {
        let err = parse("HAI\nI HAS A X ITZ 1 VISIBLE X\nKTHXBYE").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected end of line but found 'VISIBLE' at line 2"
        );
    }

    #[test]
    fn test_found_text_includes_lexeme_for_values() {
        let err = parse("HAI\nI HAS A 5\nKTHXBYE").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected a variable name but found number '5' at line 2"
        );
    }

    #[test]
    fn test_parser_appends_missing_eof() {
        let mut parser = Parser::new(Vec::new());
        let err = parser.parse().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                found: TokenKind::Eof,
                ..
            }
        ));
    }
}
