//! Lexical analysis (tokenization)
//!
//! The lexer is a linear scanner driven by an ordered table of anchored
//! regular expressions. At each position the first pattern that matches wins,
//! which is why multi-word keywords are listed before identifiers. String
//! literals and block comments are scanned by hand so that escapes and
//! unterminated input can be reported precisely.

use crate::span::Span;
use crate::token::{Token, TokenKind};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors raised while tokenizing
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at line {}, column {}", .span.line, .span.column)]
    UnexpectedCharacter { ch: char, span: Span },
    #[error("Unterminated YARN starting at line {}, column {}", .span.line, .span.column)]
    UnterminatedString { span: Span },
    #[error("Invalid escape ':{ch}' in YARN at line {}, column {}", .span.line, .span.column)]
    InvalidEscape { ch: char, span: Span },
    #[error("Unterminated OBTW comment starting at line {}", .span.line)]
    UnterminatedComment { span: Span },
    #[error("Invalid number literal '{text}' at line {}, column {}", .span.line, .span.column)]
    InvalidNumber { text: String, span: Span },
}

impl LexError {
    /// Get the source span for this error
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::InvalidEscape { span, .. }
            | LexError::UnterminatedComment { span }
            | LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

/// Ordered token table. Order matters: earlier entries win.
const TOKEN_SPECS: &[(TokenKind, &str)] = &[
    (TokenKind::Comment, r"^BTW\b[^\n]*"),
    (TokenKind::Hai, r"^HAI\b(?:[ \t]+\d+(?:\.\d+)*)?"),
    (TokenKind::Kthxbye, r"^KTHXBYE\b"),
    (TokenKind::Kthx, r"^KTHX\b"),
    (TokenKind::IHasA, r"^I[ \t]+HAS[ \t]+A\b"),
    (TokenKind::Itz, r"^ITZ\b"),
    (TokenKind::Visible, r"^VISIBLE\b"),
    (TokenKind::HowIzI, r"^HOW[ \t]+IZ[ \t]+I\b"),
    (TokenKind::IfUSaySo, r"^IF[ \t]+U[ \t]+SAY[ \t]+SO\b"),
    (TokenKind::FoundYr, r"^FOUND[ \t]+YR\b"),
    (TokenKind::Gtfo, r"^GTFO\b"),
    (TokenKind::AnYr, r"^AN[ \t]+YR\b"),
    (TokenKind::An, r"^AN\b"),
    (TokenKind::Yr, r"^YR\b"),
    (TokenKind::Mkay, r"^MKAY\b"),
    (TokenKind::SumOf, r"^SUM[ \t]+OF\b"),
    (TokenKind::DiffOf, r"^DIFF[ \t]+OF\b"),
    (TokenKind::ProduktOf, r"^PRODUKT[ \t]+OF\b"),
    (TokenKind::QuoshuntOf, r"^QUOSHUNT[ \t]+OF\b"),
    (TokenKind::BothSaem, r"^BOTH[ \t]+SAEM\b"),
    (TokenKind::Diffrint, r"^DIFFRINT\b"),
    (TokenKind::ORly, r"^O[ \t]+RLY\?"),
    (TokenKind::OHaiIm, r"^O[ \t]+HAI[ \t]+IM\b"),
    (TokenKind::YaRly, r"^YA[ \t]+RLY\b"),
    (TokenKind::NoWai, r"^NO[ \t]+WAI\b"),
    (TokenKind::Oic, r"^OIC\b"),
    (TokenKind::New, r"^NEW\b"),
    (TokenKind::Me, r"^ME\b"),
    (TokenKind::ApostropheZ, r"^'Z\b"),
    (TokenKind::Bukkit, r"^BUKKIT\b"),
    (TokenKind::At, r"^AT\b"),
    (TokenKind::Maek, r"^MAEK\b"),
    (TokenKind::TypeName, r"^(?:NUMBR|NUMBAR|YARN|TROOF|NOOB)\b"),
    (TokenKind::Troof, r"^(?:WIN|FAIL)\b"),
    (TokenKind::A, r"^A\b"),
    (TokenKind::R, r"^R\b"),
    (TokenKind::Number, r"^-?\d+(?:\.\d+)?\b"),
    (TokenKind::Identifier, r"^[A-Za-z][A-Za-z0-9_]*"),
];

static TOKEN_PATTERNS: OnceLock<Vec<(TokenKind, Regex)>> = OnceLock::new();

fn token_patterns() -> &'static [(TokenKind, Regex)] {
    TOKEN_PATTERNS.get_or_init(|| {
        TOKEN_SPECS
            .iter()
            .map(|(kind, pattern)| {
                (
                    *kind,
                    Regex::new(pattern).expect("token table patterns are valid regexes"),
                )
            })
            .collect()
    })
}

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Original source code
    source: String,
    /// Current byte offset into `source`
    current: usize,
    /// Current line number (1-indexed)
    line: u32,
    /// Current column number (1-indexed)
    column: u32,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole source. The returned vector always ends with `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        debug!(tokens = tokens.len(), lines = self.line, "tokenized source");
        Ok(tokens)
    }

    /// Scan the next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_blanks();

        let rest = &self.source[self.current..];
        let Some(c) = rest.chars().next() else {
            return Ok(self.emit(TokenKind::Eof, String::new(), 0));
        };

        if c == '\n' {
            return Ok(self.emit(TokenKind::Newline, "\n".to_string(), 1));
        }
        if c == '"' {
            return self.scan_yarn();
        }
        if Self::starts_word(rest, "OBTW") {
            return self.scan_block_comment();
        }

        self.scan_pattern(c)
    }

    /// Skip spaces, tabs and carriage returns (newlines are tokens)
    fn skip_blanks(&mut self) {
        while let Some(c) = self.source[self.current..].chars().next() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance_by(c.len_utf8());
            } else {
                break;
            }
        }
    }

    /// Match the token table at the current position
    fn scan_pattern(&mut self, first: char) -> Result<Token, LexError> {
        let rest = &self.source[self.current..];
        let found = token_patterns()
            .iter()
            .find_map(|(kind, regex)| regex.find(rest).map(|m| (*kind, m.end())));

        let Some((kind, len)) = found else {
            return Err(LexError::UnexpectedCharacter {
                ch: first,
                span: self.span_ahead(first.len_utf8()),
            });
        };

        let text = self.source[self.current..self.current + len].to_string();
        if kind == TokenKind::Number && !Self::is_valid_number(&text) {
            return Err(LexError::InvalidNumber {
                span: self.span_ahead(len),
                text,
            });
        }

        Ok(self.emit(kind, text, len))
    }

    /// Scan a `"..."` literal, resolving `:)`, `:>`, `:"` and `::` escapes
    fn scan_yarn(&mut self) -> Result<Token, LexError> {
        let start_span = self.span_ahead(1);
        let mut contents = String::new();
        let mut chars = self.source[self.current + 1..].char_indices();
        let mut consumed = None;

        while let Some((offset, c)) = chars.next() {
            match c {
                '"' => {
                    consumed = Some(offset + 2);
                    break;
                }
                '\n' => break,
                ':' => match chars.next() {
                    Some((_, ')')) => contents.push('\n'),
                    Some((_, '>')) => contents.push('\t'),
                    Some((_, '"')) => contents.push('"'),
                    Some((_, ':')) => contents.push(':'),
                    Some((escape_offset, other)) if other != '\n' => {
                        // Byte position of the ':' that opened the escape
                        let colon = self.current + escape_offset;
                        let column = self.column
                            + self.source[self.current..colon].chars().count() as u32;
                        return Err(LexError::InvalidEscape {
                            ch: other,
                            span: Span::new(colon, colon + 1 + other.len_utf8(), self.line, column),
                        });
                    }
                    _ => break,
                },
                other => contents.push(other),
            }
        }

        match consumed {
            Some(len) => Ok(self.emit(TokenKind::Yarn, contents, len)),
            None => Err(LexError::UnterminatedString { span: start_span }),
        }
    }

    /// Scan an `OBTW ... TLDR` block comment
    fn scan_block_comment(&mut self) -> Result<Token, LexError> {
        let rest = &self.source[self.current..];
        let mut search_from = "OBTW".len();

        while let Some(found) = rest[search_from..].find("TLDR") {
            let end = search_from + found + "TLDR".len();
            if Self::is_word_end(rest, end) {
                let text = rest[..end].to_string();
                return Ok(self.emit(TokenKind::Comment, text, end));
            }
            search_from = end;
        }

        Err(LexError::UnterminatedComment {
            span: self.span_ahead("OBTW".len()),
        })
    }

    /// Build a token for the next `consumed` bytes and move past them
    fn emit(&mut self, kind: TokenKind, lexeme: String, consumed: usize) -> Token {
        let span = self.span_ahead(consumed);
        self.advance_by(consumed);
        Token::new(kind, lexeme, span)
    }

    /// Span of the next `len` bytes starting at the current position
    fn span_ahead(&self, len: usize) -> Span {
        Span::new(self.current, self.current + len, self.line, self.column)
    }

    /// Move forward `len` bytes, keeping line and column up to date
    fn advance_by(&mut self, len: usize) {
        for c in self.source[self.current..self.current + len].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.current += len;
    }

    fn starts_word(text: &str, word: &str) -> bool {
        text.starts_with(word) && Self::is_word_end(text, word.len())
    }

    fn is_word_end(text: &str, at: usize) -> bool {
        text[at..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_'))
    }

    fn is_valid_number(text: &str) -> bool {
        if text.contains('.') {
            text.parse::<f64>().map_or(false, f64::is_finite)
        } else {
            text.parse::<i64>().is_ok()
        }
    }
}
