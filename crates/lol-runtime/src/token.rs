//! Token types for lexical analysis
//!
//! Defines all token kinds recognized by the lexer. Multi-word keywords such
//! as `I HAS A` are single tokens.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Program delimiters
    /// `HAI` (with optional version)
    Hai,
    /// `KTHXBYE`
    Kthxbye,

    // Declarations and assignment
    /// `I HAS A`
    IHasA,
    /// `ITZ`
    Itz,
    /// `R`
    R,

    // Output
    /// `VISIBLE`
    Visible,

    // Functions
    /// `HOW IZ I`
    HowIzI,
    /// `IF U SAY SO`
    IfUSaySo,
    /// `FOUND YR`
    FoundYr,
    /// `GTFO`
    Gtfo,
    /// `YR`
    Yr,
    /// `AN YR`
    AnYr,
    /// `MKAY`
    Mkay,

    // Operators
    /// `AN`
    An,
    /// `SUM OF`
    SumOf,
    /// `DIFF OF`
    DiffOf,
    /// `PRODUKT OF`
    ProduktOf,
    /// `QUOSHUNT OF`
    QuoshuntOf,
    /// `BOTH SAEM`
    BothSaem,
    /// `DIFFRINT`
    Diffrint,

    // Conditionals
    /// `O RLY?`
    ORly,
    /// `YA RLY`
    YaRly,
    /// `NO WAI`
    NoWai,
    /// `OIC`
    Oic,

    // Classes and objects
    /// `O HAI IM`
    OHaiIm,
    /// `KTHX`
    Kthx,
    /// `NEW`
    New,
    /// `ME`
    Me,
    /// `'Z`
    ApostropheZ,

    // Arrays and coercion
    /// `BUKKIT`
    Bukkit,
    /// `AT`
    At,
    /// `MAEK`
    Maek,
    /// `A`
    A,
    /// `NUMBR`, `NUMBAR`, `YARN`, `TROOF` or `NOOB`
    TypeName,

    // Literals
    /// Integer or float literal
    Number,
    /// String literal (lexeme holds the unescaped contents)
    Yarn,
    /// `WIN` or `FAIL`
    Troof,
    /// Identifier
    Identifier,

    // Layout
    /// Line break
    Newline,
    /// `BTW` line comment or `OBTW ... TLDR` block comment
    Comment,
    /// End of input
    Eof,
}

impl TokenKind {
    /// Whether this token starts a binary operator expression
    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            TokenKind::SumOf
                | TokenKind::DiffOf
                | TokenKind::ProduktOf
                | TokenKind::QuoshuntOf
                | TokenKind::BothSaem
                | TokenKind::Diffrint
        )
    }

    /// Whether this token closes a statement list
    pub fn is_block_terminator(self) -> bool {
        matches!(
            self,
            TokenKind::Kthxbye
                | TokenKind::IfUSaySo
                | TokenKind::NoWai
                | TokenKind::Oic
                | TokenKind::Kthx
        )
    }

    /// Whether this token ends the current line
    pub fn is_line_terminator(self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Comment | TokenKind::Eof
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Hai => "'HAI'",
            TokenKind::Kthxbye => "'KTHXBYE'",
            TokenKind::IHasA => "'I HAS A'",
            TokenKind::Itz => "'ITZ'",
            TokenKind::R => "'R'",
            TokenKind::Visible => "'VISIBLE'",
            TokenKind::HowIzI => "'HOW IZ I'",
            TokenKind::IfUSaySo => "'IF U SAY SO'",
            TokenKind::FoundYr => "'FOUND YR'",
            TokenKind::Gtfo => "'GTFO'",
            TokenKind::Yr => "'YR'",
            TokenKind::AnYr => "'AN YR'",
            TokenKind::Mkay => "'MKAY'",
            TokenKind::An => "'AN'",
            TokenKind::SumOf => "'SUM OF'",
            TokenKind::DiffOf => "'DIFF OF'",
            TokenKind::ProduktOf => "'PRODUKT OF'",
            TokenKind::QuoshuntOf => "'QUOSHUNT OF'",
            TokenKind::BothSaem => "'BOTH SAEM'",
            TokenKind::Diffrint => "'DIFFRINT'",
            TokenKind::ORly => "'O RLY?'",
            TokenKind::YaRly => "'YA RLY'",
            TokenKind::NoWai => "'NO WAI'",
            TokenKind::Oic => "'OIC'",
            TokenKind::OHaiIm => "'O HAI IM'",
            TokenKind::Kthx => "'KTHX'",
            TokenKind::New => "'NEW'",
            TokenKind::Me => "'ME'",
            TokenKind::ApostropheZ => "''Z'",
            TokenKind::Bukkit => "'BUKKIT'",
            TokenKind::At => "'AT'",
            TokenKind::Maek => "'MAEK'",
            TokenKind::A => "'A'",
            TokenKind::TypeName => "type name",
            TokenKind::Number => "number",
            TokenKind::Yarn => "string",
            TokenKind::Troof => "boolean",
            TokenKind::Identifier => "identifier",
            TokenKind::Newline => "newline",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_operator_kinds() {
        assert!(TokenKind::SumOf.is_binary_operator());
        assert!(TokenKind::Diffrint.is_binary_operator());
        assert!(!TokenKind::An.is_binary_operator());
    }

    #[test]
    fn test_terminators() {
        assert!(TokenKind::Oic.is_block_terminator());
        assert!(!TokenKind::Newline.is_block_terminator());
        assert!(TokenKind::Comment.is_line_terminator());
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::IHasA.to_string(), "'I HAS A'");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
