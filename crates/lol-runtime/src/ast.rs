//! Abstract Syntax Tree (AST) definitions
//!
//! The tree is built once by the parser and never mutated afterwards. Function
//! and class definitions sit behind `Rc` so runtime callables can point at
//! them without cloning bodies.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// AST schema version
///
/// Included in JSON dumps. Increment when making breaking changes to the AST
/// structure.
pub const AST_VERSION: u32 = 1;

/// Root of a parsed source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Versioned AST wrapper for JSON serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedProgram {
    /// AST schema version
    pub ast_version: u32,
    /// The actual program AST
    #[serde(flatten)]
    pub program: Program,
}

impl VersionedProgram {
    /// Create a new versioned program wrapper
    pub fn new(program: Program) -> Self {
        Self {
            ast_version: AST_VERSION,
            program,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Program> for VersionedProgram {
    fn from(program: Program) -> Self {
        Self::new(program)
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `I HAS A name [ITZ expr]`
    VarDecl(VarDecl),
    /// `target R expr`
    Assign(Assign),
    /// `VISIBLE expr [AN expr]...`
    Visible(VisibleStmt),
    /// `HOW IZ I name [YR p [AN YR p]...] ... IF U SAY SO`
    FuncDef(Rc<FuncDef>),
    /// `FOUND YR [expr]` or `GTFO`
    Return(ReturnStmt),
    /// `O RLY? cond YA RLY ... [NO WAI ...] OIC`
    If(IfStmt),
    /// `O HAI IM name ... KTHX`
    ClassDef(Rc<ClassDef>),
    /// A function call evaluated for its side effects
    Expr(ExprStmt),
}

/// Variable declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: Identifier,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Assignment statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub target: AssignTarget,
    pub value: Expr,
    pub span: Span,
}

/// The only expression shapes that may appear left of `R`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignTarget {
    Name(Identifier),
    Member(MemberExpr),
    Index(IndexExpr),
}

impl AssignTarget {
    pub fn span(&self) -> Span {
        match self {
            AssignTarget::Name(id) => id.span,
            AssignTarget::Member(m) => m.span,
            AssignTarget::Index(i) => i.span,
        }
    }
}

impl TryFrom<Expr> for AssignTarget {
    /// The rejected expression is handed back for error reporting
    type Error = Expr;

    fn try_from(expr: Expr) -> Result<Self, Self::Error> {
        match expr {
            Expr::Identifier(id) => Ok(AssignTarget::Name(id)),
            Expr::Member(member) => Ok(AssignTarget::Member(member)),
            Expr::Index(index) => Ok(AssignTarget::Index(index)),
            other => Err(other),
        }
    }
}

/// Print statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleStmt {
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Function or method definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDef {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Return statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Conditional statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Vec<Stmt>,
    pub else_block: Option<Vec<Stmt>>,
    pub span: Span,
}

/// Class definition
///
/// Properties are initialized in declaration order when an instance is
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: Identifier,
    pub methods: Vec<Rc<FuncDef>>,
    pub properties: Vec<VarDecl>,
    pub span: Span,
}

impl ClassDef {
    /// Find a method by name
    pub fn method(&self, name: &str) -> Option<&Rc<FuncDef>> {
        self.methods.iter().find(|m| m.name.name == name)
    }
}

/// Expression statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

// ============================================================================
// Expressions
// ============================================================================

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal, Span),
    Identifier(Identifier),
    Binary(BinaryExpr),
    Call(CallExpr),
    /// `NEW ClassName`
    New(NewExpr),
    /// `object'Z member`
    Member(MemberExpr),
    /// `ME`
    Me(Span),
    /// `BUKKIT`, a fresh empty array
    Bukkit(Span),
    /// `array AT index`
    Index(IndexExpr),
    /// `MAEK expr A TYPE`
    Maek(MaekExpr),
}

/// Binary operator expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Function call expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Instance creation expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpr {
    pub class: Identifier,
    pub span: Span,
}

/// Member access expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub member: Identifier,
    pub span: Span,
}

/// Array index expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpr {
    pub target: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// Type coercion expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaekExpr {
    pub expr: Box<Expr>,
    pub target_type: TypeName,
    pub span: Span,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Sum,
    Diff,
    Produkt,
    Quoshunt,
    BothSaem,
    Diffrint,
}

impl BinaryOp {
    /// Source spelling of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Sum => "SUM OF",
            BinaryOp::Diff => "DIFF OF",
            BinaryOp::Produkt => "PRODUKT OF",
            BinaryOp::Quoshunt => "QUOSHUNT OF",
            BinaryOp::BothSaem => "BOTH SAEM",
            BinaryOp::Diffrint => "DIFFRINT",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type names accepted by `MAEK`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeName {
    Numbr,
    Numbar,
    Yarn,
    Troof,
    Noob,
}

impl TypeName {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "NUMBR" => Some(TypeName::Numbr),
            "NUMBAR" => Some(TypeName::Numbar),
            "YARN" => Some(TypeName::Yarn),
            "TROOF" => Some(TypeName::Troof),
            "NOOB" => Some(TypeName::Noob),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Numbr => "NUMBR",
            TypeName::Numbar => "NUMBAR",
            TypeName::Yarn => "YARN",
            TypeName::Troof => "TROOF",
            TypeName::Noob => "NOOB",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Numbr(i64),
    Numbar(f64),
    Yarn(String),
    Troof(bool),
}

/// Identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl Expr {
    /// Get the span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(_, span) => *span,
            Expr::Identifier(id) => id.span,
            Expr::Binary(b) => b.span,
            Expr::Call(c) => c.span,
            Expr::New(n) => n.span,
            Expr::Member(m) => m.span,
            Expr::Me(span) => *span,
            Expr::Bukkit(span) => *span,
            Expr::Index(i) => i.span,
            Expr::Maek(m) => m.span,
        }
    }

    /// Short description used in parse errors
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Literal(..) => "literal",
            Expr::Identifier(_) => "identifier",
            Expr::Binary(_) => "binary expression",
            Expr::Call(_) => "function call",
            Expr::New(_) => "NEW expression",
            Expr::Member(_) => "member access",
            Expr::Me(_) => "ME",
            Expr::Bukkit(_) => "BUKKIT",
            Expr::Index(_) => "array access",
            Expr::Maek(_) => "MAEK expression",
        }
    }
}

impl Stmt {
    /// Get the span of this statement
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(v) => v.span,
            Stmt::Assign(a) => a.span,
            Stmt::Visible(v) => v.span,
            Stmt::FuncDef(f) => f.span,
            Stmt::Return(r) => r.span,
            Stmt::If(i) => i.span,
            Stmt::ClassDef(c) => c.span,
            Stmt::Expr(e) => e.span,
        }
    }
}
