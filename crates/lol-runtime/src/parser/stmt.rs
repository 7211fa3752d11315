//! Statement parsing

use crate::ast::*;
use crate::parser::{ParseError, Parser};
use crate::token::TokenKind;
use std::rc::Rc;

impl Parser {
    /// Parse a statement
    pub(super) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek().kind {
            TokenKind::IHasA => Ok(Stmt::VarDecl(self.parse_var_decl()?)),
            TokenKind::Visible => self.parse_visible(),
            TokenKind::HowIzI => Ok(Stmt::FuncDef(Rc::new(self.parse_func_def()?))),
            TokenKind::FoundYr | TokenKind::Gtfo => self.parse_return(),
            TokenKind::ORly => self.parse_if(),
            TokenKind::OHaiIm => Ok(Stmt::ClassDef(Rc::new(self.parse_class_def()?))),
            _ => self.parse_assign_or_expr_stmt(),
        }
    }

    /// Parse a variable declaration
    ///
    /// VarDecl := 'I HAS A' Identifier ['ITZ' Expression]
    pub(super) fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let keyword_span = self.consume(TokenKind::IHasA, "'I HAS A'")?.span;
        let name = self.consume_identifier("a variable name")?;

        let init = if self.match_token(TokenKind::Itz) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(VarDecl {
            name,
            init,
            span: keyword_span.merge(self.previous_span()),
        })
    }

    /// Parse a print statement
    ///
    /// The argument list runs to the end of the line; `AN` between arguments
    /// is optional.
    fn parse_visible(&mut self) -> Result<Stmt, ParseError> {
        let keyword_span = self.consume(TokenKind::Visible, "'VISIBLE'")?.span;
        let mut args = vec![self.parse_expression()?];

        while !self.peek().kind.is_line_terminator() {
            self.match_token(TokenKind::An);
            args.push(self.parse_expression()?);
        }

        Ok(Stmt::Visible(VisibleStmt {
            args,
            span: keyword_span.merge(self.previous_span()),
        }))
    }

    /// Parse a function definition
    ///
    /// FuncDef := 'HOW IZ I' Identifier ['YR' Identifier ('AN YR' Identifier)*]
    ///            StatementList 'IF U SAY SO'
    pub(super) fn parse_func_def(&mut self) -> Result<FuncDef, ParseError> {
        let keyword_span = self.consume(TokenKind::HowIzI, "'HOW IZ I'")?.span;
        let name = self.consume_identifier("a function name")?;

        let mut params = Vec::new();
        if self.match_token(TokenKind::Yr) {
            params.push(self.consume_identifier("a parameter name")?);
            while self.match_token(TokenKind::AnYr) {
                params.push(self.consume_identifier("a parameter name")?);
            }
        }
        self.end_of_statement()?;

        let body = self.parse_block_body()?;
        let end_span = self.consume(TokenKind::IfUSaySo, "'IF U SAY SO'")?.span;

        Ok(FuncDef {
            name,
            params,
            body,
            span: keyword_span.merge(end_span),
        })
    }

    /// Parse `FOUND YR [expr]` or `GTFO`
    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        if self.check(TokenKind::Gtfo) {
            let span = self.advance().span;
            return Ok(Stmt::Return(ReturnStmt { value: None, span }));
        }

        let keyword_span = self.consume(TokenKind::FoundYr, "'FOUND YR'")?.span;
        let next = self.peek().kind;
        let value = if next.is_line_terminator() || next.is_block_terminator() {
            None
        } else {
            Some(self.parse_expression()?)
        };

        Ok(Stmt::Return(ReturnStmt {
            value,
            span: keyword_span.merge(self.previous_span()),
        }))
    }

    /// Parse a conditional
    ///
    /// If := 'O RLY?' Expression 'YA RLY' StatementList ['NO WAI' StatementList] 'OIC'
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let keyword_span = self.consume(TokenKind::ORly, "'O RLY?'")?.span;
        let cond = self.parse_expression()?;

        self.skip_separators();
        self.consume(TokenKind::YaRly, "'YA RLY'")?;
        let then_block = self.parse_block_body()?;

        let else_block = if self.match_token(TokenKind::NoWai) {
            Some(self.parse_block_body()?)
        } else {
            None
        };

        let end_span = self.consume(TokenKind::Oic, "'OIC'")?.span;

        Ok(Stmt::If(IfStmt {
            cond,
            then_block,
            else_block,
            span: keyword_span.merge(end_span),
        }))
    }

    /// Parse a class definition
    ///
    /// ClassDef := 'O HAI IM' Identifier (VarDecl | FuncDef)* 'KTHX'
    fn parse_class_def(&mut self) -> Result<ClassDef, ParseError> {
        let keyword_span = self.consume(TokenKind::OHaiIm, "'O HAI IM'")?.span;
        let name = self.consume_identifier("a class name")?;
        self.end_of_statement()?;

        let mut methods = Vec::new();
        let mut properties = Vec::new();

        loop {
            self.skip_separators();
            match self.peek().kind {
                TokenKind::Kthx | TokenKind::Eof => break,
                TokenKind::IHasA => properties.push(self.parse_var_decl()?),
                TokenKind::HowIzI => methods.push(Rc::new(self.parse_func_def()?)),
                _ => return Err(self.unexpected("'I HAS A' or 'HOW IZ I' in class body")),
            }
            self.end_of_statement()?;
        }

        let end_span = self.consume(TokenKind::Kthx, "'KTHX'")?.span;

        Ok(ClassDef {
            name,
            methods,
            properties,
            span: keyword_span.merge(end_span),
        })
    }

    /// Parse an assignment or expression statement
    ///
    /// The left side is parsed as an ordinary expression and then checked
    /// against the assignable shapes once `R` is seen.
    fn parse_assign_or_expr_stmt(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expression()?;

        if self.match_token(TokenKind::R) {
            let target = AssignTarget::try_from(expr).map_err(|rejected| {
                ParseError::InvalidAssignmentTarget {
                    found: rejected.describe(),
                    span: rejected.span(),
                }
            })?;
            let value = self.parse_expression()?;
            let span = target.span().merge(value.span());
            return Ok(Stmt::Assign(Assign {
                target,
                value,
                span,
            }));
        }

        match expr {
            Expr::Call(_) => {
                let span = expr.span();
                Ok(Stmt::Expr(ExprStmt { expr, span }))
            }
            other => Err(ParseError::BareExpression {
                found: other.describe(),
                span: other.span(),
            }),
        }
    }
}
