//! Expression parsing

use crate::ast::*;
use crate::parser::{ParseError, Parser};
use crate::token::TokenKind;

impl Parser {
    /// Parse an expression
    ///
    /// Expression := BinaryOp | PostfixExpression
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        if self.peek().kind.is_binary_operator() {
            self.parse_binary()
        } else {
            self.parse_postfix()
        }
    }

    /// BinaryOp := operator PostfixExpression 'AN' PostfixExpression
    fn parse_binary(&mut self) -> Result<Expr, ParseError> {
        let (kind, start) = {
            let op_token = self.advance();
            (op_token.kind, op_token.span)
        };
        let op = match kind {
            TokenKind::SumOf => BinaryOp::Sum,
            TokenKind::DiffOf => BinaryOp::Diff,
            TokenKind::ProduktOf => BinaryOp::Produkt,
            TokenKind::QuoshuntOf => BinaryOp::Quoshunt,
            TokenKind::BothSaem => BinaryOp::BothSaem,
            TokenKind::Diffrint => BinaryOp::Diffrint,
            _ => {
                self.current -= 1;
                return Err(self.unexpected("a binary operator"));
            }
        };

        let left = self.parse_postfix()?;
        self.consume(TokenKind::An, "'AN'")?;
        let right = self.parse_postfix()?;
        let span = start.merge(right.span());

        Ok(Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }))
    }

    /// Parse a primary expression followed by call, member and index suffixes
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            expr = match self.peek().kind {
                TokenKind::Yr => self.finish_call(expr)?,
                TokenKind::ApostropheZ => {
                    self.advance();
                    let member = self.consume_identifier("a member name after ''Z'")?;
                    let span = expr.span().merge(member.span);
                    Expr::Member(MemberExpr {
                        object: Box::new(expr),
                        member,
                        span,
                    })
                }
                TokenKind::At => {
                    self.advance();
                    let index = if self.peek().kind.is_binary_operator() {
                        self.parse_binary()?
                    } else {
                        self.parse_primary()?
                    };
                    let span = expr.span().merge(index.span());
                    Expr::Index(IndexExpr {
                        target: Box::new(expr),
                        index: Box::new(index),
                        span,
                    })
                }
                _ => break,
            };
        }

        Ok(expr)
    }

    /// Parse a call suffix: 'YR' [Expression ('AN YR' Expression)*] ['MKAY']
    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        self.consume(TokenKind::Yr, "'YR'")?;

        let mut args = Vec::new();
        let next = self.peek().kind;
        let empty = next.is_line_terminator() || next.is_block_terminator() || next == TokenKind::Mkay;
        if !empty {
            args.push(self.parse_expression()?);
            while self.match_token(TokenKind::AnYr) {
                args.push(self.parse_expression()?);
            }
        }
        self.match_token(TokenKind::Mkay);

        let span = callee.span().merge(self.previous_span());
        Ok(Expr::Call(CallExpr {
            callee: Box::new(callee),
            args,
            span,
        }))
    }

    /// Parse a primary expression
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::Number => {
                self.advance();
                let literal = if token.lexeme.contains('.') {
                    token.lexeme.parse::<f64>().map(Literal::Numbar).ok()
                } else {
                    token.lexeme.parse::<i64>().map(Literal::Numbr).ok()
                };
                literal
                    .map(|lit| Expr::Literal(lit, token.span))
                    .ok_or(ParseError::InvalidNumber {
                        lexeme: token.lexeme,
                        span: token.span,
                    })
            }
            TokenKind::Yarn => {
                self.advance();
                Ok(Expr::Literal(Literal::Yarn(token.lexeme), token.span))
            }
            TokenKind::Troof => {
                self.advance();
                Ok(Expr::Literal(
                    Literal::Troof(token.lexeme == "WIN"),
                    token.span,
                ))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::Identifier(Identifier::new(token.lexeme, token.span)))
            }
            TokenKind::Me => {
                self.advance();
                Ok(Expr::Me(token.span))
            }
            TokenKind::Bukkit => {
                self.advance();
                Ok(Expr::Bukkit(token.span))
            }
            TokenKind::New => {
                self.advance();
                let class = self.consume_identifier("a class name after 'NEW'")?;
                let span = token.span.merge(class.span);
                Ok(Expr::New(NewExpr { class, span }))
            }
            TokenKind::Maek => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenKind::A, "'A'")?;
                let (type_span, lexeme) = {
                    let type_token = self.consume(TokenKind::TypeName, "a type name")?;
                    (type_token.span, type_token.lexeme.clone())
                };
                let target_type =
                    TypeName::from_keyword(&lexeme).ok_or_else(|| ParseError::UnexpectedToken {
                        expected: "a type name".to_string(),
                        found: TokenKind::TypeName,
                        lexeme: lexeme.clone(),
                        span: type_span,
                    })?;
                Ok(Expr::Maek(MaekExpr {
                    expr: Box::new(expr),
                    target_type,
                    span: token.span.merge(type_span),
                }))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }
}
