//! Expression parsing.
//!
//! Precedence (lowest to highest):
//! 1. `!` (or)
//! 2. `&` (and)
//! 3. `==` `!=` `'=` and, in comparison mode, `=`
//! 4. `<` `>` `<=` `>=`
//! 5. `+` `-` `_`
//! 6. `*` `/`
//! 7. unary `-` `+` `'`
//! 8. postfix: `.name`, `.%name`, `%name`, `(args)`

use crate::parser::Parser;
use rover_lexer::{Op, TokenKind};
use rover_types::ast::*;
use rover_types::ErrorCode;

/// What a bare `=` means while parsing an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EqMode {
    /// `=` ends the expression (`Set` sides, `For` bounds).
    Assign,
    /// `=` is equality (conditions, arguments, parenthesised groups).
    Compare,
}

const LOWEST: u8 = 1;
const HIGHEST: u8 = 6;

impl<'src> Parser<'src> {
    pub(crate) fn parse_expr(&mut self, mode: EqMode) -> Expr {
        self.nested(|p| p.parse_binary(LOWEST, mode))
    }

    fn parse_binary(&mut self, level: u8, mode: EqMode) -> Expr {
        if level > HIGHEST {
            return self.parse_unary();
        }
        let start = self.position();
        let mut left = self.parse_binary(level + 1, mode);
        while let Some(op) = self.peek_binop(mode).filter(|op| op.precedence() == level) {
            self.advance();
            let right = self.parse_binary(level + 1, mode);
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
            left = self.capped(start, left);
        }
        left
    }

    fn peek_binop(&self, mode: EqMode) -> Option<BinOp> {
        let TokenKind::Operator(op) = self.peek_kind() else {
            return None;
        };
        Some(match op {
            Op::Or => BinOp::Or,
            Op::And => BinOp::And,
            Op::EqEq => BinOp::Eq,
            Op::Assign if mode == EqMode::Compare => BinOp::Eq,
            Op::NotEq => BinOp::NotEq,
            Op::Less => BinOp::Less,
            Op::Greater => BinOp::Greater,
            Op::LessEq => BinOp::LessEq,
            Op::GreaterEq => BinOp::GreaterEq,
            Op::Plus => BinOp::Add,
            Op::Minus => BinOp::Sub,
            Op::Star => BinOp::Mul,
            Op::Slash => BinOp::Div,
            Op::Assign | Op::Not => return None,
        })
    }

    fn parse_unary(&mut self) -> Expr {
        let op = match self.peek_kind() {
            TokenKind::Operator(Op::Minus) => UnaryOp::Neg,
            TokenKind::Operator(Op::Plus) => UnaryOp::Plus,
            TokenKind::Operator(Op::Not) => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.position();
        let op_span = self.advance().span;
        let operand = self.nested(Self::parse_unary);
        let span = op_span.merge(operand.span);
        let expr = Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        );
        self.capped(start, expr)
    }

    /// A primary followed by member accesses and calls.
    pub(crate) fn parse_postfix(&mut self) -> Expr {
        let start = self.position();
        let mut expr = self.parse_primary();
        loop {
            expr = self.capped(start, expr);
            match self.peek_kind().clone() {
                TokenKind::Dot => {
                    self.advance();
                    let next = self.peek_kind().clone();
                    let (name, private) = match &next {
                        TokenKind::Private(name) => (name.clone(), true),
                        kind => match kind.as_name() {
                            Some(name) => (name.to_string(), false),
                            None => {
                                self.warn_at_current(
                                    ErrorCode::UNEXPECTED_TOKEN,
                                    format!("expected a member name after '.', found '{next}'"),
                                );
                                let span = expr.span.merge(self.previous_span());
                                expr = member(expr, String::new(), false, span);
                                break;
                            }
                        },
                    };
                    self.advance();
                    let span = expr.span.merge(self.previous_span());
                    expr = member(expr, name, private, span);
                }
                TokenKind::Private(name) => {
                    self.advance();
                    let span = expr.span.merge(self.previous_span());
                    expr = member(expr, name, true, span);
                }
                TokenKind::LParen => {
                    let args = self.parse_args();
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }
        expr
    }

    /// `( expr, expr, ... )`, arguments separated by commas.
    fn parse_args(&mut self) -> Vec<Expr> {
        self.advance(); // eat `(`
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return args;
        }
        if !self.at_line_end() {
            loop {
                args.push(self.parse_expr(EqMode::Compare));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, ErrorCode::UNEXPECTED_TOKEN);
        args
    }

    fn parse_primary(&mut self) -> Expr {
        let token = self.peek().clone();
        let kind = match token.kind {
            TokenKind::Number(text) => {
                self.advance();
                ExprKind::Number(text)
            }
            TokenKind::String(value) => {
                self.advance();
                ExprKind::Str(value)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                if name.starts_with('$') {
                    let args = if self.check_exact(&TokenKind::LParen) {
                        self.parse_args()
                    } else {
                        Vec::new()
                    };
                    ExprKind::LibCall {
                        name: name[1..].to_string(),
                        args,
                    }
                } else {
                    ExprKind::Identifier(name)
                }
            }
            // A command word in operand position is an ordinary name.
            TokenKind::Command { spelling, .. } => {
                self.advance();
                ExprKind::Identifier(spelling)
            }
            TokenKind::Private(name) => {
                self.advance();
                ExprKind::Identifier(format!("_{name}"))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr(EqMode::Compare);
                self.expect(&TokenKind::RParen, ErrorCode::UNEXPECTED_TOKEN);
                ExprKind::Paren(Box::new(inner))
            }
            TokenKind::LBrace => return self.parse_object(),
            TokenKind::Newline
            | TokenKind::Eof
            | TokenKind::RBrace
            | TokenKind::RParen
            | TokenKind::Comma
            | TokenKind::Colon => {
                self.warn_at_current(
                    ErrorCode::MISSING_OPERAND,
                    format!("expected an expression, found '{}'", self.peek_kind()),
                );
                return Expr::new(ExprKind::Malformed(String::new()), token.span);
            }
            other => {
                self.advance();
                self.warn_at(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("unexpected '{other}' in expression"),
                    token.span,
                );
                ExprKind::Malformed(other.to_string())
            }
        };
        Expr::new(kind, token.span.merge(self.previous_span()))
    }

    /// `{ key: value, ... }`
    fn parse_object(&mut self) -> Expr {
        let open_index = self.position();
        let open = self.advance().span;
        let mut entries = Vec::new();
        loop {
            self.skip_newlines();
            if self.check_exact(&TokenKind::RBrace) {
                break;
            }
            let (key, quoted) = match self.peek_kind().clone() {
                TokenKind::String(s) => (s, true),
                TokenKind::Number(n) => (n, false),
                kind => match kind.as_name() {
                    Some(name) => (name.to_string(), false),
                    None => return self.malformed_object(open_index),
                },
            };
            self.advance();
            if !self.eat(&TokenKind::Colon) {
                return self.malformed_object(open_index);
            }
            let value = self.parse_expr(EqMode::Compare);
            entries.push(ObjectEntry { key, quoted, value });
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        if !self.check_exact(&TokenKind::RBrace) {
            return self.malformed_object(open_index);
        }
        let close = self.advance().span;
        Expr::new(ExprKind::Object(entries), open.merge(close))
    }

    /// Give up on an object literal: keep everything through the matching
    /// `}` as raw text.
    fn malformed_object(&mut self, open_index: usize) -> Expr {
        self.warn_at_current(
            ErrorCode::UNEXPECTED_TOKEN,
            format!("malformed object literal near '{}'", self.peek_kind()),
        );
        self.rewind(open_index);
        let open = self.advance().span;
        let close = self.skip_to_close_brace();
        let text = self.text_between(open_index, self.position());
        let span = close.map_or(open, |c| open.merge(c));
        Expr::new(ExprKind::Malformed(text), span)
    }
}

fn member(object: Expr, name: String, private: bool, span: rover_types::Span) -> Expr {
    Expr::new(
        ExprKind::Member {
            object: Box::new(object),
            name,
            private,
        },
        span,
    )
}
