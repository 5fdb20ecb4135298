//! Statement parsing.

use crate::parse_expr::EqMode;
use crate::parser::{Parser, MAX_BLOCK_DEPTH};
use rover_lexer::{Command, Op, TokenKind};
use rover_types::ast::*;
use rover_types::{ErrorCode, Span};

impl<'src> Parser<'src> {
    pub(crate) fn parse_program(&mut self) -> Program {
        let start = self.current_span();
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if self.at_end() {
                break;
            }
            if self.check_exact(&TokenKind::RBrace) {
                let span = self.advance().span;
                self.warn_at(
                    ErrorCode::UNEXPECTED_CLOSE_BRACE,
                    "'}' has no matching '{'",
                    span,
                );
                stmts.push(Stmt::Malformed(MalformedStmt {
                    text: "}".into(),
                    span,
                }));
                continue;
            }
            stmts.push(self.parse_statement());
        }
        Program {
            stmts,
            span: start.merge(self.previous_span()),
        }
    }

    /// Parse a block of statements: `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> Block {
        let Some(open) = self.expect(&TokenKind::LBrace, ErrorCode::EXPECTED_BLOCK) else {
            let span = self.previous_span();
            return Block {
                stmts: Vec::new(),
                close: span,
                span,
            };
        };
        if self.block_depth >= MAX_BLOCK_DEPTH {
            return self.too_deep_block(open.span);
        }
        self.block_depth += 1;
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if self.at_end() || self.check_exact(&TokenKind::RBrace) {
                break;
            }
            stmts.push(self.parse_statement());
        }
        self.block_depth -= 1;
        let close = match self.expect(&TokenKind::RBrace, ErrorCode::EXPECTED_BLOCK) {
            Some(tok) => tok.span,
            None => self.previous_span(),
        };
        Block {
            stmts,
            close,
            span: open.span.merge(close),
        }
    }

    /// Keep the body of a block nested past [`MAX_BLOCK_DEPTH`] as one
    /// malformed statement.
    fn too_deep_block(&mut self, open: Span) -> Block {
        self.warn_at(
            ErrorCode::NESTING_TOO_DEEP,
            format!("blocks nested deeper than {MAX_BLOCK_DEPTH} levels"),
            open,
        );
        let body_start = self.position();
        let close = self.skip_to_close_brace();
        let body_end = if close.is_some() {
            self.position() - 1
        } else {
            self.position()
        };
        let close = close.unwrap_or_else(|| self.previous_span());
        let text = self.text_between(body_start, body_end);
        Block {
            stmts: vec![Stmt::Malformed(MalformedStmt {
                text: text.trim().to_string(),
                span: open.merge(close),
            })],
            close,
            span: open.merge(close),
        }
    }

    /// Parse a single statement, starting at a command word.
    pub(crate) fn parse_statement(&mut self) -> Stmt {
        let start = self.position();
        let Some(command) = self.peek_command() else {
            self.warn_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected a command, found '{}'", self.peek_kind()),
            );
            return self.malformed_from(start);
        };
        match command {
            Command::Set => self.parse_set(start),
            Command::Do => self.parse_do(),
            Command::Write => self.parse_write(),
            Command::If => self.parse_if(),
            Command::While => self.parse_while(),
            Command::For => self.parse_for(start),
            Command::Quit | Command::Return => Stmt::Quit(self.advance().span),
            Command::ElseIf | Command::Else => {
                self.warn_at_current(
                    ErrorCode::ORPHAN_ELSE,
                    format!("{} without a preceding If", command.name()),
                );
                self.malformed_from(start)
            }
        }
    }

    /// Re-read the statement starting at `start` as raw text.
    fn malformed_from(&mut self, start: usize) -> Stmt {
        self.rewind(start);
        let (text, span) = self.skip_malformed();
        Stmt::Malformed(MalformedStmt { text, span })
    }

    /// `Set lhs = expr [, lhs = expr]*`
    fn parse_set(&mut self, start: usize) -> Stmt {
        let keyword = self.advance().span;
        let mut assignments = Vec::new();
        loop {
            let target = self.parse_postfix();
            if !self.eat(&TokenKind::Operator(Op::Assign)) {
                self.warn_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected '=' in Set, found '{}'", self.peek_kind()),
                );
                return self.malformed_from(start);
            }
            let value = self.parse_expr(EqMode::Assign);
            if let Some(root) = target.chain_root() {
                self.scope.insert(root);
            }
            assignments.push(Assignment { target, value });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Stmt::Set(SetStmt {
            assignments,
            span: keyword.merge(self.previous_span()),
        })
    }

    /// `Do expr`
    fn parse_do(&mut self) -> Stmt {
        let keyword = self.advance().span;
        let expr = self.parse_expr(EqMode::Compare);
        let needs_context = expr
            .chain_root()
            .is_some_and(|root| !self.scope.resolves(root));
        let expr = if needs_context {
            qualify_root(expr)
        } else {
            expr
        };
        let awaited = expr.has_call_or_private();
        Stmt::Do(DoStmt {
            expr,
            awaited,
            span: keyword.merge(self.previous_span()),
        })
    }

    /// `Write expr [, expr]*`
    fn parse_write(&mut self) -> Stmt {
        let keyword = self.advance().span;
        let mut args = Vec::new();
        if !self.at_line_end() {
            loop {
                args.push(self.parse_expr(EqMode::Compare));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        Stmt::Write(WriteStmt {
            args,
            span: keyword.merge(self.previous_span()),
        })
    }

    /// `If c { } [ElseIf c { }]* [Else { }]`
    ///
    /// `ElseIf` and `Else` may follow on later lines.
    fn parse_if(&mut self) -> Stmt {
        let keyword = self.advance().span;
        let condition = self.parse_condition();
        let body = self.parse_block();
        let mut branches = vec![CondBranch {
            condition,
            body,
            keyword,
        }];
        let mut else_branch = None;

        loop {
            let save = self.position();
            self.skip_newlines();
            match self.peek_command() {
                Some(Command::ElseIf) => {
                    let keyword = self.advance().span;
                    let condition = self.parse_condition();
                    let body = self.parse_block();
                    branches.push(CondBranch {
                        condition,
                        body,
                        keyword,
                    });
                }
                Some(Command::Else) => {
                    let keyword = self.advance().span;
                    let body = self.parse_block();
                    else_branch = Some(ElseBranch { body, keyword });
                    break;
                }
                _ => {
                    self.rewind(save);
                    break;
                }
            }
        }

        Stmt::If(IfStmt {
            branches,
            else_branch,
            span: keyword.merge(self.previous_span()),
        })
    }

    /// `While c { }`
    fn parse_while(&mut self) -> Stmt {
        let keyword = self.advance().span;
        let condition = self.parse_condition();
        let body = self.parse_block();
        Stmt::While(WhileStmt {
            condition,
            body,
            span: keyword.merge(self.previous_span()),
        })
    }

    /// `For id = start:end { }` or `For id = start:step:end { }`
    fn parse_for(&mut self, start: usize) -> Stmt {
        let keyword = self.advance().span;

        let var = match self.peek_kind().as_name() {
            Some(name) if !name.starts_with('$') => Ident::new(name, self.current_span()),
            _ => {
                self.warn_at_current(ErrorCode::MALFORMED_FOR, "expected a loop variable");
                return self.malformed_from(start);
            }
        };
        self.advance();
        if !self.eat(&TokenKind::Operator(Op::Assign)) {
            self.warn_at_current(
                ErrorCode::MALFORMED_FOR,
                format!("expected '=' after '{}'", var.name),
            );
            return self.malformed_from(start);
        }

        let mut bounds = vec![self.parse_expr(EqMode::Assign)];
        while self.eat(&TokenKind::Colon) {
            bounds.push(self.parse_expr(EqMode::Assign));
        }
        if bounds.len() > 3 {
            self.warn_at(
                ErrorCode::MALFORMED_FOR,
                format!("expected start:end or start:step:end, found {} values", bounds.len()),
                keyword,
            );
            return self.malformed_from(start);
        }
        let mut bounds = bounds.into_iter();
        let (Some(first), Some(second)) = (bounds.next(), bounds.next()) else {
            self.warn_at(
                ErrorCode::MALFORMED_FOR,
                "expected start:end or start:step:end",
                keyword,
            );
            return self.malformed_from(start);
        };
        let (step, end) = match bounds.next() {
            Some(third) => (Some(second), third),
            None => (None, second),
        };

        self.scope.insert(&var.name);
        let body = self.parse_block();
        Stmt::For(ForStmt {
            var,
            start: first,
            step,
            end,
            body,
            span: keyword.merge(self.previous_span()),
        })
    }

    /// Condition of `If`, `ElseIf` or `While`.
    fn parse_condition(&mut self) -> Expr {
        if self.check_exact(&TokenKind::LBrace) || self.at_line_end() {
            self.warn_at_current(ErrorCode::MISSING_OPERAND, "missing condition");
            return Expr::new(ExprKind::Malformed(String::new()), self.current_span());
        }
        self.parse_expr(EqMode::Compare)
    }
}

/// Prefix the root of a call chain with `context.`.
fn qualify_root(expr: Expr) -> Expr {
    let Expr { kind, span, .. } = expr;
    let kind = match kind {
        ExprKind::Identifier(name) => {
            let context = Expr::new(ExprKind::Identifier("context".into()), span);
            ExprKind::Member {
                object: Box::new(context),
                name,
                private: false,
            }
        }
        ExprKind::Member {
            object,
            name,
            private,
        } => ExprKind::Member {
            object: Box::new(qualify_root(*object)),
            name,
            private,
        },
        ExprKind::Call { callee, args } => ExprKind::Call {
            callee: Box::new(qualify_root(*callee)),
            args,
        },
        other => other,
    };
    Expr::new(kind, span)
}
