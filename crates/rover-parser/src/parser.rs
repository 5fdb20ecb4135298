//! Core parser infrastructure: token cursor, diagnostics, recovery helpers.

use rover_lexer::{Command, Token, TokenKind};
use rover_types::ast::{Expr, ExprKind, Program};
use rover_types::{CompileErrors, ErrorCode, RoverError, SourceFile, Span};

use crate::scope::ScopeSet;

/// Deepest expression tree the parser builds. Anything deeper is kept as
/// malformed text.
pub const MAX_EXPR_DEPTH: u32 = 64;

/// Deepest block nesting the parser descends into.
pub const MAX_BLOCK_DEPTH: u32 = 32;

/// The RoverScript parser.
///
/// Consumes a token stream produced by the lexer and builds an AST. It does
/// not reject input: anything it cannot parse is kept as a `Malformed` node
/// and reported as a warning.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source_file: &'src SourceFile,
    errors: CompileErrors,
    pub(crate) scope: ScopeSet,
    pub(crate) expr_depth: u32,
    pub(crate) block_depth: u32,
}

/// Result of parsing.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Program,
    /// Parser diagnostics; all of them are warnings.
    pub errors: CompileErrors,
    /// Locals inferred while parsing.
    pub scope: ScopeSet,
}

/// Parse a token stream with no source text attached.
pub fn parse(tokens: Vec<Token>) -> ParseResult {
    let file = SourceFile::new("<script>", "");
    Parser::new(tokens, &file).parse()
}

impl<'src> Parser<'src> {
    pub fn new(mut tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let span = tokens.last().map_or(Span::point(1, 1), |t| t.span);
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: CompileErrors::empty(),
            scope: ScopeSet::new(),
            expr_depth: 0,
            block_depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// The command at the cursor, if any.
    pub(crate) fn peek_command(&self) -> Option<Command> {
        match self.peek_kind() {
            TokenKind::Command { command, .. } => Some(*command),
            _ => None,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn rewind(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.check_exact(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// Whether nothing more of the current statement can follow: a
    /// separator, the end of a block, or end of input.
    pub(crate) fn at_line_end(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Newline | TokenKind::Eof | TokenKind::RBrace
        )
    }

    /// Expect a token. Warns and leaves the cursor in place if it is missing.
    pub(crate) fn expect(&mut self, expected: &TokenKind, code: ErrorCode) -> Option<Token> {
        if self.check_exact(expected) {
            Some(self.advance())
        } else {
            self.warn_at_current(
                code,
                format!("expected '{}', found '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    // ── Diagnostics ───────────────────────────────────────────────────────────

    pub(crate) fn warn_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.warn_at(code, message, span);
    }

    pub(crate) fn warn_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let file = self.source_file;
        let source_line = file.line(span.start_line).unwrap_or("");
        self.errors.push(RoverError::warning(
            file.name.as_str(),
            code,
            message,
            span,
            source_line,
        ));
    }

    // ── Recovery ──────────────────────────────────────────────────────────────

    /// Consume tokens up to the end of the statement and return their text.
    ///
    /// Braces opened inside the skipped region are consumed through their
    /// matching `}` so that the surrounding block structure is preserved.
    /// At least one token is consumed unless the cursor is already at a
    /// separator, a `}` or end of input.
    pub(crate) fn skip_malformed(&mut self) -> (String, Span) {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Newline | TokenKind::RBrace if depth == 0 => break,
                TokenKind::Command { .. } if depth == 0 && self.pos > start => break,
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        let span = if self.pos > start {
            self.tokens[start].span.merge(self.previous_span())
        } else {
            self.current_span()
        };
        (self.text_between(start, self.pos), span)
    }

    /// Consume tokens up to and including the `}` matching an already
    /// consumed `{`. Returns the closing span, if one was found.
    pub(crate) fn skip_to_close_brace(&mut self) -> Option<Span> {
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return None,
                TokenKind::RBrace if depth == 0 => return Some(self.advance().span),
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    /// Consume the rest of the current operand: up to a `,`, `:`, `)`, `}`
    /// or line end that is not inside a bracket opened here.
    pub(crate) fn skip_operand(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Newline
                | TokenKind::Comma
                | TokenKind::Colon
                | TokenKind::RParen
                | TokenKind::RBrace
                    if depth == 0 =>
                {
                    break
                }
                TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    /// Give up on an expression nested past [`MAX_EXPR_DEPTH`] that started
    /// at token `start`, keeping it and the rest of its operand as text.
    pub(crate) fn too_deep(&mut self, start: usize) -> Expr {
        let at = self.current_span();
        self.warn_at(
            ErrorCode::NESTING_TOO_DEEP,
            format!("expression nested deeper than {MAX_EXPR_DEPTH} levels"),
            at,
        );
        self.skip_operand();
        let span = if self.pos > start {
            self.tokens[start].span.merge(self.previous_span())
        } else {
            at
        };
        Expr::new(ExprKind::Malformed(self.text_between(start, self.pos)), span)
    }

    /// Run a recursive parse one level deeper, or stop at the limit.
    pub(crate) fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Expr) -> Expr {
        let start = self.pos;
        if self.expr_depth >= MAX_EXPR_DEPTH {
            return self.too_deep(start);
        }
        self.expr_depth += 1;
        let expr = parse(self);
        self.expr_depth -= 1;
        self.capped(start, expr)
    }

    /// Replace `expr` with malformed text once its tree is too deep.
    pub(crate) fn capped(&mut self, start: usize, expr: Expr) -> Expr {
        if expr.depth() > MAX_EXPR_DEPTH {
            self.too_deep(start)
        } else {
            expr
        }
    }

    /// Rebuild source-like text from a token range.
    ///
    /// Tokens that were adjacent in the source stay adjacent; anything else
    /// is separated by one space, and line breaks are kept.
    pub(crate) fn text_between(&self, start: usize, end: usize) -> String {
        let mut out = String::new();
        let mut prev: Option<&Token> = None;
        for token in &self.tokens[start..end] {
            if token.kind == TokenKind::Newline {
                out.push('\n');
                prev = None;
                continue;
            }
            if let Some(p) = prev {
                let adjacent = p.span.end_line == token.span.start_line
                    && p.span.end_col + 1 == token.span.start_col;
                if !adjacent {
                    out.push(' ');
                }
            }
            out.push_str(&token.kind.to_string());
            prev = Some(token);
        }
        out
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a `Program` AST.
    pub fn parse(mut self) -> ParseResult {
        let program = self.parse_program();
        ParseResult {
            program,
            errors: self.errors,
            scope: self.scope,
        }
    }
}
