//! Core RoverScript lexer: converts COS-style source text to a token stream.
//!
//! - Case-insensitive command words with abbreviations (`s`, `d`, `w`, ...)
//! - Line comments with `//` or `#`
//! - A line break, or two consecutive spaces, separates statements
//! - Source operators rewritten to their target meaning (`_` is `+`,
//!   `&` is logical and, a lone `!` is logical or, `'` is logical not)
//! - Never fails: unknown characters are skipped and reported as warnings

use rover_types::{CompileErrors, ErrorCode, RoverError, SourceFile, Span};

use crate::token::{Command, Op, Token, TokenKind};

/// The RoverScript lexer.
pub struct Lexer<'src> {
    source: &'src [u8],
    source_file: &'src SourceFile,
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    errors: CompileErrors,
}

/// Result of lexing: tokens + any diagnostics collected.
#[derive(Debug)]
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Lexer diagnostics. Every lexer diagnostic is a warning.
    pub errors: CompileErrors,
}

/// Tokenize a script. Diagnostics are dropped; use [`Lexer`] to keep them.
pub fn tokenize(source: &str) -> Vec<Token> {
    let file = SourceFile::new("<script>", source);
    Lexer::new(&file).lex().tokens
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            errors: CompileErrors::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn warn(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let file = self.source_file;
        let source_line = file.line(span.start_line).unwrap_or("");
        let diag = RoverError::warning(file.name.as_str(), code, message, span, source_line);
        self.errors.push(diag);
    }

    fn text_from(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.source[start..self.pos]).into_owned()
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip blanks. Returns the span of a statement separator if the run
    /// contained two consecutive spaces.
    fn skip_blanks(&mut self) -> Option<Span> {
        let mut separator = None;
        while let Some(ch) = self.peek() {
            match ch {
                b' ' if self.peek_at(1) == Some(b' ') => {
                    let (line, col) = (self.line, self.col);
                    while self.peek() == Some(b' ') {
                        self.advance();
                    }
                    separator.get_or_insert(self.span_from(line, col));
                }
                b' ' | b'\t' | b'\r' => {
                    self.advance();
                }
                _ => break,
            }
        }
        separator
    }

    fn at_comment(&self) -> bool {
        match self.peek() {
            Some(b'#') => true,
            Some(b'/') => self.peek_at(1) == Some(b'/'),
            _ => false,
        }
    }

    /// Digits and dots after the first character; a leading `.` counts.
    fn scan_number(&mut self, start: usize) -> TokenKind {
        while let Some(b'0'..=b'9' | b'.') = self.peek() {
            self.advance();
        }
        TokenKind::Number(self.text_from(start))
    }

    /// Consume up to, not including, the end of the line.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == b'\n' {
                break;
            }
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        loop {
            if let Some(span) = self.skip_blanks() {
                // A comment right after the gap ends the line anyway.
                if !self.at_comment() && self.peek().is_some() {
                    return Token::new(TokenKind::Newline, span);
                }
            }

            if self.at_comment() {
                self.skip_comment();
                continue;
            }

            let start_line = self.line;
            let start_col = self.col;
            let start = self.pos;
            let Some(ch) = self.advance() else {
                return Token::new(TokenKind::Eof, self.current_span());
            };

            let kind = match ch {
                b'\n' => TokenKind::Newline,
                b'"' => self.scan_string(start_line, start_col),
                b'0'..=b'9' => self.scan_number(start),
                b'.' if matches!(self.peek(), Some(b'0'..=b'9')) => self.scan_number(start),
                b'a'..=b'z' | b'A'..=b'Z' | b'$' => self.scan_word(start),
                b'%' => {
                    if matches!(self.peek(), Some(b'a'..=b'z' | b'A'..=b'Z')) {
                        let name_start = self.pos;
                        self.eat_word_tail();
                        TokenKind::Private(self.text_from(name_start))
                    } else {
                        self.unknown_character('%', start_line, start_col);
                        continue;
                    }
                }

                // ── Operators ──
                b'+' | b'_' => TokenKind::Operator(Op::Plus),
                b'-' => TokenKind::Operator(Op::Minus),
                b'*' => TokenKind::Operator(Op::Star),
                b'/' => TokenKind::Operator(Op::Slash),
                b'&' => TokenKind::Operator(Op::And),
                b'=' => self.with_eq(Op::EqEq, Op::Assign),
                b'!' => self.with_eq(Op::NotEq, Op::Or),
                b'\'' => self.with_eq(Op::NotEq, Op::Not),
                b'<' => self.with_eq(Op::LessEq, Op::Less),
                b'>' => self.with_eq(Op::GreaterEq, Op::Greater),

                // ── Punctuation ──
                b'{' => TokenKind::LBrace,
                b'}' => TokenKind::RBrace,
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b',' => TokenKind::Comma,
                b':' => TokenKind::Colon,
                b'.' => TokenKind::Dot,

                _ => {
                    let shown = self.finish_char(ch);
                    self.unknown_character(shown, start_line, start_col);
                    continue;
                }
            };

            return Token::new(kind, self.span_from(start_line, start_col));
        }
    }

    /// `op=` forms a two-character operator, otherwise `single`.
    fn with_eq(&mut self, with: Op, single: Op) -> TokenKind {
        if self.peek() == Some(b'=') {
            self.advance();
            TokenKind::Operator(with)
        } else {
            TokenKind::Operator(single)
        }
    }

    fn eat_word_tail(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_word(&mut self, start: usize) -> TokenKind {
        self.eat_word_tail();
        let text = self.text_from(start);
        match Command::from_word(&text) {
            Some(command) => TokenKind::Command {
                command,
                spelling: text,
            },
            None => TokenKind::Identifier(text),
        }
    }

    /// Scan a string literal after the opening `"`.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> TokenKind {
        let mut buf = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_from(start_line, start_col);
                    self.warn(
                        ErrorCode::UNTERMINATED_STRING,
                        "unterminated string literal",
                        span,
                    );
                    break;
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(b'\\') if matches!(self.peek_at(1), Some(b'"' | b'\\')) => {
                    self.advance();
                    if let Some(escaped) = self.advance() {
                        buf.push(escaped);
                    }
                }
                Some(ch) => {
                    self.advance();
                    buf.push(ch);
                }
            }
        }
        TokenKind::String(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Consume the continuation bytes of a multi-byte character and return
    /// it for display.
    fn finish_char(&mut self, first: u8) -> char {
        let start = self.pos - 1;
        while let Some(0x80..=0xBF) = self.peek() {
            self.advance();
        }
        std::str::from_utf8(&self.source[start..self.pos])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(first as char)
    }

    fn unknown_character(&mut self, ch: char, start_line: u32, start_col: u32) {
        let span = self.span_from(start_line, start_col);
        self.warn(
            ErrorCode::UNKNOWN_CHARACTER,
            format!("unknown character '{ch}' skipped"),
            span,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn trailing_double_space_is_not_a_separator() {
        assert_eq!(
            kinds("q  "),
            vec![
                TokenKind::Command {
                    command: Command::Quit,
                    spelling: "q".into()
                },
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn spans_are_one_based() {
        let tokens = tokenize("s x");
        assert_eq!(tokens[0].span, Span::new(1, 1, 1, 1));
        assert_eq!(tokens[1].span, Span::new(1, 3, 1, 3));
    }
}
