//! Token types for the RoverScript lexer.

use rover_types::Span;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────

/// A command keyword.
///
/// Keywords are case-insensitive and most have a one- or two-letter
/// abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Set,
    Do,
    Write,
    If,
    ElseIf,
    Else,
    For,
    While,
    Quit,
    Return,
}

impl Command {
    /// Every accepted spelling, lower-case.
    pub const SPELLINGS: &'static [(&'static str, Command)] = &[
        ("s", Command::Set),
        ("set", Command::Set),
        ("d", Command::Do),
        ("do", Command::Do),
        ("w", Command::Write),
        ("write", Command::Write),
        ("i", Command::If),
        ("if", Command::If),
        ("ei", Command::ElseIf),
        ("elseif", Command::ElseIf),
        ("e", Command::Else),
        ("else", Command::Else),
        ("f", Command::For),
        ("for", Command::For),
        ("while", Command::While),
        ("q", Command::Quit),
        ("quit", Command::Quit),
        ("return", Command::Return),
    ];

    /// Look up a word. Returns `None` for ordinary identifiers.
    pub fn from_word(word: &str) -> Option<Command> {
        let lower = word.to_ascii_lowercase();
        Self::SPELLINGS
            .iter()
            .find(|(spelling, _)| *spelling == lower)
            .map(|(_, cmd)| *cmd)
    }

    /// Canonical name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set => "Set",
            Command::Do => "Do",
            Command::Write => "Write",
            Command::If => "If",
            Command::ElseIf => "ElseIf",
            Command::Else => "Else",
            Command::For => "For",
            Command::While => "While",
            Command::Quit => "Quit",
            Command::Return => "Return",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────

/// Operator tokens, after the source-level rewrites (`_` is already `+`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Plus,
    Minus,
    Star,
    Slash,
    /// A single `=`. Assignment or equality depending on context.
    Assign,
    /// `==`
    EqEq,
    /// `!=` or `'=`
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    /// `&`
    And,
    /// `!` on its own
    Or,
    /// `'` on its own
    Not,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Star => "*",
            Op::Slash => "/",
            Op::Assign => "=",
            Op::EqEq => "==",
            Op::NotEq => "!=",
            Op::Less => "<",
            Op::Greater => ">",
            Op::LessEq => "<=",
            Op::GreaterEq => ">=",
            Op::And => "&&",
            Op::Or => "||",
            Op::Not => "!",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A command keyword with the spelling used in the source.
    Command { command: Command, spelling: String },
    /// String literal, unescaped.
    String(String),
    /// Numeric literal as written: `[0-9.]+`.
    Number(String),
    /// Identifier; a leading `$` marks a library function.
    Identifier(String),
    /// `%Name`, an internal member.
    Private(String),
    Operator(Op),
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Colon,
    Dot,
    /// Statement separator: a line break or two consecutive spaces.
    Newline,
    Eof,
}

impl TokenKind {
    /// The word to use when a command keyword appears where a name is
    /// expected, e.g. `obj.do`.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            TokenKind::Identifier(name) => Some(name),
            TokenKind::Command { spelling, .. } => Some(spelling),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Command { spelling, .. } => f.write_str(spelling),
            TokenKind::String(s) => {
                f.write_str("\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        _ => write!(f, "{ch}")?,
                    }
                }
                f.write_str("\"")
            }
            TokenKind::Number(text) => f.write_str(text),
            TokenKind::Identifier(name) => f.write_str(name),
            TokenKind::Private(name) => write!(f, "%{name}"),
            TokenKind::Operator(op) => f.write_str(op.as_str()),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Newline => f.write_str("newline"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(Command::from_word("SET"), Some(Command::Set));
        assert_eq!(Command::from_word("Set"), Some(Command::Set));
        assert_eq!(Command::from_word("s"), Some(Command::Set));
        assert_eq!(Command::from_word("S"), Some(Command::Set));
        assert_eq!(Command::from_word("ElseIf"), Some(Command::ElseIf));
        assert_eq!(Command::from_word("EI"), Some(Command::ElseIf));
    }

    #[test]
    fn while_and_return_have_no_abbreviation() {
        assert_eq!(Command::from_word("while"), Some(Command::While));
        assert_eq!(Command::from_word("wh"), None);
        assert_eq!(Command::from_word("return"), Some(Command::Return));
        assert_eq!(Command::from_word("r"), None);
    }

    #[test]
    fn ordinary_words_are_not_commands() {
        for word in ["x", "memory", "Move", "setx", "dx", "iff"] {
            assert_eq!(Command::from_word(word), None, "{word}");
        }
    }

    #[test]
    fn every_spelling_resolves() {
        for (spelling, cmd) in Command::SPELLINGS {
            assert_eq!(Command::from_word(spelling), Some(*cmd));
        }
    }

    #[test]
    fn display_reproduces_source_form() {
        let cmd = TokenKind::Command {
            command: Command::Do,
            spelling: "Do".into(),
        };
        assert_eq!(cmd.to_string(), "Do");
        assert_eq!(TokenKind::Private("Set".into()).to_string(), "%Set");
        assert_eq!(TokenKind::String("a\"b".into()).to_string(), "\"a\\\"b\"");
        assert_eq!(TokenKind::Operator(Op::NotEq).to_string(), "!=");
    }

    #[test]
    fn names_come_from_identifiers_and_commands() {
        let cmd = TokenKind::Command {
            command: Command::If,
            spelling: "i".into(),
        };
        assert_eq!(cmd.as_name(), Some("i"));
        assert_eq!(TokenKind::Identifier("x".into()).as_name(), Some("x"));
        assert_eq!(TokenKind::Comma.as_name(), None);
    }
}
