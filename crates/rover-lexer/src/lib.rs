//! RoverScript lexer: converts COS-style source text into a token stream.

pub mod lexer;
pub mod token;

pub use lexer::{tokenize, LexResult, Lexer};
pub use token::{Command, Op, Token, TokenKind};
