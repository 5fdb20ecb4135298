//! Shared types for RoverScript.
//!
//! This crate defines the source spans, structured diagnostics, AST nodes
//! and the rover world model used across every stage of the pipeline,
//! from the lexer through the replay engine.

mod error;
mod span;
pub mod ast;
pub mod world;

pub use error::{CompileErrors, ErrorCategory, ErrorCode, RoverError, Severity, MAX_ERRORS};
pub use span::{SourceFile, Span};

/// Result type used by the front end.
pub type Result<T> = std::result::Result<T, RoverError>;
