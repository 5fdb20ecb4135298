//! RoverScript parser: converts a token stream into an AST.
//!
//! [`validate`] is the structural pre-check run before parsing. The parser
//! itself never fails; input it cannot make sense of becomes `Malformed`
//! nodes plus warnings.

mod parse_expr;
mod parse_stmt;
mod parser;
mod scope;
mod validate;

pub use parser::{parse, ParseResult, Parser, MAX_BLOCK_DEPTH, MAX_EXPR_DEPTH};
pub use scope::{ScopeSet, CAPABILITY_NAMESPACES};
pub use validate::{validate, StructuralError};
