//! RoverScript transpiler: emits JavaScript statement text from the AST.
//!
//! The output is the body of the rover's per-tick async method. It expects
//! four bindings at run time:
//!
//! - `context`: the capability object (`rover`, `memory`, `output.action`,
//!   `Move`, `Turn`, `Collect`, `Scan`, ...)
//! - `roverApi`: imperative actions and `Write`
//! - `lib`: library functions (`Piece`, `Length`, `Get`, `Random`)
//! - `memory`: the persistent memory scope
//!
//! Emission is a pure function of the AST, so the same token stream always
//! yields byte-identical output.

pub mod emitter;
mod expr;
pub mod source_map;
mod stmt;

pub use emitter::{emit, emit_with_source_map, transpile};
pub use source_map::{SourceMap, SourceMapEntry};
