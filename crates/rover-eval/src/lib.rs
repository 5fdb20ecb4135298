//! RoverScript execution host.
//!
//! Runs a parsed program one tick at a time by walking the same AST the
//! transpiler emits from. A tick sees the rover as a read-only snapshot,
//! may read and write persistent memory, may scan the world through the
//! [`RoverHost`], and leaves at most one [`Action`] in its output slot.
//!
//! Every evaluated expression, statement and loop iteration costs one step;
//! a tick that exceeds its step budget fails with
//! [`EvalError::BudgetExhausted`].
//!
//! [`Action`]: rover_types::world::Action

mod capability;
mod env;
mod error;
mod evaluator;
mod host;
mod library;
mod memory;
mod program;
mod value;

pub use env::Environment;
pub use error::{EvalError, EvalResult};
pub use host::{HostOptions, RoverHost, TickOutput};
pub use memory::MemoryScope;
pub use program::{prepare, RunnableProgram};
pub use value::{format_number, Capability, Value};
