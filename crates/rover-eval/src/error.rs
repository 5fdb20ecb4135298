//! Runtime error types for the RoverScript execution host.

use thiserror::Error;

/// A runtime failure while running one tick.
///
/// Any of these halts the simulation session that owns the program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Name that is neither a local nor a global binding.
    #[error("{0} is not defined")]
    UndefinedVariable(String),
    /// Call on something that is not a function.
    #[error("{0} is not a function")]
    NotCallable(String),
    /// Member read on `undefined`.
    #[error("cannot read '{0}' of undefined")]
    NilAccess(String),
    /// Assignment to a capability or other non-writable target.
    #[error("cannot assign to {0}")]
    ReadOnly(String),
    /// Bad argument to a capability or library function.
    #[error("{function}: {message}")]
    InvalidArgument { function: String, message: String },
    /// Numeric literal that does not parse.
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    /// Source the parser kept as raw text.
    #[error("malformed code: {0}")]
    Malformed(String),
    /// `json.Parse` input that is not JSON.
    #[error("json.Parse: {0}")]
    Json(String),
    /// The per-tick step budget ran out.
    #[error("step budget of {budget} exhausted")]
    BudgetExhausted { budget: u64 },
}

impl EvalError {
    pub(crate) fn invalid(function: &str, message: impl Into<String>) -> Self {
        EvalError::InvalidArgument {
            function: function.to_string(),
            message: message.into(),
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
