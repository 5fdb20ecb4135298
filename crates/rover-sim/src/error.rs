//! Error types for the simulation crate.

use rover_eval::EvalError;
use rover_types::world::Cell;
use thiserror::Error;

/// A session that cannot take another tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The program failed during a tick. Frames recorded before it are kept.
    #[error("runtime error at frame {frame}: {source}")]
    Runtime {
        frame: u64,
        #[source]
        source: EvalError,
    },
    /// The run already finished.
    #[error("session has finished")]
    Finished,
}

/// A mission file that cannot be used.
#[derive(Debug, Error)]
pub enum MissionError {
    #[error("invalid mission JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid size must be positive, got {0}")]
    InvalidGrid(i32),
    #[error("{what} at {cell} is outside the grid")]
    OutOfBounds { what: &'static str, cell: Cell },
    #[error("rover start {0} is an obstacle")]
    StartOnObstacle(Cell),
}

/// A recorded timeline that could not have come from this world.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("frame {found} out of order, expected {expected}")]
    FrameOrder { expected: u64, found: u64 },
    #[error("frame {frame}: rover at {cell} is outside the grid")]
    OutOfBounds { frame: u64, cell: Cell },
    #[error("frame {frame}: fuel rose from {before} to {after}")]
    FuelIncreased { frame: u64, before: i64, after: i64 },
    #[error("frame {frame}: negative {field} {value}")]
    Negative {
        frame: u64,
        field: &'static str,
        value: i64,
    },
    #[error("frame {frame}: collect event without a collected cell")]
    MissingCollected { frame: u64 },
    #[error("frame {frame}: {cell} collected outside a collect event")]
    UnexpectedCollected { frame: u64, cell: Cell },
    #[error("frame {frame}: no mineral at {cell}")]
    UnknownMineral { frame: u64, cell: Cell },
    #[error("frame {frame}: mineral at {cell} collected twice")]
    DuplicateCollect { frame: u64, cell: Cell },
}
