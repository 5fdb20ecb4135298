//! RoverScript simulation.
//!
//! [`SimulationSession`] runs a parsed program tick by tick against a
//! mission, committing each tick's action through the [`engine`] and
//! recording an append-only timeline. [`replay`] projects a recorded
//! timeline without running user code, and [`verify`] checks one against
//! its mission before it is trusted.

pub mod config;
pub mod engine;
pub mod error;
pub mod mission;
pub mod replay;
pub mod session;
pub mod verify;

pub use config::SessionConfig;
pub use engine::{apply, scan, Rules, StepOutcome};
pub use error::{MissionError, SessionError, VerifyError};
pub use mission::{load_mission, validate};
pub use replay::{replay, ReplayFrame, ReplayOutcome};
pub use session::{
    simulate, CancelToken, FinishReason, SessionStatus, SimulationReport, SimulationSession,
};
pub use verify::{digest, verify};
