//! The boundary between a running program and the simulation.

use rover_types::world::{Action, ScanResult, SensorDirection};

/// Services the simulation provides to a program during a tick.
pub trait RoverHost {
    /// Scan a cell relative to the rover. May move the sensor marker but
    /// never changes rover or world state.
    fn scan(&mut self, direction: SensorDirection) -> ScanResult;
}

/// Execution limits for a prepared program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostOptions {
    /// Steps one tick may take before it fails.
    pub step_budget: u64,
    /// Seed for `lib.Random`.
    pub seed: u64,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            step_budget: 100_000,
            seed: 0,
        }
    }
}

/// What one tick produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    /// The action slot after the program finished, if anything wrote it.
    pub action: Option<Action>,
    /// Lines written with `Write`, in order.
    pub output: Vec<String>,
}
