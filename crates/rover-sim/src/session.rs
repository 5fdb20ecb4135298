//! Live simulation sessions.
//!
//! A [`SimulationSession`] owns everything one run needs: the mission, the
//! minerals still on the grid, the rover, persistent memory, the recorded
//! timeline and the prepared program. [`SimulationSession::step`] runs one
//! tick; [`SimulationSession::run`] drives ticks on a fixed interval until
//! the run finishes or is cancelled.

use crate::config::SessionConfig;
use crate::engine::{self, Rules};
use crate::error::{MissionError, SessionError};
use crate::mission;
use rover_eval::{MemoryScope, RoverHost, RunnableProgram};
use rover_types::ast::Program;
use rover_types::world::{
    Cell, Mineral, RoverState, ScanResult, SensorDirection, TimelineEntry, WorldState,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable flag that stops [`SimulationSession::run`] between ticks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a run stopped taking ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FinishReason {
    OutOfFuel,
    Destroyed,
    MaxTicks,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Finished(FinishReason),
    /// Stopped by a runtime error.
    Halted,
}

/// The world as a program sees it during one tick.
struct SessionHost<'a> {
    world: &'a WorldState,
    minerals: &'a [Mineral],
    rover: &'a RoverState,
    sensor: &'a mut Option<Cell>,
}

impl RoverHost for SessionHost<'_> {
    fn scan(&mut self, direction: SensorDirection) -> ScanResult {
        *self.sensor = Some(direction.target(self.rover));
        engine::scan(self.world, self.minerals, self.rover, direction)
    }
}

pub struct SimulationSession {
    world: WorldState,
    minerals: Vec<Mineral>,
    rover: RoverState,
    memory: MemoryScope,
    timeline: Vec<TimelineEntry>,
    sensor: Option<Cell>,
    console: Vec<String>,
    program: RunnableProgram,
    config: SessionConfig,
    rules: Rules,
    status: SessionStatus,
    halt: Option<SessionError>,
}

impl SimulationSession {
    /// Start a run of `program` on `world`. Fails if the mission is not
    /// playable.
    pub fn new(
        program: &Program,
        world: WorldState,
        config: SessionConfig,
    ) -> Result<Self, MissionError> {
        mission::validate(&world)?;
        let rover = RoverState {
            x: world.rover_start.x,
            z: world.rover_start.z,
            direction: config.initial_direction,
            fuel: config.initial_fuel,
            health: config.initial_health,
            score: 0,
            steps: 0,
        };
        let mut session = Self {
            minerals: world.minerals.clone(),
            world,
            rover,
            memory: MemoryScope::new(),
            timeline: Vec::new(),
            sensor: None,
            console: Vec::new(),
            program: RunnableProgram::new(program.clone(), config.host_options()),
            rules: config.rules(),
            config,
            status: SessionStatus::Running,
            halt: None,
        };
        session.update_status();
        Ok(session)
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Minerals still on the grid.
    pub fn minerals(&self) -> &[Mineral] {
        &self.minerals
    }

    pub fn rover(&self) -> &RoverState {
        &self.rover
    }

    pub fn memory(&self) -> &MemoryScope {
        &self.memory
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    pub fn into_timeline(self) -> Vec<TimelineEntry> {
        self.timeline
    }

    /// The cell read by the most recent scan in the last tick.
    pub fn sensor(&self) -> Option<Cell> {
        self.sensor
    }

    /// Every line the program has written so far.
    pub fn console(&self) -> &[String] {
        &self.console
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// Run one tick and record its timeline entry.
    ///
    /// A runtime error halts the session; the entries recorded before it are
    /// kept and every later call returns the same error.
    pub fn step(&mut self) -> Result<&TimelineEntry, SessionError> {
        if let Some(err) = &self.halt {
            return Err(err.clone());
        }
        if !self.is_running() {
            return Err(SessionError::Finished);
        }

        let frame = self.timeline.len() as u64;
        self.sensor = None;
        let mut host = SessionHost {
            world: &self.world,
            minerals: &self.minerals,
            rover: &self.rover,
            sensor: &mut self.sensor,
        };
        let output = match self.program.tick(&self.rover, &mut self.memory, &mut host) {
            Ok(output) => output,
            Err(source) => {
                tracing::warn!(frame, error = %source, "runtime error, session halted");
                let err = SessionError::Runtime { frame, source };
                self.status = SessionStatus::Halted;
                self.halt = Some(err.clone());
                return Err(err);
            }
        };

        for line in &output.output {
            tracing::info!(frame, "{line}");
        }
        self.console.extend(output.output);

        let outcome = engine::apply(
            &self.world,
            &mut self.minerals,
            &mut self.rover,
            output.action,
            &self.rules,
        );
        tracing::debug!(
            frame,
            event = ?outcome.event,
            x = self.rover.x,
            z = self.rover.z,
            fuel = self.rover.fuel,
            "tick applied"
        );
        self.timeline.push(TimelineEntry {
            frame_index: frame,
            event: outcome.event,
            rover_state: self.rover,
            collected: outcome.collected,
        });
        self.update_status();

        Ok(&self.timeline[self.timeline.len() - 1])
    }

    /// Tick until the run finishes or `cancel` is set, sleeping
    /// `tick_interval` between ticks.
    pub fn run(&mut self, cancel: &CancelToken) -> Result<SessionStatus, SessionError> {
        tracing::info!(
            grid = self.world.grid_size,
            minerals = self.minerals.len(),
            max_ticks = self.config.max_ticks,
            "session started"
        );
        let interval = self.config.tick_interval();
        while self.is_running() {
            if cancel.is_cancelled() {
                self.status = SessionStatus::Finished(FinishReason::Cancelled);
                break;
            }
            self.step()?;
            if self.is_running() && !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }
        tracing::info!(
            status = ?self.status,
            frames = self.timeline.len(),
            score = self.rover.score,
            "session finished"
        );
        Ok(self.status)
    }

    fn update_status(&mut self) {
        if self.status != SessionStatus::Running {
            return;
        }
        if self.rover.health <= 0 {
            self.status = SessionStatus::Finished(FinishReason::Destroyed);
        } else if self.rover.fuel <= 0 {
            self.status = SessionStatus::Finished(FinishReason::OutOfFuel);
        } else if self.timeline.len() as u64 >= self.config.max_ticks {
            self.status = SessionStatus::Finished(FinishReason::MaxTicks);
        }
    }
}

/// Everything a finished run produced, in the JSON shape the web client reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub timeline: Vec<TimelineEntry>,
    pub final_state: RoverState,
    pub remaining_minerals: Vec<Mineral>,
    pub console: Vec<String>,
    pub memory: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Runtime error that halted the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run `program` on `world` to completion without pausing between ticks.
pub fn simulate(
    program: &Program,
    world: WorldState,
    config: SessionConfig,
) -> Result<SimulationReport, MissionError> {
    let config = SessionConfig {
        tick_interval_ms: 0,
        ..config
    };
    let mut session = SimulationSession::new(program, world, config)?;
    let error = session.run(&CancelToken::new()).err().map(|e| e.to_string());
    let finish_reason = match session.status {
        SessionStatus::Finished(reason) => Some(reason),
        _ => None,
    };
    Ok(SimulationReport {
        final_state: session.rover,
        remaining_minerals: session.minerals,
        console: session.console,
        memory: session.memory.to_json(),
        finish_reason,
        error,
        timeline: session.timeline,
    })
}
