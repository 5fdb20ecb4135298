//! Prepared programs and the per-tick entry point.

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::host::{HostOptions, RoverHost, TickOutput};
use crate::memory::MemoryScope;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rover_types::ast::Program;
use rover_types::world::RoverState;

/// Prepare a parsed program for ticking with default options.
pub fn prepare(program: &Program) -> RunnableProgram {
    RunnableProgram::new(program.clone(), HostOptions::default())
}

/// A program ready to run one tick at a time.
///
/// Locals start empty on every tick; only `memory` and the random
/// generator carry over. `tick` takes `&mut self`, so two ticks of the same
/// program can never overlap.
#[derive(Debug, Clone)]
pub struct RunnableProgram {
    program: Program,
    options: HostOptions,
    rng: Pcg32,
    ticks: u64,
}

impl RunnableProgram {
    pub fn new(program: Program, options: HostOptions) -> Self {
        Self {
            program,
            options,
            rng: Pcg32::seed_from_u64(options.seed),
            ticks: 0,
        }
    }

    pub fn options(&self) -> HostOptions {
        self.options
    }

    /// Number of ticks run so far, including failed ones.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run the program once against a snapshot of the rover.
    pub fn tick(
        &mut self,
        rover: &RoverState,
        memory: &mut MemoryScope,
        host: &mut dyn RoverHost,
    ) -> Result<TickOutput, EvalError> {
        self.ticks += 1;
        let mut eval = Evaluator::new(
            self.options.step_budget,
            rover,
            memory,
            host,
            &mut self.rng,
        );
        eval.eval_block(&self.program.stmts)?;
        tracing::trace!(tick = self.ticks, steps = eval.steps(), "tick evaluated");
        Ok(eval.finish())
    }
}
