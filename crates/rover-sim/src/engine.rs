//! Deterministic world rules.
//!
//! The engine is the only code that mutates rover state. It knows nothing
//! about programs; it takes the action a tick produced and commits it.

use rover_types::world::{
    Action, Cell, Event, Mineral, RoverState, ScanResult, SensorDirection, WorldState,
};

/// Tunable constants applied by [`apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub collision_damage: i64,
    pub mineral_score: i64,
    pub move_fuel_cost: i64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            collision_damage: 10,
            mineral_score: 50,
            move_fuel_cost: 1,
        }
    }
}

/// Result of applying one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub event: Event,
    /// The mineral cell removed during this step.
    pub collected: Option<Cell>,
}

impl StepOutcome {
    fn event(event: Event) -> Self {
        Self {
            event,
            collected: None,
        }
    }
}

/// Commit `action` against the world.
///
/// Rejected moves leave everything untouched and report [`Event::None`].
pub fn apply(
    world: &WorldState,
    minerals: &mut Vec<Mineral>,
    rover: &mut RoverState,
    action: Option<Action>,
    rules: &Rules,
) -> StepOutcome {
    let outcome = match action {
        None => StepOutcome::event(Event::None),
        Some(Action::Turn(direction)) => {
            rover.direction = direction;
            StepOutcome::event(Event::Turn)
        }
        Some(Action::Move) => apply_move(world, minerals, rover, rules),
        Some(Action::Collect) => apply_collect(minerals, rover, rules),
    };
    rover.fuel = rover.fuel.max(0);
    rover.health = rover.health.max(0);
    outcome
}

fn apply_move(
    world: &WorldState,
    minerals: &mut Vec<Mineral>,
    rover: &mut RoverState,
    rules: &Rules,
) -> StepOutcome {
    let target = rover.cell().offset(rover.direction, 1);
    if !world.in_bounds(target) {
        return StepOutcome::event(Event::None);
    }
    if world.is_obstacle(target) {
        rover.health -= rules.collision_damage;
        return StepOutcome::event(Event::Collision);
    }

    rover.x = target.x;
    rover.z = target.z;
    rover.fuel -= rules.move_fuel_cost;
    rover.steps += 1;

    match take_mineral(minerals, target) {
        Some(cell) => {
            rover.score += rules.mineral_score;
            StepOutcome {
                event: Event::Collect,
                collected: Some(cell),
            }
        }
        None => StepOutcome::event(Event::Move),
    }
}

fn apply_collect(
    minerals: &mut Vec<Mineral>,
    rover: &mut RoverState,
    rules: &Rules,
) -> StepOutcome {
    let here = rover.cell();
    let ahead = here.offset(rover.direction, 1);
    let collected = take_mineral(minerals, here).or_else(|| take_mineral(minerals, ahead));
    match collected {
        Some(cell) => {
            rover.score += rules.mineral_score;
            StepOutcome {
                event: Event::Collect,
                collected: Some(cell),
            }
        }
        None => StepOutcome::event(Event::None),
    }
}

fn take_mineral(minerals: &mut Vec<Mineral>, cell: Cell) -> Option<Cell> {
    let index = minerals.iter().position(|m| m.cell() == cell)?;
    Some(minerals.remove(index).cell())
}

/// Read one cell relative to the rover. Cells off the grid read as
/// [`ScanResult::Obstacle`].
pub fn scan(
    world: &WorldState,
    minerals: &[Mineral],
    rover: &RoverState,
    direction: SensorDirection,
) -> ScanResult {
    let cell = direction.target(rover);
    if !world.in_bounds(cell) || world.is_obstacle(cell) {
        ScanResult::Obstacle
    } else if minerals.iter().any(|m| m.cell() == cell) {
        ScanResult::Mineral
    } else {
        ScanResult::Clear
    }
}
