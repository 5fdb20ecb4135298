//! Rover world model: mission layout, rover state, actions and the
//! timeline records exchanged with the web client and the verifier.
//!
//! Everything here serialises to the camelCase JSON used by mission files
//! and recorded timelines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The cell `distance` steps towards `direction`, saturating at the
    /// `i32` range so cells past it stay off any grid.
    pub fn offset(self, direction: Direction, distance: i32) -> Cell {
        let (dx, dz) = direction.delta();
        Cell::new(
            self.x.saturating_add(dx.saturating_mul(distance)),
            self.z.saturating_add(dz.saturating_mul(distance)),
        )
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// A collectable mineral deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mineral {
    pub x: i32,
    pub z: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

impl Mineral {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.z)
    }
}

/// Mission layout, loaded once per mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    pub grid_size: i32,
    #[serde(default)]
    pub obstacles: Vec<Cell>,
    #[serde(default)]
    pub minerals: Vec<Mineral>,
    pub rover_start: Cell,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_station: Option<Cell>,
}

impl WorldState {
    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.grid_size).contains(&cell.x) && (0..self.grid_size).contains(&cell.z)
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }
}

/// Compass heading. North decreases `z`, east increases `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub fn turn_left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    pub fn turn_right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub fn reverse(self) -> Direction {
        self.turn_left().turn_left()
    }

    /// Parse a compass name, case-insensitively.
    pub fn parse(name: &str) -> Option<Direction> {
        match name.to_ascii_lowercase().as_str() {
            "north" => Some(Direction::North),
            "east" => Some(Direction::East),
            "south" => Some(Direction::South),
            "west" => Some(Direction::West),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rover state after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoverState {
    pub x: i32,
    pub z: i32,
    pub direction: Direction,
    pub fuel: i64,
    pub health: i64,
    pub score: i64,
    pub steps: i64,
}

impl RoverState {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.z)
    }

    /// A rover with no fuel or no health takes no further ticks.
    pub fn is_terminal(&self) -> bool {
        self.fuel <= 0 || self.health <= 0
    }
}

/// The single action a program may request per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "direction", rename_all = "lowercase")]
pub enum Action {
    Move,
    Turn(Direction),
    Collect,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move => f.write_str("move"),
            Action::Turn(dir) => write!(f, "turn {dir}"),
            Action::Collect => f.write_str("collect"),
        }
    }
}

/// Sensor scan direction, relative to the rover's heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorDirection {
    Front,
    Far,
    Left,
    Right,
    Back,
}

impl SensorDirection {
    pub fn parse(name: &str) -> Option<SensorDirection> {
        match name.to_ascii_lowercase().as_str() {
            "front" => Some(SensorDirection::Front),
            "far" => Some(SensorDirection::Far),
            "left" => Some(SensorDirection::Left),
            "right" => Some(SensorDirection::Right),
            "back" => Some(SensorDirection::Back),
            _ => None,
        }
    }

    /// The cell scanned from `rover`.
    pub fn target(self, rover: &RoverState) -> Cell {
        let here = rover.cell();
        match self {
            SensorDirection::Front => here.offset(rover.direction, 1),
            SensorDirection::Far => here.offset(rover.direction, 2),
            SensorDirection::Left => here.offset(rover.direction.turn_left(), 1),
            SensorDirection::Right => here.offset(rover.direction.turn_right(), 1),
            SensorDirection::Back => here.offset(rover.direction.reverse(), 1),
        }
    }
}

/// What a sensor scan found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanResult {
    Obstacle,
    Mineral,
    Clear,
}

impl ScanResult {
    pub fn as_str(self) -> &'static str {
        match self {
            ScanResult::Obstacle => "OBSTACLE",
            ScanResult::Mineral => "MINERAL",
            ScanResult::Clear => "CLEAR",
        }
    }
}

/// What happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Move,
    Turn,
    Collect,
    /// Accepted in recorded timelines; the engine reports obstacle hits as
    /// [`Event::Collision`].
    Obstacle,
    Collision,
    None,
}

/// One frame of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub frame_index: u64,
    pub event: Event,
    pub rover_state: RoverState,
    /// The mineral cell removed by a `collect` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected: Option<Cell>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rover(direction: Direction) -> RoverState {
        RoverState {
            x: 5,
            z: 5,
            direction,
            fuel: 100,
            health: 100,
            score: 0,
            steps: 0,
        }
    }

    #[test]
    fn south_faces_increasing_z() {
        assert_eq!(Cell::new(0, 0).offset(Direction::South, 1), Cell::new(0, 1));
        assert_eq!(Cell::new(3, 3).offset(Direction::North, 2), Cell::new(3, 1));
    }

    #[test]
    fn offset_saturates_at_the_edge_of_i32() {
        let edge = Cell::new(i32::MAX - 1, i32::MIN + 1);
        assert_eq!(edge.offset(Direction::East, 2), Cell::new(i32::MAX, i32::MIN + 1));
        assert_eq!(edge.offset(Direction::North, 2), Cell::new(i32::MAX - 1, i32::MIN));
        assert_eq!(Cell::new(0, 0).offset(Direction::West, i32::MAX), Cell::new(-i32::MAX, 0));
    }

    #[test]
    fn turning_round_trips() {
        for dir in [Direction::North, Direction::East, Direction::South, Direction::West] {
            assert_eq!(dir.turn_left().turn_right(), dir);
            assert_eq!(dir.reverse().reverse(), dir);
        }
    }

    #[test]
    fn sensor_targets_are_relative_to_heading() {
        let r = rover(Direction::East);
        assert_eq!(SensorDirection::Front.target(&r), Cell::new(6, 5));
        assert_eq!(SensorDirection::Far.target(&r), Cell::new(7, 5));
        assert_eq!(SensorDirection::Left.target(&r), Cell::new(5, 4));
        assert_eq!(SensorDirection::Right.target(&r), Cell::new(5, 6));
        assert_eq!(SensorDirection::Back.target(&r), Cell::new(4, 5));
    }

    #[test]
    fn world_json_uses_camel_case() {
        let json = r#"{"gridSize":10,"obstacles":[{"x":2,"z":3}],"minerals":[{"x":0,"z":1}],"roverStart":{"x":0,"z":0}}"#;
        let world: WorldState = serde_json::from_str(json).unwrap();
        assert_eq!(world.grid_size, 10);
        assert!(world.is_obstacle(Cell::new(2, 3)));
        assert_eq!(world.minerals[0].value, None);
        assert_eq!(world.base_station, None);
        assert!(world.in_bounds(Cell::new(9, 9)));
        assert!(!world.in_bounds(Cell::new(10, 0)));
        assert!(!world.in_bounds(Cell::new(0, -1)));
    }

    #[test]
    fn timeline_entry_json_shape() {
        let entry = TimelineEntry {
            frame_index: 3,
            event: Event::Collect,
            rover_state: rover(Direction::South),
            collected: Some(Cell::new(5, 6)),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"frameIndex\":3"));
        assert!(json.contains("\"event\":\"collect\""));
        assert!(json.contains("\"direction\":\"south\""));
        assert!(json.contains("\"collected\":{\"x\":5,\"z\":6}"));
        let back: TimelineEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn scan_results_serialise_uppercase() {
        assert_eq!(serde_json::to_string(&ScanResult::Mineral).unwrap(), "\"MINERAL\"");
        assert_eq!(ScanResult::Clear.as_str(), "CLEAR");
    }
}
