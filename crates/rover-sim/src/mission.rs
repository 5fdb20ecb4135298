//! Mission loading.

use crate::error::MissionError;
use rover_types::world::WorldState;

/// Parse and validate a mission file.
pub fn load_mission(json: &str) -> Result<WorldState, MissionError> {
    let world: WorldState = serde_json::from_str(json)?;
    validate(&world)?;
    Ok(world)
}

/// Check that a mission layout is playable.
///
/// Obstacles, minerals and the base station must sit on the grid, and the
/// rover may not start on an obstacle.
pub fn validate(world: &WorldState) -> Result<(), MissionError> {
    if world.grid_size <= 0 {
        return Err(MissionError::InvalidGrid(world.grid_size));
    }
    let start = world.rover_start;
    if !world.in_bounds(start) {
        return Err(MissionError::OutOfBounds {
            what: "rover start",
            cell: start,
        });
    }
    if world.is_obstacle(start) {
        return Err(MissionError::StartOnObstacle(start));
    }
    if let Some(&cell) = world.obstacles.iter().find(|c| !world.in_bounds(**c)) {
        return Err(MissionError::OutOfBounds {
            what: "obstacle",
            cell,
        });
    }
    if let Some(mineral) = world.minerals.iter().find(|m| !world.in_bounds(m.cell())) {
        return Err(MissionError::OutOfBounds {
            what: "mineral",
            cell: mineral.cell(),
        });
    }
    if let Some(cell) = world.base_station.filter(|c| !world.in_bounds(*c)) {
        return Err(MissionError::OutOfBounds {
            what: "base station",
            cell,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_minimal_mission() {
        let world = load_mission(r#"{"gridSize":4,"roverStart":{"x":1,"z":1}}"#).unwrap();
        assert_eq!(world.grid_size, 4);
        assert!(world.obstacles.is_empty());
        assert!(world.minerals.is_empty());
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(load_mission("{"), Err(MissionError::Json(_))));
    }

    #[test]
    fn rejects_empty_grid() {
        let err = load_mission(r#"{"gridSize":0,"roverStart":{"x":0,"z":0}}"#).unwrap_err();
        assert!(matches!(err, MissionError::InvalidGrid(0)));
    }

    #[test]
    fn rejects_start_on_obstacle() {
        let json = r#"{"gridSize":3,"roverStart":{"x":1,"z":1},"obstacles":[{"x":1,"z":1}]}"#;
        assert!(matches!(load_mission(json), Err(MissionError::StartOnObstacle(_))));
    }

    #[test]
    fn rejects_mineral_off_grid() {
        let json = r#"{"gridSize":3,"roverStart":{"x":0,"z":0},"minerals":[{"x":3,"z":0}]}"#;
        let err = load_mission(json).unwrap_err();
        assert_eq!(err.to_string(), "mineral at (3, 0) is outside the grid");
    }
}
