//! Session configuration.

use crate::engine::Rules;
use rover_eval::HostOptions;
use rover_types::world::Direction;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for one simulation run.
///
/// Deserialises from camelCase JSON; every field is optional and falls back
/// to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub initial_fuel: i64,
    pub initial_health: i64,
    pub initial_direction: Direction,
    /// Steps a single tick may take.
    pub step_budget: u64,
    /// Ticks after which the run finishes regardless of rover state.
    pub max_ticks: u64,
    /// Pause between ticks when driven by [`SimulationSession::run`].
    ///
    /// [`SimulationSession::run`]: crate::SimulationSession::run
    pub tick_interval_ms: u64,
    /// Seed for the program's `lib.Random`.
    pub seed: u64,
    pub collision_damage: i64,
    pub mineral_score: i64,
    pub move_fuel_cost: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_fuel: 100,
            initial_health: 100,
            initial_direction: Direction::North,
            step_budget: 100_000,
            max_ticks: 1_000,
            tick_interval_ms: 0,
            seed: 0,
            collision_damage: 10,
            mineral_score: 50,
            move_fuel_cost: 1,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn rules(&self) -> Rules {
        Rules {
            collision_damage: self.collision_damage,
            mineral_score: self.mineral_score,
            move_fuel_cost: self.move_fuel_cost,
        }
    }

    pub fn host_options(&self) -> HostOptions {
        HostOptions {
            step_budget: self.step_budget,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(SessionConfig::from_json("{}").unwrap(), SessionConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config =
            SessionConfig::from_json(r#"{"initialFuel":5,"initialDirection":"south","seed":9}"#)
                .unwrap();
        assert_eq!(config.initial_fuel, 5);
        assert_eq!(config.initial_direction, Direction::South);
        assert_eq!(config.seed, 9);
        assert_eq!(config.max_ticks, 1_000);
    }

    #[test]
    fn unknown_direction_is_rejected() {
        assert!(SessionConfig::from_json(r#"{"initialDirection":"up"}"#).is_err());
    }
}
