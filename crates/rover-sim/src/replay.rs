//! Timeline playback.
//!
//! Replay never runs user code or world rules. It walks recorded entries,
//! projecting the rover from each entry and the mineral list from the
//! `collected` cells.

use rover_types::world::{Mineral, RoverState, TimelineEntry, WorldState};
use serde::Serialize;
use std::time::Duration;

/// One projected frame handed to the replay callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayFrame<'a> {
    pub entry: &'a TimelineEntry,
    pub rover: RoverState,
    /// Minerals still on the grid after this frame.
    pub minerals: Vec<Mineral>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutcome {
    pub frames: usize,
    /// State after the last entry, or `None` for an empty timeline.
    pub final_rover: Option<RoverState>,
    pub remaining_minerals: Vec<Mineral>,
}

/// Play `timeline` against `world`, calling `on_frame` once per entry.
///
/// A non-zero `cadence` sleeps between frames.
pub fn replay<F>(
    timeline: &[TimelineEntry],
    world: &WorldState,
    cadence: Duration,
    mut on_frame: F,
) -> ReplayOutcome
where
    F: FnMut(&ReplayFrame<'_>),
{
    let mut minerals = world.minerals.clone();
    let mut final_rover = None;

    for (i, entry) in timeline.iter().enumerate() {
        if let Some(cell) = entry.collected {
            minerals.retain(|m| m.cell() != cell);
        }
        let frame = ReplayFrame {
            entry,
            rover: entry.rover_state,
            minerals: minerals.clone(),
        };
        on_frame(&frame);
        final_rover = Some(entry.rover_state);

        if !cadence.is_zero() && i + 1 < timeline.len() {
            std::thread::sleep(cadence);
        }
    }

    ReplayOutcome {
        frames: timeline.len(),
        final_rover,
        remaining_minerals: minerals,
    }
}
