//! Timeline verification and digests.
//!
//! A client-produced timeline is checked against the mission before it is
//! trusted: frames must be contiguous, the rover must stay on the grid,
//! fuel may only fall, and each mineral may be collected once.

use crate::error::VerifyError;
use rover_types::world::{Event, TimelineEntry, WorldState};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

pub fn verify(timeline: &[TimelineEntry], world: &WorldState) -> Result<(), VerifyError> {
    let mut collected = BTreeSet::new();
    let mut last_fuel: Option<i64> = None;

    for (i, entry) in timeline.iter().enumerate() {
        let frame = entry.frame_index;
        if frame != i as u64 {
            return Err(VerifyError::FrameOrder {
                expected: i as u64,
                found: frame,
            });
        }

        let rover = &entry.rover_state;
        if !world.in_bounds(rover.cell()) {
            return Err(VerifyError::OutOfBounds {
                frame,
                cell: rover.cell(),
            });
        }
        for (field, value) in [("fuel", rover.fuel), ("health", rover.health)] {
            if value < 0 {
                return Err(VerifyError::Negative { frame, field, value });
            }
        }
        if let Some(before) = last_fuel {
            if rover.fuel > before {
                return Err(VerifyError::FuelIncreased {
                    frame,
                    before,
                    after: rover.fuel,
                });
            }
        }
        last_fuel = Some(rover.fuel);

        match (entry.event, entry.collected) {
            (Event::Collect, None) => return Err(VerifyError::MissingCollected { frame }),
            (Event::Collect, Some(cell)) => {
                if !world.minerals.iter().any(|m| m.cell() == cell) {
                    return Err(VerifyError::UnknownMineral { frame, cell });
                }
                if !collected.insert(cell) {
                    return Err(VerifyError::DuplicateCollect { frame, cell });
                }
            }
            (_, Some(cell)) => return Err(VerifyError::UnexpectedCollected { frame, cell }),
            (_, None) => {}
        }
    }
    Ok(())
}

/// Hex SHA-256 of the timeline's canonical JSON.
pub fn digest(timeline: &[TimelineEntry]) -> String {
    let bytes = serde_json::to_vec(timeline).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}
