//! RoverScript as a WASM module for the mission editor.
//!
//! Every export takes and returns JSON strings so the web client never
//! depends on Rust types.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { transpile, simulate } from 'rover-wasm';
//!
//! await init();
//!
//! const compiled = JSON.parse(transpile('d Move()'));
//! // { success: true, javascript: "await context.Move();", ... }
//!
//! const run = JSON.parse(simulate('d Move()', missionJson, '{"maxTicks":20}'));
//! // { success: true, timeline: [...], finalState: {...}, ... }
//! ```

use rover_compiler::compile_to_result;
use rover_sim::{load_mission, SessionConfig};
use rover_types::world::TimelineEntry;
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

const SCRIPT_NAME: &str = "script.cos";

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| failure(&format!("serialization error: {e}")))
}

fn failure(message: &str) -> String {
    json!({ "success": false, "error": message }).to_string()
}

fn parse_timeline(json: &str) -> Result<Vec<TimelineEntry>, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid timeline JSON: {e}"))
}

/// Transpile a script to JavaScript.
///
/// Returns a `CompileResult`:
/// ```json
/// {
///   "success": true,
///   "javascript": "await context.Move();",
///   "javascript_hash": "…",
///   "source_map": { "entries": [...] },
///   "errors": { "errors": [], "warnings": [], "total_errors": 0, "total_warnings": 0 }
/// }
/// ```
#[wasm_bindgen]
pub fn transpile(source: &str) -> String {
    to_json(&compile_to_result(source, SCRIPT_NAME))
}

/// Compile and run a script against a mission.
///
/// `config_json` may be empty for the default session settings. On a
/// compile failure the result carries `success: false` and the `errors`
/// collection; a runtime error keeps the recorded timeline and sets `error`.
#[wasm_bindgen]
pub fn simulate(source: &str, mission_json: &str, config_json: &str) -> String {
    let compiled = match rover_compiler::compile_program(source, SCRIPT_NAME) {
        Ok(compiled) => compiled,
        Err(errors) => return json!({ "success": false, "errors": errors }).to_string(),
    };
    let world = match load_mission(mission_json) {
        Ok(world) => world,
        Err(e) => return failure(&e.to_string()),
    };
    let config = if config_json.trim().is_empty() {
        SessionConfig::default()
    } else {
        match SessionConfig::from_json(config_json) {
            Ok(config) => config,
            Err(e) => return failure(&format!("invalid config JSON: {e}")),
        }
    };

    match rover_sim::simulate(&compiled.program, world, config) {
        Ok(report) => json!({
            "success": report.error.is_none(),
            "report": report,
            "warnings": compiled.warnings,
        })
        .to_string(),
        Err(e) => failure(&e.to_string()),
    }
}

/// Project a recorded timeline against its mission.
///
/// Returns every frame with the minerals still on the grid, plus the final
/// rover state.
#[wasm_bindgen]
pub fn replay(timeline_json: &str, mission_json: &str) -> String {
    let timeline = match parse_timeline(timeline_json) {
        Ok(timeline) => timeline,
        Err(message) => return failure(&message),
    };
    let world = match load_mission(mission_json) {
        Ok(world) => world,
        Err(e) => return failure(&e.to_string()),
    };

    let mut frames = Vec::with_capacity(timeline.len());
    let outcome = rover_sim::replay(&timeline, &world, std::time::Duration::ZERO, |frame| {
        frames.push(json!(frame));
    });
    json!({ "success": true, "frames": frames, "outcome": outcome }).to_string()
}

/// Check a recorded timeline against its mission and return its digest.
#[wasm_bindgen]
pub fn verify(timeline_json: &str, mission_json: &str) -> String {
    let timeline = match parse_timeline(timeline_json) {
        Ok(timeline) => timeline,
        Err(message) => return failure(&message),
    };
    let world = match load_mission(mission_json) {
        Ok(world) => world,
        Err(e) => return failure(&e.to_string()),
    };

    let digest = rover_sim::digest(&timeline);
    match rover_sim::verify(&timeline, &world) {
        Ok(()) => json!({ "success": true, "valid": true, "digest": digest }).to_string(),
        Err(e) => json!({
            "success": true,
            "valid": false,
            "error": e.to_string(),
            "digest": digest,
        })
        .to_string(),
    }
}

/// Return the crate version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
