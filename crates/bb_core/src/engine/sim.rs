//! CPU-vs-CPU simulation driver.
//!
//! Drives a game to completion with both sides played by the CPU decision
//! policies, capturing a deep-copy snapshot after every state transition.
//! The ordered snapshot sequence is the complete replay of the game; the
//! driver never substitutes decisions for a human-controlled role, so it is
//! only invoked for batch simulation.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::game::{GameEngine, GameRecord};
use super::types::GameStatus;
use crate::error::Result;

/// Hard cap on driver ticks. A nine-inning game runs around 300 pitches;
/// the cap only exists to bound a pathological extra-inning stalemate.
const MAX_TICKS: usize = 5000;

/// The result of running a game to completion: the final record plus every
/// intermediate snapshot in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRun {
    pub final_state: GameRecord,
    pub snapshots: Vec<GameRecord>,
}

impl SimulationRun {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<SimulationRun> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Run the game until its status is `final`, snapshotting after every tick.
/// The first snapshot is the state before any play happens.
pub fn run_to_completion(engine: &mut GameEngine) -> SimulationRun {
    let mut snapshots = vec![engine.snapshot()];
    let mut ticks = 0;
    while engine.record().game_status == GameStatus::Active && ticks < MAX_TICKS {
        ticks += 1;
        engine.step_cpu();
        snapshots.push(engine.snapshot());
    }
    if engine.record().game_status == GameStatus::Active {
        warn!(ticks, "simulation hit the safety cap before the game finished");
    }
    SimulationRun { final_state: engine.snapshot(), snapshots }
}
