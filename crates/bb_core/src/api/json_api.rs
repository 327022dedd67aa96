//! JSON API for the game engine.
//!
//! This is the boundary the excluded UI/HTTP layers talk to: rosters come
//! in as a `GameRequest`, and game state goes out as the serialized
//! `GameRecord` contract (optionally with the full snapshot replay).

use serde::{Deserialize, Serialize};

use crate::engine::game::{GameConfig, GameEngine, GameRecord};
use crate::engine::sim::run_to_completion;
use crate::engine::types::{TimeOfDay, Weather};
use crate::error::{GameError, Result};
use crate::models::player::{Batter, Pitcher};
use crate::models::team::{TeamInfo, TeamRoster, TeamSide};
use crate::SCHEMA_VERSION;

fn default_player_side() -> TeamSide {
    TeamSide::Home
}

#[derive(Debug, Deserialize)]
pub struct GameRequest {
    pub schema_version: u8,
    pub seed: u64,
    /// Which club the user controls. Defaults to home, matching the
    /// classic "you're the home team" setup.
    #[serde(default = "default_player_side")]
    pub player_side: TeamSide,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
    pub home_team: TeamData,
    pub away_team: TeamData,
}

#[derive(Debug, Deserialize)]
pub struct TeamData {
    pub name: String,
    pub abbreviation: String,
    pub lineup: Vec<Batter>,
    pub pitcher: Pitcher,
    #[serde(default)]
    pub bullpen: Vec<Pitcher>,
}

impl TeamData {
    fn into_roster(self) -> TeamRoster {
        TeamRoster {
            info: TeamInfo { name: self.name, abbreviation: self.abbreviation },
            lineup: self.lineup,
            pitcher: self.pitcher,
            bullpen: self.bullpen,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GameStateResponse {
    pub schema_version: u8,
    pub state: GameRecord,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub schema_version: u8,
    pub final_state: GameRecord,
    pub snapshots: Vec<GameRecord>,
}

/// Validate a request and build a ready-to-play engine from it.
pub fn build_engine(request: GameRequest) -> Result<GameEngine> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(GameError::InvalidSchemaVersion {
            expected: SCHEMA_VERSION,
            found: request.schema_version,
        });
    }
    let config = GameConfig {
        player_side: request.player_side,
        weather: request.weather,
        time_of_day: request.time_of_day,
        home: request.home_team.into_roster(),
        away: request.away_team.into_roster(),
    };
    let record = GameRecord::new(config)?;
    Ok(GameEngine::new(record, request.seed))
}

/// Create a game and return its initial state as JSON.
pub fn new_game_json(request_json: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request_json)?;
    let engine = build_engine(request)?;
    let response =
        GameStateResponse { schema_version: SCHEMA_VERSION, state: engine.snapshot() };
    Ok(serde_json::to_string(&response)?)
}

/// Create a game, run the CPU-vs-CPU driver to completion, and return the
/// final state plus the full snapshot replay as JSON.
pub fn simulate_game_json(request_json: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request_json)?;
    let mut engine = build_engine(request)?;
    let run = run_to_completion(&mut engine);
    let response = SimulationResponse {
        schema_version: SCHEMA_VERSION,
        final_state: run.final_state,
        snapshots: run.snapshots,
    };
    Ok(serde_json::to_string(&response)?)
}
