pub mod json_api;

pub use json_api::{
    build_engine, new_game_json, simulate_game_json, GameRequest, GameStateResponse,
    SimulationResponse, TeamData,
};
