//! # bb_core - Deterministic Baseball Game Simulation Engine
//!
//! This library simulates a baseball game pitch by pitch between a
//! user-controlled side and a CPU-controlled side, driven by real-world
//! style player statistics and situational modifiers (pitcher fatigue,
//! weather, time of day, home/away splits).
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same replay)
//! - Weighted outcome tables adjusted by batter/pitcher stats
//! - Full rules state machine: counts, base running, double plays, steals,
//!   pickoffs, pitching changes, walk-offs, extra innings
//! - JSON API for easy integration with UI and persistence layers

// Probability pipelines thread several context values per call
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

// Re-export main API functions
pub use api::{
    build_engine, new_game_json, simulate_game_json, GameRequest, GameStateResponse,
    SimulationResponse, TeamData,
};
pub use error::{GameError, Result};

// Re-export the engine surface
pub use engine::{
    run_to_completion, AtBatAction, AtBatOptions, GameConfig, GameEngine, GameRecord, GameStatus,
    Outcome, PitchType, PlayerRole, RandomSource, ScriptedSource, SeededSource, SimulationRun,
    TimeOfDay, Weather, WeightTable, AUTO_REPLACE_PITCHES, TOTAL_INNINGS,
};

// Re-export model types
pub use models::{
    Batter, BattingLine, BattingStats, Pitcher, PitchingLine, PitchingStats, ScorecardEntry,
    ScorecardResult, Splits, TeamInfo, TeamRoster, TeamSide, LINEUP_SIZE,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
