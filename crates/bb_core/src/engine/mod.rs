pub mod game;
pub mod modifiers;
pub mod policy;
pub mod sampler;
pub mod sim;
pub mod tables;
pub mod types;

pub use game::{
    AtBatOptions, GameConfig, GameEngine, GameRecord, AUTO_REPLACE_PITCHES, TOTAL_INNINGS,
};
pub use sampler::{RandomSource, ScriptedSource, SeededSource, WeightTable};
pub use sim::{run_to_completion, SimulationRun};
pub use types::{AtBatAction, GameStatus, Outcome, PitchType, PlayerRole, TimeOfDay, Weather};
