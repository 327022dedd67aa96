pub mod box_score;
pub mod player;
pub mod team;

pub use box_score::{BattingLine, PitchingLine, ScorecardEntry, ScorecardResult};
pub use player::{Batter, BattingStats, Pitcher, PitchingStats, Splits};
pub use team::{TeamInfo, TeamRoster, TeamSide, LINEUP_SIZE};
