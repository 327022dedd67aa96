use serde::{Deserialize, Serialize};

use super::player::{Batter, Pitcher};
use crate::error::{GameError, Result};

/// Batting lineups are fixed at the standard nine slots.
pub const LINEUP_SIZE: usize = 9;

/// Which club a team is designated as for this game.
///
/// The designation is fixed for the whole game and drives both role
/// derivation (home bats in bottom halves) and home/away stat-split
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamSide::Home => "home",
            TeamSide::Away => "away",
        }
    }
}

/// Display identity for one club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    /// Short code shown on the scoreboard, e.g. "NYY".
    pub abbreviation: String,
}

/// Everything one side brings to a game: identity, a nine-man batting
/// order, a starting pitcher, and an ordered list of eligible relievers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRoster {
    pub info: TeamInfo,
    pub lineup: Vec<Batter>,
    pub pitcher: Pitcher,
    #[serde(default)]
    pub bullpen: Vec<Pitcher>,
}

impl TeamRoster {
    pub fn validate(&self) -> Result<()> {
        if self.lineup.len() != LINEUP_SIZE {
            return Err(GameError::InvalidLineupSize {
                expected: LINEUP_SIZE,
                found: self.lineup.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::{BattingStats, PitchingStats};

    fn batter(name: &str) -> Batter {
        Batter {
            id: 1,
            name: name.to_string(),
            position: "CF".to_string(),
            stats: BattingStats { avg: 0.250, slg: 0.400, k_rate: 0.220, hr_rate: None },
            splits: None,
        }
    }

    fn roster(lineup_len: usize) -> TeamRoster {
        TeamRoster {
            info: TeamInfo { name: "Test Club".to_string(), abbreviation: "TST".to_string() },
            lineup: (0..lineup_len).map(|i| batter(&format!("Batter {}", i + 1))).collect(),
            pitcher: Pitcher {
                id: 99,
                name: "Starter".to_string(),
                stats: PitchingStats { era: 4.00, k_per_9: 8.0, bb_per_9: 3.0 },
                splits: None,
            },
            bullpen: Vec::new(),
        }
    }

    #[test]
    fn test_validate_accepts_nine_man_lineup() {
        assert!(roster(9).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_lineup() {
        let err = roster(7).validate().unwrap_err();
        assert!(err.to_string().contains("expected 9"), "unexpected error: {}", err);
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(TeamSide::Home.opponent(), TeamSide::Away);
        assert_eq!(TeamSide::Away.opponent(), TeamSide::Home);
    }
}
