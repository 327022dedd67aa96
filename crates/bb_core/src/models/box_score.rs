//! Box-score and scorecard record keeping.
//!
//! These structures are the stat sink of the simulation: every completed
//! plate appearance flows into a `BattingLine`, the current pitcher's
//! appearance line, and one `ScorecardEntry`.

use serde::{Deserialize, Serialize};

use super::player::Pitcher;

/// One batting line, aligned 1:1 with a lineup slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingLine {
    pub player_id: u32,
    pub name: String,
    /// At-bats (walks and sacrifices excluded).
    pub ab: u32,
    /// Runs scored.
    pub r: u32,
    /// Hits.
    pub h: u32,
    pub doubles: u32,
    pub triples: u32,
    pub hr: u32,
    pub rbi: u32,
    pub bb: u32,
    pub so: u32,
    /// Stolen bases. Never credited on caught stealing.
    pub sb: u32,
}

impl BattingLine {
    pub fn new(player_id: u32, name: &str) -> Self {
        BattingLine { player_id, name: name.to_string(), ..Default::default() }
    }
}

/// One pitching appearance, keyed to the pitcher currently on the mound.
/// Re-initialized on every pitching change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchingLine {
    pub player_id: u32,
    pub name: String,
    /// Outs recorded while this pitcher was on the mound.
    pub outs_recorded: u32,
    pub hits: u32,
    pub runs: u32,
    /// Runs scoring without a fielding error on the play.
    pub earned_runs: u32,
    pub walks: u32,
    pub strikeouts: u32,
}

impl PitchingLine {
    pub fn new(pitcher: &Pitcher) -> Self {
        PitchingLine {
            player_id: pitcher.id,
            name: pitcher.name.clone(),
            ..Default::default()
        }
    }

    /// Conventional innings-pitched notation, e.g. 7 outs -> "2.1".
    pub fn innings_pitched(&self) -> String {
        format!("{}.{}", self.outs_recorded / 3, self.outs_recorded % 3)
    }
}

/// Terminal classification of one completed plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorecardResult {
    Single,
    Double,
    Triple,
    Homerun,
    Walk,
    Strikeout,
    Groundout,
    Flyout,
    Lineout,
    Popout,
    DoublePlay,
    SacrificeOut,
    ReachedOnError,
}

/// One scorecard row: which batter did what, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardEntry {
    pub inning: usize,
    pub is_top: bool,
    /// Lineup slot (0-8) of the batter.
    pub batter_slot: usize,
    pub batter_name: String,
    pub result: ScorecardResult,
}
