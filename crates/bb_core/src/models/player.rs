//! Player identity and season statistics.
//!
//! Players are immutable inputs to the engine: rosters are supplied by an
//! external data layer and never mutated during a game. The only derived
//! view is "active stats", which picks the home or away split (when the
//! player carries splits) based on the player's own club designation.

use serde::{Deserialize, Serialize};

use super::team::TeamSide;

/// Season batting rates consumed by the outcome probability engine.
/// Fields missing from the input fall back to league averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattingStats {
    /// Batting average.
    #[serde(default = "default_avg")]
    pub avg: f64,
    /// Slugging percentage.
    #[serde(default = "default_slg")]
    pub slg: f64,
    /// Strikeouts per plate appearance.
    #[serde(default = "default_k_rate")]
    pub k_rate: f64,
    /// Home runs per plate appearance. Optional; when absent the slugging
    /// rate alone drives the homerun adjustment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_rate: Option<f64>,
}

impl BattingStats {
    /// Approximate MLB league averages, used as the fallback baseline when a
    /// plate appearance has no batter data to draw from.
    pub const LEAGUE_AVERAGE: BattingStats =
        BattingStats { avg: 0.245, slg: 0.395, k_rate: 0.230, hr_rate: None };
}

impl Default for BattingStats {
    fn default() -> Self {
        Self::LEAGUE_AVERAGE
    }
}

fn default_avg() -> f64 {
    BattingStats::LEAGUE_AVERAGE.avg
}

fn default_slg() -> f64 {
    BattingStats::LEAGUE_AVERAGE.slg
}

fn default_k_rate() -> f64 {
    BattingStats::LEAGUE_AVERAGE.k_rate
}

/// Season pitching rates consumed by the outcome probability engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchingStats {
    /// Earned run average.
    pub era: f64,
    /// Strikeouts per nine innings.
    pub k_per_9: f64,
    /// Walks per nine innings.
    pub bb_per_9: f64,
}

/// Home/away statistical splits, same shape as the season line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Splits<T> {
    pub home: T,
    pub away: T,
}

/// A position player in a batting lineup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batter {
    pub id: u32,
    pub name: String,
    /// Fielding position label, e.g. "SS", "CF", "DH".
    pub position: String,
    #[serde(default)]
    pub stats: BattingStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splits: Option<Splits<BattingStats>>,
}

impl Batter {
    /// Stats in effect for a plate appearance: the split matching this
    /// player's club designation when splits exist, else the season line.
    ///
    /// Resolved fresh at every lookup. Callers must not cache the result
    /// across batter or pitcher changes.
    pub fn active_stats(&self, side: TeamSide) -> &BattingStats {
        match (&self.splits, side) {
            (Some(splits), TeamSide::Home) => &splits.home,
            (Some(splits), TeamSide::Away) => &splits.away,
            (None, _) => &self.stats,
        }
    }
}

/// A pitcher, starter or reliever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pitcher {
    pub id: u32,
    pub name: String,
    pub stats: PitchingStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splits: Option<Splits<PitchingStats>>,
}

impl Pitcher {
    /// Stats in effect for the current outing, resolved the same way as
    /// [`Batter::active_stats`].
    pub fn active_stats(&self, side: TeamSide) -> &PitchingStats {
        match (&self.splits, side) {
            (Some(splits), TeamSide::Home) => &splits.home,
            (Some(splits), TeamSide::Away) => &splits.away,
            (None, _) => &self.stats,
        }
    }
}
