//! Closed vocabularies shared across the engine.
//!
//! The serde names of these enums are part of the stable snapshot contract:
//! the UI and persistence layers match on the snake_case strings, so renames
//! here are breaking changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four pitch types the engine models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchType {
    Fastball,
    Curveball,
    Slider,
    Changeup,
}

impl PitchType {
    pub const ALL: [PitchType; 4] =
        [PitchType::Fastball, PitchType::Curveball, PitchType::Slider, PitchType::Changeup];

    pub fn as_str(&self) -> &'static str {
        match self {
            PitchType::Fastball => "fastball",
            PitchType::Curveball => "curveball",
            PitchType::Slider => "slider",
            PitchType::Changeup => "changeup",
        }
    }
}

impl fmt::Display for PitchType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PitchType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fastball" => Ok(PitchType::Fastball),
            "curveball" => Ok(PitchType::Curveball),
            "slider" => Ok(PitchType::Slider),
            "changeup" => Ok(PitchType::Changeup),
            _ => Err(()),
        }
    }
}

/// Every discrete play outcome the probability engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ball,
    StrikeLooking,
    StrikeSwinging,
    Foul,
    Groundout,
    Flyout,
    Lineout,
    Popout,
    Single,
    Double,
    Triple,
    Homerun,
    /// Bunt-only: the batter is retired while every runner moves up.
    SacrificeOut,
}

impl Outcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, Outcome::Single | Outcome::Double | Outcome::Triple | Outcome::Homerun)
    }

    /// Batted-ball outs that can be booted for an error.
    pub fn is_field_out(&self) -> bool {
        matches!(self, Outcome::Groundout | Outcome::Flyout | Outcome::Lineout | Outcome::Popout)
    }

    /// Bases the batter is awarded on a hit (homerun rounds all four).
    pub fn bases_awarded(&self) -> usize {
        match self {
            Outcome::Single => 1,
            Outcome::Double => 2,
            Outcome::Triple => 3,
            Outcome::Homerun => 4,
            _ => 0,
        }
    }

    /// Title-case form used in play-log messages, e.g. "Strike Swinging".
    pub fn headline(&self) -> &'static str {
        match self {
            Outcome::Ball => "Ball",
            Outcome::StrikeLooking => "Strike Looking",
            Outcome::StrikeSwinging => "Strike Swinging",
            Outcome::Foul => "Foul",
            Outcome::Groundout => "Groundout",
            Outcome::Flyout => "Flyout",
            Outcome::Lineout => "Lineout",
            Outcome::Popout => "Popout",
            Outcome::Single => "Single",
            Outcome::Double => "Double",
            Outcome::Triple => "Triple",
            Outcome::Homerun => "Homerun",
            Outcome::SacrificeOut => "Sacrifice Out",
        }
    }
}

/// What the batting side chooses to do with the incoming pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtBatAction {
    Swing,
    Take,
    Bunt,
}

impl FromStr for AtBatAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "swing" => Ok(AtBatAction::Swing),
            "take" => Ok(AtBatAction::Take),
            "bunt" => Ok(AtBatAction::Bunt),
            _ => Err(()),
        }
    }
}

/// Ballpark weather for the game. Clear and dome leave the outcome tables
/// untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    WindOut,
    WindIn,
    Rain,
    Dome,
}

/// Scheduled start window for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Day,
    Twilight,
    Night,
}

/// What the user-controlled side is doing in the current half-inning.
/// Always derived from the user's side and the half-inning flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Pitching,
    Batting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Active,
    Final,
}
