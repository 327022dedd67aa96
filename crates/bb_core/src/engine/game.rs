//! Game state machine: the mutable game record plus the rules engine
//! operating on it.
//!
//! `GameRecord` is the single serializable aggregate the UI and persistence
//! layers consume; `GameEngine` owns one record together with the crate's
//! single random source and applies every rule to it. Invalid actions never
//! error out of the engine: they write an explanatory message to
//! `last_play` and leave every counted field untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::modifiers;
use super::policy;
use super::sampler::{RandomSource, SeededSource};
use super::tables;
use super::types::{
    AtBatAction, GameStatus, Outcome, PitchType, PlayerRole, TimeOfDay, Weather,
};
use crate::error::Result;
use crate::models::box_score::{BattingLine, PitchingLine, ScorecardEntry, ScorecardResult};
use crate::models::player::{Batter, Pitcher};
use crate::models::team::{TeamInfo, TeamRoster, TeamSide, LINEUP_SIZE};

/// Standard game length; tied games extend past this into extra innings.
pub const TOTAL_INNINGS: usize = 9;

/// Pitch count at which a CPU-managed pitcher is lifted for a reliever.
pub const AUTO_REPLACE_PITCHES: u32 = 100;

const DOUBLE_PLAY_CHANCE: f64 = 0.55;
const STEAL_SUCCESS: f64 = 0.70;
const STEAL_HOME_SUCCESS: f64 = 0.30;
const PICKOFF_SUCCESS: f64 = 0.15;

fn base_label(base_index: usize) -> &'static str {
    match base_index {
        0 => "1st",
        1 => "2nd",
        _ => "3rd",
    }
}

/// Everything needed to start a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Which club the user controls, fixed for the whole game.
    pub player_side: TeamSide,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
    pub home: TeamRoster,
    pub away: TeamRoster,
}

/// The complete, serializable game state. This shape is the contract the
/// UI and persistence layers consume; snapshots are deep copies of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    /// 1-indexed; exceeds 9 in extra innings.
    pub inning: usize,
    pub is_top: bool,
    pub outs: u8,
    pub balls: u8,
    pub strikes: u8,
    /// Occupied flags for 1st/2nd/3rd.
    pub bases: [bool; 3],
    /// Lineup slot of the runner on each base. Invariant: `base_runners[i]`
    /// is `Some` iff `bases[i]` is true.
    pub base_runners: [Option<usize>; 3],
    /// Per-inning run totals; index 0 is the 1st inning.
    pub away_score: Vec<u32>,
    pub home_score: Vec<u32>,
    pub away_total: u32,
    pub home_total: u32,
    pub away_hits: u32,
    pub home_hits: u32,
    pub away_errors: u32,
    pub home_errors: u32,
    pub away_team: TeamInfo,
    pub home_team: TeamInfo,
    pub away_lineup: Vec<Batter>,
    pub home_lineup: Vec<Batter>,
    /// Box-score lines aligned 1:1 with the lineups.
    pub away_box: Vec<BattingLine>,
    pub home_box: Vec<BattingLine>,
    pub away_batter_idx: usize,
    pub home_batter_idx: usize,
    /// Convenience fields for the UI: the batter currently at the plate.
    pub current_batter_index: usize,
    pub current_batter_name: String,
    pub home_pitcher: Pitcher,
    pub away_pitcher: Pitcher,
    pub home_pitching_line: PitchingLine,
    pub away_pitching_line: PitchingLine,
    pub home_pitch_count: u32,
    pub away_pitch_count: u32,
    /// Relievers still available, in the order they would enter.
    pub home_bullpen: Vec<Pitcher>,
    pub away_bullpen: Vec<Pitcher>,
    /// One entry per completed plate appearance.
    pub scorecard: Vec<ScorecardEntry>,
    pub play_log: Vec<String>,
    pub last_play: String,
    pub player_side: TeamSide,
    /// Derived from `player_side` and `is_top`; reassigned from that
    /// derivation at construction and at every half-inning flip, never set
    /// independently.
    pub player_role: PlayerRole,
    pub game_status: GameStatus,
    pub weather: Weather,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
}

impl GameRecord {
    pub fn new(config: GameConfig) -> Result<GameRecord> {
        config.home.validate()?;
        config.away.validate()?;
        let GameConfig { player_side, weather, time_of_day, home, away } = config;

        let home_box = home.lineup.iter().map(|b| BattingLine::new(b.id, &b.name)).collect();
        let away_box = away.lineup.iter().map(|b| BattingLine::new(b.id, &b.name)).collect();

        let mut record = GameRecord {
            game_id: Uuid::new_v4().to_string(),
            inning: 1,
            is_top: true,
            outs: 0,
            balls: 0,
            strikes: 0,
            bases: [false; 3],
            base_runners: [None; 3],
            away_score: vec![0; TOTAL_INNINGS],
            home_score: vec![0; TOTAL_INNINGS],
            away_total: 0,
            home_total: 0,
            away_hits: 0,
            home_hits: 0,
            away_errors: 0,
            home_errors: 0,
            away_team: away.info,
            home_team: home.info,
            away_lineup: away.lineup,
            home_lineup: home.lineup,
            away_box,
            home_box,
            away_batter_idx: 0,
            home_batter_idx: 0,
            current_batter_index: 0,
            current_batter_name: String::new(),
            home_pitching_line: PitchingLine::new(&home.pitcher),
            away_pitching_line: PitchingLine::new(&away.pitcher),
            home_pitcher: home.pitcher,
            away_pitcher: away.pitcher,
            home_pitch_count: 0,
            away_pitch_count: 0,
            home_bullpen: home.bullpen,
            away_bullpen: away.bullpen,
            scorecard: Vec::new(),
            play_log: Vec::new(),
            last_play: String::new(),
            player_side,
            player_role: Self::role_for(player_side, true),
            game_status: GameStatus::Active,
            weather,
            time_of_day,
        };
        record.refresh_current_batter();

        let (user, opponent) = match player_side {
            TeamSide::Home => (&record.home_team.name, &record.away_team.name),
            TeamSide::Away => (&record.away_team.name, &record.home_team.name),
        };
        let opener = format!("Play Ball! You're the {} vs the {}!", user, opponent);
        record.log(opener);
        Ok(record)
    }

    /// Pure role derivation: home bats in bottom halves, away in top halves.
    pub fn role_for(side: TeamSide, is_top: bool) -> PlayerRole {
        match (side, is_top) {
            (TeamSide::Home, true) => PlayerRole::Pitching,
            (TeamSide::Home, false) => PlayerRole::Batting,
            (TeamSide::Away, true) => PlayerRole::Batting,
            (TeamSide::Away, false) => PlayerRole::Pitching,
        }
    }

    pub fn batting_side(&self) -> TeamSide {
        if self.is_top {
            TeamSide::Away
        } else {
            TeamSide::Home
        }
    }

    pub fn pitching_side(&self) -> TeamSide {
        self.batting_side().opponent()
    }

    pub fn batting_lineup(&self) -> &[Batter] {
        match self.batting_side() {
            TeamSide::Home => &self.home_lineup,
            TeamSide::Away => &self.away_lineup,
        }
    }

    /// Lineup slot of the batter due up.
    pub fn batter_slot(&self) -> usize {
        let idx = match self.batting_side() {
            TeamSide::Home => self.home_batter_idx,
            TeamSide::Away => self.away_batter_idx,
        };
        idx % LINEUP_SIZE
    }

    pub fn current_batter(&self) -> &Batter {
        &self.batting_lineup()[self.batter_slot()]
    }

    pub fn pitcher(&self, side: TeamSide) -> &Pitcher {
        match side {
            TeamSide::Home => &self.home_pitcher,
            TeamSide::Away => &self.away_pitcher,
        }
    }

    pub fn team_info(&self, side: TeamSide) -> &TeamInfo {
        match side {
            TeamSide::Home => &self.home_team,
            TeamSide::Away => &self.away_team,
        }
    }

    pub fn pitch_count(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home_pitch_count,
            TeamSide::Away => self.away_pitch_count,
        }
    }

    fn pitch_count_mut(&mut self, side: TeamSide) -> &mut u32 {
        match side {
            TeamSide::Home => &mut self.home_pitch_count,
            TeamSide::Away => &mut self.away_pitch_count,
        }
    }

    /// Batting line for a slot in the lineup currently at bat.
    fn batting_line_mut(&mut self, slot: usize) -> &mut BattingLine {
        match self.batting_side() {
            TeamSide::Home => &mut self.home_box[slot],
            TeamSide::Away => &mut self.away_box[slot],
        }
    }

    /// Appearance line of the pitcher currently on the mound.
    fn pitching_line_mut(&mut self) -> &mut PitchingLine {
        match self.pitching_side() {
            TeamSide::Home => &mut self.home_pitching_line,
            TeamSide::Away => &mut self.away_pitching_line,
        }
    }

    fn log(&mut self, message: String) {
        self.last_play = message.clone();
        self.play_log.push(message);
    }

    /// Rejection channel: `last_play` only, no log entry, no counters.
    fn reject(&mut self, message: String) {
        self.last_play = message;
    }

    fn log_runs(&mut self, runs: usize) {
        let message = format!("{} run(s) score!", runs);
        self.play_log.push(message.clone());
        self.last_play = format!("{} {}", self.last_play, message);
    }

    fn reset_count(&mut self) {
        self.balls = 0;
        self.strikes = 0;
    }

    fn advance_batter(&mut self) {
        match self.batting_side() {
            TeamSide::Home => {
                self.home_batter_idx = (self.home_batter_idx + 1) % LINEUP_SIZE;
            }
            TeamSide::Away => {
                self.away_batter_idx = (self.away_batter_idx + 1) % LINEUP_SIZE;
            }
        }
    }

    fn refresh_current_batter(&mut self) {
        self.current_batter_index = self.batter_slot();
        self.current_batter_name = self.current_batter().name.clone();
    }

    /// Re-derive the occupancy flags from the runner slots, keeping the
    /// bases/base_runners invariant mechanical.
    fn sync_base_flags(&mut self) {
        for i in 0..3 {
            self.bases[i] = self.base_runners[i].is_some();
        }
    }

    fn push_scorecard(&mut self, batter_slot: usize, result: ScorecardResult) {
        let batter_name = self.batting_lineup()[batter_slot].name.clone();
        self.scorecard.push(ScorecardEntry {
            inning: self.inning,
            is_top: self.is_top,
            batter_slot,
            batter_name,
            result,
        });
    }
}

/// Test/debug hooks for at-bat resolution, passed explicitly per call.
#[derive(Default)]
pub struct AtBatOptions<'a> {
    /// Commit this outcome instead of sampling one. No random draws are
    /// consumed for pitch selection or outcome sampling when set.
    pub outcome_override: Option<Outcome>,
    /// Substitution applied to the sampled (or overridden) outcome before
    /// it is committed.
    pub outcome_filter: Option<&'a dyn Fn(Outcome) -> Outcome>,
}

/// The rules engine: one game record plus the single random source every
/// probability draw flows through.
pub struct GameEngine {
    record: GameRecord,
    rng: Box<dyn RandomSource>,
}

impl GameEngine {
    pub fn new(record: GameRecord, seed: u64) -> Self {
        GameEngine { record, rng: Box::new(SeededSource::new(seed)) }
    }

    /// Build an engine over an explicit random source (deterministic tests).
    pub fn with_source(record: GameRecord, source: Box<dyn RandomSource>) -> Self {
        GameEngine { record, rng: source }
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    /// Immutable deep copy of the current state.
    pub fn snapshot(&self) -> GameRecord {
        self.record.clone()
    }

    pub fn into_record(self) -> GameRecord {
        self.record
    }

    /// Mutating operations after the final out are strict no-ops;
    /// `last_play` already carries the final-score message.
    fn guard_active(&self) -> bool {
        self.record.game_status == GameStatus::Active
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// User is pitching: throw the named pitch to the CPU batter.
    pub fn process_pitch(&mut self, pitch_type: &str) {
        if !self.guard_active() {
            return;
        }
        if self.record.player_role != PlayerRole::Pitching {
            self.record.reject("You're batting right now, not pitching!".to_string());
            return;
        }
        let Ok(pitch) = pitch_type.parse::<PitchType>() else {
            self.record.reject(format!("Unknown pitch type: {}.", pitch_type));
            return;
        };
        let (balls, strikes) = (self.record.balls, self.record.strikes);
        let swings = policy::cpu_decides_swing(balls, strikes, self.rng.as_mut());
        self.resolve_live_pitch(pitch, swings, None);
    }

    /// User is batting: swing at, take, or bunt the CPU pitcher's offering.
    pub fn process_at_bat(&mut self, action: &str) {
        if !self.guard_active() {
            return;
        }
        let Ok(action) = action.parse::<AtBatAction>() else {
            self.record.reject(format!("Unknown at-bat action: {}.", action));
            return;
        };
        self.process_at_bat_with(action, AtBatOptions::default());
    }

    /// At-bat processing with explicit outcome hooks.
    pub fn process_at_bat_with(&mut self, action: AtBatAction, opts: AtBatOptions<'_>) {
        if !self.guard_active() {
            return;
        }
        if self.record.player_role != PlayerRole::Batting {
            self.record.reject("You're pitching right now, not batting!".to_string());
            return;
        }
        // The CPU manages its own bullpen before delivering the next pitch.
        self.maybe_auto_replace(self.record.pitching_side());

        match action {
            AtBatAction::Bunt => self.resolve_bunt(opts),
            AtBatAction::Swing | AtBatAction::Take => {
                let swings = action == AtBatAction::Swing;
                if let Some(outcome) = opts.outcome_override {
                    let outcome = match opts.outcome_filter {
                        Some(filter) => filter(outcome),
                        None => outcome,
                    };
                    let side = self.record.pitching_side();
                    *self.record.pitch_count_mut(side) += 1;
                    let word = if swings { "swing" } else { "take" };
                    let message = format!("You {}: {}!", word, outcome.headline());
                    self.apply_outcome(outcome, message);
                } else {
                    let pitch = policy::cpu_picks_pitch(self.rng.as_mut());
                    self.resolve_live_pitch(pitch, swings, opts.outcome_filter);
                }
            }
        }
    }

    /// Send the runner: base 0/1 steals 2nd/3rd, base 2 steals home.
    pub fn attempt_steal(&mut self, base_index: usize) {
        if !self.guard_active() {
            return;
        }
        if self.record.player_role != PlayerRole::Batting {
            self.record.reject("Can't steal while your team is in the field!".to_string());
            return;
        }
        match base_index {
            0 | 1 => {
                let Some(runner) = self.record.base_runners[base_index] else {
                    self.record
                        .reject(format!("Can't steal: no runner on {}.", base_label(base_index)));
                    return;
                };
                if self.record.base_runners[base_index + 1].is_some() {
                    self.record.reject(format!(
                        "Can't steal: {} is already occupied.",
                        base_label(base_index + 1)
                    ));
                    return;
                }
                let name = self.record.batting_lineup()[runner].name.clone();
                if self.rng.roll() < STEAL_SUCCESS {
                    self.record.base_runners[base_index + 1] = Some(runner);
                    self.record.base_runners[base_index] = None;
                    self.record.sync_base_flags();
                    self.record.batting_line_mut(runner).sb += 1;
                    self.record.log(format!("{} steals {}!", name, base_label(base_index + 1)));
                } else {
                    self.record.base_runners[base_index] = None;
                    self.record.sync_base_flags();
                    self.record_runner_out(format!("{} caught stealing!", name));
                }
            }
            2 => {
                let Some(runner) = self.record.base_runners[2] else {
                    self.record.reject("Can't steal home: no runner on 3rd.".to_string());
                    return;
                };
                let name = self.record.batting_lineup()[runner].name.clone();
                self.record.base_runners[2] = None;
                self.record.sync_base_flags();
                if self.rng.roll() < STEAL_HOME_SUCCESS {
                    self.record.batting_line_mut(runner).sb += 1;
                    self.record.log(format!("{} steals home!", name));
                    self.score_runs(&[runner], true, None);
                    self.check_walk_off();
                } else {
                    self.record_runner_out(format!("{} caught stealing home!", name));
                }
            }
            _ => self.record.reject("Can't steal: no such base.".to_string()),
        }
    }

    /// Throw over to the named base and try to catch the runner leaning.
    pub fn attempt_pickoff(&mut self, base_index: usize) {
        if !self.guard_active() {
            return;
        }
        if self.record.player_role != PlayerRole::Pitching {
            self.record
                .reject("You can only attempt a pickoff while pitching!".to_string());
            return;
        }
        let runner = if base_index < 3 { self.record.base_runners[base_index] } else { None };
        let Some(runner) = runner else {
            let message = if base_index < 3 {
                format!("Pickoff: no runner on {}.", base_label(base_index))
            } else {
                "Pickoff: no runner there.".to_string()
            };
            self.record.reject(message);
            return;
        };
        let name = self.record.batting_lineup()[runner].name.clone();
        if self.rng.roll() < PICKOFF_SUCCESS {
            self.record.base_runners[base_index] = None;
            self.record.sync_base_flags();
            self.record_runner_out(format!("Picked off! {} is caught leaning.", name));
        } else {
            self.record.log(format!(
                "Pickoff throw to {}... {} dives back safe.",
                base_label(base_index),
                name
            ));
        }
    }

    /// Bring in a reliever for the named side. Resets that side's pitch
    /// count and starts a fresh appearance line keyed to the new pitcher.
    pub fn switch_pitcher(&mut self, side: TeamSide, reliever: Pitcher) {
        if !self.guard_active() {
            return;
        }
        let team = self.record.team_info(side).name.clone();
        let message =
            format!("Pitching change: {} takes the mound for the {}.", reliever.name, team);
        debug!(side = side.as_str(), pitcher = %reliever.name, "pitching change");
        match side {
            TeamSide::Home => {
                self.record.home_pitching_line = PitchingLine::new(&reliever);
                self.record.home_pitcher = reliever;
                self.record.home_pitch_count = 0;
            }
            TeamSide::Away => {
                self.record.away_pitching_line = PitchingLine::new(&reliever);
                self.record.away_pitcher = reliever;
                self.record.away_pitch_count = 0;
            }
        }
        self.record.log(message);
    }

    /// One CPU-vs-CPU tick: both the pitch selection and the swing decision
    /// come from the CPU policies. Used only by the simulation driver.
    pub(crate) fn step_cpu(&mut self) {
        if !self.guard_active() {
            return;
        }
        let pitching_side = self.record.pitching_side();
        self.maybe_auto_replace(pitching_side);
        let pitch = policy::cpu_picks_pitch(self.rng.as_mut());
        let (balls, strikes) = (self.record.balls, self.record.strikes);
        let swings = policy::cpu_decides_swing(balls, strikes, self.rng.as_mut());
        self.resolve_live_pitch(pitch, swings, None);
    }

    // ========================================================================
    // Pitch resolution
    // ========================================================================

    fn maybe_auto_replace(&mut self, side: TeamSide) {
        if self.record.pitch_count(side) < AUTO_REPLACE_PITCHES {
            return;
        }
        let reliever = match side {
            TeamSide::Home if !self.record.home_bullpen.is_empty() => {
                Some(self.record.home_bullpen.remove(0))
            }
            TeamSide::Away if !self.record.away_bullpen.is_empty() => {
                Some(self.record.away_bullpen.remove(0))
            }
            _ => None,
        };
        if let Some(reliever) = reliever {
            info!(
                side = side.as_str(),
                reliever = %reliever.name,
                "pitch count reached the fatigue ceiling, going to the bullpen"
            );
            self.switch_pitcher(side, reliever);
        }
    }

    /// A live pitch: count it, run the probability pipeline, commit.
    fn resolve_live_pitch(
        &mut self,
        pitch: PitchType,
        swings: bool,
        filter: Option<&dyn Fn(Outcome) -> Outcome>,
    ) {
        let pitching_side = self.record.pitching_side();
        let batting_side = self.record.batting_side();
        *self.record.pitch_count_mut(pitching_side) += 1;

        // Active stats are resolved fresh for every pitch, never cached
        // across batter or pitcher changes.
        let batter_stats = *self.record.current_batter().active_stats(batting_side);
        let pitcher_stats = *self.record.pitcher(pitching_side).active_stats(pitching_side);
        let pitch_count = self.record.pitch_count(pitching_side);
        let weather = self.record.weather;
        let time_of_day = self.record.time_of_day;

        let outcome = if swings {
            modifiers::determine_swing_outcome(
                pitch,
                &batter_stats,
                Some(&pitcher_stats),
                pitch_count,
                weather,
                time_of_day,
                self.rng.as_mut(),
            )
        } else {
            modifiers::determine_take_outcome(
                pitch,
                Some(&pitcher_stats),
                weather,
                self.rng.as_mut(),
            )
        };
        let outcome = match filter {
            Some(filter) => filter(outcome),
            None => outcome,
        };

        let batter_name = self.record.current_batter().name.clone();
        let message = match self.record.player_role {
            PlayerRole::Pitching => {
                let word = if swings { "swings" } else { "takes" };
                format!("You throw a {}. {} {}: {}!", pitch, batter_name, word, outcome.headline())
            }
            PlayerRole::Batting => {
                let word = if swings { "swing" } else { "take" };
                format!("Pitcher throws a {}. You {}: {}!", pitch, word, outcome.headline())
            }
        };
        self.apply_outcome(outcome, message);
    }

    fn resolve_bunt(&mut self, opts: AtBatOptions<'_>) {
        let side = self.record.pitching_side();
        *self.record.pitch_count_mut(side) += 1;
        let outcome = match opts.outcome_override {
            Some(outcome) => outcome,
            None => tables::bunt_outcomes().pick(self.rng.as_mut()),
        };
        let outcome = match opts.outcome_filter {
            Some(filter) => filter(outcome),
            None => outcome,
        };
        self.record.log(format!("You square to bunt: {}!", outcome.headline()));
        match outcome {
            Outcome::SacrificeOut => self.sacrifice_bunt(),
            Outcome::Foul => {
                if self.record.strikes >= 2 {
                    self.bunt_foul_strikeout();
                } else {
                    self.record.strikes += 1;
                }
            }
            Outcome::Popout => self.bunt_popout(),
            Outcome::Single => self.bunt_single(),
            Outcome::Groundout => {
                // Plain out at first: no sacrifice advancement, no double play.
                let slot = self.record.batter_slot();
                self.record.batting_line_mut(slot).ab += 1;
                self.record.push_scorecard(slot, ScorecardResult::Groundout);
                self.record_batter_out("Groundout!".to_string());
            }
            other => self.dispatch_outcome(other),
        }
    }

    // ========================================================================
    // Outcome resolution (shared by the pitch and at-bat paths)
    // ========================================================================

    fn apply_outcome(&mut self, outcome: Outcome, message: String) {
        self.record.log(message);
        self.dispatch_outcome(outcome);
    }

    fn dispatch_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Ball => {
                self.record.balls += 1;
                if self.record.balls >= 4 {
                    self.walk();
                }
            }
            Outcome::StrikeLooking | Outcome::StrikeSwinging => {
                self.record.strikes += 1;
                if self.record.strikes >= 3 {
                    self.strikeout();
                }
            }
            Outcome::Foul => {
                // No strikeout on a foul: the count holds at two strikes.
                if self.record.strikes < 2 {
                    self.record.strikes += 1;
                }
            }
            Outcome::Single | Outcome::Double | Outcome::Triple | Outcome::Homerun => {
                self.record_hit(outcome);
            }
            Outcome::Groundout | Outcome::Flyout | Outcome::Lineout | Outcome::Popout => {
                self.resolve_field_out(outcome);
            }
            Outcome::SacrificeOut => self.sacrifice_bunt(),
        }
    }

    /// Ball four: the batter takes 1st and only forced runners move up.
    fn walk(&mut self) {
        let slot = self.record.batter_slot();
        let name = self.record.current_batter().name.clone();
        self.record.log(format!("Ball four! {} walks.", name));

        let forced_home = self.record.bases[0] && self.record.bases[1] && self.record.bases[2];
        let scorer = if forced_home { self.record.base_runners[2] } else { None };
        if self.record.bases[0] && self.record.bases[1] {
            self.record.base_runners[2] = self.record.base_runners[1];
        }
        if self.record.bases[0] {
            self.record.base_runners[1] = self.record.base_runners[0];
        }
        self.record.base_runners[0] = Some(slot);
        self.record.sync_base_flags();

        self.record.batting_line_mut(slot).bb += 1;
        self.record.pitching_line_mut().walks += 1;
        self.record.push_scorecard(slot, ScorecardResult::Walk);
        if let Some(runner) = scorer {
            self.score_runs(&[runner], true, Some(slot));
            self.record.log_runs(1);
        }
        self.record.reset_count();
        self.record.advance_batter();
        self.record.refresh_current_batter();
        self.check_walk_off();
    }

    fn strikeout(&mut self) {
        let slot = self.record.batter_slot();
        {
            let line = self.record.batting_line_mut(slot);
            line.ab += 1;
            line.so += 1;
        }
        self.record.pitching_line_mut().strikeouts += 1;
        self.record.push_scorecard(slot, ScorecardResult::Strikeout);
        self.record_batter_out("Strikeout!".to_string());
    }

    /// A base hit: every runner advances by the hit's base count, scoring
    /// past home, and the batter takes the awarded base.
    fn record_hit(&mut self, hit: Outcome) {
        let slot = self.record.batter_slot();
        let advance = hit.bases_awarded();

        let mut scorers = Vec::new();
        let mut new_runners: [Option<usize>; 3] = [None; 3];
        for base in (0..3).rev() {
            if let Some(runner) = self.record.base_runners[base] {
                let destination = base + advance;
                if destination >= 3 {
                    scorers.push(runner);
                } else {
                    new_runners[destination] = Some(runner);
                }
            }
        }
        if advance >= 4 {
            scorers.push(slot);
        } else {
            new_runners[advance - 1] = Some(slot);
        }
        self.record.base_runners = new_runners;
        self.record.sync_base_flags();

        {
            let line = self.record.batting_line_mut(slot);
            line.ab += 1;
            line.h += 1;
            match hit {
                Outcome::Double => line.doubles += 1,
                Outcome::Triple => line.triples += 1,
                Outcome::Homerun => line.hr += 1,
                _ => {}
            }
        }
        match self.record.batting_side() {
            TeamSide::Home => self.record.home_hits += 1,
            TeamSide::Away => self.record.away_hits += 1,
        }
        self.record.pitching_line_mut().hits += 1;
        let result = match hit {
            Outcome::Double => ScorecardResult::Double,
            Outcome::Triple => ScorecardResult::Triple,
            Outcome::Homerun => ScorecardResult::Homerun,
            _ => ScorecardResult::Single,
        };
        self.record.push_scorecard(slot, result);

        let runs = scorers.len();
        self.score_runs(&scorers, true, Some(slot));
        if runs > 0 {
            self.record.log_runs(runs);
        }
        self.record.reset_count();
        self.record.advance_batter();
        self.record.refresh_current_batter();
        self.check_walk_off();
    }

    /// A ball put in play for a routine out, which the defense may boot and
    /// which may turn into a double play.
    fn resolve_field_out(&mut self, out_type: Outcome) {
        let error_p = modifiers::error_chance(self.record.time_of_day);
        if self.rng.roll() < error_p {
            self.reached_on_error();
            return;
        }
        let slot = self.record.batter_slot();
        self.record.batting_line_mut(slot).ab += 1;
        if out_type == Outcome::Groundout && self.record.bases[0] && self.record.outs < 2 {
            if self.rng.roll() < DOUBLE_PLAY_CHANCE {
                self.double_play(slot);
                return;
            }
        }
        let result = match out_type {
            Outcome::Flyout => ScorecardResult::Flyout,
            Outcome::Lineout => ScorecardResult::Lineout,
            Outcome::Popout => ScorecardResult::Popout,
            _ => ScorecardResult::Groundout,
        };
        self.record.push_scorecard(slot, result);
        self.record_batter_out(format!("{}!", out_type.headline()));
    }

    /// Ground ball, runner on 1st, fewer than two down: twin killing. The
    /// batter and the lead runner are both retired, the runner on 2nd moves
    /// to 3rd, and a runner on 3rd comes home.
    fn double_play(&mut self, batter_slot: usize) {
        let name = self.record.batting_lineup()[batter_slot].name.clone();
        let scorer = self.record.base_runners[2];
        self.record.base_runners[0] = None;
        self.record.base_runners[2] = self.record.base_runners[1];
        self.record.base_runners[1] = None;
        self.record.sync_base_flags();
        self.record.outs += 2;
        self.record.pitching_line_mut().outs_recorded += 2;
        self.record.push_scorecard(batter_slot, ScorecardResult::DoublePlay);
        self.record.log(format!("Double play! {} grounds into two.", name));
        if let Some(runner) = scorer {
            self.score_runs(&[runner], true, Some(batter_slot));
            self.record.log_runs(1);
        }
        self.record.reset_count();
        self.record.advance_batter();
        self.check_walk_off();
        if !self.guard_active() {
            return;
        }
        if self.record.outs >= 3 {
            self.end_half_inning();
        } else {
            self.record.refresh_current_batter();
        }
    }

    /// The defense boots a routine out: the batter reaches 1st and every
    /// runner moves up one base. A team error, not a hit, and any run that
    /// scores is unearned.
    fn reached_on_error(&mut self) {
        let slot = self.record.batter_slot();
        let name = self.record.current_batter().name.clone();
        match self.record.pitching_side() {
            TeamSide::Home => self.record.home_errors += 1,
            TeamSide::Away => self.record.away_errors += 1,
        }
        self.record.batting_line_mut(slot).ab += 1;

        let scorer = self.record.base_runners[2];
        self.record.base_runners[2] = self.record.base_runners[1];
        self.record.base_runners[1] = self.record.base_runners[0];
        self.record.base_runners[0] = Some(slot);
        self.record.sync_base_flags();

        self.record.push_scorecard(slot, ScorecardResult::ReachedOnError);
        self.record.log(format!("Error on the play! {} reaches base.", name));
        if let Some(runner) = scorer {
            self.score_runs(&[runner], false, None);
            self.record.log_runs(1);
        }
        self.record.reset_count();
        self.record.advance_batter();
        self.record.refresh_current_batter();
        self.check_walk_off();
    }

    /// Successful sacrifice: every runner moves up exactly one base and the
    /// batter is retired without being charged an at-bat.
    fn sacrifice_bunt(&mut self) {
        let slot = self.record.batter_slot();
        let scorer = self.record.base_runners[2];
        self.record.base_runners[2] = self.record.base_runners[1];
        self.record.base_runners[1] = self.record.base_runners[0];
        self.record.base_runners[0] = None;
        self.record.sync_base_flags();
        self.record.push_scorecard(slot, ScorecardResult::SacrificeOut);

        let scored = scorer.is_some();
        if let Some(runner) = scorer {
            self.score_runs(&[runner], true, Some(slot));
        }
        self.record.log("Sacrifice bunt!".to_string());
        if scored {
            self.record.log_runs(1);
        }
        self.check_walk_off();
        if !self.guard_active() {
            return;
        }
        self.finish_batter_out();
    }

    fn bunt_foul_strikeout(&mut self) {
        let slot = self.record.batter_slot();
        {
            let line = self.record.batting_line_mut(slot);
            line.ab += 1;
            line.so += 1;
        }
        self.record.pitching_line_mut().strikeouts += 1;
        self.record.push_scorecard(slot, ScorecardResult::Strikeout);
        self.record_batter_out("Bunt foul with two strikes! Strikeout!".to_string());
    }

    /// Bunt popped straight up: one out, every runner holds.
    fn bunt_popout(&mut self) {
        let slot = self.record.batter_slot();
        self.record.batting_line_mut(slot).ab += 1;
        self.record.push_scorecard(slot, ScorecardResult::Popout);
        self.record_batter_out("Bunt popped up! Runners hold.".to_string());
    }

    /// Bunt legged out for a hit: the batter takes 1st and every runner
    /// moves up exactly one base.
    fn bunt_single(&mut self) {
        let slot = self.record.batter_slot();
        let name = self.record.current_batter().name.clone();
        let scorer = self.record.base_runners[2];
        self.record.base_runners[2] = self.record.base_runners[1];
        self.record.base_runners[1] = self.record.base_runners[0];
        self.record.base_runners[0] = Some(slot);
        self.record.sync_base_flags();

        {
            let line = self.record.batting_line_mut(slot);
            line.ab += 1;
            line.h += 1;
        }
        match self.record.batting_side() {
            TeamSide::Home => self.record.home_hits += 1,
            TeamSide::Away => self.record.away_hits += 1,
        }
        self.record.pitching_line_mut().hits += 1;
        self.record.push_scorecard(slot, ScorecardResult::Single);
        self.record.log(format!("Bunt single! {} beats it out.", name));
        if let Some(runner) = scorer {
            self.score_runs(&[runner], true, Some(slot));
            self.record.log_runs(1);
        }
        self.record.reset_count();
        self.record.advance_batter();
        self.record.refresh_current_batter();
        self.check_walk_off();
    }

    // ========================================================================
    // Outs, runs, and termination
    // ========================================================================

    /// A plate-appearance-ending out: log it, then close out the at-bat.
    fn record_batter_out(&mut self, description: String) {
        self.record.log(description);
        self.finish_batter_out();
    }

    fn finish_batter_out(&mut self) {
        self.record.outs += 1;
        self.record.pitching_line_mut().outs_recorded += 1;
        self.record.reset_count();
        // The lineup picks up at the right spot next time this team bats,
        // so advance before any half-inning transition.
        self.record.advance_batter();
        if self.record.outs >= 3 {
            self.end_half_inning();
        } else {
            self.record.refresh_current_batter();
        }
    }

    /// A base-running out (caught stealing, pickoff). The at-bat continues,
    /// so the count and batter stay put.
    fn record_runner_out(&mut self, description: String) {
        self.record.log(description);
        self.record.outs += 1;
        self.record.pitching_line_mut().outs_recorded += 1;
        if self.record.outs >= 3 {
            self.end_half_inning();
        }
    }

    /// Pure bookkeeping for runs crossing the plate; callers log and then
    /// run the walk-off check themselves.
    fn score_runs(&mut self, scorers: &[usize], earned: bool, rbi_slot: Option<usize>) {
        let runs = scorers.len() as u32;
        if runs == 0 {
            return;
        }
        let inning_idx = self.record.inning - 1;
        let batting = self.record.batting_side();
        {
            let score = match batting {
                TeamSide::Home => &mut self.record.home_score,
                TeamSide::Away => &mut self.record.away_score,
            };
            while score.len() <= inning_idx {
                score.push(0);
            }
            score[inning_idx] += runs;
        }
        match batting {
            TeamSide::Home => self.record.home_total += runs,
            TeamSide::Away => self.record.away_total += runs,
        }
        for &scorer in scorers {
            self.record.batting_line_mut(scorer).r += 1;
        }
        if let Some(slot) = rbi_slot {
            self.record.batting_line_mut(slot).rbi += runs;
        }
        let line = self.record.pitching_line_mut();
        line.runs += runs;
        if earned {
            line.earned_runs += runs;
        }
    }

    /// A go-ahead home run in the bottom of the 9th or later ends the game
    /// on the spot, before three outs are recorded.
    fn check_walk_off(&mut self) {
        if !self.guard_active() {
            return;
        }
        if !self.record.is_top
            && self.record.inning >= TOTAL_INNINGS
            && self.record.home_total > self.record.away_total
        {
            self.end_game();
        }
    }

    fn end_half_inning(&mut self) {
        self.record.outs = 0;
        self.record.reset_count();
        self.record.base_runners = [None; 3];
        self.record.sync_base_flags();

        let banner;
        if self.record.is_top {
            self.record.is_top = false;
            self.record.player_role = GameRecord::role_for(self.record.player_side, false);
            // Home already ahead entering its half of the 9th: no need to bat.
            if self.record.inning >= TOTAL_INNINGS
                && self.record.home_total > self.record.away_total
            {
                self.end_game();
                return;
            }
            banner = format!("--- Bottom of inning {} ---", self.record.inning);
        } else {
            self.record.inning += 1;
            self.record.is_top = true;
            self.record.player_role = GameRecord::role_for(self.record.player_side, true);
            // A completed 9th (or later) with the scores apart ends it;
            // tied games keep going.
            if self.record.inning > TOTAL_INNINGS
                && self.record.home_total != self.record.away_total
            {
                self.end_game();
                return;
            }
            if self.record.inning > self.record.away_score.len() {
                self.record.away_score.push(0);
                self.record.home_score.push(0);
            }
            banner = format!("--- Top of inning {} ---", self.record.inning);
        }
        debug!(
            inning = self.record.inning,
            is_top = self.record.is_top,
            "half-inning transition"
        );
        self.record.refresh_current_batter();
        self.record.log(banner);
    }

    /// Transition to `final`, exactly once, and log the verdict from the
    /// user's perspective.
    fn end_game(&mut self) {
        if self.record.game_status == GameStatus::Final {
            return;
        }
        self.record.game_status = GameStatus::Final;
        let (user_total, opponent_total) = match self.record.player_side {
            TeamSide::Home => (self.record.home_total, self.record.away_total),
            TeamSide::Away => (self.record.away_total, self.record.home_total),
        };
        let verdict = if user_total > opponent_total { "You win!" } else { "You lose!" };
        let message = format!(
            "Game Over! Final: {} {} - {} {}. {}",
            self.record.home_team.name,
            self.record.home_total,
            self.record.away_team.name,
            self.record.away_total,
            verdict
        );
        info!(
            home = self.record.home_total,
            away = self.record.away_total,
            inning = self.record.inning,
            "game final"
        );
        self.record.log(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sampler::ScriptedSource;
    use crate::models::player::{BattingStats, PitchingStats};

    fn batter(slot: usize, name: &str) -> Batter {
        Batter {
            id: slot as u32 + 1,
            name: name.to_string(),
            position: "CF".to_string(),
            stats: BattingStats { avg: 0.250, slg: 0.400, k_rate: 0.220, hr_rate: None },
            splits: None,
        }
    }

    fn pitcher(id: u32, name: &str) -> Pitcher {
        Pitcher {
            id,
            name: name.to_string(),
            stats: PitchingStats { era: 4.00, k_per_9: 8.5, bb_per_9: 3.0 },
            splits: None,
        }
    }

    fn roster(label: &str, abbreviation: &str, pitcher_id: u32) -> TeamRoster {
        TeamRoster {
            info: TeamInfo { name: label.to_string(), abbreviation: abbreviation.to_string() },
            lineup: (0..LINEUP_SIZE).map(|i| batter(i, &format!("{} {}", label, i + 1))).collect(),
            pitcher: pitcher(pitcher_id, &format!("{} Starter", label)),
            bullpen: vec![
                pitcher(pitcher_id + 1, &format!("{} Reliever A", label)),
                pitcher(pitcher_id + 2, &format!("{} Reliever B", label)),
            ],
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            player_side: TeamSide::Home,
            weather: Weather::Clear,
            time_of_day: None,
            home: roster("Home", "HOM", 100),
            away: roster("Away", "AWY", 200),
        }
    }

    fn engine_with(draws: &[f64]) -> GameEngine {
        let record = GameRecord::new(config()).unwrap();
        GameEngine::with_source(record, Box::new(ScriptedSource::new(draws)))
    }

    /// Move the game to the bottom half so the (home) user is batting.
    fn to_bottom(engine: &mut GameEngine) {
        engine.record.is_top = false;
        engine.record.player_role =
            GameRecord::role_for(engine.record.player_side, false);
        engine.record.refresh_current_batter();
    }

    fn put_runner(engine: &mut GameEngine, base: usize, slot: usize) {
        engine.record.base_runners[base] = Some(slot);
        engine.record.sync_base_flags();
    }

    fn override_at_bat(engine: &mut GameEngine, outcome: Outcome) {
        engine.process_at_bat_with(
            AtBatAction::Take,
            AtBatOptions { outcome_override: Some(outcome), outcome_filter: None },
        );
    }

    fn assert_base_invariant(record: &GameRecord) {
        for i in 0..3 {
            assert_eq!(
                record.bases[i],
                record.base_runners[i].is_some(),
                "base {} occupancy flag out of sync with its runner slot",
                i
            );
        }
    }

    #[test]
    fn test_new_game_starts_top_of_first_with_away_batting() {
        let record = GameRecord::new(config()).unwrap();
        assert_eq!(record.inning, 1);
        assert!(record.is_top);
        assert_eq!(record.player_role, PlayerRole::Pitching);
        assert_eq!(record.batting_side(), TeamSide::Away);
        assert_eq!(record.current_batter_name, "Away 1");
        assert!(record.last_play.contains("Play Ball!"));
        assert_eq!(record.away_score.len(), TOTAL_INNINGS);
    }

    #[test]
    fn test_role_derivation_matches_side_and_half() {
        assert_eq!(GameRecord::role_for(TeamSide::Home, true), PlayerRole::Pitching);
        assert_eq!(GameRecord::role_for(TeamSide::Home, false), PlayerRole::Batting);
        assert_eq!(GameRecord::role_for(TeamSide::Away, true), PlayerRole::Batting);
        assert_eq!(GameRecord::role_for(TeamSide::Away, false), PlayerRole::Pitching);
    }

    #[test]
    fn test_three_balls_do_not_walk_but_four_do() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        for _ in 0..3 {
            override_at_bat(&mut engine, Outcome::Ball);
        }
        assert_eq!(engine.record().balls, 3);
        assert!(!engine.record().bases[0], "three balls alone must not award a base");

        override_at_bat(&mut engine, Outcome::Ball);
        let record = engine.record();
        assert_eq!(record.balls, 0, "count resets after the walk");
        assert!(record.bases[0]);
        assert_eq!(record.base_runners[0], Some(0));
        assert_eq!(record.home_box[0].bb, 1);
        assert_eq!(record.away_pitching_line.walks, 1);
        assert_eq!(record.home_batter_idx, 1);
        assert!(record.last_play.contains("walks"));
        assert_base_invariant(record);
    }

    #[test]
    fn test_bases_loaded_walk_forces_in_a_run() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 0, 6);
        put_runner(&mut engine, 1, 7);
        put_runner(&mut engine, 2, 8);
        engine.record.balls = 3;
        override_at_bat(&mut engine, Outcome::Ball);
        let record = engine.record();
        assert_eq!(record.home_total, 1);
        assert_eq!(record.home_box[8].r, 1, "the runner from 3rd scores");
        assert_eq!(record.home_box[0].rbi, 1, "the batter is credited the RBI");
        assert_eq!(record.base_runners, [Some(0), Some(6), Some(7)]);
        assert_base_invariant(record);
    }

    #[test]
    fn test_two_strikes_hold_and_three_strike_out() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        override_at_bat(&mut engine, Outcome::StrikeSwinging);
        override_at_bat(&mut engine, Outcome::StrikeLooking);
        assert_eq!(engine.record().strikes, 2);
        assert_eq!(engine.record().outs, 0, "two strikes alone must not retire anyone");

        override_at_bat(&mut engine, Outcome::StrikeSwinging);
        let record = engine.record();
        assert_eq!(record.strikes, 0);
        assert_eq!(record.outs, 1);
        assert_eq!(record.home_box[0].so, 1);
        assert_eq!(record.home_box[0].ab, 1);
        assert_eq!(record.away_pitching_line.strikeouts, 1);
        assert_eq!(record.away_pitching_line.outs_recorded, 1);
        assert!(record.last_play.contains("Strikeout"));
        assert_eq!(record.scorecard.last().unwrap().result, ScorecardResult::Strikeout);
    }

    #[test]
    fn test_foul_never_produces_strike_three() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        override_at_bat(&mut engine, Outcome::Foul);
        override_at_bat(&mut engine, Outcome::Foul);
        assert_eq!(engine.record().strikes, 2);
        override_at_bat(&mut engine, Outcome::Foul);
        let record = engine.record();
        assert_eq!(record.strikes, 2, "a foul at two strikes leaves the count alone");
        assert_eq!(record.outs, 0);
    }

    #[test]
    fn test_single_advances_each_runner_one_base() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 1, 5);
        override_at_bat(&mut engine, Outcome::Single);
        let record = engine.record();
        assert_eq!(record.base_runners, [Some(0), None, Some(5)]);
        assert_eq!(record.home_total, 0);
        assert_eq!(record.home_hits, 1);
        assert_eq!(record.home_box[0].h, 1);
        assert_eq!(record.away_pitching_line.hits, 1);
        assert_base_invariant(record);
    }

    #[test]
    fn test_double_scores_from_second_and_first_goes_to_third() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 0, 4);
        put_runner(&mut engine, 1, 5);
        override_at_bat(&mut engine, Outcome::Double);
        let record = engine.record();
        assert_eq!(record.base_runners, [None, Some(0), Some(4)]);
        assert_eq!(record.home_total, 1, "the runner from 2nd comes around");
        assert_eq!(record.home_box[5].r, 1);
        assert_eq!(record.home_box[0].rbi, 1);
        assert_eq!(record.home_box[0].doubles, 1);
        assert_base_invariant(record);
    }

    #[test]
    fn test_homerun_clears_the_bases_and_scores_the_batter() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 0, 3);
        put_runner(&mut engine, 2, 4);
        override_at_bat(&mut engine, Outcome::Homerun);
        let record = engine.record();
        assert_eq!(record.bases, [false, false, false]);
        assert_eq!(record.home_total, 3);
        assert_eq!(record.home_box[0].hr, 1);
        assert_eq!(record.home_box[0].r, 1, "the batter rounds the bases too");
        assert_eq!(record.home_box[0].rbi, 3);
        assert!(record.last_play.contains("3 run(s) score!"));
    }

    #[test]
    fn test_double_play_round_trip() {
        let mut engine = engine_with(&[0.9, 0.1]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 0, 5);
        assert_eq!(engine.record().outs, 0);
        // Draw 1 (0.9) fails the error roll, draw 2 (0.1) succeeds the
        // double-play roll.
        override_at_bat(&mut engine, Outcome::Groundout);
        let record = engine.record();
        assert_eq!(record.outs, 2);
        assert_eq!(record.bases, [false, false, false]);
        assert_eq!(record.away_pitching_line.outs_recorded, 2);
        assert!(record.scorecard.iter().any(|e| e.result == ScorecardResult::DoublePlay));
        assert!(record.play_log.iter().any(|m| m.contains("Double play")));
        assert_base_invariant(record);
    }

    #[test]
    fn test_double_play_moves_trailing_runners_and_scores_third() {
        let mut engine = engine_with(&[0.9, 0.1]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 0, 4);
        put_runner(&mut engine, 1, 5);
        put_runner(&mut engine, 2, 6);
        override_at_bat(&mut engine, Outcome::Groundout);
        let record = engine.record();
        assert_eq!(record.outs, 2);
        assert_eq!(record.base_runners, [None, None, Some(5)], "2nd moves up, 1st is erased");
        assert_eq!(record.home_total, 1, "the runner from 3rd comes home");
        assert_eq!(record.home_box[0].rbi, 1);
    }

    #[test]
    fn test_no_double_play_with_two_outs() {
        let mut engine = engine_with(&[0.9, 0.0]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 0, 5);
        engine.record.outs = 2;
        override_at_bat(&mut engine, Outcome::Groundout);
        let record = engine.record();
        // Exactly one out: the third, which ends the half-inning.
        assert_eq!(record.away_pitching_line.outs_recorded, 1);
        assert_eq!(record.outs, 0, "half-inning rolled over");
        assert_eq!(record.inning, 2);
        assert!(record.is_top);
        assert!(!record.scorecard.iter().any(|e| e.result == ScorecardResult::DoublePlay));
    }

    #[test]
    fn test_fielding_error_puts_the_batter_on_and_charges_the_defense() {
        // Error chance with no time of day is 0.02; a 0.01 draw boots it.
        let mut engine = engine_with(&[0.01]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 2, 6);
        override_at_bat(&mut engine, Outcome::Groundout);
        let record = engine.record();
        assert_eq!(record.outs, 0);
        assert_eq!(record.away_errors, 1, "the defense is charged the error");
        assert_eq!(record.base_runners[0], Some(0));
        assert_eq!(record.home_total, 1);
        assert_eq!(record.home_box[0].h, 0, "an error is not a hit");
        assert_eq!(record.away_pitching_line.runs, 1);
        assert_eq!(record.away_pitching_line.earned_runs, 0, "error runs are unearned");
        assert!(record.scorecard.iter().any(|e| e.result == ScorecardResult::ReachedOnError));
    }

    #[test]
    fn test_sacrifice_bunt_trades_an_out_for_the_advance() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 0, 4);
        engine.process_at_bat_with(
            AtBatAction::Bunt,
            AtBatOptions { outcome_override: Some(Outcome::SacrificeOut), outcome_filter: None },
        );
        let record = engine.record();
        assert_eq!(record.outs, 1);
        assert_eq!(record.base_runners, [None, Some(4), None]);
        assert_eq!(record.home_box[0].ab, 0, "no at-bat charged on a sacrifice");
        assert_eq!(record.away_pitching_line.outs_recorded, 1);
        assert!(record.play_log.iter().any(|m| m.contains("Sacrifice bunt")));
        assert_eq!(record.scorecard.last().unwrap().result, ScorecardResult::SacrificeOut);
    }

    #[test]
    fn test_sacrifice_bunt_scores_from_third_with_rbi() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 2, 8);
        engine.process_at_bat_with(
            AtBatAction::Bunt,
            AtBatOptions { outcome_override: Some(Outcome::SacrificeOut), outcome_filter: None },
        );
        let record = engine.record();
        assert_eq!(record.home_total, 1);
        assert_eq!(record.home_box[0].rbi, 1);
        assert!(record.play_log.iter().any(|m| m.contains("run(s) score")));
    }

    #[test]
    fn test_bunt_foul_with_two_strikes_is_a_strikeout() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        engine.record.strikes = 2;
        engine.process_at_bat_with(
            AtBatAction::Bunt,
            AtBatOptions { outcome_override: Some(Outcome::Foul), outcome_filter: None },
        );
        let record = engine.record();
        assert_eq!(record.outs, 1);
        assert_eq!(record.home_box[0].so, 1);
        assert!(record.play_log.iter().any(|m| m.contains("Bunt foul with two strikes")));
    }

    #[test]
    fn test_bunt_foul_below_two_strikes_adds_a_strike() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        engine.process_at_bat_with(
            AtBatAction::Bunt,
            AtBatOptions { outcome_override: Some(Outcome::Foul), outcome_filter: None },
        );
        assert_eq!(engine.record().strikes, 1);
        assert_eq!(engine.record().outs, 0);
    }

    #[test]
    fn test_bunt_popout_holds_runners() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 1, 5);
        engine.process_at_bat_with(
            AtBatAction::Bunt,
            AtBatOptions { outcome_override: Some(Outcome::Popout), outcome_filter: None },
        );
        let record = engine.record();
        assert_eq!(record.outs, 1);
        assert_eq!(record.base_runners, [None, Some(5), None], "nobody moves on a bunt popout");
    }

    #[test]
    fn test_bunt_single_moves_everyone_one_base() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 1, 5);
        engine.process_at_bat_with(
            AtBatAction::Bunt,
            AtBatOptions { outcome_override: Some(Outcome::Single), outcome_filter: None },
        );
        let record = engine.record();
        assert_eq!(record.base_runners, [Some(0), None, Some(5)]);
        assert_eq!(record.home_box[0].h, 1, "a bunt single is a hit");
        assert_eq!(record.home_hits, 1);
    }

    #[test]
    fn test_outcome_filter_rewrites_the_sampled_outcome() {
        let suppress_extra_bases = |outcome: Outcome| match outcome {
            Outcome::Double | Outcome::Triple | Outcome::Homerun => Outcome::Single,
            other => other,
        };
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        engine.process_at_bat_with(
            AtBatAction::Swing,
            AtBatOptions {
                outcome_override: Some(Outcome::Homerun),
                outcome_filter: Some(&suppress_extra_bases),
            },
        );
        let record = engine.record();
        assert_eq!(record.home_box[0].hr, 0);
        assert_eq!(record.home_box[0].h, 1, "the homerun was filtered down to a single");
        assert_eq!(record.base_runners[0], Some(0));
    }

    #[test]
    fn test_steal_second_success_and_failure_boundaries() {
        // 0.69 < 0.70 succeeds.
        let mut engine = engine_with(&[0.69]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 0, 3);
        engine.attempt_steal(0);
        let record = engine.record();
        assert_eq!(record.base_runners, [None, Some(3), None]);
        assert_eq!(record.home_box[3].sb, 1);
        assert!(record.last_play.contains("steals 2nd"));

        // 0.70 is caught.
        let mut engine = engine_with(&[0.70]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 0, 3);
        engine.attempt_steal(0);
        let record = engine.record();
        assert_eq!(record.bases, [false, false, false]);
        assert_eq!(record.outs, 1);
        assert_eq!(record.home_box[3].sb, 0, "no stolen base on caught stealing");
        assert!(record.last_play.contains("caught stealing"));
    }

    #[test]
    fn test_steal_home_uses_the_thirty_percent_threshold() {
        let mut engine = engine_with(&[0.29]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 2, 7);
        engine.attempt_steal(2);
        let record = engine.record();
        assert_eq!(record.home_total, 1);
        assert_eq!(record.home_box[7].sb, 1);
        assert_eq!(record.home_box[7].r, 1);
        assert!(record.last_play.contains("steals home"));

        let mut engine = engine_with(&[0.30]);
        to_bottom(&mut engine);
        put_runner(&mut engine, 2, 7);
        engine.attempt_steal(2);
        let record = engine.record();
        assert_eq!(record.home_total, 0);
        assert_eq!(record.outs, 1);
        assert_eq!(record.home_box[7].sb, 0);
        assert!(record.last_play.contains("caught stealing home"));
    }

    #[test]
    fn test_steal_rejections_leave_state_untouched() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        let log_len = engine.record().play_log.len();
        engine.attempt_steal(0);
        assert!(engine.record().last_play.contains("Can't steal"));
        engine.attempt_steal(2);
        assert!(engine.record().last_play.contains("no runner on 3rd"));
        let record = engine.record();
        assert_eq!(record.outs, 0);
        assert_eq!(record.play_log.len(), log_len, "rejections never hit the play log");
    }

    #[test]
    fn test_pickoff_boundaries_and_rejections() {
        // Top of the 1st: the home user is pitching, away runner on 1st.
        let mut engine = engine_with(&[0.14]);
        put_runner(&mut engine, 0, 2);
        engine.attempt_pickoff(0);
        let record = engine.record();
        assert_eq!(record.outs, 1);
        assert!(!record.bases[0]);
        assert!(record.last_play.contains("Picked off"));

        let mut engine = engine_with(&[0.15]);
        put_runner(&mut engine, 0, 2);
        engine.attempt_pickoff(0);
        let record = engine.record();
        assert_eq!(record.outs, 0);
        assert!(record.bases[0], "the runner dives back on a failed pickoff");
        assert!(record.last_play.contains("safe"));

        let mut engine = engine_with(&[]);
        engine.attempt_pickoff(1);
        assert!(engine.record().last_play.contains("no runner"));
        to_bottom(&mut engine);
        engine.attempt_pickoff(0);
        assert!(engine
            .record()
            .last_play
            .contains("only attempt a pickoff while pitching"));
    }

    #[test]
    fn test_steal_or_pickoff_out_can_end_the_half_inning() {
        let mut engine = engine_with(&[0.99]);
        to_bottom(&mut engine);
        engine.record.outs = 2;
        put_runner(&mut engine, 0, 3);
        engine.attempt_steal(0);
        let record = engine.record();
        assert_eq!(record.outs, 0, "the third out rolled the half-inning over");
        assert_eq!(record.inning, 2);
        assert!(record.is_top);
        assert_eq!(record.bases, [false, false, false]);
    }

    #[test]
    fn test_switch_pitcher_resets_count_and_appearance_line() {
        let mut engine = engine_with(&[]);
        engine.record.away_pitch_count = 57;
        engine.record.away_pitching_line.strikeouts = 4;
        let reliever = pitcher(900, "Fresh Arm");
        engine.switch_pitcher(TeamSide::Away, reliever);
        let record = engine.record();
        assert_eq!(record.away_pitch_count, 0);
        assert_eq!(record.away_pitcher.name, "Fresh Arm");
        assert_eq!(record.away_pitching_line.player_id, 900);
        assert_eq!(record.away_pitching_line.strikeouts, 0, "fresh appearance line");
        assert!(record.last_play.contains("Pitching change"));
    }

    #[test]
    fn test_auto_replacement_at_one_hundred_pitches() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        engine.record.away_pitch_count = AUTO_REPLACE_PITCHES;
        let first_reliever = engine.record.away_bullpen[0].name.clone();
        override_at_bat(&mut engine, Outcome::Ball);
        let record = engine.record();
        assert_eq!(record.away_pitcher.name, first_reliever);
        assert_eq!(record.away_pitch_count, 1, "reset, then the one pitch just thrown");
        assert_eq!(record.away_bullpen.len(), 1);
    }

    #[test]
    fn test_walk_off_ends_the_game_mid_inning() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        engine.record.inning = 9;
        engine.record.away_total = 3;
        engine.record.home_total = 3;
        put_runner(&mut engine, 2, 6);
        override_at_bat(&mut engine, Outcome::Single);
        let record = engine.record();
        assert_eq!(record.game_status, GameStatus::Final);
        assert_eq!(record.home_total, 4);
        assert!(record.last_play.contains("You win!"));
    }

    #[test]
    fn test_no_walk_off_while_away_still_leads() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        engine.record.inning = 9;
        engine.record.away_total = 5;
        engine.record.home_total = 2;
        put_runner(&mut engine, 2, 6);
        override_at_bat(&mut engine, Outcome::Single);
        let record = engine.record();
        assert_eq!(record.game_status, GameStatus::Active, "home still trails, play on");
        assert_eq!(record.home_total, 3);
    }

    #[test]
    fn test_home_lead_after_top_nine_skips_the_bottom() {
        let mut engine = engine_with(&[]);
        engine.record.inning = 9;
        engine.record.home_total = 5;
        engine.record.away_total = 3;
        engine.record.home_score[0] = 5;
        engine.record.away_score[0] = 3;
        engine.record.outs = 2;
        engine.record_batter_out("Flyout!".to_string());
        let record = engine.record();
        assert_eq!(record.game_status, GameStatus::Final);
        assert!(record.last_play.contains("You win!"));
        assert!(!record.is_top, "the half flag flips, but the bottom is never played");
        assert_eq!(record.home_total, 5, "no bottom-half runs were added");
    }

    #[test]
    fn test_tied_game_goes_to_extra_innings() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        engine.record.inning = 9;
        engine.record.away_total = 4;
        engine.record.home_total = 4;
        engine.record.outs = 2;
        engine.record_batter_out("Groundout!".to_string());
        let record = engine.record();
        assert_eq!(record.game_status, GameStatus::Active, "ties are never terminal");
        assert_eq!(record.inning, 10);
        assert!(record.is_top);
        assert_eq!(record.away_score.len(), 10, "line score grew a 10th frame");
        assert_eq!(record.home_score.len(), 10);
    }

    #[test]
    fn test_completed_ninth_with_a_lead_ends_the_game() {
        let mut engine = engine_with(&[]);
        to_bottom(&mut engine);
        engine.record.inning = 9;
        engine.record.away_total = 6;
        engine.record.home_total = 4;
        engine.record.outs = 2;
        engine.record_batter_out("Groundout!".to_string());
        let record = engine.record();
        assert_eq!(record.game_status, GameStatus::Final);
        assert!(record.last_play.contains("You lose!"));
    }

    #[test]
    fn test_wrong_role_rejections_touch_only_last_play() {
        let mut engine = engine_with(&[]);
        let log_len = engine.record().play_log.len();
        // Top of the 1st: the home user pitches, so batting is rejected.
        engine.process_at_bat("swing");
        assert!(engine.record().last_play.contains("not batting"));
        to_bottom(&mut engine);
        engine.process_pitch("fastball");
        assert!(engine.record().last_play.contains("not pitching"));
        let record = engine.record();
        assert_eq!(record.balls, 0);
        assert_eq!(record.strikes, 0);
        assert_eq!(record.outs, 0);
        assert_eq!(record.home_pitch_count, 0);
        assert_eq!(record.away_pitch_count, 0);
        assert_eq!(record.play_log.len(), log_len);
    }

    #[test]
    fn test_unknown_inputs_are_recoverable_rejections() {
        let mut engine = engine_with(&[]);
        engine.process_pitch("eephus");
        assert!(engine.record().last_play.contains("Unknown pitch type"));
        to_bottom(&mut engine);
        engine.process_at_bat("steal");
        assert!(engine.record().last_play.contains("Unknown at-bat action"));
        assert_eq!(engine.record().outs, 0);
    }

    #[test]
    fn test_operations_after_final_are_no_ops() {
        let mut engine = engine_with(&[]);
        engine.end_game();
        let frozen = engine.snapshot();
        engine.process_pitch("fastball");
        engine.process_at_bat("swing");
        engine.attempt_steal(0);
        engine.attempt_pickoff(0);
        engine.switch_pitcher(TeamSide::Home, pitcher(901, "Too Late"));
        let record = engine.record();
        assert_eq!(record.last_play, frozen.last_play);
        assert_eq!(record.play_log.len(), frozen.play_log.len());
        assert_eq!(record.home_pitcher.name, frozen.home_pitcher.name);
    }

    #[test]
    fn test_half_inning_transition_resets_everything() {
        let mut engine = engine_with(&[]);
        put_runner(&mut engine, 0, 1);
        put_runner(&mut engine, 2, 2);
        engine.record.balls = 2;
        engine.record.strikes = 1;
        engine.record.outs = 2;
        engine.record_runner_out("Picked off!".to_string());
        let record = engine.record();
        assert_eq!(record.outs, 0);
        assert_eq!(record.balls, 0);
        assert_eq!(record.strikes, 0);
        assert_eq!(record.bases, [false, false, false]);
        assert_eq!(record.base_runners, [None, None, None]);
        assert!(!record.is_top);
        assert_eq!(record.player_role, PlayerRole::Batting, "home user bats in the bottom");
        assert!(record.last_play.contains("Bottom of inning 1"));
    }
}
