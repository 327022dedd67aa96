//! Outcome-weight modifier pipeline.
//!
//! All functions are pure: they take a weight table plus one context value
//! and return an adjusted table, so each stage can be unit tested without a
//! full engine. Stages compose in a fixed order for a live swing:
//! base table -> stats -> fatigue -> weather -> time of day -> selection.
//! Order matters because later stages operate on already-adjusted weights.

use super::sampler::{RandomSource, WeightTable};
use super::tables;
use super::types::{Outcome, PitchType, TimeOfDay, Weather};
use crate::models::player::{BattingStats, PitchingStats};

// League baselines (approximate MLB averages).
pub const LEAGUE_AVG: f64 = 0.245;
pub const LEAGUE_SLG: f64 = 0.395;
pub const LEAGUE_K_RATE: f64 = 0.230;
pub const LEAGUE_HR_RATE: f64 = 0.034;
pub const LEAGUE_ERA: f64 = 4.30;
pub const LEAGUE_K_PER_9: f64 = 8.20;
pub const LEAGUE_BB_PER_9: f64 = 3.20;

/// Stat multipliers are capped at +/-50% of the league baseline.
const MAX_ADJ: f64 = 0.50;

/// A pitcher is fresh through this many pitches; beyond it, hitters start
/// squaring balls up.
pub const FATIGUE_THRESHOLD: u32 = 84;
const FATIGUE_HIT_STEP: f64 = 0.015;
const FATIGUE_HIT_CAP: f64 = 1.50;
const FATIGUE_WHIFF_FLOOR: f64 = 0.67;

const HIT_OUTCOMES: [Outcome; 4] =
    [Outcome::Single, Outcome::Double, Outcome::Triple, Outcome::Homerun];

fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

fn stat_mult(value: f64, baseline: f64) -> f64 {
    clamp(value / baseline, 1.0 - MAX_ADJ, 1.0 + MAX_ADJ)
}

/// Re-normalize so the adjusted table keeps the pre-adjustment total.
fn renormalize(table: &mut WeightTable<Outcome>, original_total: f64) {
    let adjusted_total = table.total();
    if adjusted_total > 0.0 {
        let scale = original_total / adjusted_total;
        for key in table.keys().collect::<Vec<_>>() {
            table.scale(key, scale);
        }
    }
}

/// Scale swing-outcome weights by how the batter (and optionally the
/// pitcher) compare to league averages. Good hitters gain hit weight, high
/// strikeout rates on either side feed the whiff weight, and the table is
/// re-normalized so its total survives the adjustment.
pub fn apply_stats_mod(
    table: &WeightTable<Outcome>,
    batter: &BattingStats,
    pitcher: Option<&PitchingStats>,
) -> WeightTable<Outcome> {
    let hit_mult = stat_mult(batter.avg, LEAGUE_AVG);
    let power_mult = stat_mult(batter.slg, LEAGUE_SLG);
    let k_mult = stat_mult(batter.k_rate, LEAGUE_K_RATE);
    let hr_mult = match batter.hr_rate {
        Some(rate) => stat_mult(rate, LEAGUE_HR_RATE),
        None => power_mult,
    };
    // Outs shrink as hitting ability grows.
    let out_mult = clamp(1.0 / hit_mult, 1.0 - MAX_ADJ, 1.0 + MAX_ADJ);

    let original_total = table.total();
    let mut adjusted = table.clone();
    adjusted.scale(Outcome::StrikeSwinging, k_mult);
    adjusted.scale(Outcome::Homerun, hr_mult);
    adjusted.scale(Outcome::Single, hit_mult);
    adjusted.scale(Outcome::Double, hit_mult);
    adjusted.scale(Outcome::Triple, hit_mult);
    adjusted.scale(Outcome::Groundout, out_mult);
    adjusted.scale(Outcome::Flyout, out_mult);
    adjusted.scale(Outcome::Lineout, out_mult);
    adjusted.scale(Outcome::Popout, out_mult);

    // Second layer: the pitcher's season line.
    if let Some(pitcher) = pitcher {
        let era_mult = stat_mult(pitcher.era, LEAGUE_ERA);
        let k9_mult = stat_mult(pitcher.k_per_9, LEAGUE_K_PER_9);
        adjusted.scale(Outcome::StrikeSwinging, k9_mult);
        for outcome in HIT_OUTCOMES {
            adjusted.scale(outcome, era_mult);
        }
    }

    renormalize(&mut adjusted, original_total);
    adjusted
}

/// Adjust take-outcome weights by the pitcher's command: a wild pitcher
/// (high BB/9) misses the zone more, a precise one fills it up.
pub fn apply_take_stats_mod(
    table: &WeightTable<Outcome>,
    pitcher: &PitchingStats,
) -> WeightTable<Outcome> {
    let bb_mult = stat_mult(pitcher.bb_per_9, LEAGUE_BB_PER_9);
    let strike_mult = clamp(1.0 / bb_mult, 1.0 - MAX_ADJ, 1.0 + MAX_ADJ);

    let original_total = table.total();
    let mut adjusted = table.clone();
    adjusted.scale(Outcome::Ball, bb_mult);
    adjusted.scale(Outcome::StrikeLooking, strike_mult);
    renormalize(&mut adjusted, original_total);
    adjusted
}

/// Tired pitchers give up harder contact. Identity through the threshold;
/// beyond it, hit weights grow with the pitch count and swinging strikes
/// shrink by the reciprocal.
pub fn apply_fatigue_mod(table: &WeightTable<Outcome>, pitch_count: u32) -> WeightTable<Outcome> {
    if pitch_count <= FATIGUE_THRESHOLD {
        return table.clone();
    }
    let over = f64::from(pitch_count - FATIGUE_THRESHOLD);
    let hit_factor = (1.0 + FATIGUE_HIT_STEP * over).min(FATIGUE_HIT_CAP);
    let whiff_factor = (1.0 / hit_factor).max(FATIGUE_WHIFF_FLOOR);

    let mut adjusted = table.clone();
    for outcome in HIT_OUTCOMES {
        adjusted.scale(outcome, hit_factor);
    }
    adjusted.scale(Outcome::StrikeSwinging, whiff_factor);
    adjusted
}

/// Weather effects. Wind moves homeruns, rain makes the ball hard to grip
/// and hard to whiff on, dome and clear skies change nothing.
pub fn apply_weather_mod(table: &WeightTable<Outcome>, weather: Weather) -> WeightTable<Outcome> {
    let mut adjusted = table.clone();
    match weather {
        Weather::WindOut => adjusted.scale(Outcome::Homerun, 1.30),
        Weather::WindIn => adjusted.scale(Outcome::Homerun, 0.70),
        Weather::Rain => {
            adjusted.scale(Outcome::Ball, 1.15);
            adjusted.scale(Outcome::StrikeSwinging, 0.90);
        }
        Weather::Clear | Weather::Dome => {}
    }
    adjusted
}

/// Time-of-day effects. Night games suppress hitting, day games help it,
/// twilight is a milder version of night.
pub fn apply_time_mod(
    table: &WeightTable<Outcome>,
    time_of_day: Option<TimeOfDay>,
) -> WeightTable<Outcome> {
    let mut adjusted = table.clone();
    match time_of_day {
        Some(TimeOfDay::Night) => {
            for outcome in HIT_OUTCOMES {
                adjusted.scale(outcome, 0.95);
            }
            adjusted.scale(Outcome::StrikeSwinging, 1.10);
            adjusted.scale(Outcome::Groundout, 1.05);
            adjusted.scale(Outcome::Flyout, 1.05);
        }
        Some(TimeOfDay::Day) => {
            for outcome in HIT_OUTCOMES {
                adjusted.scale(outcome, 1.03);
            }
            adjusted.scale(Outcome::StrikeSwinging, 0.95);
        }
        Some(TimeOfDay::Twilight) => {
            for outcome in HIT_OUTCOMES {
                adjusted.scale(outcome, 0.97);
            }
            adjusted.scale(Outcome::StrikeSwinging, 1.05);
        }
        None => {}
    }
    adjusted
}

/// Per-play chance that the defense boots a routine out. Twilight is the
/// hardest light to field in; night parks are lit for it.
pub fn error_chance(time_of_day: Option<TimeOfDay>) -> f64 {
    match time_of_day {
        Some(TimeOfDay::Day) => 0.04,
        Some(TimeOfDay::Twilight) => 0.06,
        Some(TimeOfDay::Night) => 0.02,
        None => 0.02,
    }
}

/// Full pipeline for a swing: base table for the pitch, then every
/// situational adjustment, then one weighted selection.
pub fn determine_swing_outcome(
    pitch: PitchType,
    batter: &BattingStats,
    pitcher: Option<&PitchingStats>,
    pitch_count: u32,
    weather: Weather,
    time_of_day: Option<TimeOfDay>,
    source: &mut dyn RandomSource,
) -> Outcome {
    let table = tables::swing_outcomes(pitch);
    let table = apply_stats_mod(&table, batter, pitcher);
    let table = apply_fatigue_mod(&table, pitch_count);
    let table = apply_weather_mod(&table, weather);
    let table = apply_time_mod(&table, time_of_day);
    table.pick(source)
}

/// Full pipeline for a take: only the pitcher's command and the weather
/// move the strike/ball split.
pub fn determine_take_outcome(
    pitch: PitchType,
    pitcher: Option<&PitchingStats>,
    weather: Weather,
    source: &mut dyn RandomSource,
) -> Outcome {
    let table = tables::take_outcomes(pitch);
    let table = match pitcher {
        Some(pitcher) => apply_take_stats_mod(&table, pitcher),
        None => table,
    };
    let table = apply_weather_mod(&table, weather);
    table.pick(source)
}
