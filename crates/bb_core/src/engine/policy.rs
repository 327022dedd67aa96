//! CPU decision policies.
//!
//! Both policies are pure functions of a single draw plus their inputs, so
//! the driver and the interactive paths stay reproducible under a scripted
//! random source.

use super::sampler::RandomSource;
use super::tables;
use super::types::PitchType;

/// Baseline swing rate. Real hitters offer at roughly half of all pitches;
/// a slightly higher rate keeps the simulated game moving.
pub const CPU_SWING_BASE: f64 = 0.60;

/// Protecting the plate with two strikes.
const TWO_STRIKE_BONUS: f64 = 0.20;

/// Working the walk with three balls.
const THREE_BALL_PENALTY: f64 = 0.15;

/// CPU pitcher picks a pitch type by weighted selection over the fixed
/// pitch mix. Only keys present in that distribution can come back.
pub fn cpu_picks_pitch(source: &mut dyn RandomSource) -> PitchType {
    tables::cpu_pitch_weights().pick(source)
}

/// CPU batter decides whether to swing: one draw against a threshold that
/// shifts with the count.
pub fn cpu_decides_swing(balls: u8, strikes: u8, source: &mut dyn RandomSource) -> bool {
    let mut threshold = CPU_SWING_BASE;
    if strikes >= 2 {
        threshold += TWO_STRIKE_BONUS;
    }
    if balls >= 3 {
        threshold -= THREE_BALL_PENALTY;
    }
    source.roll() < threshold
}
