//! Base outcome probability tables.
//!
//! Weights are relative, not percentages, though each shipped table totals
//! 100 so the numbers read as rough probabilities. Pitch-specific shapes
//! follow real tendencies: fastballs are easier to square up (fewer whiffs,
//! harder contact), curveballs miss the most bats, sliders draw fouls,
//! changeups induce weak ground contact. For takes, breaking pitches miss
//! the zone more often than fastballs.

use once_cell::sync::Lazy;

use super::sampler::WeightTable;
use super::types::{Outcome, PitchType};

/// How often the CPU pitcher throws each pitch, roughly matching the real
/// league-wide pitch mix.
static CPU_PITCH_WEIGHTS: Lazy<WeightTable<PitchType>> = Lazy::new(|| {
    WeightTable::new(vec![
        (PitchType::Fastball, 50.0),
        (PitchType::Slider, 20.0),
        (PitchType::Curveball, 15.0),
        (PitchType::Changeup, 15.0),
    ])
});

static SWING_FASTBALL: Lazy<WeightTable<Outcome>> = Lazy::new(|| {
    WeightTable::new(vec![
        (Outcome::StrikeSwinging, 25.0),
        (Outcome::Foul, 20.0),
        (Outcome::Groundout, 14.0),
        (Outcome::Flyout, 11.0),
        (Outcome::Lineout, 4.0),
        (Outcome::Popout, 3.0),
        (Outcome::Single, 12.0),
        (Outcome::Double, 5.0),
        (Outcome::Triple, 1.0),
        (Outcome::Homerun, 5.0),
    ])
});

static SWING_CURVEBALL: Lazy<WeightTable<Outcome>> = Lazy::new(|| {
    WeightTable::new(vec![
        (Outcome::StrikeSwinging, 35.0),
        (Outcome::Foul, 15.0),
        (Outcome::Groundout, 14.0),
        (Outcome::Flyout, 9.0),
        (Outcome::Lineout, 4.0),
        (Outcome::Popout, 3.0),
        (Outcome::Single, 10.0),
        (Outcome::Double, 4.0),
        (Outcome::Triple, 1.0),
        (Outcome::Homerun, 5.0),
    ])
});

static SWING_SLIDER: Lazy<WeightTable<Outcome>> = Lazy::new(|| {
    WeightTable::new(vec![
        (Outcome::StrikeSwinging, 30.0),
        (Outcome::Foul, 18.0),
        (Outcome::Groundout, 15.0),
        (Outcome::Flyout, 9.0),
        (Outcome::Lineout, 4.0),
        (Outcome::Popout, 3.0),
        (Outcome::Single, 11.0),
        (Outcome::Double, 4.0),
        (Outcome::Triple, 1.0),
        (Outcome::Homerun, 5.0),
    ])
});

static SWING_CHANGEUP: Lazy<WeightTable<Outcome>> = Lazy::new(|| {
    WeightTable::new(vec![
        (Outcome::StrikeSwinging, 28.0),
        (Outcome::Foul, 17.0),
        (Outcome::Groundout, 16.0),
        (Outcome::Flyout, 10.0),
        (Outcome::Lineout, 4.0),
        (Outcome::Popout, 3.0),
        (Outcome::Single, 11.0),
        (Outcome::Double, 5.0),
        (Outcome::Triple, 1.0),
        (Outcome::Homerun, 5.0),
    ])
});

static TAKE_FASTBALL: Lazy<WeightTable<Outcome>> = Lazy::new(|| {
    WeightTable::new(vec![(Outcome::StrikeLooking, 55.0), (Outcome::Ball, 45.0)])
});

static TAKE_CURVEBALL: Lazy<WeightTable<Outcome>> = Lazy::new(|| {
    WeightTable::new(vec![(Outcome::StrikeLooking, 35.0), (Outcome::Ball, 65.0)])
});

static TAKE_SLIDER: Lazy<WeightTable<Outcome>> = Lazy::new(|| {
    WeightTable::new(vec![(Outcome::StrikeLooking, 40.0), (Outcome::Ball, 60.0)])
});

static TAKE_CHANGEUP: Lazy<WeightTable<Outcome>> = Lazy::new(|| {
    WeightTable::new(vec![(Outcome::StrikeLooking, 40.0), (Outcome::Ball, 60.0)])
});

/// One table for every bunt attempt regardless of pitch type. Weights sum
/// to exactly 100 and every entry is strictly positive.
static BUNT_OUTCOMES: Lazy<WeightTable<Outcome>> = Lazy::new(|| {
    WeightTable::new(vec![
        (Outcome::SacrificeOut, 45.0),
        (Outcome::Foul, 20.0),
        (Outcome::Popout, 12.0),
        (Outcome::Single, 8.0),
        (Outcome::Groundout, 15.0),
    ])
});

pub fn cpu_pitch_weights() -> &'static WeightTable<PitchType> {
    &CPU_PITCH_WEIGHTS
}

/// Outcome weights for a swing at the given pitch type.
pub fn swing_outcomes(pitch: PitchType) -> WeightTable<Outcome> {
    match pitch {
        PitchType::Fastball => SWING_FASTBALL.clone(),
        PitchType::Curveball => SWING_CURVEBALL.clone(),
        PitchType::Slider => SWING_SLIDER.clone(),
        PitchType::Changeup => SWING_CHANGEUP.clone(),
    }
}

/// Outcome weights for taking the given pitch type.
pub fn take_outcomes(pitch: PitchType) -> WeightTable<Outcome> {
    match pitch {
        PitchType::Fastball => TAKE_FASTBALL.clone(),
        PitchType::Curveball => TAKE_CURVEBALL.clone(),
        PitchType::Slider => TAKE_SLIDER.clone(),
        PitchType::Changeup => TAKE_CHANGEUP.clone(),
    }
}

/// Outcome weights for a bunt attempt.
pub fn bunt_outcomes() -> WeightTable<Outcome> {
    BUNT_OUTCOMES.clone()
}
