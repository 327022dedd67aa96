//! The randomness seam and weighted selection.
//!
//! Every probability draw in the crate flows through one [`RandomSource`],
//! so tests can substitute deterministic sequences without touching the
//! rules code. There are no parallel random streams: the engine owns a
//! single source and threads it through every decision.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Single randomness seam for the whole engine.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn roll(&mut self) -> f64;
}

/// Production source: a seeded ChaCha stream. Same seed, same game.
pub struct SeededSource {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        SeededSource { rng: ChaCha8Rng::seed_from_u64(seed), seed }
    }

    /// The seed this source was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededSource {
    fn roll(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Deterministic draw sequence for tests. Yields the queued values in
/// order, then the fallback once the queue drains.
pub struct ScriptedSource {
    draws: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedSource {
    pub fn new(draws: &[f64]) -> Self {
        Self::with_fallback(draws, 0.999)
    }

    pub fn with_fallback(draws: &[f64], fallback: f64) -> Self {
        ScriptedSource { draws: draws.iter().copied().collect(), fallback }
    }
}

impl RandomSource for ScriptedSource {
    fn roll(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(self.fallback)
    }
}

/// An ordered key-to-weight mapping with stable iteration order.
///
/// Entry order is insertion order and never changes, so the cumulative
/// scan in [`WeightTable::pick`] walks keys in a fixed, reproducible
/// sequence. Zero-weight entries may exist in a table but are skipped by
/// the scan and can never be selected.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable<K: Copy + PartialEq> {
    entries: Vec<(K, f64)>,
}

impl<K: Copy + PartialEq> WeightTable<K> {
    pub fn new(entries: Vec<(K, f64)>) -> Self {
        WeightTable { entries }
    }

    pub fn get(&self, key: K) -> Option<f64> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, w)| *w)
    }

    /// Multiply one key's weight by `factor`. Missing keys are a no-op, so
    /// modifiers can be applied to any table without knowing its shape.
    pub fn scale(&mut self, key: K, factor: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 *= factor;
        }
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Weighted random selection: draw uniformly in `[0, total)` and return
    /// the first key whose cumulative weight exceeds the draw.
    ///
    /// Always returns a key present in the table. Panics only on an empty
    /// table, which the shipped base tables rule out.
    pub fn pick(&self, source: &mut dyn RandomSource) -> K {
        assert!(!self.entries.is_empty(), "cannot pick from an empty weight table");
        let total = self.total();
        let last_positive = self.entries.iter().rev().find(|(_, w)| *w > 0.0);
        let Some(&(last_key, _)) = last_positive else {
            // Degenerate all-zero table: fall back to the first key.
            return self.entries[0].0;
        };
        let draw = source.roll() * total;
        let mut cumulative = 0.0;
        for (key, weight) in &self.entries {
            if *weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            if draw < cumulative {
                return *key;
            }
        }
        // Floating-point edge where the draw lands on the total.
        last_key
    }
}
