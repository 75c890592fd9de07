//! Injectable randomness for hazard placement
//!
//! Spawn code only needs two kinds of draw, so it takes a [`RandomSource`]
//! rather than a concrete generator. Any `rand::Rng` qualifies; tests use
//! [`ScriptedRng`] to replay an exact sequence.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub trait RandomSource {
    /// Uniform index in `0..n` (`n > 0`)
    fn index(&mut self, n: usize) -> usize;
    /// Fair coin
    fn coin(&mut self) -> bool;
}

impl<R: Rng> RandomSource for R {
    fn index(&mut self, n: usize) -> usize {
        self.random_range(0..n.max(1))
    }

    fn coin(&mut self) -> bool {
        self.random_bool(0.5)
    }
}

/// Seeded generator used for a run
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Draw up to `attempts` times until `accept` passes; otherwise keep the
/// last draw.
pub fn pick_with_retries<T, R: RandomSource + ?Sized>(
    rng: &mut R,
    attempts: u32,
    mut draw: impl FnMut(&mut R) -> T,
    accept: impl Fn(&T) -> bool,
) -> T {
    let mut candidate = draw(rng);
    let mut tries = 1;
    while !accept(&candidate) && tries < attempts.max(1) {
        candidate = draw(rng);
        tries += 1;
    }
    candidate
}

/// Replays a fixed script of draws; falls back to zero/false when empty
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    indices: VecDeque<usize>,
    coins: VecDeque<bool>,
}

impl ScriptedRng {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            coins: VecDeque::new(),
        }
    }

    pub fn with_coins(mut self, coins: impl IntoIterator<Item = bool>) -> Self {
        self.coins = coins.into_iter().collect();
        self
    }

    pub fn remaining(&self) -> usize {
        self.indices.len()
    }
}

impl RandomSource for ScriptedRng {
    fn index(&mut self, n: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % n.max(1)
    }

    fn coin(&mut self) -> bool {
        self.coins.pop_front().unwrap_or(false)
    }
}
