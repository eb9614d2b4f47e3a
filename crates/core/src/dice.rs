//! Dice: the per-turn pool and the sources that roll it.
//! Every random outcome in a game flows through one `RollSource`, which keeps
//! seeded runs reproducible and lets tests script exact rolls.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::types::DiceError;

/// A d3 is a six-sided die with each face doubled.
const D3_FACES: [u8; 6] = [1, 1, 2, 2, 3, 3];

pub trait RollSource {
    /// Uniform over 1..=3.
    fn roll_d3(&mut self) -> u8;

    /// Uniform over `0..bound`; `bound` must be non-zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

pub struct SeededRolls {
    rng: ChaCha8Rng,
}

impl SeededRolls {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl RollSource for SeededRolls {
    fn roll_d3(&mut self) -> u8 {
        D3_FACES[(self.rng.next_u32() % 6) as usize]
    }

    fn next_index(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        (self.rng.next_u64() % bound as u64) as usize
    }
}

/// Replays a fixed list of d3 results, then falls back to a seeded stream.
/// Shuffles always use the seeded stream so scripts only describe dice.
pub struct ScriptedRolls {
    script: VecDeque<u8>,
    fallback: SeededRolls,
}

impl ScriptedRolls {
    pub fn new(seed: u64, script: impl IntoIterator<Item = u8>) -> Self {
        Self { script: script.into_iter().collect(), fallback: SeededRolls::new(seed) }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RollSource for ScriptedRolls {
    fn roll_d3(&mut self) -> u8 {
        match self.script.pop_front() {
            Some(value) => value.clamp(1, 3),
            None => self.fallback.roll_d3(),
        }
    }

    fn next_index(&mut self, bound: usize) -> usize {
        self.fallback.next_index(bound)
    }
}

/// The dice one player may still spend this turn. Order carries no meaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DicePool {
    rolled: Vec<u8>,
    remaining: Vec<u8>,
}

impl DicePool {
    pub fn new(rolled: Vec<u8>) -> Self {
        Self { remaining: rolled.clone(), rolled }
    }

    pub fn roll(count: usize, rolls: &mut dyn RollSource) -> Self {
        Self::new((0..count).map(|_| rolls.roll_d3()).collect())
    }

    pub fn has_remaining(&self) -> bool {
        !self.remaining.is_empty()
    }

    pub fn remaining(&self) -> &[u8] {
        &self.remaining
    }

    pub fn rolled(&self) -> &[u8] {
        &self.rolled
    }

    pub fn consume_one(&mut self, value: u8) -> Result<(), DiceError> {
        if take_one(&mut self.remaining, value) {
            Ok(())
        } else {
            Err(DiceError::InvalidConsumption(value))
        }
    }

    /// Consumes every value or none of them.
    pub fn consume_many(&mut self, values: &[u8]) -> Result<(), DiceError> {
        let mut scratch = self.remaining.clone();
        for &value in values {
            if !take_one(&mut scratch, value) {
                return Err(DiceError::InvalidConsumption(value));
            }
        }
        self.remaining = scratch;
        Ok(())
    }
}

fn take_one(values: &mut Vec<u8>, value: u8) -> bool {
    match values.iter().position(|candidate| *candidate == value) {
        Some(index) => {
            values.swap_remove(index);
            true
        }
        None => false,
    }
}
