//! The random-source seam.
//!
//! The generator never touches a global RNG. Every draw goes through a
//! `RandomSource` owned by the caller, so reproducibility is a property of
//! the source, and tests can substitute a scripted sequence without any
//! global state.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A deterministic stream of uniform integer draws.
///
/// Implementations must consume exactly one position of their underlying
/// stream per call — the generator's reproducibility contract counts draws,
/// not bytes.
pub trait RandomSource {
    /// Draw uniformly from `low..high` (half-open). `high` must exceed `low`.
    fn next_in(&mut self, low: u64, high: u64) -> u64;
}

/// The production source: a seeded `StdRng`.
///
/// Two `StdSource`s built from the same seed yield identical draw
/// sequences, which is what makes `generate` reproducible.
pub struct StdSource {
    rng: StdRng,
}

impl StdSource {
    /// Build a source from a seed value.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdSource {
    fn next_in(&mut self, low: u64, high: u64) -> u64 {
        self.rng.gen_range(low..high)
    }
}

/// A test double that replays a fixed sequence of draw values.
///
/// Each call pops the next scripted value. A value already inside the
/// requested range is returned verbatim, so scripts read as the intended
/// draws; an out-of-range value is folded in with a modulus. Panics when
/// the script runs out — an exhausted script in a test means the
/// draw-order expectation was wrong.
pub struct ScriptedSource {
    values: VecDeque<u64>,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Number of scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_in(&mut self, low: u64, high: u64) -> u64 {
        let value = self
            .values
            .pop_front()
            .unwrap_or_else(|| panic!("scripted random source exhausted at draw {}..{}", low, high));
        if (low..high).contains(&value) {
            value
        } else {
            low + value % (high - low)
        }
    }
}
