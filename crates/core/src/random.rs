use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform position draws for shuffling and re-insertion.
///
/// Injected into the generator and the session so that tests can run with a
/// fixed seed or a scripted sequence of picks.
pub trait RandomSource {
    /// Returns an index uniformly drawn from `0..len`.
    ///
    /// Returns 0 when `len` is 0; callers are expected to guard that case.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// `StdRng`-backed source, seeded once and then drawn from independently.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Seeds from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic source for tests and reproducible sessions.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Replays a fixed list of picks, each reduced modulo the requested length.
///
/// The script wraps around when exhausted; an empty script always picks 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    picks: Vec<usize>,
    cursor: usize,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(picks: impl Into<Vec<usize>>) -> Self {
        Self {
            picks: picks.into(),
            cursor: 0,
        }
    }

    /// Number of picks handed out so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 || self.picks.is_empty() {
            self.cursor += 1;
            return 0;
        }
        let pick = self.picks[self.cursor % self.picks.len()];
        self.cursor += 1;
        pick % len
    }
}

/// Seed used by tests that need a reproducible but non-trivial shuffle.
pub const FIXED_TEST_SEED: u64 = 1_700_000_000;

/// Returns a `SeededRandom` seeded with [`FIXED_TEST_SEED`].
#[must_use]
pub fn fixed_random() -> SeededRandom {
    SeededRandom::seeded(FIXED_TEST_SEED)
}
