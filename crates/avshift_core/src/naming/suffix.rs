//! Four-digit numeric suffixes that keep repeated runs from colliding.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Smallest suffix handed out.
pub const SUFFIX_MIN: u32 = 1000;
/// Largest suffix handed out.
pub const SUFFIX_MAX: u32 = 9999;

/// Source of per-job output suffixes.
pub trait SuffixGenerator {
    /// Next suffix, always within `SUFFIX_MIN..=SUFFIX_MAX`.
    fn next_suffix(&mut self) -> u32;
}

/// Uniformly random suffixes, drawn independently per job.
///
/// Not cryptographic; two jobs may get the same value.
pub struct RandomSuffix {
    rng: StdRng,
}

impl RandomSuffix {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSuffix {
    fn default() -> Self {
        Self::new()
    }
}

impl SuffixGenerator for RandomSuffix {
    fn next_suffix(&mut self) -> u32 {
        self.rng.random_range(SUFFIX_MIN..=SUFFIX_MAX)
    }
}

/// Monotonic suffixes, wrapping back to `SUFFIX_MIN` after `SUFFIX_MAX`.
#[derive(Debug, Clone)]
pub struct CounterSuffix {
    next: u32,
}

impl CounterSuffix {
    /// Start counting at `start`, clamped into the suffix range.
    pub fn starting_at(start: u32) -> Self {
        Self {
            next: start.clamp(SUFFIX_MIN, SUFFIX_MAX),
        }
    }
}

impl Default for CounterSuffix {
    fn default() -> Self {
        Self::starting_at(SUFFIX_MIN)
    }
}

impl SuffixGenerator for CounterSuffix {
    fn next_suffix(&mut self) -> u32 {
        let current = self.next;
        self.next = if current >= SUFFIX_MAX {
            SUFFIX_MIN
        } else {
            current + 1
        };
        current
    }
}

/// Which suffix generator a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixStrategy {
    /// Random in `1000..=9999`.
    #[default]
    Random,
    /// 1000, 1001, ... per run.
    Counter,
}

impl SuffixStrategy {
    /// Create a fresh generator for one run.
    pub fn generator(&self) -> Box<dyn SuffixGenerator> {
        match self {
            SuffixStrategy::Random => Box::new(RandomSuffix::new()),
            SuffixStrategy::Counter => Box::new(CounterSuffix::default()),
        }
    }
}

impl std::fmt::Display for SuffixStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuffixStrategy::Random => write!(f, "random"),
            SuffixStrategy::Counter => write!(f, "counter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_stays_in_range() {
        let mut generator = RandomSuffix::seeded(7);
        for _ in 0..10_000 {
            let suffix = generator.next_suffix();
            assert!((SUFFIX_MIN..=SUFFIX_MAX).contains(&suffix));
        }
    }

    #[test]
    fn random_reaches_both_ends() {
        let mut generator = RandomSuffix::seeded(42);
        let drawn: Vec<u32> = (0..200_000).map(|_| generator.next_suffix()).collect();
        assert!(drawn.contains(&SUFFIX_MIN));
        assert!(drawn.contains(&SUFFIX_MAX));
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let a: Vec<u32> = {
            let mut g = RandomSuffix::seeded(1);
            (0..5).map(|_| g.next_suffix()).collect()
        };
        let b: Vec<u32> = {
            let mut g = RandomSuffix::seeded(1);
            (0..5).map(|_| g.next_suffix()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn counter_counts_and_wraps() {
        let mut counter = CounterSuffix::starting_at(9998);
        assert_eq!(counter.next_suffix(), 9998);
        assert_eq!(counter.next_suffix(), 9999);
        assert_eq!(counter.next_suffix(), 1000);
        assert_eq!(counter.next_suffix(), 1001);
    }

    #[test]
    fn counter_start_is_clamped() {
        assert_eq!(CounterSuffix::starting_at(5).next_suffix(), SUFFIX_MIN);
        assert_eq!(CounterSuffix::starting_at(50_000).next_suffix(), SUFFIX_MAX);
    }

    #[test]
    fn strategy_builds_matching_generator() {
        let mut counter = SuffixStrategy::Counter.generator();
        assert_eq!(counter.next_suffix(), 1000);
        assert_eq!(counter.next_suffix(), 1001);

        let mut random = SuffixStrategy::Random.generator();
        assert!((SUFFIX_MIN..=SUFFIX_MAX).contains(&random.next_suffix()));
    }
}
