use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of every random roll in a battle.
///
/// The engine never reaches for a global generator; a `BattleRng` is passed
/// down the call chain so a seed plus an action sequence replays exactly.
/// Each roll carries a short reason that shows up in trace logs and in the
/// panic message of an exhausted [`ScriptedRng`].
pub trait BattleRng {
    /// Uniform value in `0..bound`. `bound` must be at least 1.
    fn next_below(&mut self, bound: u32, reason: &str) -> u32;

    /// `true` with `percent`% probability. 0 and 100+ resolve without a roll.
    fn percent_check(&mut self, percent: u8, reason: &str) -> bool {
        match percent {
            0 => false,
            p if p >= 100 => true,
            p => self.next_below(100, reason) < p as u32,
        }
    }

    /// `true` with probability `1/n`. `n <= 1` resolves without a roll.
    fn one_in(&mut self, n: u32, reason: &str) -> bool {
        if n <= 1 {
            return true;
        }
        self.next_below(n, reason) == 0
    }

    /// Uniform value in `low..=high`. A single-value range resolves without a roll.
    fn range_inclusive(&mut self, low: u32, high: u32, reason: &str) -> u32 {
        if high <= low {
            return low;
        }
        low + self.next_below(high - low + 1, reason)
    }

    fn coin_flip(&mut self, reason: &str) -> bool {
        self.next_below(2, reason) == 0
    }
}

/// Seedable generator for real play and statistical tests.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    rng: StdRng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn initial_seed(&self) -> u64 {
        self.seed
    }
}

impl BattleRng for SeededRng {
    fn next_below(&mut self, bound: u32, reason: &str) -> u32 {
        let value = self.rng.random_range(0..bound.max(1));
        trace!("[RNG] rolled {} (0..{}) for: {}", value, bound, reason);
        value
    }
}

/// Replays a fixed list of outcomes, for exact scenario tests.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    outcomes: Vec<u32>,
    index: usize,
}

impl ScriptedRng {
    pub fn new(outcomes: Vec<u32>) -> Self {
        Self { outcomes, index: 0 }
    }

    /// Number of scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.outcomes.len() - self.index
    }
}

impl BattleRng for ScriptedRng {
    fn next_below(&mut self, bound: u32, reason: &str) -> u32 {
        if self.index >= self.outcomes.len() {
            panic!(
                "ScriptedRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = self.outcomes[self.index];
        if outcome >= bound.max(1) {
            panic!(
                "ScriptedRng value {} is out of range 0..{} for: '{}'",
                outcome, bound, reason
            );
        }
        trace!("[RNG] consumed {} for: {}", outcome, reason);
        self.index += 1;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        let left: Vec<u32> = (0..50).map(|_| a.next_below(1000, "test")).collect();
        let right: Vec<u32> = (0..50).map(|_| b.next_below(1000, "test")).collect();
        assert_eq!(left, right);
        assert_eq!(a.initial_seed(), 42);
    }

    #[test]
    fn certain_checks_consume_nothing() {
        let mut rng = ScriptedRng::new(vec![]);
        assert!(rng.percent_check(100, "certain"));
        assert!(!rng.percent_check(0, "never"));
        assert!(rng.one_in(1, "certain"));
        assert_eq!(rng.range_inclusive(3, 3, "single"), 3);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn scripted_helpers_map_values() {
        let mut rng = ScriptedRng::new(vec![24, 25, 0, 15, 1]);
        assert!(rng.percent_check(25, "hit"));
        assert!(!rng.percent_check(25, "miss"));
        assert!(rng.one_in(16, "crit"));
        assert_eq!(rng.range_inclusive(85, 100, "spread"), 100);
        assert!(!rng.coin_flip("tie"));
    }

    #[test]
    #[should_panic(expected = "ScriptedRng exhausted")]
    fn exhausted_script_panics_with_reason() {
        let mut rng = ScriptedRng::new(vec![]);
        rng.next_below(10, "accuracy");
    }
}
