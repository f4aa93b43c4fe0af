//! Deterministic utilities for reproducible training
//!
//! Provides a seeded LCG and the train/test split built on it, so that the
//! same dataset and seed always yield the same partition on every platform.

use std::num::Wrapping;

/// Linear Congruential Generator for deterministic pseudo-randomness
/// Uses the 64-bit MMIX constants (Knuth)
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<u64>,
}

impl LcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        let mut rng = Self {
            state: Wrapping(seed),
        };
        // Discard the first output so nearby seeds diverge immediately.
        rng.next_u64();
        rng
    }

    /// Next raw value. The high half carries the usable entropy.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        self.state.0
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        ((self.next_u64() >> 32) % max as u64) as usize
    }
}

/// Row indices of the two partitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Number of held-out rows: `ceil(n * test_size)`.
pub fn test_count(n: usize, test_size: f64) -> usize {
    ((n as f64) * test_size).ceil() as usize
}

/// Shuffle `0..n` with the seeded LCG (Fisher-Yates) and cut off the
/// held-out rows from the front.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = LcgRng::new(seed);

    for i in (1..n).rev() {
        let j = rng.next_range(i + 1);
        indices.swap(i, j);
    }

    let n_test = test_count(n, test_size).min(n);
    let train = indices.split_off(n_test);
    Split {
        train,
        test: indices,
    }
}
