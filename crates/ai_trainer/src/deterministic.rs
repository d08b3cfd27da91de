//! Deterministic utilities for reproducible training
//!
//! Provides an LCG-based RNG, the seeded train/test split and the
//! tie-breaking order for candidate splits, so that identical inputs always
//! yield identical models.

use std::num::Wrapping;

use crate::errors::{PipelineError, Result};

/// Linear Congruential Generator (glibc constants)
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<i64>,
}

impl LcgRng {
    const MULTIPLIER: i64 = 1103515245;
    const INCREMENT: i64 = 12345;
    const MODULUS: i64 = 1 << 31;

    pub fn new(seed: u64) -> Self {
        Self {
            state: Wrapping((seed % Self::MODULUS as u64) as i64),
        }
    }

    /// Next value in `[0, MODULUS)`
    pub fn next_i64(&mut self) -> i64 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        self.state.0 & (Self::MODULUS - 1)
    }

    /// Next value in `[0, max)`, taken from the high bits of the state
    pub fn next_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        ((self.next_i64() as u128 * max as u128) >> 31) as usize
    }

    /// Fisher-Yates shuffle of `0..n`
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = self.next_range(i + 1);
            indices.swap(i, j);
        }
        indices
    }
}

/// Row indices of a held-out split
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `n` rows with `seed` and hold out `ceil(test_fraction * n)` of them.
///
/// The first rows of the permutation form the test side.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<SplitIndices> {
    let n_test = (test_fraction * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);

    if n_test == 0 || n_train == 0 {
        return Err(PipelineError::ModelFit(format!(
            "with {} sample(s) and test fraction {} the {} set would be empty",
            n,
            test_fraction,
            if n_train == 0 { "training" } else { "test" }
        )));
    }

    let mut permutation = LcgRng::new(seed).permutation(n);
    let train = permutation.split_off(n_test);

    Ok(SplitIndices {
        train,
        test: permutation,
    })
}

/// Ordering used to pick between splits of equal gain
/// (lower feature, then lower threshold, then lower node id wins)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SplitTieBreaker {
    pub feature_idx: usize,
    pub threshold: i64,
    pub node_id: usize,
}

impl SplitTieBreaker {
    pub fn new(feature_idx: usize, threshold: i64, node_id: usize) -> Self {
        Self {
            feature_idx,
            threshold,
            node_id,
        }
    }
}
