//! Random long-only allocation weights.

use crate::domain::error::FrontierError;
use rand::Rng;

/// Allocation weights summing to 1.0, one per asset.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn new(weights: Vec<f64>) -> Self {
        Self(weights)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl std::ops::Index<usize> for WeightVector {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

/// Draw `n` uniform [0, 1) values and scale them to sum to 1.
///
/// Weights are non-negative because the draws are, not because of any
/// constraint; no short positions can be produced.
pub fn sample_weights<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
) -> Result<WeightVector, FrontierError> {
    if n < 2 {
        return Err(FrontierError::NoValidPortfolio {
            reason: format!("need at least 2 assets, got {n}"),
        });
    }

    loop {
        let draws: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
        let total: f64 = draws.iter().sum();
        // all-zero draws cannot be normalized
        if total > 0.0 {
            return Ok(WeightVector(draws.into_iter().map(|w| w / total).collect()));
        }
    }
}
