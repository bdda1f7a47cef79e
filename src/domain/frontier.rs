//! Random-sampling frontier search.
//!
//! Draws `samples` independent weight vectors, evaluates each one, keeps every
//! (weights, return, risk) record and selects the minimum-risk record.
//!
//! Selection uses a strict `<` over sampling order, so among equal risks the
//! earliest sample wins. The parallel search preserves this by reducing batch
//! results in batch order.
//!
//! This is not a quadratic optimizer. Quality depends on `samples` and on the
//! asset count: uniform draws cover the weight simplex more sparsely as the
//! number of assets grows, so the selected portfolio can sit well above the
//! true minimum-variance risk for larger universes.

use crate::domain::error::FrontierError;
use crate::domain::evaluator::evaluate;
use crate::domain::return_stats::ReturnStats;
use crate::domain::weights::{WeightVector, sample_weights};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Sample count used when none is configured.
pub const DEFAULT_SAMPLES: usize = 10_000;

/// Upper bound on samples per run; every sample is kept in memory.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Samples drawn per independently seeded batch in [`search_parallel`].
pub const BATCH_SIZE: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub samples: usize,
    /// Fixed seed for reproducible runs; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSample {
    pub weights: WeightVector,
    pub expected_return: f64,
    pub risk: f64,
}

/// Minimum-risk sample of a run and its position in sampling order.
#[derive(Debug, Clone, PartialEq)]
pub struct BestCandidate {
    pub index: usize,
    pub sample: PortfolioSample,
}

impl BestCandidate {
    pub fn weights(&self) -> &WeightVector {
        &self.sample.weights
    }

    pub fn expected_return(&self) -> f64 {
        self.sample.expected_return
    }

    pub fn risk(&self) -> f64 {
        self.sample.risk
    }

    /// Weights keyed by ticker, in the order the tickers are given.
    pub fn allocation(&self, tickers: &[String]) -> Vec<(String, f64)> {
        tickers
            .iter()
            .cloned()
            .zip(self.sample.weights.iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrontierResult {
    /// Every evaluated sample, in sampling order.
    pub samples: Vec<PortfolioSample>,
    pub best: BestCandidate,
}

impl FrontierResult {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// (risk, expected return) pairs for plotting.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples.iter().map(|s| (s.risk, s.expected_return))
    }

    pub fn risk_range(&self) -> (f64, f64) {
        min_max(self.samples.iter().map(|s| s.risk))
    }

    pub fn return_range(&self) -> (f64, f64) {
        min_max(self.samples.iter().map(|s| s.expected_return))
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Running minimum over samples seen in order.
#[derive(Debug)]
struct BestTracker {
    index: Option<usize>,
    risk: f64,
}

impl BestTracker {
    fn new() -> Self {
        Self {
            index: None,
            risk: f64::INFINITY,
        }
    }

    fn consider(&mut self, index: usize, risk: f64) {
        if risk < self.risk {
            self.index = Some(index);
            self.risk = risk;
        }
    }

    fn finish(self, samples: Vec<PortfolioSample>) -> Result<FrontierResult, FrontierError> {
        let index = self.index.ok_or_else(|| FrontierError::NoValidPortfolio {
            reason: "no sampled portfolio had a finite risk".into(),
        })?;
        let best = BestCandidate {
            index,
            sample: samples[index].clone(),
        };
        Ok(FrontierResult { samples, best })
    }
}

fn check_request(assets: usize, samples: usize) -> Result<(), FrontierError> {
    if samples == 0 {
        return Err(FrontierError::NoValidPortfolio {
            reason: "sample count must be positive".into(),
        });
    }
    if samples > MAX_SAMPLES {
        return Err(FrontierError::NoValidPortfolio {
            reason: format!("sample count {samples} exceeds the limit of {MAX_SAMPLES}"),
        });
    }
    if assets < 2 {
        return Err(FrontierError::NoValidPortfolio {
            reason: format!("need at least 2 assets, got {assets}"),
        });
    }
    Ok(())
}

fn draw_sample<R: Rng + ?Sized>(
    rng: &mut R,
    stats: &ReturnStats,
) -> Result<PortfolioSample, FrontierError> {
    let weights = sample_weights(rng, stats.asset_count())?;
    let performance = evaluate(&weights, stats.mean(), stats.covariance())?;
    Ok(PortfolioSample {
        weights,
        expected_return: performance.expected_return,
        risk: performance.risk,
    })
}

/// Sequential search seeded from `config`.
pub fn run(stats: &ReturnStats, config: &SearchConfig) -> Result<FrontierResult, FrontierError> {
    let mut rng = config.rng();
    search(stats, config, &mut rng)
}

pub fn search<R: Rng + ?Sized>(
    stats: &ReturnStats,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<FrontierResult, FrontierError> {
    search_with_cancel(stats, config, rng, &AtomicBool::new(false))
}

/// Sequential search that checks `cancel` before every sample.
pub fn search_with_cancel<R: Rng + ?Sized>(
    stats: &ReturnStats,
    config: &SearchConfig,
    rng: &mut R,
    cancel: &AtomicBool,
) -> Result<FrontierResult, FrontierError> {
    check_request(stats.asset_count(), config.samples)?;
    debug!(
        samples = config.samples,
        assets = stats.asset_count(),
        "starting frontier search"
    );

    let mut samples = Vec::with_capacity(config.samples);
    let mut tracker = BestTracker::new();

    for i in 0..config.samples {
        if cancel.load(Ordering::Relaxed) {
            info!(completed = i, "frontier search cancelled");
            return Err(FrontierError::Cancelled { completed: i });
        }
        let sample = draw_sample(rng, stats)?;
        tracker.consider(i, sample.risk);
        samples.push(sample);
    }

    let result = tracker.finish(samples)?;
    info!(
        samples = result.len(),
        best_index = result.best.index,
        best_risk = result.best.risk(),
        "frontier search complete"
    );
    Ok(result)
}

fn batch_seed(seed: u64, batch: usize) -> u64 {
    seed ^ (batch as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Batched search across the rayon pool.
///
/// Batch `k` draws from its own generator seeded by `(seed, k)`, and batches
/// are concatenated in order before selection. The result depends only on
/// the seed and sample count, not on thread scheduling. It differs from the
/// sequential search for the same seed because the random streams differ.
#[cfg(feature = "parallel")]
pub fn search_parallel(
    stats: &ReturnStats,
    config: &SearchConfig,
) -> Result<FrontierResult, FrontierError> {
    use rayon::prelude::*;

    check_request(stats.asset_count(), config.samples)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let batches = config.samples.div_ceil(BATCH_SIZE);
    debug!(
        samples = config.samples,
        batches,
        assets = stats.asset_count(),
        "starting parallel frontier search"
    );

    let per_batch: Vec<Vec<PortfolioSample>> = (0..batches)
        .into_par_iter()
        .map(|b| {
            let mut rng = StdRng::seed_from_u64(batch_seed(seed, b));
            let len = BATCH_SIZE.min(config.samples - b * BATCH_SIZE);
            (0..len)
                .map(|_| draw_sample(&mut rng, stats))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let samples: Vec<PortfolioSample> = per_batch.into_iter().flatten().collect();
    let mut tracker = BestTracker::new();
    for (i, sample) in samples.iter().enumerate() {
        tracker.consider(i, sample.risk);
    }

    let result = tracker.finish(samples)?;
    info!(
        samples = result.len(),
        best_index = result.best.index,
        best_risk = result.best.risk(),
        "parallel frontier search complete"
    );
    Ok(result)
}
