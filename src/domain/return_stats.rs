//! Per-asset mean returns and the return covariance matrix.
//!
//! Covariance uses the sample divisor `n - 1`, matching the variance
//! convention the evaluator's risk figure is read against.

use crate::domain::asset_series::AssetSeries;
use crate::domain::error::FrontierError;
use crate::domain::price::period_return;
use tracing::{debug, warn};

/// Minimum number of return observations for a sample covariance.
pub const MIN_OBSERVATIONS: usize = 2;

/// Square, row-major covariance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl CovarianceMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, FrontierError> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(FrontierError::DimensionMismatch {
                    what: "covariance row",
                    expected: dim,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self { dim, data })
    }

    fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![0.0; dim * dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.dim + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Quadratic form `wᵀ Σ w`.
    pub fn quadratic_form(&self, w: &[f64]) -> Result<f64, FrontierError> {
        if w.len() != self.dim {
            return Err(FrontierError::DimensionMismatch {
                what: "quadratic form weights",
                expected: self.dim,
                actual: w.len(),
            });
        }
        Ok((0..self.dim)
            .map(|i| w[i] * self.row(i).iter().zip(w).map(|(c, wj)| c * wj).sum::<f64>())
            .sum())
    }
}

/// Immutable statistics for one optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStats {
    mean: Vec<f64>,
    covariance: CovarianceMatrix,
    observations: usize,
}

impl ReturnStats {
    pub fn new(
        mean: Vec<f64>,
        covariance: CovarianceMatrix,
        observations: usize,
    ) -> Result<Self, FrontierError> {
        if covariance.dim() != mean.len() {
            return Err(FrontierError::DimensionMismatch {
                what: "covariance matrix",
                expected: mean.len(),
                actual: covariance.dim(),
            });
        }
        Ok(Self {
            mean,
            covariance,
            observations,
        })
    }

    /// Period returns of every asset, then their means and sample covariance.
    ///
    /// A row whose return is undefined for any asset is dropped for all assets;
    /// this discards the first row of the series.
    pub fn from_series(series: &AssetSeries) -> Result<Self, FrontierError> {
        let assets = series.asset_count();
        let mut returns: Vec<Vec<f64>> = vec![Vec::new(); assets];

        for row in 1..series.row_count() {
            let period: Option<Vec<f64>> = (0..assets)
                .map(|a| period_return(series.price(a, row - 1), series.price(a, row)))
                .collect();

            match period {
                Some(values) => {
                    for (column, r) in returns.iter_mut().zip(values) {
                        column.push(r);
                    }
                }
                None => warn!(date = %series.dates()[row], "dropping row with undefined return"),
            }
        }

        let observations = returns.first().map_or(0, Vec::len);
        if observations < MIN_OBSERVATIONS {
            return Err(FrontierError::InsufficientData {
                observations,
                minimum: MIN_OBSERVATIONS,
            });
        }

        let means: Vec<f64> = returns.iter().map(|r| mean(r)).collect();

        let mut covariance = CovarianceMatrix::zeros(assets);
        let divisor = (observations - 1) as f64;
        for i in 0..assets {
            for j in i..assets {
                let c = returns[i]
                    .iter()
                    .zip(&returns[j])
                    .map(|(ri, rj)| (ri - means[i]) * (rj - means[j]))
                    .sum::<f64>()
                    / divisor;
                covariance.set(i, j, c);
                covariance.set(j, i, c);
            }
        }

        debug!(assets, observations, "built return statistics");

        Ok(Self {
            mean: means,
            covariance,
            observations,
        })
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn covariance(&self) -> &CovarianceMatrix {
        &self.covariance
    }

    pub fn asset_count(&self) -> usize {
        self.mean.len()
    }

    pub fn observations(&self) -> usize {
        self.observations
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
