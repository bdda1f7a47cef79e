//! Expected return and risk of a single allocation.

use crate::domain::error::FrontierError;
use crate::domain::return_stats::{CovarianceMatrix, ReturnStats};
use crate::domain::weights::WeightVector;

/// Expected return and standard deviation of one allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    pub expected_return: f64,
    pub risk: f64,
}

/// Evaluate `weights` against mean returns and their covariance.
///
/// All three inputs must describe the same number of assets.
pub fn evaluate(
    weights: &WeightVector,
    mean: &[f64],
    covariance: &CovarianceMatrix,
) -> Result<Performance, FrontierError> {
    let n = weights.len();
    if mean.len() != n {
        return Err(FrontierError::DimensionMismatch {
            what: "mean returns",
            expected: n,
            actual: mean.len(),
        });
    }
    if covariance.dim() != n {
        return Err(FrontierError::DimensionMismatch {
            what: "covariance matrix",
            expected: n,
            actual: covariance.dim(),
        });
    }

    let w = weights.as_slice();
    let expected_return = w.iter().zip(mean).map(|(wi, mi)| wi * mi).sum();
    // rounding can push a PSD quadratic form slightly below zero
    let quadratic = covariance.quadratic_form(w)?;
    let variance = if quadratic < 0.0 { 0.0 } else { quadratic };

    Ok(Performance {
        expected_return,
        risk: variance.sqrt(),
    })
}

pub fn evaluate_with(
    weights: &WeightVector,
    stats: &ReturnStats,
) -> Result<Performance, FrontierError> {
    evaluate(weights, stats.mean(), stats.covariance())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn cov(rows: Vec<Vec<f64>>) -> CovarianceMatrix {
        CovarianceMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn two_asset_portfolio() {
        let w = WeightVector::new(vec![0.5, 0.5]);
        let c = cov(vec![vec![0.04, 0.0], vec![0.0, 0.09]]);
        let p = evaluate(&w, &[0.10, 0.20], &c).unwrap();

        assert_abs_diff_eq!(p.expected_return, 0.15, epsilon = 1e-12);
        // 0.25 * 0.04 + 0.25 * 0.09 = 0.0325
        assert_abs_diff_eq!(p.risk, 0.0325_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn full_weight_on_one_asset_gives_its_volatility() {
        let w = WeightVector::new(vec![0.0, 1.0, 0.0]);
        let c = cov(vec![
            vec![0.04, 0.01, 0.00],
            vec![0.01, 0.09, 0.02],
            vec![0.00, 0.02, 0.16],
        ]);
        let p = evaluate(&w, &[0.01, 0.02, 0.03], &c).unwrap();
        assert_abs_diff_eq!(p.expected_return, 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(p.risk, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn negative_quadratic_form_is_clamped() {
        // not PSD on purpose: w'Σw = -0.01 for equal weights
        let w = WeightVector::new(vec![0.5, 0.5]);
        let c = cov(vec![vec![0.0, -0.02], vec![-0.02, 0.0]]);
        let p = evaluate(&w, &[0.0, 0.0], &c).unwrap();
        assert_eq!(p.risk, 0.0);
    }

    #[test]
    fn mean_length_mismatch() {
        let w = WeightVector::new(vec![0.5, 0.5]);
        let c = cov(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let err = evaluate(&w, &[0.1, 0.2, 0.3], &c).unwrap_err();
        assert!(matches!(
            err,
            FrontierError::DimensionMismatch { what: "mean returns", expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn covariance_dim_mismatch() {
        let w = WeightVector::new(vec![0.5, 0.5]);
        let c = cov(vec![vec![1.0]]);
        let err = evaluate(&w, &[0.1, 0.2], &c).unwrap_err();
        assert!(matches!(
            err,
            FrontierError::DimensionMismatch { what: "covariance matrix", .. }
        ));
    }

    #[test]
    fn evaluate_with_stats() {
        let stats = ReturnStats::new(
            vec![0.01, 0.03],
            cov(vec![vec![0.01, 0.0], vec![0.0, 0.01]]),
            30,
        )
        .unwrap();
        let p = evaluate_with(&WeightVector::new(vec![0.5, 0.5]), &stats).unwrap();
        assert_abs_diff_eq!(p.expected_return, 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(p.risk, 0.005_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn nan_covariance_propagates() {
        let w = WeightVector::new(vec![0.5, 0.5]);
        let c = cov(vec![vec![f64::NAN, 0.0], vec![0.0, 0.01]]);
        let p = evaluate(&w, &[0.0, 0.0], &c).unwrap();
        assert!(p.risk.is_nan());
    }

    proptest! {
        #[test]
        fn risk_is_never_negative(
            raw in prop::collection::vec(0.0f64..1.0, 3),
            a in -0.5f64..0.5,
            b in -0.5f64..0.5,
            c in -0.5f64..0.5,
        ) {
            let total: f64 = raw.iter().sum();
            prop_assume!(total > 0.0);
            let w = WeightVector::new(raw.iter().map(|x| x / total).collect());
            // L Lᵀ is positive semi-definite for any lower-triangular L
            let l = [[a, 0.0, 0.0], [b, c, 0.0], [c, a, b]];
            let rows: Vec<Vec<f64>> = (0..3)
                .map(|i| {
                    (0..3)
                        .map(|j| (0..3).map(|k| l[i][k] * l[j][k]).sum::<f64>())
                        .collect()
                })
                .collect();
            let p = evaluate(&w, &[0.0; 3], &cov(rows)).unwrap();
            prop_assert!(p.risk >= 0.0);
            prop_assert!(p.risk.is_finite());
        }
    }
}
