//! Daily adjusted-close price observation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub ticker: String,
    pub date: NaiveDate,
    pub adj_close: f64,
}

impl PricePoint {
    pub fn new(ticker: impl Into<String>, date: NaiveDate, adj_close: f64) -> Self {
        Self {
            ticker: ticker.into(),
            date,
            adj_close,
        }
    }
}

/// (curr - prev) / prev, or `None` when the prior price cannot be divided by.
pub fn period_return(prev: f64, curr: f64) -> Option<f64> {
    if prev == 0.0 || !prev.is_finite() || !curr.is_finite() {
        return None;
    }
    Some((curr - prev) / prev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_return_rising() {
        // (110 - 100) / 100 = 0.1
        let r = period_return(100.0, 110.0).unwrap();
        assert!((r - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn period_return_falling() {
        let r = period_return(100.0, 90.0).unwrap();
        assert!((r + 0.1).abs() < 1e-12);
    }

    #[test]
    fn period_return_to_zero_is_total_loss() {
        assert_eq!(period_return(10.0, 0.0), Some(-1.0));
    }

    #[test]
    fn period_return_from_zero_is_undefined() {
        assert_eq!(period_return(0.0, 10.0), None);
    }

    #[test]
    fn period_return_nan_is_undefined() {
        assert_eq!(period_return(10.0, f64::NAN), None);
        assert_eq!(period_return(f64::NAN, 10.0), None);
    }
}
