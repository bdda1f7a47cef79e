#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use frontier::domain::error::FrontierError;
use frontier::domain::universe::DateRange;
pub use frontier::domain::price::PricePoint;
use frontier::ports::data_port::PriceSource;
use std::collections::HashMap;

pub struct MockPriceSource {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PriceSource for MockPriceSource {
    fn fetch_prices(
        &self,
        ticker: &str,
        range: DateRange,
    ) -> Result<Vec<PricePoint>, FrontierError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(FrontierError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| range.contains(p.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_tickers(&self) -> Result<Vec<String>, FrontierError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, FrontierError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(FrontierError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(points) if !points.is_empty() => {
                let min = points.iter().map(|p| p.date).min().unwrap();
                let max = points.iter().map(|p| p.date).max().unwrap();
                Ok(Some((min, max, points.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One point per consecutive day starting at `start`.
pub fn make_points(ticker: &str, start: &str, prices: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(ticker, start + Duration::days(i as i64), p))
        .collect()
}

/// Deterministic wavy price path; different `phase` values give
/// imperfectly correlated assets.
pub fn generate_prices(count: usize, start_price: f64, drift: f64, phase: f64) -> Vec<f64> {
    let mut price = start_price;
    (0..count)
        .map(|i| {
            let r = drift + 0.01 * ((i as f64) * 0.7 + phase).sin();
            price *= 1.0 + r;
            price
        })
        .collect()
}

/// `n` tickers named `T0`..`Tn` with generated histories of `count` days.
pub fn mock_universe(n: usize, count: usize) -> (MockPriceSource, Vec<String>) {
    let mut source = MockPriceSource::new();
    let mut tickers = Vec::with_capacity(n);
    for i in 0..n {
        let ticker = format!("T{i}");
        let prices = generate_prices(count, 50.0 + 10.0 * i as f64, 0.0005 * i as f64, i as f64);
        source = source.with_prices(&ticker, make_points(&ticker, "2024-01-01", &prices));
        tickers.push(ticker);
    }
    (source, tickers)
}
