//! Price columns aligned on a common date index.

use crate::domain::error::FrontierError;
use crate::domain::price::PricePoint;
use crate::domain::universe::{DateRange, Universe};
use crate::ports::data_port::PriceSource;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

/// One price column per asset, rows in chronological order.
///
/// Every column has exactly `dates.len()` entries. Dates missing for any
/// asset are dropped during alignment, never filled.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSeries {
    tickers: Vec<String>,
    dates: Vec<NaiveDate>,
    prices: Vec<Vec<f64>>,
}

impl AssetSeries {
    /// Build from pre-aligned columns.
    pub fn from_columns(
        tickers: Vec<String>,
        dates: Vec<NaiveDate>,
        prices: Vec<Vec<f64>>,
    ) -> Result<Self, FrontierError> {
        if prices.len() != tickers.len() {
            return Err(FrontierError::DimensionMismatch {
                what: "price columns",
                expected: tickers.len(),
                actual: prices.len(),
            });
        }
        if let Some(column) = prices.iter().find(|c| c.len() != dates.len()) {
            return Err(FrontierError::DimensionMismatch {
                what: "price rows",
                expected: dates.len(),
                actual: column.len(),
            });
        }
        Ok(Self {
            tickers,
            dates,
            prices,
        })
    }

    /// Inner-join per-ticker price histories on date.
    pub fn align(columns: Vec<(String, Vec<PricePoint>)>) -> Result<Self, FrontierError> {
        let mut indexed: Vec<(String, HashMap<NaiveDate, f64>)> = Vec::with_capacity(columns.len());
        for (ticker, points) in columns {
            if points.is_empty() {
                return Err(FrontierError::NoData { ticker });
            }
            let by_date = points.iter().map(|p| (p.date, p.adj_close)).collect();
            indexed.push((ticker, by_date));
        }

        let all_dates: BTreeSet<NaiveDate> = indexed
            .iter()
            .flat_map(|(_, by_date)| by_date.keys().copied())
            .collect();
        let dates: Vec<NaiveDate> = all_dates
            .iter()
            .copied()
            .filter(|d| indexed.iter().all(|(_, by_date)| by_date.contains_key(d)))
            .collect();

        let dropped = all_dates.len() - dates.len();
        if dropped > 0 {
            warn!(dropped, "dropped dates missing for at least one ticker");
        }

        let tickers = indexed.iter().map(|(t, _)| t.clone()).collect();
        let prices = indexed
            .iter()
            .map(|(_, by_date)| dates.iter().map(|d| by_date[d]).collect())
            .collect();

        Ok(Self {
            tickers,
            dates,
            prices,
        })
    }

    /// Fetch every ticker of `universe` over `range` and align the results.
    pub fn load(
        source: &dyn PriceSource,
        universe: &Universe,
        range: DateRange,
    ) -> Result<Self, FrontierError> {
        let mut columns = Vec::with_capacity(universe.count());
        for ticker in &universe.tickers {
            let points = source.fetch_prices(ticker, range)?;
            info!(ticker = %ticker, rows = points.len(), "loaded prices");
            columns.push((ticker.clone(), points));
        }
        Self::align(columns)
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn asset_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn column(&self, asset: usize) -> &[f64] {
        &self.prices[asset]
    }

    pub fn price(&self, asset: usize, row: usize) -> f64 {
        self.prices[asset][row]
    }
}
