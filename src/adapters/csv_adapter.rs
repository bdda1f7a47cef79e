//! CSV file price data adapter.
//!
//! Reads `<base_path>/<TICKER>.csv` files with a header row containing a
//! `date` column and an `adj_close` column (`Adj Close` and plain `close`
//! are accepted as well).

use crate::domain::error::FrontierError;
use crate::domain::price::PricePoint;
use crate::domain::universe::DateRange;
use crate::ports::data_port::PriceSource;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const PRICE_COLUMNS: [&str; 3] = ["adj_close", "adj close", "close"];

pub struct CsvPriceSource {
    base_path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_all(&self, ticker: &str) -> Result<Vec<PricePoint>, FrontierError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| FrontierError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| FrontierError::Data {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();

        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };
        let date_col = find(&["date"]).ok_or_else(|| FrontierError::Data {
            reason: format!("missing date column in {}", path.display()),
        })?;
        let price_col = PRICE_COLUMNS
            .iter()
            .find_map(|name| find(&[*name]))
            .ok_or_else(|| FrontierError::Data {
                reason: format!("missing adj_close column in {}", path.display()),
            })?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| FrontierError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                FrontierError::Data {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let price_str = record.get(price_col).unwrap_or_default().trim();
            let adj_close: f64 = price_str.parse().map_err(|e| FrontierError::Data {
                reason: format!("invalid price '{}' on {}: {}", price_str, date, e),
            })?;

            points.push(PricePoint::new(ticker, date, adj_close));
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl PriceSource for CsvPriceSource {
    fn fetch_prices(
        &self,
        ticker: &str,
        range: DateRange,
    ) -> Result<Vec<PricePoint>, FrontierError> {
        let mut points = self.read_all(ticker)?;
        points.retain(|p| range.contains(p.date));
        Ok(points)
    }

    fn list_tickers(&self) -> Result<Vec<String>, FrontierError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| FrontierError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FrontierError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(ticker) = name_str.strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, FrontierError> {
        if !self.csv_path(ticker).exists() {
            return Ok(None);
        }
        let points = self.read_all(ticker)?;
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, points.len()))),
            _ => Ok(None),
        }
    }
}
