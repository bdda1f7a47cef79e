//! Ticker universe and date range parsing.
//!
//! Parses ticker lists from configuration or the command line and checks the
//! count bounds and date formats before any price data is requested.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;

pub const MIN_TICKERS: usize = 2;
pub const MAX_TICKERS: usize = 10;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),

    #[error("expected between 2 and 10 tickers, got {count}")]
    TickerCount { count: usize },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("start date {start} must be before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub tickers: Vec<String>,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.tickers.len()
    }
}

/// Inclusive `[start, end]` trading date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, UniverseError> {
        if start >= end {
            return Err(UniverseError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, UniverseError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, UniverseError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| UniverseError::InvalidDate(trimmed.to_string()))
}

pub fn parse_tickers(input: &str) -> Result<Universe, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    if !(MIN_TICKERS..=MAX_TICKERS).contains(&tickers.len()) {
        return Err(UniverseError::TickerCount {
            count: tickers.len(),
        });
    }

    Ok(Universe { tickers })
}
