//! Price data access port trait.

use crate::domain::error::FrontierError;
use crate::domain::price::PricePoint;
use crate::domain::universe::DateRange;
use chrono::NaiveDate;

pub trait PriceSource {
    /// Adjusted-close prices for `ticker` within the inclusive `range`,
    /// sorted by date.
    fn fetch_prices(&self, ticker: &str, range: DateRange)
    -> Result<Vec<PricePoint>, FrontierError>;

    fn list_tickers(&self) -> Result<Vec<String>, FrontierError>;

    /// First date, last date and row count, or `None` if the ticker has no data.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, FrontierError>;
}
