//! Report generation port trait.

use crate::domain::error::FrontierError;
use crate::domain::frontier::FrontierResult;
use crate::domain::universe::DateRange;

/// Everything a reporter needs about one completed run.
#[derive(Debug, Clone)]
pub struct FrontierReport<'a> {
    pub tickers: &'a [String],
    pub range: DateRange,
    pub observations: usize,
    pub result: &'a FrontierResult,
}

/// Port for writing frontier reports.
pub trait ReportPort {
    fn write(&self, report: &FrontierReport<'_>, output_path: &str) -> Result<(), FrontierError>;
}
